pub mod command;
pub mod file;
pub mod notify;
pub mod process;
pub mod streams;
pub mod system;
