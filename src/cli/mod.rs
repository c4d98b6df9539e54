pub mod args;

use clap::Parser;

pub use args::{Arguments, Format};

pub fn parse() -> Arguments {
    Arguments::parse()
}
