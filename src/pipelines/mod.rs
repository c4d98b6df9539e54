pub mod fastqc;
