use std::collections::HashMap;
use std::path::PathBuf;

use lazy_static::lazy_static;
use thiserror::Error;

use crate::cli::Arguments;
use crate::utils::command::CommandLine;

// External software
pub const FASTQC_TAG: &str = "fastqc";

lazy_static! {
    /// Minimum supported tool versions as (major, minor).
    pub static ref TOOL_VERSIONS: HashMap<&'static str, (u32, u32)> = {
        let mut m = HashMap::new();
        m.insert(FASTQC_TAG, (0, 11));

        m
    };
}

// Static Parameters

pub const KMER_MIN: u32 = 2;
pub const KMER_MAX: u32 = 10;
pub const KMER_DEFAULT: u32 = 7;

pub const DEFAULT_STAGING_DIR: &str = "fastqc";

pub const COMPRESSION_EXTS: &[&'static str] = &["gz", "bz2"];
pub const FASTQ_EXTS: &[&'static str] = &["fastq", "fq"];
pub const ALIGNMENT_EXTS: &[&'static str] = &["sam", "bam"];
pub const FAST5_EXTS: &[&'static str] = &["fast5"];


#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Failed to launch {tool} ({command}): {error}")]
    ProcessLaunch {
        tool: String,
        command: CommandLine,
        error: String,
    },

    #[error("{tool} exited with code {exit_code} ({command}): {stderr}")]
    ProcessExecution {
        tool: String,
        exit_code: i32,
        stderr: String,
        command: CommandLine,
    },

    #[error("I/O error: {0}")]
    IOError(String),
}


pub struct RunConfig {
    pub cwd: PathBuf,
    pub staging_dir: PathBuf,
    pub args: Arguments,
}
