use std::fmt;

use clap::{Parser, ValueEnum};

use crate::config::defs::{DEFAULT_STAGING_DIR, FASTQC_TAG, KMER_DEFAULT};

/// Sequence formats FastQC can be forced into with `--format`.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Format {
    #[value(name = "fastq")]
    Fastq,
    #[value(name = "bam")]
    Bam,
    #[value(name = "sam")]
    Sam,
    #[value(name = "bam_mapped")]
    BamMapped,
    #[value(name = "sam_mapped")]
    SamMapped,
}

impl Format {
    /// Name FastQC expects on its command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Fastq => "fastq",
            Format::Bam => "bam",
            Format::Sam => "sam",
            Format::BamMapped => "bam_mapped",
            Format::SamMapped => "sam_mapped",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "fastqc-pipeline", version, about = "Run FastQC on sequencing files and stage its reports")]
pub struct Arguments {

    #[arg(required = true, help = "Sequencing files or directories to process. Must be FASTQ or BAM/SAM files (fast5 directories with --nano).")]
    pub inputs: Vec<String>,

    #[arg(short = 'o', long = "out", help = "Destination folder for the FastQC reports. Local paths are populated after the run; remote destinations are left to the hosting platform.")]
    pub out_dir: String,

    #[arg(long, default_value = DEFAULT_STAGING_DIR, help = "Local staging directory handed to fastqc --outdir. Must not already exist.")]
    pub staging_dir: String,

    #[arg(short = 'v', long = "verbose", action)]
    pub verbose: bool,

    #[arg(long = "fastqc-bin", env = "FASTQC_BIN", default_value = FASTQC_TAG)]
    pub fastqc_bin: String,

    #[arg(long, help = "Upper bound on threads; defaults to every usable core")]
    pub threads: Option<usize>,

    #[arg(long, action, help = "Files come from raw casava output")]
    pub casava: bool,

    #[arg(long, action, help = "Files come from nanopore sequences and are in fast5 format")]
    pub nano: bool,

    #[arg(long, action, help = "With --casava, keep reads flagged by casava as poor quality")]
    pub nofilter: bool,

    #[arg(long, action, help = "Uncompress the zipped report after it is created")]
    pub extract: bool,

    #[arg(long, action, help = "Disable grouping of bases for reads >50bp")]
    pub nogroup: bool,

    #[arg(long = "min-length", help = "Artificial lower limit on the sequence length shown in the report")]
    pub min_length: Option<u64>,

    #[arg(long, value_enum, help = "Bypass format detection")]
    pub format: Option<Format>,

    #[arg(long, help = "Non-default contaminants file (name[tab]sequence)")]
    pub contaminants: Option<String>,

    #[arg(long, help = "Non-default adapters file (name[tab]sequence)")]
    pub adapters: Option<String>,

    #[arg(long, help = "Non-default limits file for module warn/error thresholds")]
    pub limits: Option<String>,

    #[arg(long, default_value_t = KMER_DEFAULT, help = "Kmer length for the Kmer content module (2-10)")]
    pub kmers: u32,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Arguments::parse_from(["fastqc-pipeline", "-o", "out", "a.fastq"]);
        assert_eq!(args.inputs, vec!["a.fastq".to_string()]);
        assert_eq!(args.kmers, KMER_DEFAULT);
        assert_eq!(args.staging_dir, DEFAULT_STAGING_DIR);
        assert!(args.format.is_none());
        assert!(!args.casava && !args.nano && !args.nofilter && !args.extract && !args.nogroup);
    }

    #[test]
    fn test_format_external_names() {
        let args = Arguments::parse_from(["fastqc-pipeline", "-o", "out", "--format", "bam_mapped", "a.bam"]);
        assert_eq!(args.format, Some(Format::BamMapped));
        assert_eq!(Format::BamMapped.as_str(), "bam_mapped");
        assert_eq!(Format::SamMapped.to_string(), "sam_mapped");
        assert!(Arguments::try_parse_from(["fastqc-pipeline", "-o", "out", "--format", "bamMapped", "a.bam"]).is_err());
    }

    #[test]
    fn test_inputs_required() {
        assert!(Arguments::try_parse_from(["fastqc-pipeline", "-o", "out"]).is_err());
    }
}
