/// Functions and structs for working with creating command-line arguments

use std::fmt;
use std::path::Path;

use crate::config::defs::PipelineError;


/// A program plus its ordered argument tokens, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new<S: Into<String>>(program: S, args: Vec<String>) -> Self {
        CommandLine { program: program.into(), args }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Every token, program first.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<&str> = self.tokens().collect();
        write!(f, "{}", tokens.join(" "))
    }
}


/// Ordered token builder. Tokens are only appended when their predicate holds,
/// and an empty token is rejected instead of being pushed.
pub struct CommandLineBuilder {
    program: String,
    args: Vec<String>,
}

impl CommandLineBuilder {
    pub fn new(program: &str) -> Self {
        CommandLineBuilder { program: program.to_string(), args: Vec::new() }
    }

    pub fn flag_if(mut self, enabled: bool, flag: &str) -> Self {
        if enabled {
            self.args.push(flag.to_string());
        }
        self
    }

    pub fn value<T: fmt::Display>(self, flag: &str, value: T) -> Result<Self, PipelineError> {
        let mut builder = self.arg(flag)?;
        let value = value.to_string();
        builder = builder.arg(&value)?;
        Ok(builder)
    }

    pub fn value_opt<T: fmt::Display>(self, flag: &str, value: Option<T>) -> Result<Self, PipelineError> {
        match value {
            Some(v) => self.value(flag, v),
            None => Ok(self),
        }
    }

    pub fn path_opt(self, flag: &str, path: Option<&Path>) -> Result<Self, PipelineError> {
        self.value_opt(flag, path.map(|p| p.display()))
    }

    pub fn arg(mut self, token: &str) -> Result<Self, PipelineError> {
        if token.is_empty() {
            return Err(PipelineError::Validation(format!(
                "Empty argument after {:?} while building {} command",
                self.args.last().map(String::as_str).unwrap_or(self.program.as_str()),
                self.program
            )));
        }
        self.args.push(token.to_string());
        Ok(self)
    }

    pub fn build(self) -> CommandLine {
        CommandLine::new(self.program, self.args)
    }
}


pub mod fastqc {
    use std::path::{Path, PathBuf};

    use anyhow::{anyhow, Result};
    use log::{debug, warn};

    use super::{CommandLine, CommandLineBuilder};
    use crate::cli::{Arguments, Format};
    use crate::config::defs::{PipelineError, FASTQC_TAG, KMER_DEFAULT, KMER_MAX, KMER_MIN, TOOL_VERSIONS};
    use crate::utils::file::InputResolver;
    use crate::utils::process::run_command;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FastqcOptions {
        pub casava: bool,
        pub nano: bool,
        pub nofilter: bool,
        pub extract: bool,
        pub nogroup: bool,
        pub min_length: Option<u64>,
        pub format: Option<Format>,
        pub contaminants: Option<PathBuf>,
        pub adapters: Option<PathBuf>,
        pub limits: Option<PathBuf>,
        pub kmers: u32,
    }

    impl Default for FastqcOptions {
        fn default() -> Self {
            FastqcOptions {
                casava: false,
                nano: false,
                nofilter: false,
                extract: false,
                nogroup: false,
                min_length: None,
                format: None,
                contaminants: None,
                adapters: None,
                limits: None,
                kmers: KMER_DEFAULT,
            }
        }
    }

    impl FastqcOptions {
        pub fn from_args(args: &Arguments) -> Self {
            FastqcOptions {
                casava: args.casava,
                nano: args.nano,
                nofilter: args.nofilter,
                extract: args.extract,
                nogroup: args.nogroup,
                min_length: args.min_length,
                format: args.format,
                contaminants: args.contaminants.as_ref().map(PathBuf::from),
                adapters: args.adapters.as_ref().map(PathBuf::from),
                limits: args.limits.as_ref().map(PathBuf::from),
                kmers: args.kmers,
            }
        }

        /// Checks the value ranges FastQC accepts.
        pub fn validate(&self) -> Result<(), PipelineError> {
            if !(KMER_MIN..=KMER_MAX).contains(&self.kmers) {
                return Err(PipelineError::Validation(format!(
                    "Kmer size must be between {} and {}, got {}",
                    KMER_MIN, KMER_MAX, self.kmers
                )));
            }
            if self.min_length == Some(0) {
                return Err(PipelineError::Validation("Minimum length must be greater than 0".to_string()));
            }
            Ok(())
        }

        /// Returns a copy whose file references point at local paths.
        pub fn resolve_files(&self, resolver: &dyn InputResolver) -> Result<Self, PipelineError> {
            let resolve = |reference: &Option<PathBuf>| -> Result<Option<PathBuf>, PipelineError> {
                reference
                    .as_ref()
                    .map(|r| resolver.resolve(&r.to_string_lossy()))
                    .transpose()
            };

            Ok(FastqcOptions {
                contaminants: resolve(&self.contaminants)?,
                adapters: resolve(&self.adapters)?,
                limits: resolve(&self.limits)?,
                ..self.clone()
            })
        }
    }

    /// Runs `<program> --version` and returns the reported version, e.g. `v0.12.1`.
    pub async fn fastqc_presence_check(program: &str) -> Result<String> {
        let cmd = CommandLine::new(program, vec!["--version".to_string()]);
        let result = run_command(&cmd)
            .await
            .map_err(|e| anyhow!("{}. Is fastqc installed?", e))?;

        let version = parse_version(&result.stdout)
            .ok_or_else(|| anyhow!("Invalid {} --version output: {}", program, result.stdout))?;

        if let Some(found) = version_number(&version) {
            if let Some(minimum) = TOOL_VERSIONS.get(FASTQC_TAG) {
                if found < *minimum {
                    warn!("{} version {} is older than the minimum supported {}.{}", FASTQC_TAG, version, minimum.0, minimum.1);
                }
            }
        } else {
            debug!("Could not read a numeric version from {}", version);
        }
        Ok(version)
    }

    /// Last whitespace-separated token of the `--version` output.
    pub fn parse_version(stdout: &str) -> Option<String> {
        stdout
            .split_whitespace()
            .last()
            .map(|v| v.to_string())
    }

    pub(crate) fn version_number(version: &str) -> Option<(u32, u32)> {
        let trimmed = version.trim_start_matches(|c: char| c == 'v' || c == 'V');
        let mut parts = trimmed.split('.');
        let major = parts.next()?.parse::<u32>().ok()?;
        let minor = match parts.next() {
            Some(m) => m.parse::<u32>().ok()?,
            None => 0,
        };
        Some((major, minor))
    }

    pub fn validate_inputs(inputs: &[PathBuf]) -> Result<(), PipelineError> {
        if inputs.is_empty() {
            return Err(PipelineError::Validation("At least one input file is required".to_string()));
        }
        Ok(())
    }

    /// Builds the fastqc invocation.
    ///
    /// # Arguments
    ///
    /// * `program` - fastqc executable name or path.
    /// * `options` - Validated user options, with file references already local.
    /// * `inputs` - Local input paths, in caller order.
    /// * `threads` - Usable execution units; values below 1 become 1.
    /// * `out_dir` - Pre-created staging directory.
    ///
    /// # Returns
    /// CommandLine with flags in fixed order followed by the inputs.
    pub fn arg_generator(
        program: &str,
        options: &FastqcOptions,
        inputs: &[PathBuf],
        threads: usize,
        out_dir: &Path,
    ) -> Result<CommandLine, PipelineError> {
        validate_inputs(inputs)?;
        options.validate()?;

        let mut builder = CommandLineBuilder::new(program)
            .value("--threads", threads.max(1))?
            .value("--outdir", out_dir.display())?
            .flag_if(options.casava, "--casava")
            .flag_if(options.nano, "--nano")
            .flag_if(options.nofilter, "--nofilter")
            .flag_if(options.extract, "--extract")
            .flag_if(options.nogroup, "--nogroup")
            .value_opt("--minlength", options.min_length)?
            .value_opt("--format", options.format.map(|f| f.as_str()))?
            .path_opt("--contaminants", options.contaminants.as_deref())?
            .path_opt("--adapters", options.adapters.as_deref())?
            .path_opt("--limits", options.limits.as_deref())?
            .value("--kmers", options.kmers)?;

        for input in inputs {
            builder = builder.arg(&input.to_string_lossy())?;
        }

        Ok(builder.build())
    }
}


#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::fastqc::{arg_generator, parse_version, validate_inputs, version_number, FastqcOptions};
    use super::*;
    use crate::cli::Format;

    const BOOL_FLAGS: [&str; 5] = ["--casava", "--nano", "--nofilter", "--extract", "--nogroup"];

    fn inputs() -> Vec<PathBuf> {
        vec![PathBuf::from("/a.fastq"), PathBuf::from("/b.fastq")]
    }

    fn build(options: &FastqcOptions) -> Result<CommandLine, PipelineError> {
        arg_generator("fastqc", options, &inputs(), 4, Path::new("/root/fastqc"))
    }

    #[test]
    fn test_default_command() {
        let cmd = build(&FastqcOptions::default()).unwrap();
        let tokens: Vec<&str> = cmd.tokens().collect();
        assert_eq!(
            tokens,
            vec!["fastqc", "--threads", "4", "--outdir", "/root/fastqc", "--kmers", "7", "/a.fastq", "/b.fastq"]
        );
        assert_eq!(cmd.to_string(), "fastqc --threads 4 --outdir /root/fastqc --kmers 7 /a.fastq /b.fastq");
    }

    #[test]
    fn test_boolean_flag_combinations() {
        for mask in 0u8..32 {
            let options = FastqcOptions {
                casava: mask & 1 != 0,
                nano: mask & 2 != 0,
                nofilter: mask & 4 != 0,
                extract: mask & 8 != 0,
                nogroup: mask & 16 != 0,
                ..FastqcOptions::default()
            };
            let cmd = build(&options).unwrap();
            let expected: Vec<&str> = BOOL_FLAGS
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u8 << *i) != 0)
                .map(|(_, f)| *f)
                .collect();
            let found: Vec<&str> = cmd.args()[4..4 + expected.len()].iter().map(String::as_str).collect();
            assert_eq!(found, expected, "mask {:05b}", mask);
            let all_flags = cmd.args().iter().filter(|a| BOOL_FLAGS.contains(&a.as_str())).count();
            assert_eq!(all_flags, expected.len());
            assert!(cmd.tokens().all(|t| !t.is_empty()));
        }
    }

    #[test]
    fn test_kmer_range() {
        for kmers in 2..=10 {
            let cmd = build(&FastqcOptions { kmers, ..FastqcOptions::default() }).unwrap();
            let pos = cmd.args().iter().position(|a| a == "--kmers").unwrap();
            assert_eq!(cmd.args()[pos + 1], kmers.to_string());
        }
        for kmers in [0, 1, 11, 42] {
            let err = build(&FastqcOptions { kmers, ..FastqcOptions::default() }).unwrap_err();
            assert!(matches!(err, PipelineError::Validation(_)), "kmers {}", kmers);
        }
    }

    #[test]
    fn test_mapped_format_uses_external_name() {
        let options = FastqcOptions { format: Some(Format::BamMapped), ..FastqcOptions::default() };
        let cmd = build(&options).unwrap();
        let pos = cmd.args().iter().position(|a| a == "--format").unwrap();
        assert_eq!(cmd.args()[pos + 1], "bam_mapped");
    }

    #[test]
    fn test_extract_with_inputs_last() {
        let options = FastqcOptions { extract: true, ..FastqcOptions::default() };
        let cmd = build(&options).unwrap();
        let args = cmd.args();
        let extract = args.iter().position(|a| a == "--extract").unwrap();
        let kmers = args.iter().position(|a| a == "--kmers").unwrap();
        assert!(extract < kmers);
        assert_eq!(&args[args.len() - 2..], ["/a.fastq", "/b.fastq"]);
    }

    #[test]
    fn test_value_flag_order() {
        let options = FastqcOptions {
            nogroup: true,
            min_length: Some(50),
            format: Some(Format::Sam),
            contaminants: Some(PathBuf::from("/ref/contaminants.txt")),
            adapters: Some(PathBuf::from("/ref/adapters.txt")),
            limits: Some(PathBuf::from("/ref/limits.txt")),
            kmers: 5,
            ..FastqcOptions::default()
        };
        let cmd = build(&options).unwrap();
        assert_eq!(
            cmd.args()[4..],
            [
                "--nogroup",
                "--minlength", "50",
                "--format", "sam",
                "--contaminants", "/ref/contaminants.txt",
                "--adapters", "/ref/adapters.txt",
                "--limits", "/ref/limits.txt",
                "--kmers", "5",
                "/a.fastq", "/b.fastq",
            ]
        );
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let options = FastqcOptions { casava: true, format: Some(Format::Fastq), ..FastqcOptions::default() };
        let err = arg_generator("fastqc", &options, &[], 4, Path::new("/root/fastqc")).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[test]
    fn test_validate_matches_builder() {
        assert!(FastqcOptions::default().validate().is_ok());
        assert!(FastqcOptions { kmers: 11, ..FastqcOptions::default() }.validate().is_err());
        assert!(FastqcOptions { min_length: Some(0), ..FastqcOptions::default() }.validate().is_err());
        assert!(FastqcOptions { min_length: Some(1), kmers: 2, ..FastqcOptions::default() }.validate().is_ok());
        assert!(matches!(validate_inputs(&[]), Err(PipelineError::Validation(_))));
        assert!(validate_inputs(&inputs()).is_ok());
    }

    #[test]
    fn test_min_length_must_be_positive() {
        let err = build(&FastqcOptions { min_length: Some(0), ..FastqcOptions::default() }).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[test]
    fn test_empty_input_path_rejected() {
        let paths = vec![PathBuf::from("/a.fastq"), PathBuf::new()];
        let err = arg_generator("fastqc", &FastqcOptions::default(), &paths, 1, Path::new("/out")).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[test]
    fn test_threads_at_least_one() {
        let cmd = arg_generator("fastqc", &FastqcOptions::default(), &inputs(), 0, Path::new("/out")).unwrap();
        assert_eq!(cmd.args()[0..2], ["--threads", "1"]);
    }

    #[test]
    fn test_deterministic() {
        let options = FastqcOptions { nano: true, min_length: Some(30), ..FastqcOptions::default() };
        assert_eq!(build(&options).unwrap(), build(&options).unwrap());
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("FastQC v0.12.1\n"), Some("v0.12.1".to_string()));
        assert_eq!(parse_version("   \n"), None);
        assert_eq!(version_number("v0.12.1"), Some((0, 12)));
        assert_eq!(version_number("v0.9.4"), Some((0, 9)));
        assert!(version_number("v0.9.4") < Some((0, 11)));
        assert_eq!(version_number("unknown"), None);
    }
}
