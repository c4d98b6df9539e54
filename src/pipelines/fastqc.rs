use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::defs::{PipelineError, RunConfig};
use crate::utils::command::fastqc::{arg_generator, fastqc_presence_check, validate_inputs, FastqcOptions};
use crate::utils::file::{create_staging_dir, is_recognised_input, InputResolver, LocalResolver};
use crate::utils::notify::{notify_best_effort, LogNotifier, Message, Notifier, Severity};
use crate::utils::process::run_command;
use crate::utils::system::{CapacityQuery, HostCapacity};


/// FastQC report directory, staged locally and bound for `remote_path`.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputArtifact {
    pub local_path: PathBuf,
    pub remote_path: String,
}


/// Platform services the run depends on.
pub struct Collaborators {
    pub resolver: Box<dyn InputResolver>,
    pub capacity: Box<dyn CapacityQuery>,
    pub notifier: Box<dyn Notifier>,
}

impl Collaborators {
    /// Local filesystem, host cores, log output.
    pub fn local(cwd: PathBuf, thread_limit: Option<usize>) -> Self {
        Collaborators {
            resolver: Box::new(LocalResolver::new(cwd)),
            capacity: Box::new(HostCapacity::new(thread_limit)),
            notifier: Box::new(LogNotifier),
        }
    }
}


/// Runs FastQC over the configured inputs.
///
/// # Arguments
///
/// * `config` - RunConfig struct from main.
/// * `host` - Resolver, capacity query and notifier.
///
/// # Returns
/// OutputArtifact for the staging directory. Nothing is returned on failure.
pub async fn run(config: Arc<RunConfig>, host: &Collaborators) -> Result<OutputArtifact, PipelineError> {
    let args = &config.args;

    match fastqc_presence_check(&args.fastqc_bin).await {
        Ok(version) => {
            info!("FASTQC version: {}", version);
            notify_best_effort(host.notifier.as_ref(), Severity::Info, Message::new("FASTQC version", version));
        }
        Err(e) => warn!("Could not determine fastqc version: {}", e),
    }

    let inputs = args
        .inputs
        .iter()
        .map(|reference| host.resolver.resolve(reference))
        .collect::<Result<Vec<PathBuf>, PipelineError>>()?;

    if args.format.is_none() {
        for input in inputs.iter().filter(|p| !is_recognised_input(p)) {
            warn!("{} does not look like a FASTQ, SAM or BAM file; consider --format", input.display());
        }
    }

    let options = FastqcOptions::from_args(args).resolve_files(host.resolver.as_ref())?;

    // Reject bad options before anything is left on disk.
    validate_inputs(&inputs)?;
    options.validate()?;

    create_staging_dir(&config.staging_dir).await?;
    debug!("Staging directory: {}", config.staging_dir.display());

    let threads = host.capacity.execution_units();
    let cmd = arg_generator(&args.fastqc_bin, &options, &inputs, threads, &config.staging_dir)?;

    notify_best_effort(
        host.notifier.as_ref(),
        Severity::Info,
        Message::new("Running FASTQC", format!("Command: {}", cmd)),
    );

    let result = run_command(&cmd).await?;
    debug!("fastqc stdout:\n{}", result.stdout);
    if !result.stderr.is_empty() {
        debug!("fastqc stderr:\n{}", result.stderr);
    }

    Ok(OutputArtifact {
        local_path: config.staging_dir.clone(),
        remote_path: args.out_dir.clone(),
    })
}
