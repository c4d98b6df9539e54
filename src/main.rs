use std::env;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use env_logger::Builder;
use log::{LevelFilter, debug, error, info};

use fastqc_pipeline::cli::parse;
use fastqc_pipeline::config::defs::RunConfig;
use fastqc_pipeline::pipelines::fastqc::{self, Collaborators};
use fastqc_pipeline::utils::file::{absolute_path, publish_artifact};
use fastqc_pipeline::utils::system::{detect_ram, CapacityQuery};


#[tokio::main]
async fn main() -> Result<()> {
    let run_start = Instant::now();

    let args = parse();

    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    println!("\n-------------\n FastQC\n-------------\n");

    let dir = env::current_dir()?;
    info!("The current directory is {:?}\n", dir);

    let host = Collaborators::local(dir.clone(), args.threads);
    debug!("Using {} threads for fastqc", host.capacity.execution_units());

    match detect_ram() {
        Ok((total_ram, available_ram)) => {
            debug!("Available RAM: {} bytes (~{} GiB)", available_ram, available_ram / 1_073_741_824);
            debug!("Total RAM: {} bytes (~{} GiB)", total_ram, total_ram / 1_073_741_824);
        }
        Err(e) => debug!("RAM detection skipped: {}", e),
    }

    let staging_dir = absolute_path(Path::new(&args.staging_dir), &dir);
    let run_config = Arc::new(RunConfig {
        cwd: dir,
        staging_dir,
        args,
    });

    let artifact = match fastqc::run(run_config.clone(), &host).await {
        Ok(artifact) => artifact,
        Err(e) => {
            error!("Pipeline failed: {} at {} milliseconds.", e, run_start.elapsed().as_millis());
            std::process::exit(1);
        }
    };

    if let Err(e) = publish_artifact(&artifact.local_path, &artifact.remote_path, &run_config.cwd) {
        error!("Publishing reports failed: {} at {} milliseconds.", e, run_start.elapsed().as_millis());
        std::process::exit(1);
    }

    println!("Run complete: {} milliseconds.", run_start.elapsed().as_millis());
    Ok(())
}
