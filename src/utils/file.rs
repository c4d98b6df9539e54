use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::defs::{PipelineError, ALIGNMENT_EXTS, COMPRESSION_EXTS, FAST5_EXTS, FASTQ_EXTS};

const FILE_SCHEME: &str = "file://";


/// Turns a caller's file or directory reference into a local path whose
/// content is already in place.
pub trait InputResolver: Send + Sync {
    fn resolve(&self, reference: &str) -> Result<PathBuf, PipelineError>;
}


/// Resolves plain paths and `file://` URIs against a working directory.
#[derive(Debug, Clone)]
pub struct LocalResolver {
    pub cwd: PathBuf,
}

impl LocalResolver {
    pub fn new(cwd: PathBuf) -> Self {
        LocalResolver { cwd }
    }
}

impl InputResolver for LocalResolver {
    fn resolve(&self, reference: &str) -> Result<PathBuf, PipelineError> {
        let raw = reference.strip_prefix(FILE_SCHEME).unwrap_or(reference);
        if raw.is_empty() {
            return Err(PipelineError::Validation("Empty file reference".to_string()));
        }
        if raw.contains("://") {
            return Err(PipelineError::IOError(format!(
                "Cannot resolve remote reference {} without a hosting platform",
                reference
            )));
        }

        let path = absolute_path(Path::new(raw), &self.cwd);
        if !path.exists() {
            return Err(PipelineError::IOError(format!("Input not found: {}", path.display())));
        }
        debug!("Resolved {} -> {}", reference, path.display());
        Ok(path)
    }
}


/// Joins relative paths onto `cwd`; absolute paths are returned as-is.
pub fn absolute_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}


/// Creates the staging directory, including parents. The leaf itself must
/// not exist yet so two runs can never share it.
pub async fn create_staging_dir(path: &Path) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PipelineError::IOError(format!("Failed to create {}: {}", parent.display(), e)))?;
    }
    tokio::fs::create_dir(path)
        .await
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => PipelineError::IOError(format!(
                "Staging directory {} already exists",
                path.display()
            )),
            _ => PipelineError::IOError(format!("Failed to create staging directory {}: {}", path.display(), e)),
        })
}


/// Whether a path carries an extension FastQC can read without `--format`.
/// Compression suffixes are ignored. Directories count as readable
/// (nano mode takes directories of fast5 files).
pub fn is_recognised_input(path: &Path) -> bool {
    if path.is_dir() {
        return true;
    }
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy().to_lowercase(),
        None => return false,
    };

    let mut parts: Vec<&str> = name.split('.').skip(1).collect();
    while let Some(last) = parts.last() {
        if COMPRESSION_EXTS.contains(last) {
            parts.pop();
        } else {
            break;
        }
    }

    match parts.last() {
        Some(ext) => FASTQ_EXTS
            .iter()
            .chain(ALIGNMENT_EXTS)
            .chain(FAST5_EXTS)
            .any(|e| e == ext),
        None => false,
    }
}


/// Local directory for a destination, or None when the destination is
/// remote and its upload belongs to the hosting platform.
pub fn local_destination(destination: &str, cwd: &Path) -> Option<PathBuf> {
    if let Some(stripped) = destination.strip_prefix(FILE_SCHEME) {
        return Some(absolute_path(Path::new(stripped), cwd));
    }
    if destination.contains("://") {
        return None;
    }
    Some(absolute_path(Path::new(destination), cwd))
}


/// Recursively copies the contents of `src` into `dst`, creating `dst` as needed.
///
/// # Returns
/// Number of files copied.
pub fn copy_dir_contents(src: &Path, dst: &Path) -> Result<usize, PipelineError> {
    let io_err = |path: &Path, e: io::Error| PipelineError::IOError(format!("{}: {}", path.display(), e));

    if dst.starts_with(src) {
        return Err(PipelineError::IOError(format!(
            "Destination {} lies inside {}",
            dst.display(),
            src.display()
        )));
    }

    fs::create_dir_all(dst).map_err(|e| io_err(dst, e))?;
    let mut copied = 0;
    for entry in fs::read_dir(src).map_err(|e| io_err(src, e))? {
        let entry = entry.map_err(|e| io_err(src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| io_err(&from, e))?;
        if file_type.is_dir() {
            copied += copy_dir_contents(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| io_err(&from, e))?;
            copied += 1;
        }
    }
    Ok(copied)
}


/// Host-side publication of a finished run.
///
/// # Arguments
///
/// * `local_path` - Staging directory holding the reports.
/// * `remote_path` - Caller's destination.
/// * `cwd` - Base for relative destinations.
///
/// # Returns
/// The local directory written to, or None when the upload is left to the platform.
pub fn publish_artifact(local_path: &Path, remote_path: &str, cwd: &Path) -> Result<Option<PathBuf>, PipelineError> {
    match local_destination(remote_path, cwd) {
        Some(dst) => {
            if dst == local_path {
                info!("Reports already at {}", dst.display());
                return Ok(Some(dst));
            }
            let copied = copy_dir_contents(local_path, &dst)?;
            info!("Published {} files to {}", copied, dst.display());
            Ok(Some(dst))
        }
        None => {
            info!("Upload of {} to {} is left to the hosting platform", local_path.display(), remote_path);
            Ok(None)
        }
    }
}
