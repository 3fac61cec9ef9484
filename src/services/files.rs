use chrono::{DateTime, Utc};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::SetupError;

/// Name pattern for the default output directory.
const OUTPUT_DIR_FORMAT: &str = "output_%y%m%d%H%M";

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}

/// List `.jpg`/`.jpeg` files under `root`, sorted.
///
/// Without `recursive` only direct children are considered. The filter looks
/// at the extension only.
pub fn list_images(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, SetupError> {
    if !root.is_dir() {
        return Err(SetupError::InputNotDirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|source| SetupError::ReadInput {
            path: dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| SetupError::ReadInput {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                if recursive {
                    pending.push(path);
                }
            } else if is_jpeg(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// The requested directory, or `output_YYMMDDhhmm` under the working directory.
pub fn resolve_output_dir(requested: Option<&Path>) -> Result<PathBuf, SetupError> {
    if let Some(path) = requested {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(SetupError::WorkingDir)?;
    Ok(resolve_output_dir_at(None, &cwd, Utc::now()))
}

pub fn resolve_output_dir_at(requested: Option<&Path>, cwd: &Path, now: DateTime<Utc>) -> PathBuf {
    match requested {
        Some(path) => path.to_path_buf(),
        None => cwd.join(now.format(OUTPUT_DIR_FORMAT).to_string()),
    }
}

/// Make sure `path` can receive results.
///
/// An existing non-empty directory is refused unless `overwrite` or
/// `dry_run` is set. A missing directory is created, except in a dry run.
pub fn ensure_output_dir(path: &Path, overwrite: bool, dry_run: bool) -> Result<(), SetupError> {
    let create_err = |source| SetupError::CreateOutput {
        path: path.to_path_buf(),
        source,
    };

    match fs::metadata(path) {
        Ok(meta) => {
            if !meta.is_dir() {
                return Err(SetupError::OutputNotDirectory(path.to_path_buf()));
            }
            if overwrite || dry_run {
                return Ok(());
            }
            let mut entries = fs::read_dir(path).map_err(create_err)?;
            if entries.next().is_some() {
                return Err(SetupError::OutputNotEmpty(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if dry_run {
                return Ok(());
            }
            fs::create_dir_all(path).map_err(create_err)
        }
        Err(e) => Err(create_err(e)),
    }
}

/// Mirror `src`'s position under `input_root` into `output_root`.
pub fn destination_for(input_root: &Path, output_root: &Path, src: &Path) -> PathBuf {
    match src.strip_prefix(input_root) {
        Ok(relative) => output_root.join(relative),
        Err(_) => output_root.join(src.file_name().unwrap_or(src.as_os_str())),
    }
}

/// Write `bytes` to `dest` atomically via a sibling temp file.
///
/// Without `overwrite` an existing destination is left alone and an
/// `AlreadyExists` error is returned.
pub fn place_result(dest: &Path, bytes: &[u8], overwrite: bool) -> io::Result<()> {
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;

    if overwrite {
        staged.persist(dest).map_err(|e| e.error)?;
    } else {
        staged.persist_noclobber(dest).map_err(|e| e.error)?;
    }
    Ok(())
}
