use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use super::cancel::CancelToken;
use super::raw_pixels::RawPixelFile;
use crate::error::EncodeError;

/// Fixed encoder switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeFlags {
    /// Optimize entropy coding tables.
    pub optimize: bool,
    /// Progressive scan order.
    pub progressive: bool,
}

impl Default for EncodeFlags {
    fn default() -> Self {
        Self {
            optimize: true,
            progressive: true,
        }
    }
}

/// Compress staged raw pixels at a given quality.
pub trait Encoder {
    fn encode(
        &self,
        raw: &RawPixelFile,
        quality: u8,
        flags: EncodeFlags,
    ) -> Result<Vec<u8>, EncodeError>;
}

/// [`Encoder`] backed by a `cjpeg` executable.
#[derive(Debug, Clone)]
pub struct CjpegEncoder {
    binary: PathBuf,
    cancel: CancelToken,
    poll_interval: Duration,
}

impl CjpegEncoder {
    pub fn new(binary: impl Into<PathBuf>, cancel: CancelToken) -> Self {
        Self {
            binary: binary.into(),
            cancel,
            poll_interval: Duration::from_millis(10),
        }
    }

    fn command(&self, raw: &RawPixelFile, quality: u8, flags: EncodeFlags) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-quality").arg(quality.to_string());
        if flags.optimize {
            cmd.arg("-optimize");
        }
        if flags.progressive {
            cmd.arg("-progressive");
        }
        cmd.arg(raw.path());
        cmd
    }
}

impl Encoder for CjpegEncoder {
    fn encode(
        &self,
        raw: &RawPixelFile,
        quality: u8,
        flags: EncodeFlags,
    ) -> Result<Vec<u8>, EncodeError> {
        if self.cancel.is_cancelled() {
            return Err(EncodeError::Cancelled);
        }

        // Anonymous files instead of pipes: no reader thread needed while polling.
        let mut stdout = tempfile::tempfile()?;
        let mut stderr = tempfile::tempfile()?;

        let mut child = self
            .command(raw, quality, flags)
            .stdin(Stdio::null())
            .stdout(stdout.try_clone()?)
            .stderr(stderr.try_clone()?)
            .spawn()
            .map_err(|source| EncodeError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if self.cancel.is_cancelled() {
                let _ = child.kill();
                let _ = child.wait();
                return Err(EncodeError::Cancelled);
            }
            std::thread::sleep(self.poll_interval);
        };

        if !status.success() {
            let mut text = String::new();
            stderr.seek(SeekFrom::Start(0))?;
            stderr.read_to_string(&mut text)?;
            return Err(EncodeError::Failed {
                status: status.to_string(),
                stderr: text.trim().to_string(),
            });
        }

        let mut bytes = Vec::new();
        stdout.seek(SeekFrom::Start(0))?;
        stdout.read_to_end(&mut bytes)?;
        if bytes.is_empty() {
            return Err(EncodeError::EmptyOutput { quality });
        }

        tracing::trace!(quality, size = bytes.len(), "cjpeg finished");
        Ok(bytes)
    }
}
