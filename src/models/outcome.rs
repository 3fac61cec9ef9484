use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::FileError;

/// How the size-targeting search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// An attempt fit the budget.
    UnderBudget,
    /// No quality down to the floor fit; the smallest attempt was kept.
    BestEffort,
}

impl SearchStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SearchStatus::UnderBudget => "OK",
            SearchStatus::BestEffort => "MAXED",
        }
    }
}

/// Terminal result of the search for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub quality: u8,
    pub size_bytes: u64,
    pub status: SearchStatus,
}

/// What happened to one input file.
#[derive(Debug)]
pub enum FileStatus {
    /// Destination exists and overwriting was not requested.
    Skipped,
    /// Dry run: what would have been done.
    Planned(String),
    Compressed {
        note: String,
        outcome: SearchOutcome,
    },
    Overlaid {
        note: String,
        quality: u8,
        size_bytes: u64,
    },
    Failed(FileError),
    /// The run was cancelled before this file was reached.
    NotStarted,
}

#[derive(Debug)]
pub struct FileReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub status: FileStatus,
}

impl FileReport {
    pub fn new(source: PathBuf, destination: PathBuf, status: FileStatus) -> Self {
        Self {
            source,
            destination,
            status,
        }
    }

    /// Failed or never started. These lines go to stderr.
    pub fn needs_attention(&self) -> bool {
        matches!(self.status, FileStatus::Failed(_) | FileStatus::NotStarted)
    }

    fn name(&self) -> String {
        file_name(&self.source)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Bytes as kilobytes with one decimal, e.g. `287.4KB`.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1}KB", bytes as f64 / 1024.0)
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dest = self.destination.display();
        match &self.status {
            FileStatus::Skipped => write!(f, "[SKIP] {} exists (use --overwrite).", dest),
            FileStatus::Planned(plan) => write!(f, "[DRY] {} -> {} {}", self.name(), dest, plan),
            FileStatus::Compressed { note, outcome } => write!(
                f,
                "[{}] {} -> {} ({}) q={} size={}",
                outcome.status.label(),
                self.name(),
                dest,
                note,
                outcome.quality,
                format_kb(outcome.size_bytes)
            ),
            FileStatus::Overlaid {
                note,
                quality,
                size_bytes,
            } => write!(
                f,
                "[OK] {} -> {} ({}) q={} size={}",
                self.name(),
                dest,
                note,
                quality,
                format_kb(*size_bytes)
            ),
            FileStatus::Failed(error) => {
                write!(f, "[ERROR] {}: {}", self.source.display(), error)
            }
            FileStatus::NotStarted => {
                write!(f, "[CANCELLED] {}: not processed", self.source.display())
            }
        }
    }
}

/// Per-file reports and totals for one batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<FileReport>,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn discovered(&self) -> usize {
        self.reports.len()
    }

    /// Files that were encoded, or planned in a dry run.
    pub fn processed(&self) -> usize {
        self.count(|s| {
            matches!(
                s,
                FileStatus::Compressed { .. } | FileStatus::Overlaid { .. } | FileStatus::Planned(_)
            )
        })
    }

    pub fn maxed(&self) -> usize {
        self.count(|s| {
            matches!(
                s,
                FileStatus::Compressed {
                    outcome: SearchOutcome {
                        status: SearchStatus::BestEffort,
                        ..
                    },
                    ..
                }
            )
        })
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed(_)))
    }

    pub fn not_started(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::NotStarted))
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.status)).count()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Done in {:.2}s. processed={} maxed={} skipped={} failed={}",
            self.elapsed.as_secs_f64(),
            self.processed(),
            self.maxed(),
            self.skipped(),
            self.failed()
        )?;
        let cancelled = self.not_started();
        if cancelled > 0 {
            write!(f, " cancelled={}", cancelled)?;
        }
        Ok(())
    }
}
