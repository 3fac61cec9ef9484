//! Size-targeting search over encoder quality.
//!
//! Quality is swept downward from the initial value in fixed steps. File
//! size falls as quality falls for JPEG encoders, so the first attempt that
//! fits the budget is also the highest quality that fits and the sweep never
//! goes back up. When nothing down to the floor fits, the smallest attempt is
//! kept so every input still yields an output.

use super::encoder::{EncodeFlags, Encoder};
use super::raw_pixels::RawPixelFile;
use crate::error::EncodeError;
use crate::models::{SearchOutcome, SearchParams, SearchStatus};

/// The accepted encode and how it was reached.
#[derive(Debug)]
pub struct Accepted {
    pub outcome: SearchOutcome,
    pub bytes: Vec<u8>,
}

/// Run the sweep. An encoder error ends the search for this file.
pub fn search<E: Encoder + ?Sized>(
    encoder: &E,
    raw: &RawPixelFile,
    params: &SearchParams,
) -> Result<Accepted, EncodeError> {
    let flags = EncodeFlags::default();
    let budget = params.budget_bytes();
    let mut best: Option<(u8, Vec<u8>)> = None;

    for quality in params.qualities() {
        let bytes = encoder.encode(raw, quality, flags)?;
        let size = bytes.len() as u64;
        tracing::debug!(quality, size, budget, "Encode attempt");

        if size <= budget {
            return Ok(Accepted {
                outcome: SearchOutcome {
                    quality,
                    size_bytes: size,
                    status: SearchStatus::UnderBudget,
                },
                bytes,
            });
        }

        let smaller = best
            .as_ref()
            .map_or(true, |(_, kept)| size < kept.len() as u64);
        if smaller {
            best = Some((quality, bytes));
        }
    }

    let (quality, bytes) = best.ok_or(EncodeError::NoAttempts {
        initial: params.initial_quality(),
        floor: params.floor_quality(),
    })?;
    Ok(Accepted {
        outcome: SearchOutcome {
            quality,
            size_bytes: bytes.len() as u64,
            status: SearchStatus::BestEffort,
        },
        bytes,
    })
}
