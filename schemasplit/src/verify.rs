//! Round-trip self-check: explode, implode, compare.

use std::fmt;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::SplitConfig;
use crate::diff::{diff, Change};
use crate::error::SplitResult;
use crate::explode::{ExplodeSummary, Exploder};
use crate::implode::Imploder;
use crate::store::MemoryStore;

/// Outcome of a round-trip check.
#[derive(Debug, Clone)]
pub struct RoundTripReport {
    /// What explode wrote to the in-memory store.
    pub summary: ExplodeSummary,
    /// Differences between the canonical input and the imploded result.
    pub changes: Vec<Change>,
}

impl RoundTripReport {
    /// True when the round trip reproduced the document.
    pub fn is_clean(&self) -> bool {
        self.changes.is_empty()
    }
}

impl fmt::Display for RoundTripReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "no changes");
        }
        writeln!(f, "{} change(s) after round trip:", self.changes.len())?;
        for change in &self.changes {
            writeln!(f, "  {}", change)?;
        }
        Ok(())
    }
}

/// Explode `document` into memory, implode it back and diff the result.
///
/// The reference is the document passed through the configured encoding
/// once, so differences the encoding itself introduces are not reported.
///
/// # Errors
///
/// Propagates any fatal explode or implode error. Divergence is not an
/// error; it is reported in [`RoundTripReport::changes`].
pub fn verify_round_trip(document: &Value, config: &SplitConfig) -> SplitResult<RoundTripReport> {
    let canonical = config.encoding.normalize(document)?;

    let mut store = MemoryStore::new();
    let summary = Exploder::new(config.clone()).explode(document, &mut store)?;
    debug!(files = store.len(), "Exploded into memory");

    let imploded = Imploder::new().implode(&store)?;
    let changes = diff(&canonical, &imploded);

    info!(changes = changes.len(), "Round trip complete");
    Ok(RoundTripReport { summary, changes })
}
