//! Run statistics
//!
//! The coordinator folds every pipeline outcome into a per-kind summary; the
//! CLI prints the collected summary once the run is over.

use crate::record::RecordKind;

/// Counters for one record kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSummary {
    pub kind: RecordKind,

    /// Number of batches issued
    pub batches: u64,

    /// Number of pipelines started
    pub started: u64,

    /// Number of files written
    pub written: u64,

    /// Number of pipelines that produced no output
    pub skipped: u64,

    /// Smallest ID that reported the end of the ID space, if any did
    pub exhausted_at: Option<u64>,

    /// Highest ID a pipeline was started for
    pub last_id: Option<u64>,
}

impl KindSummary {
    /// Creates an empty summary for a kind
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            batches: 0,
            started: 0,
            written: 0,
            skipped: 0,
            exhausted_at: None,
            last_id: None,
        }
    }

    /// Returns true if the scan stopped on an exhaustion signal
    pub fn exhausted(&self) -> bool {
        self.exhausted_at.is_some()
    }

    /// Returns the share of started pipelines that wrote a file, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.started == 0 {
            return 0.0;
        }
        (self.written as f64 / self.started as f64) * 100.0
    }
}

/// Summary of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub kinds: Vec<KindSummary>,
}

impl RunSummary {
    /// Returns the summary for a kind, if that kind was processed
    pub fn kind(&self, kind: RecordKind) -> Option<&KindSummary> {
        self.kinds.iter().find(|summary| summary.kind == kind)
    }

    /// Total files written across all kinds
    pub fn total_written(&self) -> u64 {
        self.kinds.iter().map(|summary| summary.written).sum()
    }

    /// Total pipelines started across all kinds
    pub fn total_started(&self) -> u64 {
        self.kinds.iter().map(|summary| summary.started).sum()
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Archive Summary ===\n");

    for kind in &summary.kinds {
        println!("{}:", kind.kind);
        println!("  Batches: {}", kind.batches);
        println!("  Pipelines started: {}", kind.started);
        println!(
            "  Files written: {} ({:.1}%)",
            kind.written,
            kind.success_rate()
        );
        println!("  Skipped: {}", kind.skipped);
        match (kind.exhausted_at, kind.last_id) {
            (Some(id), _) => println!("  Stopped: ID space ends at {}", id),
            (None, Some(last)) => println!("  Stopped: reached ID {}", last),
            (None, None) => println!("  Stopped: empty ID range"),
        }
        println!();
    }

    println!(
        "Total: {} files from {} pipelines",
        summary.total_written(),
        summary.total_started()
    );
}
