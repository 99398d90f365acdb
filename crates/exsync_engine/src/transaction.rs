//! Synchronization phases and the per-run transaction record.

use exsync_graph::StoreIdentifier;
use std::fmt;
use std::time::Instant;

/// The phase of a synchronization transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No transaction open.
    Idle,
    /// Transaction opened against the store.
    Started,
    /// Pending payloads are being uploaded.
    BinariesUploading,
    /// All pending payloads uploaded (or none were pending).
    BinariesUploaded,
    /// The schema document is being published.
    SchemaPublishing,
    /// Schema publication acknowledged.
    SchemaPublished,
    /// The store is finalizing the transaction.
    Committing,
    /// Waiting for the transaction's revision to become visible.
    Polling,
    /// The revision is visible and local state reconciled. Terminal.
    Completed,
    /// The run failed; see the transaction's errors. Terminal.
    Failed,
    /// The transaction was explicitly abandoned. Terminal.
    Discarded,
}

impl SyncPhase {
    /// Returns true for terminal phases.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SyncPhase::Completed | SyncPhase::Failed | SyncPhase::Discarded
        )
    }

    /// Returns true while remote work is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, SyncPhase::Idle) && !self.is_terminal()
    }

    /// Returns the phase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncPhase::Idle => "Idle",
            SyncPhase::Started => "Started",
            SyncPhase::BinariesUploading => "BinariesUploading",
            SyncPhase::BinariesUploaded => "BinariesUploaded",
            SyncPhase::SchemaPublishing => "SchemaPublishing",
            SyncPhase::SchemaPublished => "SchemaPublished",
            SyncPhase::Committing => "Committing",
            SyncPhase::Polling => "Polling",
            SyncPhase::Completed => "Completed",
            SyncPhase::Failed => "Failed",
            SyncPhase::Discarded => "Discarded",
        }
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synchronization run's transaction record.
///
/// Ephemeral: owned exclusively by a single run against a single store
/// identifier.
#[derive(Debug, Clone)]
pub struct SyncTransaction {
    /// Identifier assigned by the store when the transaction was opened.
    pub transaction_id: Option<String>,
    /// Current phase.
    pub phase: SyncPhase,
    /// Phase in which the run failed, if it did.
    pub failed_phase: Option<SyncPhase>,
    /// Target store.
    pub identifier: StoreIdentifier,
    /// When the run started.
    pub started_at: Instant,
    /// Errors encountered, in order.
    pub errors: Vec<String>,
}

impl SyncTransaction {
    /// Creates an idle transaction for a target store.
    #[must_use]
    pub fn new(identifier: StoreIdentifier) -> Self {
        Self {
            transaction_id: None,
            phase: SyncPhase::Idle,
            failed_phase: None,
            identifier,
            started_at: Instant::now(),
            errors: Vec::new(),
        }
    }

    /// Advances to the next phase.
    pub fn advance(&mut self, phase: SyncPhase) {
        tracing::debug!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }

    /// Records a failure in the current phase and moves to `Failed`.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(phase = %self.phase, %message, "synchronization failed");
        self.failed_phase = Some(self.phase);
        self.errors.push(format!("{}: {message}", self.phase));
        self.phase = SyncPhase::Failed;
    }
}
