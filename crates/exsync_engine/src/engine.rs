//! The synchronization state machine.

use crate::config::SyncConfig;
use crate::credentials::{Credential, CredentialSource};
use crate::error::{SyncError, SyncResult};
use crate::payload::PayloadSource;
use crate::schema::{document_from_graph, graph_from_snapshot};
use crate::transaction::{SyncPhase, SyncTransaction};
use crate::transport::StoreTransport;
use crate::uploader::{run_uploads, UploadTask};
use exsync_graph::{AssetGraph, AssetId, StoreIdentifier};
use exsync_protocol::{
    AbortRequest, CommitRequest, FetchGraphRequest, OpenTransactionRequest, PollStatusRequest,
    PublishSchemaRequest, RemoteTransactionState,
};
use exsync_report::{DiagnosticsSink, ReportBuilder, SyncReport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// The structured outcome of a synchronization run.
///
/// Failure never escapes the engine as a raw fault: the outcome always
/// carries a success flag, the joined diagnostics, and the phase the run
/// ended in.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// The run's transaction record.
    pub transaction: SyncTransaction,
    /// Structured report (success flag, diagnostics, payload fields).
    pub report: SyncReport,
    /// Revision produced by the transaction, on success.
    pub revision_id: Option<String>,
    /// Assets whose payload was uploaded and linked in this run.
    pub uploaded: Vec<AssetId>,
    /// The failure, if the run did not complete.
    pub error: Option<SyncError>,
}

impl SyncOutcome {
    /// Returns true if the run completed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Drives the transactional synchronization of an asset graph with the
/// remote exchange store.
///
/// One engine may serve many runs, but a single run owns its graph
/// exclusively (`&mut AssetGraph`), which is what enforces the one-run-per
/// -store-identifier rule on the caller's side.
pub struct SyncEngine<T: StoreTransport, C: CredentialSource, P: PayloadSource> {
    config: SyncConfig,
    transport: Arc<T>,
    credentials: C,
    payloads: P,
    cancelled: AtomicBool,
}

impl<T: StoreTransport, C: CredentialSource, P: PayloadSource> SyncEngine<T, C, P> {
    /// Creates a new engine.
    pub fn new(config: SyncConfig, transport: T, credentials: C, payloads: P) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
            credentials,
            payloads,
            cancelled: AtomicBool::new(false),
        }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Requests that an ongoing run stop promptly.
    ///
    /// The remote transaction's fate becomes indeterminate; no implicit
    /// rollback is attempted.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn check_cancelled(&self) -> SyncResult<()> {
        if self.cancelled.load(Ordering::SeqCst) {
            Err(SyncError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Runs the full synchronization state machine for one graph.
    ///
    /// On success the graph's status, revision and binary-reference fields
    /// are reconciled in place. On failure the graph keeps any binary
    /// references already linked (so a retried run skips those uploads) and
    /// is otherwise unchanged.
    pub fn synchronize(&self, graph: &mut AssetGraph, target: &StoreIdentifier) -> SyncOutcome {
        self.cancelled.store(false, Ordering::SeqCst);

        let mut sink = DiagnosticsSink::new(self.config.diagnostics_level);
        let mut transaction = SyncTransaction::new(target.clone());
        let mut uploaded = Vec::new();

        let result = self.run(graph, target, &mut transaction, &mut sink, &mut uploaded);

        match result {
            Ok(revision_id) => {
                info!(target = %target, revision = %revision_id, "synchronization completed");
                sink.info(format!("synchronized at revision {revision_id}"));
                let report = ReportBuilder::new()
                    .success(true)
                    .diagnostics(&sink)
                    .field("phase", transaction.phase.as_str())
                    .field("revision_id", revision_id.clone())
                    .field("uploaded", uploaded.len())
                    .build();
                SyncOutcome {
                    transaction,
                    report,
                    revision_id: Some(revision_id),
                    uploaded,
                    error: None,
                }
            }
            Err(error) => {
                sink.error(error.to_string());
                if matches!(error, SyncError::Cancelled) {
                    // Leave the phase as-is so the caller can still discard
                    // the open transaction explicitly.
                    transaction
                        .errors
                        .push(format!("{}: {error}", transaction.phase));
                } else {
                    transaction.fail(error.to_string());
                }
                let phase = transaction
                    .failed_phase
                    .unwrap_or(transaction.phase);
                let report = ReportBuilder::new()
                    .success(false)
                    .diagnostics(&sink)
                    .field("phase", phase.as_str())
                    .field("uploaded", uploaded.len())
                    .build();
                SyncOutcome {
                    transaction,
                    report,
                    revision_id: None,
                    uploaded,
                    error: Some(error),
                }
            }
        }
    }

    /// Synchronizes with retries for retryable failures.
    ///
    /// Indeterminate failures (timeout, cancellation) are never retried
    /// automatically: the transaction may have committed remotely and only
    /// the caller can decide.
    pub fn synchronize_with_retry(
        &self,
        graph: &mut AssetGraph,
        target: &StoreIdentifier,
    ) -> SyncOutcome {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                let delay = self.config.retry.delay_for_attempt(attempt);
                debug!(attempt, ?delay, "retrying synchronization");
                std::thread::sleep(delay);
            }

            let outcome = self.synchronize(graph, target);
            let retry = outcome
                .error
                .as_ref()
                .is_some_and(|e| e.is_retryable() && attempt + 1 < self.config.retry.max_attempts);
            if !retry {
                return outcome;
            }
            attempt += 1;
        }
    }

    /// Explicitly abandons an open transaction.
    ///
    /// Best-effort informs the store so server-side resources are released;
    /// local graph state is untouched. Fails with
    /// [`SyncError::InvalidPhase`] if the transaction is already terminal.
    pub fn discard(&self, transaction: &mut SyncTransaction) -> SyncResult<()> {
        if transaction.phase.is_terminal() {
            return Err(SyncError::InvalidPhase {
                phase: transaction.phase.to_string(),
            });
        }

        if let Some(transaction_id) = transaction.transaction_id.clone() {
            let aborted = self.credentials.acquire().and_then(|credential| {
                self.transport
                    .abort(&credential, &AbortRequest { transaction_id })
            });
            if let Err(error) = aborted {
                tracing::warn!(%error, "abort not acknowledged; server-side resources may linger");
            }
        }

        transaction.advance(SyncPhase::Discarded);
        Ok(())
    }

    /// Fetches an exchange's current asset graph for read-only projection.
    pub fn fetch_graph(&self, identifier: &StoreIdentifier) -> SyncResult<AssetGraph> {
        let credential = self.credentials.acquire()?;
        let request = FetchGraphRequest {
            collection_id: identifier.collection_id.clone(),
            exchange_id: identifier.exchange_id.clone(),
        };
        let response = self.transport.fetch_graph(&credential, &request)?;
        if !response.success {
            return Err(SyncError::transport_retryable(
                response
                    .error
                    .unwrap_or_else(|| "fetch rejected without a message".to_string()),
            ));
        }
        let snapshot = response
            .snapshot
            .ok_or_else(|| SyncError::transport_fatal("fetch succeeded without a snapshot"))?;
        Ok(graph_from_snapshot(identifier, &snapshot))
    }

    fn run(
        &self,
        graph: &mut AssetGraph,
        target: &StoreIdentifier,
        transaction: &mut SyncTransaction,
        sink: &mut DiagnosticsSink,
        uploaded: &mut Vec<AssetId>,
    ) -> SyncResult<String> {
        // Fresh credential per run; never cached by the engine.
        let credential = self.credentials.acquire()?;

        transaction.advance(SyncPhase::Started);
        let transaction_id = self.open(&credential, target)?;
        sink.debug(format!("opened transaction {transaction_id}"));
        transaction.transaction_id = Some(transaction_id.clone());

        self.check_cancelled()?;
        transaction.advance(SyncPhase::BinariesUploading);
        self.upload_pending(graph, &credential, &transaction_id, sink, uploaded)?;
        transaction.advance(SyncPhase::BinariesUploaded);

        self.check_cancelled()?;
        transaction.advance(SyncPhase::SchemaPublishing);
        self.publish(graph, &credential, &transaction_id, sink)?;
        transaction.advance(SyncPhase::SchemaPublished);

        self.check_cancelled()?;
        transaction.advance(SyncPhase::Committing);
        self.commit(&credential, &transaction_id)?;

        transaction.advance(SyncPhase::Polling);
        let revision_id = self.poll(&credential, &transaction_id, sink)?;

        // Reconcile: every asset in the published graph is now synced at
        // the new revision.
        let asset_ids: Vec<AssetId> = graph.assets().map(|a| a.id.clone()).collect();
        for id in &asset_ids {
            graph.mark_synced(id, &revision_id)?;
        }
        transaction.advance(SyncPhase::Completed);
        Ok(revision_id)
    }

    fn open(&self, credential: &Credential, target: &StoreIdentifier) -> SyncResult<String> {
        let request = OpenTransactionRequest {
            collection_id: target.collection_id.clone(),
            exchange_id: target.exchange_id.clone(),
        };
        let response = self
            .transport
            .open_transaction(credential, &request)
            .map_err(|e| match e {
                // An incompatible SDK stays fatal.
                SyncError::Resolution { .. } => e,
                other => SyncError::TransactionOpen {
                    message: other.to_string(),
                },
            })?;
        if !response.success {
            return Err(SyncError::TransactionOpen {
                message: response
                    .error
                    .unwrap_or_else(|| "store rejected the transaction".to_string()),
            });
        }
        response
            .transaction_id
            .ok_or_else(|| SyncError::TransactionOpen {
                message: "store returned no transaction id".to_string(),
            })
    }

    fn upload_pending(
        &self,
        graph: &mut AssetGraph,
        credential: &Credential,
        transaction_id: &str,
        sink: &mut DiagnosticsSink,
        uploaded: &mut Vec<AssetId>,
    ) -> SyncResult<()> {
        // The pending map is the single source of upload work. Assets
        // outside it are never re-derived or re-uploaded, even when they
        // already carry content.
        let tasks: Vec<UploadTask> = graph
            .pending_uploads()
            .map(|(id, locator)| UploadTask {
                asset_id: id.clone(),
                locator: locator.clone(),
            })
            .collect();

        if tasks.is_empty() {
            sink.debug("no pending uploads; binary phase skipped");
            return Ok(());
        }

        let results = run_uploads(
            self.transport.as_ref(),
            &self.payloads,
            credential,
            transaction_id,
            tasks,
            self.config.upload_workers,
            &self.cancelled,
        );

        let mut failed = Vec::new();
        for result in results {
            match result.outcome {
                Ok(reference) => {
                    // Linking removes the pending entry, so a retried run
                    // only re-uploads the remainder.
                    graph.link_binary(&result.asset_id, reference)?;
                    uploaded.push(result.asset_id);
                }
                Err(message) => failed.push((result.asset_id, message)),
            }
        }

        if !failed.is_empty() {
            // A cancellation that interrupted the phase is indeterminate,
            // not a retryable partial failure: uploads already in flight
            // may still have landed remotely.
            if self.cancelled.load(Ordering::SeqCst) {
                return Err(SyncError::Cancelled);
            }
            return Err(SyncError::PartialUpload {
                completed: uploaded.clone(),
                failed,
            });
        }
        sink.info(format!("uploaded {} payloads", uploaded.len()));
        Ok(())
    }

    fn publish(
        &self,
        graph: &AssetGraph,
        credential: &Credential,
        transaction_id: &str,
        sink: &mut DiagnosticsSink,
    ) -> SyncResult<()> {
        // Publication covers the whole graph and runs even when no binary
        // was uploaded: new assets and relationships alone still need to
        // become visible remotely.
        let schema = document_from_graph(graph);
        sink.debug(format!(
            "publishing schema: {} assets, {} relationships",
            schema.assets.len(),
            schema.relationships.len()
        ));
        let request = PublishSchemaRequest {
            transaction_id: transaction_id.to_string(),
            schema,
        };
        let response = self.transport.publish_schema(credential, &request)?;
        if !response.success {
            return Err(SyncError::SchemaPublish {
                message: response
                    .error
                    .unwrap_or_else(|| "publication rejected without a message".to_string()),
            });
        }
        Ok(())
    }

    fn commit(&self, credential: &Credential, transaction_id: &str) -> SyncResult<()> {
        let request = CommitRequest {
            transaction_id: transaction_id.to_string(),
        };
        let response = self.transport.commit(credential, &request)?;
        if !response.success {
            return Err(SyncError::Commit {
                message: response
                    .error
                    .unwrap_or_else(|| "commit rejected without a message".to_string()),
            });
        }
        Ok(())
    }

    fn poll(
        &self,
        credential: &Credential,
        transaction_id: &str,
        sink: &mut DiagnosticsSink,
    ) -> SyncResult<String> {
        let request = PollStatusRequest {
            transaction_id: transaction_id.to_string(),
        };
        let started = Instant::now();

        loop {
            self.check_cancelled()?;

            match self.transport.poll_status(credential, &request) {
                Ok(response) if response.success => match response.state {
                    RemoteTransactionState::Committed => {
                        if let Some(revision_id) = response.revision_id {
                            return Ok(revision_id);
                        }
                        sink.warning("store reports committed without a revision id");
                    }
                    RemoteTransactionState::Failed => {
                        return Err(SyncError::Commit {
                            message: response
                                .error
                                .unwrap_or_else(|| "transaction failed remotely".to_string()),
                        });
                    }
                    RemoteTransactionState::Pending => {}
                },
                Ok(response) => {
                    sink.warning(format!(
                        "status poll failed: {}",
                        response.error.unwrap_or_default()
                    ));
                }
                Err(error) => {
                    sink.warning(format!("status poll failed: {error}"));
                }
            }

            if started.elapsed() >= self.config.poll_timeout {
                return Err(SyncError::Timeout);
            }
            std::thread::sleep(self.config.poll_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentials;
    use crate::payload::LocalPayloadSource;
    use crate::transport::MockTransport;
    use exsync_graph::{AssetKind, AssetStatus, PayloadLocator, RelationshipKind};
    use exsync_protocol::{
        CommitResponse, OpenTransactionResponse, PollStatusResponse, UploadBinaryResponse,
    };
    use std::time::Duration;

    fn engine(transport: MockTransport) -> SyncEngine<MockTransport, StaticCredentials, LocalPayloadSource> {
        let config = SyncConfig::new()
            .with_poll_interval(Duration::from_millis(1))
            .with_poll_timeout(Duration::from_millis(50));
        SyncEngine::new(
            config,
            transport,
            StaticCredentials::new("tok"),
            LocalPayloadSource::new(),
        )
    }

    fn target() -> StoreIdentifier {
        StoreIdentifier::new("col-1", "exch-1")
    }

    fn wall_graph() -> AssetGraph {
        let mut graph = AssetGraph::new();
        graph
            .add_asset(
                AssetKind::Element,
                Some(AssetId::from("wall-1")),
                [("name".to_string(), "Wall-1".to_string())],
            )
            .unwrap();
        graph
            .add_asset(AssetKind::Geometry, Some(AssetId::from("geo-1")), [])
            .unwrap();
        graph
            .add_relationship(
                &AssetId::from("wall-1"),
                &AssetId::from("geo-1"),
                RelationshipKind::Containment,
            )
            .unwrap();
        graph
            .mark_geometry_pending(&AssetId::from("geo-1"), PayloadLocator::buffer(vec![0xAB]))
            .unwrap();
        graph
    }

    #[test]
    fn full_run_reaches_completed_and_reconciles() {
        let engine = engine(MockTransport::new());
        let mut graph = wall_graph();

        let outcome = engine.synchronize(&mut graph, &target());
        assert!(outcome.is_success(), "{:?}", outcome.error);
        assert_eq!(outcome.transaction.phase, SyncPhase::Completed);
        assert!(outcome.revision_id.is_some());

        let geo = graph.get(&AssetId::from("geo-1")).unwrap();
        assert!(geo.binary_reference.is_some());
        assert_eq!(geo.status, AssetStatus::Synced);
        assert!(geo.revision_id.is_some());
        assert!(graph.has_no_pending());

        let wall = graph.get(&AssetId::from("wall-1")).unwrap();
        assert_eq!(wall.status, AssetStatus::Synced);
    }

    #[test]
    fn empty_pending_map_skips_uploads_entirely() {
        let engine = engine(MockTransport::new());
        let mut graph = AssetGraph::new();
        graph
            .add_asset(AssetKind::Element, Some(AssetId::from("wall-1")), [])
            .unwrap();

        let outcome = engine.synchronize(&mut graph, &target());
        assert!(outcome.is_success());
        assert_eq!(engine.transport.upload_calls(), 0);
        // Schema publication still ran.
        assert_eq!(engine.transport.publish_calls(), 1);
    }

    #[test]
    fn open_failure_names_started_phase() {
        let transport = MockTransport::new();
        transport.set_open_response(OpenTransactionResponse::error("no such exchange"));
        let engine = engine(transport);
        let mut graph = wall_graph();

        let outcome = engine.synchronize(&mut graph, &target());
        assert!(!outcome.is_success());
        assert!(matches!(
            outcome.error,
            Some(SyncError::TransactionOpen { .. })
        ));
        assert_eq!(outcome.transaction.failed_phase, Some(SyncPhase::Started));
        assert_eq!(
            outcome.report.field("phase").unwrap(),
            SyncPhase::Started.as_str()
        );
        // Graph untouched.
        assert_eq!(graph.pending_count(), 1);
    }

    #[test]
    fn partial_upload_keeps_successes_and_pending_remainder() {
        let transport = MockTransport::new();
        transport.set_upload_response("geo-2", UploadBinaryResponse::error("quota"));
        let engine = engine(transport);

        let mut graph = AssetGraph::new();
        for id in ["geo-1", "geo-2", "geo-3"] {
            graph
                .add_asset(AssetKind::Geometry, Some(AssetId::from(id)), [])
                .unwrap();
            graph
                .mark_geometry_pending(&AssetId::from(id), PayloadLocator::buffer(vec![1]))
                .unwrap();
        }

        let outcome = engine.synchronize(&mut graph, &target());
        let Some(SyncError::PartialUpload { completed, failed }) = outcome.error else {
            panic!("expected partial upload failure");
        };
        assert_eq!(completed, vec![AssetId::from("geo-1"), AssetId::from("geo-3")]);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, AssetId::from("geo-2"));

        // Successes are linked and out of the pending map.
        assert!(graph.get(&AssetId::from("geo-1")).unwrap().binary_reference.is_some());
        assert!(graph.get(&AssetId::from("geo-3")).unwrap().binary_reference.is_some());
        let remaining: Vec<_> = graph.pending_uploads().map(|(id, _)| id.clone()).collect();
        assert_eq!(remaining, vec![AssetId::from("geo-2")]);

        // Nothing was committed.
        assert_eq!(engine.transport.commit_calls(), 0);
        assert_eq!(
            outcome.transaction.failed_phase,
            Some(SyncPhase::BinariesUploading)
        );
    }

    #[test]
    fn retried_run_only_uploads_the_remainder() {
        let transport = MockTransport::new();
        transport.set_upload_response("geo-2", UploadBinaryResponse::error("quota"));
        let engine = engine(transport);

        let mut graph = AssetGraph::new();
        for id in ["geo-1", "geo-2"] {
            graph
                .add_asset(AssetKind::Geometry, Some(AssetId::from(id)), [])
                .unwrap();
            graph
                .mark_geometry_pending(&AssetId::from(id), PayloadLocator::buffer(vec![1]))
                .unwrap();
        }

        let first = engine.synchronize(&mut graph, &target());
        assert!(!first.is_success());
        assert_eq!(engine.transport.upload_calls(), 2);

        // Let the second attempt succeed.
        engine
            .transport
            .set_upload_response("geo-2", UploadBinaryResponse::success("store://blob/geo-2"));
        let second = engine.synchronize(&mut graph, &target());
        assert!(second.is_success(), "{:?}", second.error);
        // Only geo-2 was re-uploaded.
        assert_eq!(engine.transport.upload_calls(), 3);
        assert_eq!(second.uploaded, vec![AssetId::from("geo-2")]);
        assert!(graph.has_no_pending());
    }

    #[test]
    fn cancellation_during_uploads_is_indeterminate_not_partial() {
        let engine = engine(MockTransport::new());
        let mut graph = AssetGraph::new();
        for id in ["geo-1", "geo-2"] {
            graph
                .add_asset(AssetKind::Geometry, Some(AssetId::from(id)), [])
                .unwrap();
            graph
                .mark_geometry_pending(&AssetId::from(id), PayloadLocator::buffer(vec![1]))
                .unwrap();
        }
        engine.cancel();

        let credential = Credential::bearer("tok");
        let mut sink = DiagnosticsSink::default();
        let mut uploaded = Vec::new();
        let err = engine
            .upload_pending(&mut graph, &credential, "txn-1", &mut sink, &mut uploaded)
            .unwrap_err();

        // Skipped uploads must not masquerade as a retryable partial
        // failure; the remote fate of in-flight uploads is unknown.
        assert_eq!(err, SyncError::Cancelled);
        assert!(err.is_indeterminate());
        assert!(!err.is_retryable());
        assert_eq!(graph.pending_count(), 2);
    }

    #[test]
    fn commit_rejection_is_a_commit_error() {
        let transport = MockTransport::new();
        transport.set_commit_response(CommitResponse::error("revision conflict"));
        let engine = engine(transport);
        let mut graph = wall_graph();

        let outcome = engine.synchronize(&mut graph, &target());
        assert!(matches!(outcome.error, Some(SyncError::Commit { .. })));
        assert_eq!(
            outcome.transaction.failed_phase,
            Some(SyncPhase::Committing)
        );
    }

    #[test]
    fn poll_timeout_is_indeterminate() {
        let transport = MockTransport::new();
        transport.push_poll_response(PollStatusResponse::pending());
        let engine = engine(transport);
        let mut graph = wall_graph();

        let outcome = engine.synchronize(&mut graph, &target());
        assert_eq!(outcome.error, Some(SyncError::Timeout));
        assert!(outcome.error.unwrap().is_indeterminate());
        assert_eq!(outcome.transaction.failed_phase, Some(SyncPhase::Polling));
        // The run made progress before timing out.
        assert!(engine.transport.poll_calls() >= 1);
    }

    #[test]
    fn remote_failure_during_poll_surfaces_message() {
        let transport = MockTransport::new();
        transport.push_poll_response(PollStatusResponse::pending());
        transport.push_poll_response(PollStatusResponse::failed("validation error"));
        let engine = engine(transport);
        let mut graph = wall_graph();

        let outcome = engine.synchronize(&mut graph, &target());
        let Some(SyncError::Commit { message }) = outcome.error else {
            panic!("expected commit failure");
        };
        assert_eq!(message, "validation error");
    }

    #[test]
    fn synchronize_with_retry_exhausts_attempts() {
        let transport = MockTransport::new();
        transport.set_open_response(OpenTransactionResponse::error("store busy"));
        let config = SyncConfig::new()
            .with_poll_interval(Duration::from_millis(1))
            .with_retry(
                crate::config::RetryConfig::new(3)
                    .with_initial_delay(Duration::from_millis(1))
                    .with_max_delay(Duration::from_millis(2)),
            );
        let engine = SyncEngine::new(
            config,
            transport,
            StaticCredentials::new("tok"),
            LocalPayloadSource::new(),
        );
        let mut graph = wall_graph();

        let outcome = engine.synchronize_with_retry(&mut graph, &target());
        assert!(!outcome.is_success());
        assert_eq!(engine.transport.open_calls(), 3);
    }

    #[test]
    fn discard_aborts_remote_and_leaves_graph_alone() {
        let engine = engine(MockTransport::new());
        let mut transaction = SyncTransaction::new(target());
        transaction.advance(SyncPhase::Started);
        transaction.transaction_id = Some("txn-7".into());

        engine.discard(&mut transaction).unwrap();
        assert_eq!(transaction.phase, SyncPhase::Discarded);
        assert_eq!(engine.transport.abort_calls(), 1);

        // Terminal transactions cannot be discarded again.
        let err = engine.discard(&mut transaction).unwrap_err();
        assert!(matches!(err, SyncError::InvalidPhase { .. }));
    }

    #[test]
    fn fetch_graph_rebuilds_from_snapshot() {
        use exsync_protocol::{FetchGraphResponse, GraphSnapshot};

        let transport = MockTransport::new();
        let mut source = wall_graph();
        // Pretend the remote already has the wall graph at rev-5.
        source.clear_pending(&AssetId::from("geo-1"));
        let snapshot = GraphSnapshot {
            exchange_id: "exch-1".into(),
            title: Some("Bridge".into()),
            revision_id: "rev-5".into(),
            schema: document_from_graph(&source),
        };
        transport.set_fetch_response(FetchGraphResponse::success(snapshot));
        let engine = engine(transport);

        let fetched = engine.fetch_graph(&target()).unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(
            fetched.get(&AssetId::from("wall-1")).unwrap().revision_id.as_deref(),
            Some("rev-5")
        );
    }
}
