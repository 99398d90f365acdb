//! Transport layer abstraction for the remote exchange store.

use crate::credentials::Credential;
use crate::error::{SyncError, SyncResult};
use exsync_protocol::{
    AbortRequest, AbortResponse, CommitRequest, CommitResponse, FetchGraphRequest,
    FetchGraphResponse, OpenTransactionRequest, OpenTransactionResponse, PollStatusRequest,
    PollStatusResponse, PublishSchemaRequest, PublishSchemaResponse, UploadBinaryRequest,
    UploadBinaryResponse,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Remote store operations consumed by the engine.
///
/// Implementations decide the wire shape (HTTP, SDK calls through the
/// gateway, in-memory test double). Every operation takes the per-run
/// credential; the transport never caches credentials.
pub trait StoreTransport: Send + Sync {
    /// Opens a transaction against an exchange.
    fn open_transaction(
        &self,
        credential: &Credential,
        request: &OpenTransactionRequest,
    ) -> SyncResult<OpenTransactionResponse>;

    /// Uploads one binary payload under an open transaction.
    fn upload_binary(
        &self,
        credential: &Credential,
        request: &UploadBinaryRequest,
    ) -> SyncResult<UploadBinaryResponse>;

    /// Publishes the schema document for the transaction's graph.
    fn publish_schema(
        &self,
        credential: &Credential,
        request: &PublishSchemaRequest,
    ) -> SyncResult<PublishSchemaResponse>;

    /// Asks the store to finalize the transaction.
    fn commit(&self, credential: &Credential, request: &CommitRequest)
        -> SyncResult<CommitResponse>;

    /// Polls the transaction's visibility state.
    fn poll_status(
        &self,
        credential: &Credential,
        request: &PollStatusRequest,
    ) -> SyncResult<PollStatusResponse>;

    /// Abandons an open transaction so server-side resources are released.
    fn abort(&self, credential: &Credential, request: &AbortRequest) -> SyncResult<AbortResponse>;

    /// Fetches the current asset graph of an exchange.
    fn fetch_graph(
        &self,
        credential: &Credential,
        request: &FetchGraphRequest,
    ) -> SyncResult<FetchGraphResponse>;
}

/// A scripted transport for tests.
///
/// Unset responses fall back to a successful default, so the happy path
/// needs no scripting. Invocation counts and upload order are recorded for
/// assertions.
#[derive(Default)]
pub struct MockTransport {
    open_response: Mutex<Option<OpenTransactionResponse>>,
    upload_responses: Mutex<HashMap<String, UploadBinaryResponse>>,
    publish_response: Mutex<Option<PublishSchemaResponse>>,
    commit_response: Mutex<Option<CommitResponse>>,
    poll_responses: Mutex<VecDeque<PollStatusResponse>>,
    abort_response: Mutex<Option<AbortResponse>>,
    fetch_response: Mutex<Option<FetchGraphResponse>>,
    open_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    publish_calls: AtomicUsize,
    commit_calls: AtomicUsize,
    poll_calls: AtomicUsize,
    abort_calls: AtomicUsize,
    uploaded_assets: Mutex<Vec<String>>,
    published_schemas: Mutex<Vec<PublishSchemaRequest>>,
}

impl MockTransport {
    /// Creates a transport whose every operation succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the open-transaction response.
    pub fn set_open_response(&self, response: OpenTransactionResponse) {
        *self.open_response.lock() = Some(response);
    }

    /// Scripts the upload response for one asset.
    pub fn set_upload_response(&self, asset_id: impl Into<String>, response: UploadBinaryResponse) {
        self.upload_responses.lock().insert(asset_id.into(), response);
    }

    /// Scripts the schema publication response.
    pub fn set_publish_response(&self, response: PublishSchemaResponse) {
        *self.publish_response.lock() = Some(response);
    }

    /// Scripts the commit response.
    pub fn set_commit_response(&self, response: CommitResponse) {
        *self.commit_response.lock() = Some(response);
    }

    /// Queues a poll response; responses are consumed in order, the last
    /// one repeating.
    pub fn push_poll_response(&self, response: PollStatusResponse) {
        self.poll_responses.lock().push_back(response);
    }

    /// Scripts the abort response.
    pub fn set_abort_response(&self, response: AbortResponse) {
        *self.abort_response.lock() = Some(response);
    }

    /// Scripts the fetch-graph response.
    pub fn set_fetch_response(&self, response: FetchGraphResponse) {
        *self.fetch_response.lock() = Some(response);
    }

    /// Number of open-transaction calls.
    #[must_use]
    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    /// Number of upload calls.
    #[must_use]
    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    /// Number of schema publications.
    #[must_use]
    pub fn publish_calls(&self) -> usize {
        self.publish_calls.load(Ordering::SeqCst)
    }

    /// Number of commit calls.
    #[must_use]
    pub fn commit_calls(&self) -> usize {
        self.commit_calls.load(Ordering::SeqCst)
    }

    /// Number of poll calls.
    #[must_use]
    pub fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }

    /// Number of abort calls.
    #[must_use]
    pub fn abort_calls(&self) -> usize {
        self.abort_calls.load(Ordering::SeqCst)
    }

    /// Asset ids uploaded, in completion order.
    #[must_use]
    pub fn uploaded_assets(&self) -> Vec<String> {
        self.uploaded_assets.lock().clone()
    }

    /// Schema documents published, in order.
    #[must_use]
    pub fn published_schemas(&self) -> Vec<PublishSchemaRequest> {
        self.published_schemas.lock().clone()
    }
}

impl StoreTransport for MockTransport {
    fn open_transaction(
        &self,
        _credential: &Credential,
        _request: &OpenTransactionRequest,
    ) -> SyncResult<OpenTransactionResponse> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .open_response
            .lock()
            .clone()
            .unwrap_or_else(|| OpenTransactionResponse::success("txn-mock")))
    }

    fn upload_binary(
        &self,
        _credential: &Credential,
        request: &UploadBinaryRequest,
    ) -> SyncResult<UploadBinaryResponse> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.uploaded_assets.lock().push(request.asset_id.clone());
        Ok(self
            .upload_responses
            .lock()
            .get(&request.asset_id)
            .cloned()
            .unwrap_or_else(|| {
                UploadBinaryResponse::success(format!("store://blob/{}", request.asset_id))
            }))
    }

    fn publish_schema(
        &self,
        _credential: &Credential,
        request: &PublishSchemaRequest,
    ) -> SyncResult<PublishSchemaResponse> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        self.published_schemas.lock().push(request.clone());
        Ok(self
            .publish_response
            .lock()
            .clone()
            .unwrap_or_else(PublishSchemaResponse::success))
    }

    fn commit(
        &self,
        _credential: &Credential,
        _request: &CommitRequest,
    ) -> SyncResult<CommitResponse> {
        self.commit_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .commit_response
            .lock()
            .clone()
            .unwrap_or_else(CommitResponse::success))
    }

    fn poll_status(
        &self,
        _credential: &Credential,
        _request: &PollStatusRequest,
    ) -> SyncResult<PollStatusResponse> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.poll_responses.lock();
        let response = if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(PollStatusResponse::pending)
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| PollStatusResponse::committed("rev-mock"))
        };
        Ok(response)
    }

    fn abort(
        &self,
        _credential: &Credential,
        _request: &AbortRequest,
    ) -> SyncResult<AbortResponse> {
        self.abort_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .abort_response
            .lock()
            .clone()
            .unwrap_or_else(AbortResponse::success))
    }

    fn fetch_graph(
        &self,
        _credential: &Credential,
        _request: &FetchGraphRequest,
    ) -> SyncResult<FetchGraphResponse> {
        self.fetch_response
            .lock()
            .clone()
            .map_or_else(
                || Err(SyncError::transport_fatal("no fetch response scripted")),
                Ok,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> Credential {
        Credential::bearer("tok")
    }

    #[test]
    fn defaults_are_successful() {
        let transport = MockTransport::new();
        let open = transport
            .open_transaction(
                &credential(),
                &OpenTransactionRequest {
                    collection_id: "c".into(),
                    exchange_id: "e".into(),
                },
            )
            .unwrap();
        assert!(open.success);
        assert_eq!(transport.open_calls(), 1);

        let poll = transport
            .poll_status(
                &credential(),
                &PollStatusRequest {
                    transaction_id: "t".into(),
                },
            )
            .unwrap();
        assert!(poll.revision_id.is_some());
    }

    #[test]
    fn scripted_upload_failure_applies_to_one_asset() {
        let transport = MockTransport::new();
        transport.set_upload_response("bad", UploadBinaryResponse::error("disk full"));

        let ok = transport
            .upload_binary(
                &credential(),
                &UploadBinaryRequest {
                    transaction_id: "t".into(),
                    asset_id: "good".into(),
                    payload: vec![1],
                },
            )
            .unwrap();
        assert!(ok.success);

        let bad = transport
            .upload_binary(
                &credential(),
                &UploadBinaryRequest {
                    transaction_id: "t".into(),
                    asset_id: "bad".into(),
                    payload: vec![2],
                },
            )
            .unwrap();
        assert!(!bad.success);
        assert_eq!(transport.uploaded_assets(), ["good", "bad"]);
    }

    #[test]
    fn poll_queue_consumes_then_repeats_last() {
        let transport = MockTransport::new();
        transport.push_poll_response(PollStatusResponse::pending());
        transport.push_poll_response(PollStatusResponse::committed("rev-9"));

        let request = PollStatusRequest {
            transaction_id: "t".into(),
        };
        let first = transport.poll_status(&credential(), &request).unwrap();
        assert_eq!(first.revision_id, None);
        let second = transport.poll_status(&credential(), &request).unwrap();
        assert_eq!(second.revision_id.as_deref(), Some("rev-9"));
        let third = transport.poll_status(&credential(), &request).unwrap();
        assert_eq!(third.revision_id.as_deref(), Some("rev-9"));
    }
}
