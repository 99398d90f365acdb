//! A transport that drives the remote store through the SDK gateway.

use crate::credentials::Credential;
use crate::error::{SyncError, SyncResult};
use crate::transport::StoreTransport;
use exsync_gateway::{
    CapabilityRuntime, GatewayError, MemberSpec, SdkValue, SearchScope, ServiceGateway,
};
use exsync_protocol::{
    AbortRequest, AbortResponse, CommitRequest, CommitResponse, FetchGraphRequest,
    FetchGraphResponse, GraphSnapshot, OpenTransactionRequest, OpenTransactionResponse,
    PollStatusRequest, PollStatusResponse, PublishSchemaRequest, PublishSchemaResponse,
    UploadBinaryRequest, UploadBinaryResponse,
};

/// Qualified names of the SDK capabilities the transport binds to.
///
/// Kept configurable so a host can point the transport at a renamed or
/// vendored client type without code changes.
#[derive(Debug, Clone)]
pub struct SdkNames {
    /// Qualified name of the store client type.
    pub client_type: String,
    /// Member opening a transaction.
    pub open: String,
    /// Member uploading one binary payload.
    pub upload: String,
    /// Member publishing the schema document.
    pub publish: String,
    /// Member committing the transaction.
    pub commit: String,
    /// Member reporting transaction status.
    pub status: String,
    /// Member aborting an open transaction.
    pub abort: String,
    /// Member fetching an exchange's graph snapshot.
    pub fetch: String,
}

impl Default for SdkNames {
    fn default() -> Self {
        Self {
            client_type: "Exchange.Client.ExchangeStoreClient".to_string(),
            open: "OpenTransaction".to_string(),
            upload: "UploadBinary".to_string(),
            publish: "PublishSchema".to_string(),
            commit: "CommitTransaction".to_string(),
            status: "GetTransactionStatus".to_string(),
            abort: "AbortTransaction".to_string(),
            fetch: "GetExchangeGraph".to_string(),
        }
    }
}

/// [`StoreTransport`] over a [`ServiceGateway`].
///
/// Every operation resolves its capability through the gateway's caches,
/// issues a suspending call, and normalizes the wrapped outcome. Resolution
/// misses surface as fatal [`SyncError::Resolution`] errors; invocation and
/// outcome failures are retryable transport errors.
pub struct GatewayTransport<R: CapabilityRuntime> {
    gateway: ServiceGateway<R>,
    names: SdkNames,
}

impl<R: CapabilityRuntime> GatewayTransport<R> {
    /// Creates a transport with the default capability names.
    pub fn new(runtime: R) -> Self {
        Self::with_names(runtime, SdkNames::default())
    }

    /// Creates a transport bound to custom capability names.
    pub fn with_names(runtime: R, names: SdkNames) -> Self {
        Self {
            gateway: ServiceGateway::new(runtime),
            names,
        }
    }

    /// Returns the underlying gateway.
    pub fn gateway(&self) -> &ServiceGateway<R> {
        &self.gateway
    }

    fn call(
        &self,
        credential: &Credential,
        member_name: &str,
        arguments: Vec<(String, SdkValue)>,
    ) -> SyncResult<SdkValue> {
        let ty = self
            .gateway
            .resolve_type(&self.names.client_type, SearchScope::Client)
            .ok_or_else(|| SyncError::Resolution {
                name: self.names.client_type.clone(),
            })?;
        let member = self
            .gateway
            .resolve_member(&ty, &MemberSpec::named(member_name))
            .ok_or_else(|| SyncError::Resolution {
                name: format!("{}.{member_name}", ty.name),
            })?;

        let mut pairs = vec![(
            "BearerToken".to_string(),
            SdkValue::text(credential.bearer.clone()),
        )];
        pairs.extend(arguments);

        let raw = self
            .gateway
            .invoke_deferred(None, &member, &[SdkValue::map(pairs)])
            .map_err(map_gateway_error)?;
        self.gateway.normalize(raw).map_err(map_gateway_error)
    }
}

fn map_gateway_error(error: GatewayError) -> SyncError {
    match error {
        GatewayError::Resolution { name } => SyncError::Resolution { name },
        GatewayError::Conversion { .. } => SyncError::transport_fatal(error.to_string()),
        GatewayError::Invocation { .. } | GatewayError::Outcome { .. } => {
            SyncError::transport_retryable(error.to_string())
        }
    }
}

fn text_field(value: &SdkValue, key: &str) -> Option<String> {
    value.get(key).and_then(SdkValue::as_text).map(str::to_string)
}

impl<R: CapabilityRuntime> StoreTransport for GatewayTransport<R> {
    fn open_transaction(
        &self,
        credential: &Credential,
        request: &OpenTransactionRequest,
    ) -> SyncResult<OpenTransactionResponse> {
        let value = self.call(
            credential,
            &self.names.open,
            vec![
                (
                    "CollectionId".to_string(),
                    SdkValue::text(request.collection_id.clone()),
                ),
                (
                    "ExchangeId".to_string(),
                    SdkValue::text(request.exchange_id.clone()),
                ),
            ],
        )?;
        let transaction_id = text_field(&value, "TransactionId").ok_or_else(|| {
            SyncError::transport_fatal("open succeeded without a transaction id")
        })?;
        Ok(OpenTransactionResponse::success(transaction_id))
    }

    fn upload_binary(
        &self,
        credential: &Credential,
        request: &UploadBinaryRequest,
    ) -> SyncResult<UploadBinaryResponse> {
        let value = self.call(
            credential,
            &self.names.upload,
            vec![
                (
                    "TransactionId".to_string(),
                    SdkValue::text(request.transaction_id.clone()),
                ),
                (
                    "AssetId".to_string(),
                    SdkValue::text(request.asset_id.clone()),
                ),
                (
                    "Payload".to_string(),
                    SdkValue::Bytes(request.payload.clone()),
                ),
            ],
        )?;
        let reference = text_field(&value, "Reference")
            .ok_or_else(|| SyncError::transport_fatal("upload succeeded without a reference"))?;
        let mut response = UploadBinaryResponse::success(reference);
        response.checksum = text_field(&value, "Checksum");
        Ok(response)
    }

    fn publish_schema(
        &self,
        credential: &Credential,
        request: &PublishSchemaRequest,
    ) -> SyncResult<PublishSchemaResponse> {
        let schema = serde_json::to_string(&request.schema)
            .map_err(|e| SyncError::transport_fatal(format!("schema serialization: {e}")))?;
        self.call(
            credential,
            &self.names.publish,
            vec![
                (
                    "TransactionId".to_string(),
                    SdkValue::text(request.transaction_id.clone()),
                ),
                ("Schema".to_string(), SdkValue::text(schema)),
            ],
        )?;
        Ok(PublishSchemaResponse::success())
    }

    fn commit(
        &self,
        credential: &Credential,
        request: &CommitRequest,
    ) -> SyncResult<CommitResponse> {
        self.call(
            credential,
            &self.names.commit,
            vec![(
                "TransactionId".to_string(),
                SdkValue::text(request.transaction_id.clone()),
            )],
        )?;
        Ok(CommitResponse::success())
    }

    fn poll_status(
        &self,
        credential: &Credential,
        request: &PollStatusRequest,
    ) -> SyncResult<PollStatusResponse> {
        let value = self.call(
            credential,
            &self.names.status,
            vec![(
                "TransactionId".to_string(),
                SdkValue::text(request.transaction_id.clone()),
            )],
        )?;

        let state = text_field(&value, "State").unwrap_or_else(|| "Pending".to_string());
        let response = match state.as_str() {
            "Committed" => match text_field(&value, "RevisionId") {
                Some(revision_id) => PollStatusResponse::committed(revision_id),
                // A revision-less commit report is not yet actionable.
                None => PollStatusResponse::pending(),
            },
            "Failed" => PollStatusResponse::failed(
                text_field(&value, "Error")
                    .unwrap_or_else(|| "transaction failed remotely".to_string()),
            ),
            _ => PollStatusResponse::pending(),
        };
        Ok(response)
    }

    fn abort(&self, credential: &Credential, request: &AbortRequest) -> SyncResult<AbortResponse> {
        self.call(
            credential,
            &self.names.abort,
            vec![(
                "TransactionId".to_string(),
                SdkValue::text(request.transaction_id.clone()),
            )],
        )?;
        Ok(AbortResponse::success())
    }

    fn fetch_graph(
        &self,
        credential: &Credential,
        request: &FetchGraphRequest,
    ) -> SyncResult<FetchGraphResponse> {
        let value = self.call(
            credential,
            &self.names.fetch,
            vec![
                (
                    "CollectionId".to_string(),
                    SdkValue::text(request.collection_id.clone()),
                ),
                (
                    "ExchangeId".to_string(),
                    SdkValue::text(request.exchange_id.clone()),
                ),
            ],
        )?;
        let raw = text_field(&value, "Snapshot")
            .ok_or_else(|| SyncError::transport_fatal("fetch succeeded without a snapshot"))?;
        let snapshot: GraphSnapshot = serde_json::from_str(&raw)
            .map_err(|e| SyncError::transport_fatal(format!("snapshot decoding: {e}")))?;
        Ok(FetchGraphResponse::success(snapshot))
    }
}
