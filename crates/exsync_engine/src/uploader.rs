//! Bounded concurrent binary uploads.

use crate::credentials::Credential;
use crate::payload::PayloadSource;
use crate::transport::StoreTransport;
use exsync_graph::{AssetId, BinaryReference, PayloadLocator};
use exsync_protocol::UploadBinaryRequest;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// One pending upload.
#[derive(Debug, Clone)]
pub(crate) struct UploadTask {
    pub asset_id: AssetId,
    pub locator: PayloadLocator,
}

/// The outcome of one upload, in snapshot position.
#[derive(Debug, Clone)]
pub(crate) struct UploadResult {
    pub asset_id: AssetId,
    pub outcome: Result<BinaryReference, String>,
}

/// Runs all tasks through at most `workers` concurrent uploads.
///
/// Results come back in snapshot order regardless of completion order, so
/// partial-success bookkeeping stays deterministic. Cancellation marks the
/// not-yet-started remainder as failed without touching uploads already in
/// flight.
pub(crate) fn run_uploads<T, P>(
    transport: &T,
    payloads: &P,
    credential: &Credential,
    transaction_id: &str,
    tasks: Vec<UploadTask>,
    workers: usize,
    cancelled: &AtomicBool,
) -> Vec<UploadResult>
where
    T: StoreTransport + ?Sized,
    P: PayloadSource + ?Sized,
{
    if tasks.is_empty() {
        return Vec::new();
    }

    let worker_count = workers.max(1).min(tasks.len());
    debug!(
        uploads = tasks.len(),
        workers = worker_count,
        "starting upload phase"
    );

    let queue: Mutex<VecDeque<usize>> = Mutex::new((0..tasks.len()).collect());
    let slots: Vec<Mutex<Option<UploadResult>>> =
        tasks.iter().map(|_| Mutex::new(None)).collect();

    std::thread::scope(|scope| {
        for _ in 0..worker_count {
            scope.spawn(|| loop {
                let index = match queue.lock().pop_front() {
                    Some(index) => index,
                    None => break,
                };
                let task = &tasks[index];
                let outcome = if cancelled.load(Ordering::SeqCst) {
                    Err("cancelled before upload".to_string())
                } else {
                    upload_one(transport, payloads, credential, transaction_id, task)
                };
                *slots[index].lock() = Some(UploadResult {
                    asset_id: task.asset_id.clone(),
                    outcome,
                });
            });
        }
    });

    slots
        .into_iter()
        .zip(tasks)
        .map(|(slot, task)| {
            slot.into_inner().unwrap_or(UploadResult {
                asset_id: task.asset_id,
                outcome: Err("upload was not attempted".to_string()),
            })
        })
        .collect()
}

fn upload_one<T, P>(
    transport: &T,
    payloads: &P,
    credential: &Credential,
    transaction_id: &str,
    task: &UploadTask,
) -> Result<BinaryReference, String>
where
    T: StoreTransport + ?Sized,
    P: PayloadSource + ?Sized,
{
    let payload = payloads.read(&task.locator)?;
    let request = UploadBinaryRequest {
        transaction_id: transaction_id.to_string(),
        asset_id: task.asset_id.as_str().to_string(),
        payload,
    };
    let response = transport
        .upload_binary(credential, &request)
        .map_err(|e| e.to_string())?;

    if !response.success {
        return Err(response
            .error
            .unwrap_or_else(|| "upload rejected without a message".to_string()));
    }
    let locator = response
        .reference
        .ok_or_else(|| "upload succeeded without a reference".to_string())?;

    let mut reference = BinaryReference::new(locator);
    if let Some(checksum) = response.checksum {
        reference = reference.with_checksum(checksum);
    }
    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::LocalPayloadSource;
    use crate::transport::MockTransport;
    use exsync_protocol::UploadBinaryResponse;

    fn task(id: &str) -> UploadTask {
        UploadTask {
            asset_id: AssetId::from(id),
            locator: PayloadLocator::buffer(vec![0x42]),
        }
    }

    #[test]
    fn results_keep_snapshot_order() {
        let transport = MockTransport::new();
        let payloads = LocalPayloadSource::new();
        let tasks = vec![task("a"), task("b"), task("c"), task("d")];

        let results = run_uploads(
            &transport,
            &payloads,
            &Credential::bearer("tok"),
            "txn-1",
            tasks,
            3,
            &AtomicBool::new(false),
        );

        let order: Vec<_> = results.iter().map(|r| r.asset_id.as_str()).collect();
        assert_eq!(order, ["a", "b", "c", "d"]);
        assert!(results.iter().all(|r| r.outcome.is_ok()));
        assert_eq!(transport.upload_calls(), 4);
    }

    #[test]
    fn one_failure_does_not_stop_the_rest() {
        let transport = MockTransport::new();
        transport.set_upload_response("b", UploadBinaryResponse::error("quota exceeded"));
        let payloads = LocalPayloadSource::new();

        let results = run_uploads(
            &transport,
            &payloads,
            &Credential::bearer("tok"),
            "txn-1",
            vec![task("a"), task("b"), task("c")],
            1,
            &AtomicBool::new(false),
        );

        assert!(results[0].outcome.is_ok());
        assert_eq!(
            results[1].outcome.as_ref().unwrap_err(),
            "quota exceeded"
        );
        assert!(results[2].outcome.is_ok());
    }

    #[test]
    fn unreadable_payload_fails_that_task_only() {
        let transport = MockTransport::new();
        let payloads = LocalPayloadSource::new();
        let tasks = vec![
            task("a"),
            UploadTask {
                asset_id: AssetId::from("b"),
                locator: PayloadLocator::path("/missing/payload.bin"),
            },
        ];

        let results = run_uploads(
            &transport,
            &payloads,
            &Credential::bearer("tok"),
            "txn-1",
            tasks,
            2,
            &AtomicBool::new(false),
        );

        assert!(results[0].outcome.is_ok());
        assert!(results[1].outcome.is_err());
        // The unreadable payload never reached the transport.
        assert_eq!(transport.upload_calls(), 1);
    }

    #[test]
    fn cancellation_skips_queued_tasks() {
        let transport = MockTransport::new();
        let payloads = LocalPayloadSource::new();
        let cancelled = AtomicBool::new(true);

        let results = run_uploads(
            &transport,
            &payloads,
            &Credential::bearer("tok"),
            "txn-1",
            vec![task("a"), task("b")],
            2,
            &cancelled,
        );

        assert!(results.iter().all(|r| r.outcome.is_err()));
        assert_eq!(transport.upload_calls(), 0);
    }

    #[test]
    fn empty_task_list_is_a_no_op() {
        let transport = MockTransport::new();
        let payloads = LocalPayloadSource::new();
        let results = run_uploads(
            &transport,
            &payloads,
            &Credential::bearer("tok"),
            "txn-1",
            Vec::new(),
            4,
            &AtomicBool::new(false),
        );
        assert!(results.is_empty());
        assert_eq!(transport.upload_calls(), 0);
    }
}
