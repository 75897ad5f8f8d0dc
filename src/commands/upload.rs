use tokio::task::JoinHandle;

use crate::models::UploadLog;
use crate::services::state::{AppState, UploadKind, UPLOAD_FAILURE_DESCRIPTION};
use crate::services::upload::parse_payload;

use super::lock_store;

/// Schedules a tax upload from raw JSON text. A payload that does not parse
/// or has the wrong shape is reported and nothing is scheduled.
pub fn upload_tax_data(text: &str, state: &AppState) -> Result<JoinHandle<()>, String> {
    upload(UploadKind::Tax, text, state)
}

pub fn upload_financial_data(text: &str, state: &AppState) -> Result<JoinHandle<()>, String> {
    upload(UploadKind::Financial, text, state)
}

pub fn get_upload_logs(limit: usize, state: &AppState) -> Result<Vec<UploadLog>, String> {
    lock_store(state)?
        .database()
        .get_upload_logs(limit)
        .map_err(|e| e.to_string())
}

fn upload(kind: UploadKind, text: &str, state: &AppState) -> Result<JoinHandle<()>, String> {
    let scheduled = parse_payload(text).and_then(|payload| match kind {
        UploadKind::Tax => state.upload_tax_data(&payload),
        UploadKind::Financial => state.upload_financial_data(&payload),
    });

    scheduled.map_err(|err| {
        tracing::error!(kind = kind.as_str(), error = %err, "Upload rejected");
        state.record_failed_upload(kind, &err.to_string());
        state
            .notifier
            .failure(kind.failure_title(), UPLOAD_FAILURE_DESCRIPTION);
        err.to_string()
    })
}
