use anyhow::{anyhow, Result};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::error::FinanceResult;
use crate::models::Settings;
use crate::services::notifier::Notifier;
use crate::services::store::FinanceStore;
use crate::services::upload::{parse_financial_upload, parse_tax_upload};
use crate::utils::today;

/// Shared handle to the store. Every mutation goes through the one mutex,
/// so there is a single writer at a time.
pub struct AppState {
    pub store: Arc<Mutex<FinanceStore>>,
    pub settings: Arc<Mutex<Settings>>,
    pub notifier: Notifier,
    uploads_in_flight: Arc<AtomicUsize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Tax,
    Financial,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadKind::Tax => "tax",
            UploadKind::Financial => "financial",
        }
    }

    fn success(&self) -> (&'static str, &'static str) {
        match self {
            UploadKind::Tax => (
                "Tax data uploaded",
                "Your tax data has been successfully processed.",
            ),
            UploadKind::Financial => (
                "Financial data uploaded",
                "Your financial data has been successfully processed.",
            ),
        }
    }

    pub fn failure_title(&self) -> &'static str {
        match self {
            UploadKind::Tax => "Error uploading tax data",
            UploadKind::Financial => "Error uploading financial data",
        }
    }
}

pub const UPLOAD_FAILURE_DESCRIPTION: &str = "Please check your data format and try again.";

/// Counts one upload as in flight until dropped.
struct LoadingGuard(Arc<AtomicUsize>);

impl LoadingGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        LoadingGuard(counter.clone())
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl AppState {
    pub fn new(store: FinanceStore, settings: Settings) -> Self {
        AppState {
            store: Arc::new(Mutex::new(store)),
            settings: Arc::new(Mutex::new(settings)),
            notifier: Notifier::new(),
            uploads_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn update_settings(&self, settings: Settings) -> Result<()> {
        let mut locked = self.settings.lock().map_err(|_| anyhow!("Settings lock"))?;
        *locked = settings;
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.uploads_in_flight.load(Ordering::SeqCst) > 0
    }

    /// Validates the payload now and applies it after the configured delay.
    /// Must be called from within a tokio runtime.
    pub fn upload_tax_data(&self, payload: &Value) -> FinanceResult<JoinHandle<()>> {
        let upload = parse_tax_upload(payload, today())?;
        Ok(self.schedule(UploadKind::Tax, move |store| store.apply_tax_upload(upload)))
    }

    pub fn upload_financial_data(&self, payload: &Value) -> FinanceResult<JoinHandle<()>> {
        let upload = parse_financial_upload(payload, today())?;
        Ok(self.schedule(UploadKind::Financial, move |store| {
            store.apply_financial_upload(upload)
        }))
    }

    pub fn record_failed_upload(&self, kind: UploadKind, message: &str) {
        match self.store.lock() {
            Ok(store) => {
                if let Err(err) = store.database().log_upload(kind.as_str(), "failed", 0, Some(message)) {
                    tracing::error!(error = %err, "Failed to record upload log");
                }
            }
            Err(_) => tracing::error!("Store lock poisoned, upload failure not recorded"),
        }
    }

    fn upload_delay(&self) -> Duration {
        let millis = self
            .settings
            .lock()
            .map(|settings| settings.upload_delay_ms)
            .unwrap_or_else(|_| Settings::default().upload_delay_ms);
        Duration::from_millis(millis)
    }

    fn schedule<F>(&self, kind: UploadKind, apply: F) -> JoinHandle<()>
    where
        F: FnOnce(&mut FinanceStore) -> usize + Send + 'static,
    {
        let guard = LoadingGuard::enter(&self.uploads_in_flight);
        let delay = self.upload_delay();
        let store = self.store.clone();
        let notifier = self.notifier.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let outcome = match store.lock() {
                Ok(mut store) => {
                    let added = apply(&mut *store);
                    if let Err(err) = store.database().log_upload(kind.as_str(), "success", added, None) {
                        tracing::error!(error = %err, "Failed to record upload log");
                    }
                    Ok(added)
                }
                Err(_) => Err(anyhow!("Store lock poisoned")),
            };
            drop(guard);

            match outcome {
                Ok(added) => {
                    tracing::info!(kind = kind.as_str(), records = added, "Upload processed");
                    let (title, description) = kind.success();
                    notifier.success(title, description);
                }
                Err(err) => {
                    tracing::error!(kind = kind.as_str(), error = %err, "Upload failed");
                    notifier.failure(kind.failure_title(), UPLOAD_FAILURE_DESCRIPTION);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use serde_json::json;

    fn state(delay_ms: u64) -> AppState {
        AppState::new(
            FinanceStore::load(Database::in_memory().unwrap()),
            Settings {
                upload_delay_ms: delay_ms,
            },
        )
    }

    #[tokio::test]
    async fn loading_flag_covers_overlapping_uploads() {
        let state = state(50);
        let mut events = state.notifier.subscribe();

        let first = state
            .upload_tax_data(&json!({"taxFilings": [{"amount": 10}]}))
            .unwrap();
        let second = state
            .upload_financial_data(&json!({"invoices": [{"amount": 20, "status": "paid"}]}))
            .unwrap();
        assert!(state.is_loading());

        first.await.unwrap();
        second.await.unwrap();
        assert!(!state.is_loading());

        let titles = [events.recv().await.unwrap().title, events.recv().await.unwrap().title];
        assert!(titles.contains(&"Tax data uploaded".to_string()));
        assert!(titles.contains(&"Financial data uploaded".to_string()));

        let store = state.store.lock().unwrap();
        assert_eq!(store.data().tax_filings.last().unwrap().id, "TX-UPLOAD-001");
        assert_eq!(store.data().invoices.last().unwrap().id, "INV-UPLOAD-001");
        assert_eq!(store.database().get_upload_logs(10).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn malformed_payload_is_rejected_before_scheduling() {
        let state = state(0);
        let before = state.store.lock().unwrap().data().clone();

        assert!(state.upload_financial_data(&json!(["bills", 5])).is_err());
        assert!(!state.is_loading());
        assert_eq!(state.store.lock().unwrap().data(), &before);
    }
}
