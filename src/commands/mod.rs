pub mod bills;
pub mod dashboard;
pub mod invoices;
pub mod settings;
pub mod taxes;
pub mod upload;

use std::sync::MutexGuard;

use crate::error::{FinanceError, FinanceResult};
use crate::services::state::AppState;
use crate::services::store::FinanceStore;
use crate::utils::{normalize_date, parse_decimal};

pub(crate) const VALIDATION_TITLE: &str = "Validation Error";
pub(crate) const VALIDATION_DESCRIPTION: &str = "Please fill in all required fields.";

pub(crate) fn lock_store(state: &AppState) -> Result<MutexGuard<'_, FinanceStore>, String> {
    state.store.lock().map_err(|_| "Store lock".to_string())
}

pub(crate) fn required(value: Option<String>, field: &str) -> FinanceResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| FinanceError::Validation(format!("{} is required", field)))
}

pub(crate) fn required_date(value: Option<String>, field: &str) -> FinanceResult<String> {
    let raw = required(value, field)?;
    Ok(normalize_date(Some(raw.clone())).unwrap_or(raw))
}

/// Amount fields arrive as form text; zero counts as missing.
pub(crate) fn required_amount(value: Option<String>) -> FinanceResult<f64> {
    let raw = required(value, "amount")?;
    let amount = parse_decimal(&raw).map_err(|e| FinanceError::Validation(e.to_string()))?;
    if amount == 0.0 || !amount.is_finite() {
        return Err(FinanceError::Validation("amount is required".to_string()));
    }
    Ok(amount)
}

/// Reports a rejected form and hands the message back to the caller.
pub(crate) fn reject(state: &AppState, err: FinanceError) -> String {
    tracing::warn!(error = %err, "Form rejected");
    state.notifier.failure(VALIDATION_TITLE, VALIDATION_DESCRIPTION);
    err.to_string()
}

fn status_text<T: serde::Serialize>(status: T) -> String {
    serde_json::to_value(status)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}
