use serde::Deserialize;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Invoice, NewInvoice, PaymentStatus};
use crate::services::state::AppState;
use crate::utils::{format_date, normalize_date, today};

use super::{lock_store, reject, required, required_amount, required_date, status_text};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    pub client: Option<String>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

pub fn get_invoices(state: &AppState) -> Result<Vec<Invoice>, String> {
    Ok(lock_store(state)?.data().invoices.clone())
}

pub fn add_invoice(payload: InvoicePayload, state: &AppState) -> Result<Invoice, String> {
    let new = validate(payload).map_err(|err| reject(state, err))?;
    let invoice = lock_store(state)?.add_invoice(new);
    state.notifier.success(
        "Invoice Added",
        "Your new invoice has been added successfully.",
    );
    Ok(invoice)
}

/// Unknown ids are not an error: returns `Ok(false)` and stays silent.
pub fn update_invoice_status(id: &str, status: &str, state: &AppState) -> Result<bool, String> {
    let status = PaymentStatus::parse(status)
        .ok_or_else(|| FinanceError::Validation(format!("Unknown invoice status '{}'", status)))
        .map_err(|err| reject(state, err))?;
    let found = lock_store(state)?.update_invoice_status(id, status);
    if found {
        state.notifier.success(
            "Status Updated",
            &format!("Invoice status has been updated to {}.", status_text(status)),
        );
    }
    Ok(found)
}

fn validate(payload: InvoicePayload) -> FinanceResult<NewInvoice> {
    Ok(NewInvoice {
        client: required(payload.client, "client")?,
        issue_date: normalize_date(payload.issue_date).unwrap_or_else(|| format_date(today())),
        due_date: required_date(payload.due_date, "dueDate")?,
        amount: required_amount(payload.amount)?,
        status: payload
            .status
            .and_then(|s| PaymentStatus::parse(&s))
            .unwrap_or(PaymentStatus::Pending),
    })
}
