use serde::Deserialize;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Bill, BillStats, NewBill, PaymentStatus};
use crate::services::state::AppState;

use super::{lock_store, reject, required, required_amount, required_date, status_text};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPayload {
    pub name: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

pub fn get_bills(state: &AppState) -> Result<Vec<Bill>, String> {
    Ok(lock_store(state)?.data().bills.clone())
}

pub fn get_bill_stats(state: &AppState) -> Result<BillStats, String> {
    Ok(lock_store(state)?.data().bill_stats())
}

pub fn add_bill(payload: BillPayload, state: &AppState) -> Result<Bill, String> {
    let new = validate(payload).map_err(|err| reject(state, err))?;
    let bill = lock_store(state)?.add_bill(new);
    state
        .notifier
        .success("Bill Added", "Your new bill has been added successfully.");
    Ok(bill)
}

pub fn update_bill_status(id: &str, status: &str, state: &AppState) -> Result<bool, String> {
    let status = PaymentStatus::parse(status)
        .ok_or_else(|| FinanceError::Validation(format!("Unknown bill status '{}'", status)))
        .map_err(|err| reject(state, err))?;
    let found = lock_store(state)?.update_bill_status(id, status);
    if found {
        state.notifier.success(
            "Status Updated",
            &format!("Bill status has been updated to {}.", status_text(status)),
        );
    }
    Ok(found)
}

fn validate(payload: BillPayload) -> FinanceResult<NewBill> {
    Ok(NewBill {
        name: required(payload.name, "name")?,
        category: required(payload.category, "category").unwrap_or_else(|_| "Utilities".to_string()),
        due_date: required_date(payload.due_date, "dueDate")?,
        amount: required_amount(payload.amount)?,
        status: payload
            .status
            .and_then(|s| PaymentStatus::parse(&s))
            .unwrap_or(PaymentStatus::Pending),
    })
}
