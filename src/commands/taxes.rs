use serde::Deserialize;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{FilingStatus, NewTaxFiling, TaxFiling};
use crate::services::state::AppState;

use super::{lock_store, reject, required, required_amount, required_date, status_text};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxFilingPayload {
    #[serde(rename = "type")]
    pub tax_type: Option<String>,
    pub period: Option<String>,
    pub due_date: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

pub fn get_tax_filings(state: &AppState) -> Result<Vec<TaxFiling>, String> {
    Ok(lock_store(state)?.data().tax_filings.clone())
}

pub fn add_tax_filing(payload: TaxFilingPayload, state: &AppState) -> Result<TaxFiling, String> {
    let new = validate(payload).map_err(|err| reject(state, err))?;
    let filing = lock_store(state)?.add_tax_filing(new);
    state.notifier.success(
        "Tax Filing Added",
        "Your new tax filing has been added successfully.",
    );
    Ok(filing)
}

pub fn update_tax_filing_status(id: &str, status: &str, state: &AppState) -> Result<bool, String> {
    let status = FilingStatus::parse(status)
        .ok_or_else(|| FinanceError::Validation(format!("Unknown tax filing status '{}'", status)))
        .map_err(|err| reject(state, err))?;
    let found = lock_store(state)?.update_tax_filing_status(id, status);
    if found {
        state.notifier.success(
            "Status Updated",
            &format!("Tax filing status has been updated to {}.", status_text(status)),
        );
    }
    Ok(found)
}

fn validate(payload: TaxFilingPayload) -> FinanceResult<NewTaxFiling> {
    Ok(NewTaxFiling {
        tax_type: required(payload.tax_type, "type").unwrap_or_else(|_| "Income Tax".to_string()),
        period: required(payload.period, "period")?,
        due_date: required_date(payload.due_date, "dueDate")?,
        amount: required_amount(payload.amount)?,
        status: payload
            .status
            .and_then(|s| FilingStatus::parse(&s))
            .unwrap_or(FilingStatus::Pending),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use crate::utils::today;
    use chrono::Datelike;

    #[test]
    fn filing_gets_current_year_id_and_leaves_metrics_alone() {
        let state = test_support::state();
        let before = state.store.lock().unwrap().data().metrics.clone();

        let filing = add_tax_filing(
            TaxFilingPayload {
                period: Some("Q3 2024".into()),
                due_date: Some("2024-10-15".into()),
                amount: Some("2100".into()),
                ..TaxFilingPayload::default()
            },
            &state,
        )
        .unwrap();

        assert_eq!(filing.id, format!("TX-{}-04", today().year()));
        assert_eq!(filing.tax_type, "Income Tax");
        assert_eq!(filing.due_date, "15/10/2024");
        assert_eq!(state.store.lock().unwrap().data().metrics, before);
    }

    #[test]
    fn missing_period_is_rejected() {
        let state = test_support::state();
        let result = add_tax_filing(
            TaxFilingPayload {
                due_date: Some("2024-10-15".into()),
                amount: Some("2100".into()),
                ..TaxFilingPayload::default()
            },
            &state,
        );
        assert!(result.is_err());
        assert_eq!(get_tax_filings(&state).unwrap().len(), 3);
    }

    #[test]
    fn filing_status_update() {
        let state = test_support::state();
        assert_eq!(update_tax_filing_status("TX-2023-Q2", "filed", &state), Ok(true));
        assert_eq!(
            get_tax_filings(&state).unwrap()[1].status,
            FilingStatus::Filed
        );
    }
}
