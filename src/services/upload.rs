use chrono::{Days, NaiveDate};
use jsonschema::JSONSchema;
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    FilingStatus, NewBill, NewInvoice, NewTaxFiling, PaymentStatus, SalesPoint, SatisfactionPoint,
};
use crate::utils::{format_date, normalize_date, parse_decimal, quarter_label};

const DEFAULT_TERM_DAYS: u64 = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct TaxUpload {
    pub filings: Vec<NewTaxFiling>,
    pub total_taxes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinancialUpload {
    pub invoices: Vec<NewInvoice>,
    pub bills: Vec<NewBill>,
    pub sales: Vec<SalesPoint>,
    pub satisfaction: Vec<SatisfactionPoint>,
}

impl TaxUpload {
    pub fn record_count(&self) -> usize {
        self.filings.len()
    }
}

impl FinancialUpload {
    pub fn record_count(&self) -> usize {
        self.invoices.len() + self.bills.len()
    }
}

/// Parses raw upload text. Blank text is treated as an empty object.
pub fn parse_payload(text: &str) -> FinanceResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(text).map_err(|e| FinanceError::MalformedPayload(e.to_string()))
}

pub fn parse_tax_upload(payload: &Value, today: NaiveDate) -> FinanceResult<TaxUpload> {
    validate(payload)?;

    let filings = entries(payload, "taxFilings")
        .map(|entry| NewTaxFiling {
            tax_type: text_field(entry, "type").unwrap_or_else(|| "Income Tax".to_string()),
            period: text_field(entry, "period").unwrap_or_else(|| quarter_label(today)),
            due_date: normalize_date(text_field(entry, "dueDate"))
                .unwrap_or_else(|| format_date(today)),
            amount: number_field(entry, "amount").unwrap_or(0.0),
            status: text_field(entry, "status")
                .and_then(|s| FilingStatus::parse(&s))
                .unwrap_or(FilingStatus::Pending),
        })
        .collect();

    let total_taxes = payload
        .get("taxSummary")
        .and_then(Value::as_object)
        .and_then(|summary| number_field(summary, "totalTaxes"))
        .filter(|total| *total != 0.0);

    Ok(TaxUpload { filings, total_taxes })
}

pub fn parse_financial_upload(payload: &Value, today: NaiveDate) -> FinanceResult<FinancialUpload> {
    validate(payload)?;

    let due = today
        .checked_add_days(Days::new(DEFAULT_TERM_DAYS))
        .unwrap_or(today);

    let invoices = entries(payload, "invoices")
        .map(|entry| NewInvoice {
            client: text_field(entry, "client").unwrap_or_else(|| "New Client".to_string()),
            issue_date: normalize_date(text_field(entry, "issueDate"))
                .unwrap_or_else(|| format_date(today)),
            due_date: normalize_date(text_field(entry, "dueDate")).unwrap_or_else(|| format_date(due)),
            amount: number_field(entry, "amount").unwrap_or(0.0),
            status: payment_status(entry),
        })
        .collect();

    let bills = entries(payload, "bills")
        .map(|entry| NewBill {
            name: text_field(entry, "name").unwrap_or_else(|| "New Bill".to_string()),
            category: text_field(entry, "category").unwrap_or_else(|| "Utilities".to_string()),
            due_date: normalize_date(text_field(entry, "dueDate")).unwrap_or_else(|| format_date(due)),
            amount: number_field(entry, "amount").unwrap_or(0.0),
            status: payment_status(entry),
        })
        .collect();

    let sales = entries(payload, "salesData")
        .filter_map(|entry| {
            Some(SalesPoint {
                month: text_field(entry, "month")?,
                total: number_field(entry, "total").unwrap_or(0.0),
            })
        })
        .collect();

    let satisfaction = entries(payload, "customerSatisfaction")
        .filter_map(|entry| {
            let satisfaction = number_field(entry, "satisfaction").filter(|v| *v != 0.0)?;
            Some(SatisfactionPoint {
                month: text_field(entry, "month")?,
                satisfaction,
            })
        })
        .collect();

    Ok(FinancialUpload {
        invoices,
        bills,
        sales,
        satisfaction,
    })
}

/// Only the top level is checked; sections of the wrong shape are skipped
/// by `entries` so the rest of the upload still applies.
fn upload_schema() -> &'static Result<JSONSchema, String> {
    static SCHEMA: OnceLock<Result<JSONSchema, String>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        JSONSchema::compile(&json!({"type": "object"}))
            .map_err(|e| format!("Invalid upload schema: {}", e))
    })
}

fn validate(payload: &Value) -> FinanceResult<()> {
    let compiled = upload_schema()
        .as_ref()
        .map_err(|e| FinanceError::MalformedPayload(e.clone()))?;

    if let Err(errors) = compiled.validate(payload) {
        let messages: Vec<String> = errors
            .map(|e| format!("{} at '{}'", e, e.instance_path))
            .collect();
        return Err(FinanceError::MalformedPayload(messages.join("; ")));
    }
    Ok(())
}

fn entries<'a>(payload: &'a Value, key: &str) -> impl Iterator<Item = &'a Map<String, Value>> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn text_field(entry: &Map<String, Value>, key: &str) -> Option<String> {
    match entry.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_field(entry: &Map<String, Value>, key: &str) -> Option<f64> {
    match entry.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s).ok(),
        _ => None,
    }
}

fn payment_status(entry: &Map<String, Value>) -> PaymentStatus {
    text_field(entry, "status")
        .and_then(|s| PaymentStatus::parse(&s))
        .unwrap_or(PaymentStatus::Pending)
}
