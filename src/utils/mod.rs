use anyhow::{anyhow, Result};
use chrono::{Datelike, Local, NaiveDate};

pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Short English month name ("Jan", "Feb", ...), the label the chart series use.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b").to_string()
}

pub fn quarter_label(date: NaiveDate) -> String {
    format!("Q{} {}", date.month0() / 3 + 1, date.year())
}

pub fn padded_id(prefix: &str, number: usize, width: usize) -> String {
    format!("{}{:0width$}", prefix, number, width = width)
}

pub fn parse_decimal(value: &str) -> Result<f64> {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|e| anyhow!("Parse decimal: {}", e))
}

pub fn normalize_date(value: Option<String>) -> Option<String> {
    let raw = value?.trim().to_string();
    if raw.is_empty() {
        return None;
    }

    let formats = [DISPLAY_DATE_FORMAT, "%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d", "%Y.%m.%d"];
    for fmt in formats.iter() {
        if let Ok(date) = NaiveDate::parse_from_str(&raw, fmt) {
            return Some(format_date(date));
        }
    }
    Some(raw)
}
