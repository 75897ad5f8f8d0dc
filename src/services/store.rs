use chrono::Datelike;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::db::Database;
use crate::error::FinanceResult;
use crate::models::{
    Bill, BillStats, DashboardStats, FilingStatus, FinancialMetrics, Invoice, NewBill, NewInvoice,
    NewTaxFiling, PaymentStatus, SalesPoint, SatisfactionPoint, TargetPoint, TaxFiling,
    VisitorPoint,
};
use crate::services::seed;
use crate::services::upload::{FinancialUpload, TaxUpload};
use crate::utils::{month_label, padded_id, today};

pub const KEY_INVOICES: &str = "invoices";
pub const KEY_TAX_FILINGS: &str = "taxFilings";
pub const KEY_BILLS: &str = "bills";
pub const KEY_SALES_DATA: &str = "salesData";
pub const KEY_METRICS: &str = "metrics";
pub const KEY_CUSTOMER_SATISFACTION: &str = "customerSatisfaction";
pub const KEY_TARGET_VS_REALITY: &str = "targetVsReality";
pub const KEY_VISITOR_DATA: &str = "visitorData";

const INVOICE_UPLOAD_PREFIX: &str = "INV-UPLOAD-";
const BILL_UPLOAD_PREFIX: &str = "BILL-UPLOAD-";
const TAX_UPLOAD_PREFIX: &str = "TX-UPLOAD-";

#[derive(Debug, Clone, PartialEq)]
pub struct FinanceData {
    pub invoices: Vec<Invoice>,
    pub tax_filings: Vec<TaxFiling>,
    pub bills: Vec<Bill>,
    pub sales_data: Vec<SalesPoint>,
    pub metrics: FinancialMetrics,
    pub customer_satisfaction: Vec<SatisfactionPoint>,
    pub target_vs_reality: Vec<TargetPoint>,
    pub visitor_data: Vec<VisitorPoint>,
}

impl FinanceData {
    pub fn seed() -> Self {
        FinanceData {
            invoices: seed::invoices(),
            tax_filings: seed::tax_filings(),
            bills: seed::bills(),
            sales_data: seed::sales_data(),
            metrics: seed::metrics(),
            customer_satisfaction: seed::customer_satisfaction(),
            target_vs_reality: seed::target_vs_reality(),
            visitor_data: seed::visitor_data(),
        }
    }

    pub fn bill_stats(&self) -> BillStats {
        let sum_by = |status: PaymentStatus| -> f64 {
            self.bills
                .iter()
                .filter(|bill| bill.status == status)
                .map(|bill| bill.amount)
                .sum()
        };
        let total_amount: f64 = self.bills.iter().map(|bill| bill.amount).sum();
        let paid_amount = sum_by(PaymentStatus::Paid);
        let pending_amount = sum_by(PaymentStatus::Pending);
        let overdue_amount = sum_by(PaymentStatus::Overdue);
        let share = |amount: f64| {
            if total_amount > 0.0 {
                amount / total_amount * 100.0
            } else {
                0.0
            }
        };

        BillStats {
            total_amount,
            paid_amount,
            pending_amount,
            overdue_amount,
            paid_percentage: share(paid_amount),
            pending_percentage: share(pending_amount),
            overdue_percentage: share(overdue_amount),
        }
    }

    pub fn dashboard(&self, is_loading: bool) -> DashboardStats {
        DashboardStats {
            metrics: self.metrics.snapshot(),
            sales_data: self.sales_data.clone(),
            customer_satisfaction: self.customer_satisfaction.clone(),
            target_vs_reality: self.target_vs_reality.clone(),
            visitor_data: self.visitor_data.clone(),
            is_loading,
        }
    }
}

/// Records plus derived metrics, written back to the key-value table after
/// every change.
pub struct FinanceStore {
    data: FinanceData,
    db: Database,
}

impl FinanceStore {
    /// Starts from the seed and overlays whatever the database holds.
    pub fn load(db: Database) -> Self {
        let mut data = FinanceData::seed();
        restore_records(&db, KEY_INVOICES, "revenueApplied", &mut data.invoices);
        restore(&db, KEY_TAX_FILINGS, &mut data.tax_filings);
        restore_records(&db, KEY_BILLS, "expenseApplied", &mut data.bills);
        restore(&db, KEY_SALES_DATA, &mut data.sales_data);
        restore(&db, KEY_METRICS, &mut data.metrics);
        restore(&db, KEY_CUSTOMER_SATISFACTION, &mut data.customer_satisfaction);
        restore(&db, KEY_TARGET_VS_REALITY, &mut data.target_vs_reality);
        restore(&db, KEY_VISITOR_DATA, &mut data.visitor_data);
        FinanceStore { data, db }
    }

    pub fn data(&self) -> &FinanceData {
        &self.data
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn add_invoice(&mut self, new: NewInvoice) -> Invoice {
        let id = next_free_id(
            &self.data.invoices,
            |invoice| invoice.id.as_str(),
            "INV-",
            self.data.invoices.len() + 1,
            3,
        );
        let paid = new.status == PaymentStatus::Paid;
        let invoice = Invoice {
            id,
            client: new.client,
            issue_date: new.issue_date,
            due_date: new.due_date,
            amount: new.amount,
            status: new.status,
            revenue_applied: paid,
        };
        self.data.invoices.push(invoice.clone());

        if paid {
            self.apply_payment(invoice.amount, 1);
        }
        self.data.metrics.total_orders += 1;

        tracing::info!(invoice_id = %invoice.id, amount = invoice.amount, "Invoice added");
        self.persist();
        invoice
    }

    pub fn add_tax_filing(&mut self, new: NewTaxFiling) -> TaxFiling {
        let prefix = format!("TX-{}-", today().year());
        let id = next_free_id(
            &self.data.tax_filings,
            |filing| filing.id.as_str(),
            &prefix,
            self.data.tax_filings.len() + 1,
            2,
        );
        let filing = TaxFiling {
            id,
            tax_type: new.tax_type,
            period: new.period,
            due_date: new.due_date,
            amount: new.amount,
            status: new.status,
        };
        self.data.tax_filings.push(filing.clone());

        tracing::info!(filing_id = %filing.id, amount = filing.amount, "Tax filing added");
        self.persist();
        filing
    }

    pub fn add_bill(&mut self, new: NewBill) -> Bill {
        let id = next_free_id(
            &self.data.bills,
            |bill| bill.id.as_str(),
            "BILL-",
            self.data.bills.len() + 1,
            3,
        );
        let paid = new.status == PaymentStatus::Paid;
        let bill = Bill {
            id,
            name: new.name,
            category: new.category,
            due_date: new.due_date,
            amount: new.amount,
            status: new.status,
            expense_applied: paid,
        };
        self.data.bills.push(bill.clone());

        if paid {
            self.apply_expense(bill.amount);
        }

        tracing::info!(bill_id = %bill.id, amount = bill.amount, "Bill added");
        self.persist();
        bill
    }

    /// Returns `false` and changes nothing when no invoice has `id`.
    pub fn update_invoice_status(&mut self, id: &str, status: PaymentStatus) -> bool {
        let Some(invoice) = self.data.invoices.iter_mut().find(|invoice| invoice.id == id) else {
            tracing::debug!(invoice_id = %id, "Status update for unknown invoice ignored");
            return false;
        };
        invoice.status = status;
        let revenue = if status == PaymentStatus::Paid && !invoice.revenue_applied {
            invoice.revenue_applied = true;
            Some(invoice.amount)
        } else {
            None
        };

        if let Some(amount) = revenue {
            self.apply_payment(amount, 1);
        }
        tracing::info!(invoice_id = %id, ?status, "Invoice status updated");
        self.persist();
        true
    }

    pub fn update_tax_filing_status(&mut self, id: &str, status: FilingStatus) -> bool {
        let Some(filing) = self.data.tax_filings.iter_mut().find(|filing| filing.id == id) else {
            tracing::debug!(filing_id = %id, "Status update for unknown tax filing ignored");
            return false;
        };
        filing.status = status;

        tracing::info!(filing_id = %id, ?status, "Tax filing status updated");
        self.persist();
        true
    }

    pub fn update_bill_status(&mut self, id: &str, status: PaymentStatus) -> bool {
        let Some(bill) = self.data.bills.iter_mut().find(|bill| bill.id == id) else {
            tracing::debug!(bill_id = %id, "Status update for unknown bill ignored");
            return false;
        };
        bill.status = status;
        let expense = if status == PaymentStatus::Paid && !bill.expense_applied {
            bill.expense_applied = true;
            Some(bill.amount)
        } else {
            None
        };

        if let Some(amount) = expense {
            self.apply_expense(amount);
        }
        tracing::info!(bill_id = %id, ?status, "Bill status updated");
        self.persist();
        true
    }

    /// Appends the uploaded filings and books the summary's total taxes as an
    /// expense. Returns the number of filings added.
    pub fn apply_tax_upload(&mut self, upload: TaxUpload) -> usize {
        let added = upload.record_count();
        for new in upload.filings {
            let id = next_upload_id(&self.data.tax_filings, |filing| filing.id.as_str(), TAX_UPLOAD_PREFIX);
            self.data.tax_filings.push(TaxFiling {
                id,
                tax_type: new.tax_type,
                period: new.period,
                due_date: new.due_date,
                amount: new.amount,
                status: new.status,
            });
        }

        if let Some(total_taxes) = upload.total_taxes {
            self.apply_expense(total_taxes);
        }

        tracing::info!(filings = added, total_taxes = ?upload.total_taxes, "Tax upload applied");
        self.persist();
        added
    }

    /// Appends uploaded invoices and bills and merges the series. Paid
    /// amounts in the batch are booked once, summed. Returns the number of
    /// records added.
    pub fn apply_financial_upload(&mut self, upload: FinancialUpload) -> usize {
        let added = upload.record_count();

        let invoice_count = upload.invoices.len();
        let mut paid_revenue = 0.0;
        let mut paid_invoices = 0;
        for new in upload.invoices {
            let id = next_upload_id(&self.data.invoices, |invoice| invoice.id.as_str(), INVOICE_UPLOAD_PREFIX);
            let paid = new.status == PaymentStatus::Paid;
            if paid {
                paid_revenue += new.amount;
                paid_invoices += 1;
            }
            self.data.invoices.push(Invoice {
                id,
                client: new.client,
                issue_date: new.issue_date,
                due_date: new.due_date,
                amount: new.amount,
                status: new.status,
                revenue_applied: paid,
            });
        }
        self.data.metrics.total_orders += invoice_count as u32;
        if paid_invoices > 0 {
            self.apply_payment(paid_revenue, paid_invoices);
        }

        let mut paid_expenses = 0.0;
        for new in upload.bills {
            let id = next_upload_id(&self.data.bills, |bill| bill.id.as_str(), BILL_UPLOAD_PREFIX);
            let paid = new.status == PaymentStatus::Paid;
            if paid {
                paid_expenses += new.amount;
            }
            self.data.bills.push(Bill {
                id,
                name: new.name,
                category: new.category,
                due_date: new.due_date,
                amount: new.amount,
                status: new.status,
                expense_applied: paid,
            });
        }
        if paid_expenses > 0.0 {
            self.apply_expense(paid_expenses);
        }

        for incoming in upload.sales {
            if let Some(point) = self.data.sales_data.iter_mut().find(|p| p.month == incoming.month) {
                point.total += incoming.total;
            }
        }
        for incoming in upload.satisfaction {
            if let Some(point) = self
                .data
                .customer_satisfaction
                .iter_mut()
                .find(|p| p.month == incoming.month)
            {
                point.satisfaction = (point.satisfaction + incoming.satisfaction) / 2.0;
            }
        }

        tracing::info!(records = added, paid_revenue, paid_expenses, "Financial upload applied");
        self.persist();
        added
    }

    /// Books `amount` as realised revenue. `settled` is the number of
    /// records the amount covers.
    fn apply_payment(&mut self, amount: f64, settled: u32) {
        let metrics = &mut self.data.metrics;
        metrics.total_sales += amount;
        metrics.total_revenue += amount;
        metrics.profit += amount;
        metrics.completed += settled;

        let month = month_label(today());
        if let Some(point) = self.data.sales_data.iter_mut().find(|p| p.month == month) {
            point.total += amount;
        }
    }

    fn apply_expense(&mut self, amount: f64) {
        let metrics = &mut self.data.metrics;
        metrics.expenses += amount;
        metrics.profit -= amount;
    }

    /// Writes every key in one transaction.
    pub fn save(&mut self) -> FinanceResult<()> {
        let entries = encode(&self.data)?;
        self.db.set_values(&entries)?;
        tracing::debug!(keys = entries.len(), "Finance state saved");
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(err) = self.save() {
            tracing::error!(error = %err, "Failed to save finance state");
        }
    }
}

fn encode(data: &FinanceData) -> FinanceResult<Vec<(&'static str, String)>> {
    Ok(vec![
        (KEY_INVOICES, serde_json::to_string(&data.invoices)?),
        (KEY_TAX_FILINGS, serde_json::to_string(&data.tax_filings)?),
        (KEY_BILLS, serde_json::to_string(&data.bills)?),
        (KEY_SALES_DATA, serde_json::to_string(&data.sales_data)?),
        (KEY_METRICS, serde_json::to_string(&data.metrics.snapshot())?),
        (KEY_CUSTOMER_SATISFACTION, serde_json::to_string(&data.customer_satisfaction)?),
        (KEY_TARGET_VS_REALITY, serde_json::to_string(&data.target_vs_reality)?),
        (KEY_VISITOR_DATA, serde_json::to_string(&data.visitor_data)?),
    ])
}

fn stored(db: &Database, key: &str) -> Option<String> {
    match db.get_value(key) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(key, error = %err, "Failed to read stored value, keeping seed");
            None
        }
    }
}

fn restore<T: DeserializeOwned>(db: &Database, key: &str, target: &mut T) {
    let Some(raw) = stored(db, key) else {
        return;
    };
    match serde_json::from_str::<T>(&raw) {
        Ok(value) => *target = value,
        Err(err) => tracing::warn!(key, error = %err, "Stored value does not decode, keeping seed"),
    }
}

/// Like `restore`, for invoice and bill lists. Entries stored without the
/// booked flag count as booked when they are already paid.
fn restore_records<T: DeserializeOwned>(db: &Database, key: &str, flag: &str, target: &mut Vec<T>) {
    let Some(raw) = stored(db, key) else {
        return;
    };
    let decoded = serde_json::from_str::<Value>(&raw).and_then(|mut value| {
        if let Some(entries) = value.as_array_mut() {
            for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
                if !entry.contains_key(flag) {
                    let paid = entry.get("status").and_then(Value::as_str) == Some("paid");
                    entry.insert(flag.to_string(), Value::Bool(paid));
                }
            }
        }
        serde_json::from_value::<Vec<T>>(value)
    });
    match decoded {
        Ok(records) => *target = records,
        Err(err) => tracing::warn!(key, error = %err, "Stored value does not decode, keeping seed"),
    }
}

fn next_free_id<T>(
    records: &[T],
    id_of: impl Fn(&T) -> &str,
    prefix: &str,
    start: usize,
    width: usize,
) -> String {
    let mut number = start;
    loop {
        let candidate = padded_id(prefix, number, width);
        if !records.iter().any(|record| id_of(record) == candidate) {
            return candidate;
        }
        number += 1;
    }
}

fn next_upload_id<T>(records: &[T], id_of: impl Fn(&T) -> &str, prefix: &str) -> String {
    let uploaded = records
        .iter()
        .filter(|record| id_of(record).starts_with(prefix))
        .count();
    next_free_id(records, id_of, prefix, uploaded + 1, 3)
}
