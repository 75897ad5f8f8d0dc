//! Built-in dataset every fresh store starts from.

use crate::models::{
    Bill, FilingStatus, FinancialMetrics, Invoice, PaymentStatus, SalesPoint, SatisfactionPoint,
    TargetPoint, TaxFiling, VisitorPoint,
};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn invoice(id: &str, client: &str, issue: &str, due: &str, amount: f64, status: PaymentStatus) -> Invoice {
    Invoice {
        id: id.to_string(),
        client: client.to_string(),
        issue_date: issue.to_string(),
        due_date: due.to_string(),
        amount,
        status,
        revenue_applied: status == PaymentStatus::Paid,
    }
}

fn bill(id: &str, name: &str, category: &str, due: &str, amount: f64, status: PaymentStatus) -> Bill {
    Bill {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        due_date: due.to_string(),
        amount,
        status,
        expense_applied: status == PaymentStatus::Paid,
    }
}

fn filing(id: &str, tax_type: &str, period: &str, due: &str, amount: f64, status: FilingStatus) -> TaxFiling {
    TaxFiling {
        id: id.to_string(),
        tax_type: tax_type.to_string(),
        period: period.to_string(),
        due_date: due.to_string(),
        amount,
        status,
    }
}

pub fn invoices() -> Vec<Invoice> {
    use PaymentStatus::*;
    vec![
        invoice("INV-001", "Acme Inc.", "01/05/2023", "15/05/2023", 1250.0, Paid),
        invoice("INV-002", "Globex Corp.", "15/05/2023", "30/05/2023", 2500.0, Pending),
        invoice("INV-003", "Stark Industries", "01/06/2023", "15/06/2023", 3750.0, Overdue),
        invoice("INV-004", "Wayne Enterprises", "15/06/2023", "30/06/2023", 4250.0, Paid),
        invoice("INV-005", "Oscorp", "01/07/2023", "15/07/2023", 1800.0, Pending),
    ]
}

pub fn tax_filings() -> Vec<TaxFiling> {
    use FilingStatus::*;
    vec![
        filing("TX-2023-Q1", "Income Tax", "Q1 2023", "15/04/2023", 4250.0, Filed),
        filing("TX-2023-Q2", "Income Tax", "Q2 2023", "15/07/2023", 5120.0, Pending),
        filing("TX-2023-VAT-1", "VAT", "Jan-Mar 2023", "30/04/2023", 2340.0, Filed),
    ]
}

pub fn bills() -> Vec<Bill> {
    use PaymentStatus::*;
    vec![
        bill("BILL-001", "Electricity", "Utilities", "15/07/2023", 125.0, Pending),
        bill("BILL-002", "Water", "Utilities", "20/07/2023", 85.0, Pending),
        bill("BILL-003", "Internet", "Utilities", "05/07/2023", 79.99, Paid),
        bill("BILL-004", "Office Rent", "Rent", "01/07/2023", 1200.0, Paid),
        bill("BILL-005", "Phone", "Utilities", "25/06/2023", 45.0, Overdue),
    ]
}

pub fn sales_data() -> Vec<SalesPoint> {
    let totals = [
        1800.0, 2200.0, 1100.0, 2800.0, 900.0, 1700.0, 2600.0, 1900.0, 2300.0, 2100.0, 2500.0,
        2900.0,
    ];
    MONTHS
        .iter()
        .zip(totals)
        .map(|(month, total)| SalesPoint {
            month: month.to_string(),
            total,
        })
        .collect()
}

pub fn customer_satisfaction() -> Vec<SatisfactionPoint> {
    let scores = [85.0, 82.0, 87.0, 84.0, 89.0, 92.0, 90.0, 88.0, 91.0, 93.0, 94.0, 95.0];
    MONTHS
        .iter()
        .zip(scores)
        .map(|(month, satisfaction)| SatisfactionPoint {
            month: month.to_string(),
            satisfaction,
        })
        .collect()
}

pub fn target_vs_reality() -> Vec<TargetPoint> {
    let rows = [
        (2000.0, 1800.0),
        (2200.0, 2400.0),
        (2400.0, 2200.0),
        (2600.0, 2800.0),
        (2800.0, 2600.0),
        (3000.0, 3200.0),
    ];
    MONTHS
        .iter()
        .zip(rows)
        .map(|(name, (target, actual))| TargetPoint {
            name: name.to_string(),
            target,
            actual,
        })
        .collect()
}

pub fn visitor_data() -> Vec<VisitorPoint> {
    let rows = [
        (400, 240, 320),
        (300, 290, 280),
        (500, 300, 400),
        (700, 400, 550),
        (400, 380, 390),
        (500, 450, 480),
    ];
    MONTHS
        .iter()
        .zip(rows)
        .map(|(name, (new_visitors, returning_visitors, unique_visitors))| VisitorPoint {
            name: name.to_string(),
            new_visitors,
            returning_visitors,
            unique_visitors,
        })
        .collect()
}

pub fn metrics() -> FinancialMetrics {
    FinancialMetrics {
        total_sales: 1000.0,
        total_orders: 300,
        completed: 5,
        new_customers: 8,
        total_revenue: 45231.89,
        expenses: 12345.0,
        profit: 32886.89,
    }
}
