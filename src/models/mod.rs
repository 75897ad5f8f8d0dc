use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
}

impl PaymentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => Some(PaymentStatus::Paid),
            "pending" => Some(PaymentStatus::Pending),
            "overdue" => Some(PaymentStatus::Overdue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilingStatus {
    Filed,
    Pending,
    Overdue,
}

impl FilingStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "filed" => Some(FilingStatus::Filed),
            "pending" => Some(FilingStatus::Pending),
            "overdue" => Some(FilingStatus::Overdue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub client: String,
    pub issue_date: String,
    pub due_date: String,
    pub amount: f64,
    pub status: PaymentStatus,
    /// Set once the amount has been counted as revenue.
    #[serde(default)]
    pub revenue_applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxFiling {
    pub id: String,
    #[serde(rename = "type")]
    pub tax_type: String,
    pub period: String,
    pub due_date: String,
    pub amount: f64,
    pub status: FilingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub name: String,
    pub category: String,
    pub due_date: String,
    pub amount: f64,
    pub status: PaymentStatus,
    /// Set once the amount has been counted as an expense.
    #[serde(default)]
    pub expense_applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    pub client: String,
    pub issue_date: String,
    pub due_date: String,
    pub amount: f64,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaxFiling {
    #[serde(rename = "type")]
    pub tax_type: String,
    pub period: String,
    pub due_date: String,
    pub amount: f64,
    pub status: FilingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    pub name: String,
    pub category: String,
    pub due_date: String,
    pub amount: f64,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub month: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionPoint {
    pub month: String,
    pub satisfaction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetPoint {
    pub name: String,
    pub target: f64,
    pub actual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorPoint {
    pub name: String,
    pub new_visitors: u32,
    pub returning_visitors: u32,
    pub unique_visitors: u32,
}

/// Running totals. The profit margin is derived from `profit` and
/// `total_revenue` on read and never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    pub total_sales: f64,
    pub total_orders: u32,
    pub completed: u32,
    pub new_customers: u32,
    pub total_revenue: f64,
    pub expenses: f64,
    pub profit: f64,
}

impl FinancialMetrics {
    pub fn profit_margin(&self) -> f64 {
        if self.total_revenue == 0.0 {
            return 0.0;
        }
        self.profit / self.total_revenue * 100.0
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_sales: self.total_sales,
            total_orders: self.total_orders,
            completed: self.completed,
            new_customers: self.new_customers,
            total_revenue: self.total_revenue,
            expenses: self.expenses,
            profit: self.profit,
            profit_margin: self.profit_margin(),
        }
    }
}

/// Read view of the metrics, margin included. This is also the shape
/// written under the `metrics` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_sales: f64,
    pub total_orders: u32,
    pub completed: u32,
    pub new_customers: u32,
    pub total_revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub profit_margin: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub metrics: MetricsSnapshot,
    pub sales_data: Vec<SalesPoint>,
    pub customer_satisfaction: Vec<SatisfactionPoint>,
    pub target_vs_reality: Vec<TargetPoint>,
    pub visitor_data: Vec<VisitorPoint>,
    pub is_loading: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillStats {
    pub total_amount: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
    pub overdue_amount: f64,
    pub paid_percentage: f64,
    pub pending_percentage: f64,
    pub overdue_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub upload_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            upload_delay_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadLog {
    pub id: i64,
    pub kind: String,
    pub status: String,
    pub records: i64,
    pub message: Option<String>,
    pub created_at: String,
}
