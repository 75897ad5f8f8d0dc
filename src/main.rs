use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use finboard::commands::bills::{self, BillPayload};
use finboard::commands::invoices::{self, InvoicePayload};
use finboard::commands::settings::{self, SettingsPayload};
use finboard::commands::taxes::{self, TaxFilingPayload};
use finboard::commands::{dashboard, upload};
use finboard::config;
use finboard::db::Database;
use finboard::services::state::AppState;
use finboard::services::store::FinanceStore;

#[derive(Parser, Debug)]
#[command(name = "finboard", about = "Finance dashboard store: invoices, bills, tax filings and derived metrics")]
struct Cli {
    /// Directory holding the database file
    #[arg(long, default_value = "finboard-data")]
    data_dir: String,

    /// Log level (overrides RUST_LOG)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Metrics and chart series
    Dashboard,
    Invoices,
    Bills,
    BillStats,
    Taxes,
    AddInvoice {
        #[arg(long)]
        client: String,
        #[arg(long)]
        issue_date: Option<String>,
        #[arg(long)]
        due_date: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "pending")]
        status: String,
    },
    AddBill {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "Utilities")]
        category: String,
        #[arg(long)]
        due_date: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "pending")]
        status: String,
    },
    AddTax {
        #[arg(long = "type", default_value = "Income Tax")]
        tax_type: String,
        #[arg(long)]
        period: String,
        #[arg(long)]
        due_date: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "pending")]
        status: String,
    },
    SetInvoiceStatus { id: String, status: String },
    SetBillStatus { id: String, status: String },
    SetTaxStatus { id: String, status: String },
    /// Ingest a tax JSON file
    UploadTax { file: String },
    /// Ingest a financial JSON file
    UploadFinancial { file: String },
    /// Recent upload outcomes
    Uploads {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    Settings {
        #[arg(long)]
        upload_delay_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let db = Database::new(config::database_path(&cli.data_dir)?)?;
    let settings = config::load_settings(&db);
    let state = AppState::new(FinanceStore::load(db), settings);

    let mut notifications = state.notifier.subscribe();
    run(cli.command, &state).await.map_err(|e| anyhow!(e))?;

    while let Ok(notification) = notifications.try_recv() {
        tracing::info!(title = %notification.title, description = %notification.description, "Notification");
    }
    Ok(())
}

async fn run(command: Command, state: &AppState) -> Result<(), String> {
    match command {
        Command::Dashboard => print(&dashboard::get_dashboard_stats(state)?),
        Command::Invoices => print(&invoices::get_invoices(state)?),
        Command::Bills => print(&bills::get_bills(state)?),
        Command::BillStats => print(&bills::get_bill_stats(state)?),
        Command::Taxes => print(&taxes::get_tax_filings(state)?),
        Command::AddInvoice {
            client,
            issue_date,
            due_date,
            amount,
            status,
        } => {
            let payload = InvoicePayload {
                client: Some(client),
                issue_date,
                due_date: Some(due_date),
                amount: Some(amount),
                status: Some(status),
            };
            print(&invoices::add_invoice(payload, state)?)
        }
        Command::AddBill {
            name,
            category,
            due_date,
            amount,
            status,
        } => {
            let payload = BillPayload {
                name: Some(name),
                category: Some(category),
                due_date: Some(due_date),
                amount: Some(amount),
                status: Some(status),
            };
            print(&bills::add_bill(payload, state)?)
        }
        Command::AddTax {
            tax_type,
            period,
            due_date,
            amount,
            status,
        } => {
            let payload = TaxFilingPayload {
                tax_type: Some(tax_type),
                period: Some(period),
                due_date: Some(due_date),
                amount: Some(amount),
                status: Some(status),
            };
            print(&taxes::add_tax_filing(payload, state)?)
        }
        Command::SetInvoiceStatus { id, status } => {
            print(&invoices::update_invoice_status(&id, &status, state)?)
        }
        Command::SetBillStatus { id, status } => {
            print(&bills::update_bill_status(&id, &status, state)?)
        }
        Command::SetTaxStatus { id, status } => {
            print(&taxes::update_tax_filing_status(&id, &status, state)?)
        }
        Command::UploadTax { file } => {
            let text = std::fs::read_to_string(&file).map_err(|e| format!("{}: {}", file, e))?;
            upload::upload_tax_data(&text, state)?
                .await
                .map_err(|e| e.to_string())?;
            print(&dashboard::get_dashboard_stats(state)?.metrics)
        }
        Command::UploadFinancial { file } => {
            let text = std::fs::read_to_string(&file).map_err(|e| format!("{}: {}", file, e))?;
            upload::upload_financial_data(&text, state)?
                .await
                .map_err(|e| e.to_string())?;
            print(&dashboard::get_dashboard_stats(state)?.metrics)
        }
        Command::Uploads { limit } => print(&upload::get_upload_logs(limit, state)?),
        Command::Settings { upload_delay_ms } => {
            print(&settings::save_settings(SettingsPayload { upload_delay_ms }, state)?)
        }
    }
}

fn print<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
