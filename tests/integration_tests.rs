use std::path::PathBuf;

use finboard::commands::bills::{self, BillPayload};
use finboard::commands::invoices;
use finboard::commands::{dashboard, upload};
use finboard::config;
use finboard::db::Database;
use finboard::models::{PaymentStatus, Settings};
use finboard::services::state::AppState;
use finboard::services::store::FinanceStore;
use finboard::utils::{month_label, today};

fn open_state(path: &PathBuf) -> AppState {
    let db = Database::new(path.clone()).expect("open database");
    config::save_settings(&db, &Settings { upload_delay_ms: 5 }).expect("save settings");
    let settings = config::load_settings(&db);
    AppState::new(FinanceStore::load(db), settings)
}

fn current_month_total(state: &AppState) -> f64 {
    let month = month_label(today());
    dashboard::get_dashboard_stats(state)
        .unwrap()
        .sales_data
        .into_iter()
        .find(|point| point.month == month)
        .map(|point| point.total)
        .unwrap()
}

#[test]
fn test_mark_invoice_paid_then_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(config::DATABASE_FILE);

    let (metrics, month_total) = {
        let state = open_state(&path);
        let before = dashboard::get_dashboard_stats(&state).unwrap().metrics;
        let month_before = current_month_total(&state);

        assert_eq!(invoices::update_invoice_status("INV-002", "paid", &state), Ok(true));
        assert_eq!(invoices::update_invoice_status("INV-002", "paid", &state), Ok(true));

        let after = dashboard::get_dashboard_stats(&state).unwrap().metrics;
        assert!((after.total_revenue - (before.total_revenue + 2500.0)).abs() < 1e-6);
        assert!((after.total_sales - (before.total_sales + 2500.0)).abs() < 1e-6);
        assert!((after.profit - (before.profit + 2500.0)).abs() < 1e-6);
        assert_eq!(after.completed, before.completed + 1);
        assert!((after.profit_margin - after.profit / after.total_revenue * 100.0).abs() < 1e-9);
        assert!((current_month_total(&state) - (month_before + 2500.0)).abs() < 1e-9);
        (after, current_month_total(&state))
    };

    let reopened = open_state(&path);
    assert_eq!(dashboard::get_dashboard_stats(&reopened).unwrap().metrics, metrics);
    assert_eq!(current_month_total(&reopened), month_total);
    let invoice = invoices::get_invoices(&reopened)
        .unwrap()
        .into_iter()
        .find(|invoice| invoice.id == "INV-002")
        .unwrap();
    assert_eq!(invoice.status, PaymentStatus::Paid);
    assert!(invoice.revenue_applied);

    // Already applied before the restart: no second booking.
    invoices::update_invoice_status("INV-002", "paid", &reopened).unwrap();
    assert_eq!(dashboard::get_dashboard_stats(&reopened).unwrap().metrics, metrics);
}

#[test]
fn test_add_paid_bill_from_seed() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir.path().join(config::DATABASE_FILE));

    let bill = bills::add_bill(
        BillPayload {
            name: Some("Gas".into()),
            category: Some("Utilities".into()),
            due_date: Some("01/08/2023".into()),
            amount: Some("60".into()),
            status: Some("paid".into()),
        },
        &state,
    )
    .unwrap();

    assert_eq!(bill.id, "BILL-006");
    let metrics = dashboard::get_dashboard_stats(&state).unwrap().metrics;
    assert!((metrics.expenses - 12405.0).abs() < 1e-9);
    assert!((metrics.profit - 32826.89).abs() < 1e-6);
    assert_eq!(metrics.total_revenue, 45231.89);
    assert!((metrics.profit_margin - 72.57).abs() < 0.01);
}

#[tokio::test]
async fn test_financial_upload_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(config::DATABASE_FILE);
    let state = open_state(&path);
    let before = dashboard::get_dashboard_stats(&state).unwrap().metrics;

    let payload = r#"{
        "invoices": [
            {"client": "Cyberdyne", "amount": 1000, "status": "paid"},
            {"client": "Tyrell", "amount": "250.50"}
        ],
        "bills": [{"name": "Cloud", "amount": 80, "status": "paid"}],
        "salesData": [{"month": "Feb", "total": 300}],
        "customerSatisfaction": [{"month": "Feb", "satisfaction": 90}]
    }"#;

    let handle = upload::upload_financial_data(payload, &state).unwrap();
    assert!(state.is_loading());
    handle.await.unwrap();
    assert!(!state.is_loading());

    let stats = dashboard::get_dashboard_stats(&state).unwrap();
    assert_eq!(stats.metrics.total_orders, before.total_orders + 2);
    assert_eq!(stats.metrics.completed, before.completed + 1);
    assert!((stats.metrics.total_revenue - (before.total_revenue + 1000.0)).abs() < 1e-6);
    assert!((stats.metrics.expenses - (before.expenses + 80.0)).abs() < 1e-9);
    assert_eq!(stats.customer_satisfaction[1].satisfaction, 86.0);

    let all = invoices::get_invoices(&state).unwrap();
    assert_eq!(all[5].id, "INV-UPLOAD-001");
    assert_eq!(all[6].id, "INV-UPLOAD-002");
    assert_eq!(all[6].client, "Tyrell");
    assert_eq!(all[6].amount, 250.5);

    let logs = upload::get_upload_logs(1, &state).unwrap();
    assert_eq!(logs[0].status, "success");
    assert_eq!(logs[0].records, 3);

    drop(state);
    let reopened = open_state(&path);
    assert_eq!(invoices::get_invoices(&reopened).unwrap(), all);
}
