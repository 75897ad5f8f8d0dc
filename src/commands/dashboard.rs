use crate::models::DashboardStats;
use crate::services::state::AppState;

use super::lock_store;

pub fn get_dashboard_stats(state: &AppState) -> Result<DashboardStats, String> {
    let is_loading = state.is_loading();
    Ok(lock_store(state)?.data().dashboard(is_loading))
}
