use serde::Serialize;

use crate::domain::stats::DashboardStats;

#[derive(Debug, Serialize)]
pub struct AdminPageData {
    pub stats: DashboardStats,
    pub total_profiles: usize,
}
