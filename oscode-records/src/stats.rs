//! Dashboard statistics.

use serde::{Deserialize, Serialize};

use crate::{ContactMessage, Event};

/// Collection counts shown on the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_events: u64,
    #[serde(default)]
    pub active_events: u64,
    #[serde(default)]
    pub total_team_members: u64,
    #[serde(default)]
    pub total_contacts: u64,
}

/// Response of `GET /api/admin/dashboard-stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardOverview {
    #[serde(default)]
    pub stats: DashboardStats,
    /// Newest first, at most five
    #[serde(default)]
    pub recent_contacts: Vec<ContactMessage>,
    /// Newest first, at most three
    #[serde(default)]
    pub recent_events: Vec<Event>,
}
