use serde::{Deserialize, Serialize};

use super::{Event, User, UserStats};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Profile {
    pub user: User,
    #[serde(default)]
    pub stats: UserStats,
    pub is_following: Option<bool>,
    pub is_followed_by: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DailyRevenue {
    pub date: String,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub tickets_sold: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct EventAnalytics {
    pub event_id: String,
    pub event: Option<Event>,
    #[serde(default)]
    pub total_attendees: u64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub tickets_sold: u64,
    #[serde(default)]
    pub check_ins: u64,
    /// Fraction of ticket holders that checked in, 0.0..=1.0
    #[serde(default)]
    pub attendance_rate: f64,
    #[serde(default)]
    pub revenue_by_day: Vec<DailyRevenue>,
}

/// One ticket sale as listed by `/analytics/events/{id}/transactions`.
/// Buyer name and email arrive already anonymized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct TransactionDetail {
    pub transaction_id: String,
    pub ticket_id: String,
    #[serde(default)]
    pub buyer_name: String,
    #[serde(default)]
    pub buyer_email: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub status: String,
    pub purchased_at: String,
    pub completed_at: Option<String>,
    #[serde(default)]
    pub is_checked_in: bool,
    pub checked_in_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MonthlyRevenue {
    pub month: String,
    #[serde(default)]
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct HostRevenueSummary {
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_events: u64,
    #[serde(default)]
    pub total_tickets_sold: u64,
    #[serde(default)]
    pub upcoming_events: u64,
    #[serde(default)]
    pub completed_events: u64,
    #[serde(default)]
    pub revenue_by_month: Vec<MonthlyRevenue>,
}

impl HostRevenueSummary {
    pub fn average_revenue_per_event(&self) -> f64 {
        if self.total_events == 0 {
            0.0
        } else {
            self.total_revenue / self.total_events as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_revenue_per_event() {
        let summary = HostRevenueSummary {
            total_revenue: 300.0,
            total_events: 4,
            ..Default::default()
        };
        assert_eq!(summary.average_revenue_per_event(), 75.0);
        assert_eq!(HostRevenueSummary::default().average_revenue_per_event(), 0.0);
    }

    #[test]
    fn test_parse_host_revenue_summary() {
        let json = r#"{"total_revenue":1250000,"total_events":3,"total_tickets_sold":42,"revenue_by_month":[{"month":"2025-01","revenue":500000}]}"#;
        let summary: HostRevenueSummary = serde_json::from_str(json).expect("valid summary");
        assert_eq!(summary.total_tickets_sold, 42);
        assert_eq!(summary.upcoming_events, 0);
        assert_eq!(summary.revenue_by_month[0].month, "2025-01");
    }
}
