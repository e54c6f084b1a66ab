use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle phase of a trip relative to the calendar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Upcoming,
    Active,
    Deactive,
}

pub mod trip {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripNew {
        pub name: String,
        /// Budget in integer minor units (cents).
        pub total_budget_minor: i64,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
    }

    /// Partial update; absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TripUpdate {
        pub name: Option<String>,
        pub total_budget_minor: Option<i64>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripView {
        pub id: Uuid,
        pub name: String,
        pub status: TripStatus,
        pub total_budget_minor: i64,
        /// Clamped at zero; the trip never shows a negative remainder.
        pub remaining_budget_minor: i64,
        pub daily_average_minor: i64,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub duration_days: i64,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripListResponse {
        pub trips: Vec<TripView>,
    }

    /// Request body for comparing two trips of the caller.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripCompare {
        pub first_trip_id: Uuid,
        pub second_trip_id: Uuid,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub trip_id: Uuid,
        pub category: String,
        /// Must be > 0, in integer minor units (cents).
        pub amount_minor: i64,
        /// Must fall inside the trip's date range.
        pub date: NaiveDate,
        pub note: Option<String>,
    }

    /// Partial update; absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub category: Option<String>,
        pub amount_minor: Option<i64>,
        pub date: Option<NaiveDate>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub trip_id: Uuid,
        pub category: String,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub note: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }
}

pub mod stats {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripStatisticsResponse {
        pub total_spent_minor: i64,
        pub total_budget_minor: i64,
        pub remaining_budget_minor: i64,
        pub category_breakdown: BTreeMap<String, i64>,
        /// Keyed by ISO calendar date.
        pub daily_spending: BTreeMap<NaiveDate, i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripSpendSummary {
        pub trip_id: Uuid,
        pub name: String,
        pub total_spent_minor: i64,
        pub breakdown: BTreeMap<String, i64>,
        pub daily_average_minor: i64,
        pub duration_days: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendDifferences {
        pub total_spent_minor: i64,
        pub daily_average_minor: i64,
        /// `null` when the first trip has no spending.
        pub percentage: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripComparisonResponse {
        pub first: TripSpendSummary,
        pub second: TripSpendSummary,
        pub differences: SpendDifferences,
    }
}

pub mod report {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportView {
        pub id: Uuid,
        pub trip_id: Uuid,
        pub total_spent_minor: i64,
        pub breakdown: BTreeMap<String, i64>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportListResponse {
        pub reports: Vec<ReportView>,
    }
}
