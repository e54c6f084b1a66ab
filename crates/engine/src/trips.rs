//! Trip primitives.
//!
//! A `Trip` is a budgeted travel period owned by a single user. Its
//! `remaining_budget_minor` and `daily_average_minor` fields are derived from
//! the expenses recorded against it and are maintained by the budget
//! adjustment in `ops::reconcile`, never recomputed ad hoc by callers.
//!
//! Amounts are stored as integer minor units (`i64` cents).

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Lifecycle phase of a trip relative to the calendar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Upcoming,
    Active,
    Deactive,
}

impl TripStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Deactive => "deactive",
        }
    }

    /// Derives the status purely from dates.
    ///
    /// Status changes happen with the passage of time alone, so callers must
    /// re-derive on read instead of trusting a stored value.
    pub fn derive(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        if today < start {
            Self::Upcoming
        } else if today <= end {
            Self::Active
        } else {
            Self::Deactive
        }
    }
}

impl TryFrom<&str> for TripStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "upcoming" => Ok(Self::Upcoming),
            "active" => Ok(Self::Active),
            "deactive" => Ok(Self::Deactive),
            other => Err(EngineError::Validation(format!(
                "invalid trip status: {other}"
            ))),
        }
    }
}

/// Inclusive day count of a date range, never below 1.
///
/// A trip from June 1st to June 5th lasts 5 days; a same-day trip lasts 1.
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(1)
}

/// Average spend per day of the trip, in minor units (integer division).
pub(crate) fn daily_average_minor(
    total_budget_minor: i64,
    remaining_budget_minor: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> i64 {
    let spent = (total_budget_minor - remaining_budget_minor).max(0);
    spent / duration_days(start, end)
}

/// Returns true if the two inclusive date ranges intersect.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// A budgeted travel period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub total_budget_minor: i64,
    /// Stored unclamped: goes negative when the trip runs over budget, so
    /// that removing an expense later restores the exact remainder. Clients
    /// see [`Trip::remaining_public_minor`].
    pub remaining_budget_minor: i64,
    pub daily_average_minor: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn new(
        user_id: String,
        name: String,
        total_budget_minor: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        today: NaiveDate,
    ) -> ResultEngine<Self> {
        if total_budget_minor < 0 {
            return Err(EngineError::Validation(
                "total_budget_minor must be >= 0".to_string(),
            ));
        }
        if end_date < start_date {
            return Err(EngineError::Validation(
                "end_date must not precede start_date".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            total_budget_minor,
            remaining_budget_minor: total_budget_minor,
            daily_average_minor: 0,
            start_date,
            end_date,
            status: TripStatus::derive(start_date, end_date, today),
            created_at: Utc::now(),
        })
    }

    pub fn duration_days(&self) -> i64 {
        duration_days(self.start_date, self.end_date)
    }

    /// Remaining budget as presented to clients, floored at zero.
    pub fn remaining_public_minor(&self) -> i64 {
        self.remaining_budget_minor.max(0)
    }

    /// Total spent so far.
    pub fn spent_minor(&self) -> i64 {
        (self.total_budget_minor - self.remaining_budget_minor).max(0)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub total_budget_minor: i64,
    pub remaining_budget_minor: i64,
    pub daily_average_minor: i64,
    pub start_date: Date,
    pub end_date: Date,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
    #[sea_orm(has_many = "super::reports::Entity")]
    Reports,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Trip> for ActiveModel {
    fn from(trip: &Trip) -> Self {
        Self {
            id: ActiveValue::Set(trip.id.to_string()),
            user_id: ActiveValue::Set(trip.user_id.clone()),
            name: ActiveValue::Set(trip.name.clone()),
            total_budget_minor: ActiveValue::Set(trip.total_budget_minor),
            remaining_budget_minor: ActiveValue::Set(trip.remaining_budget_minor),
            daily_average_minor: ActiveValue::Set(trip.daily_average_minor),
            start_date: ActiveValue::Set(trip.start_date),
            end_date: ActiveValue::Set(trip.end_date),
            status: ActiveValue::Set(trip.status.as_str().to_string()),
            created_at: ActiveValue::Set(trip.created_at),
        }
    }
}

impl TryFrom<Model> for Trip {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::Validation("invalid trip id".to_string()))?;
        let status = TripStatus::try_from(model.status.as_str())?;
        Ok(Self {
            id,
            user_id: model.user_id,
            name: model.name,
            total_budget_minor: model.total_budget_minor,
            remaining_budget_minor: model.remaining_budget_minor,
            daily_average_minor: model.daily_average_minor,
            start_date: model.start_date,
            end_date: model.end_date,
            status,
            created_at: model.created_at,
        })
    }
}
