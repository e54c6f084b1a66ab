//! Command structs for engine operations.
//!
//! These types group parameters for write operations (trip and expense
//! create/update), keeping call sites readable and avoiding long argument
//! lists.

use chrono::NaiveDate;
use uuid::Uuid;

/// Create a trip.
#[derive(Clone, Debug)]
pub struct TripNewCmd {
    pub user_id: String,
    pub name: String,
    pub total_budget_minor: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TripNewCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        total_budget_minor: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            total_budget_minor,
            start_date,
            end_date,
        }
    }
}

/// Update an existing trip. Unset fields are left unchanged.
#[derive(Clone, Debug)]
pub struct TripUpdateCmd {
    pub trip_id: Uuid,
    pub user_id: String,
    pub name: Option<String>,
    pub total_budget_minor: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TripUpdateCmd {
    #[must_use]
    pub fn new(trip_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            trip_id,
            user_id: user_id.into(),
            name: None,
            total_budget_minor: None,
            start_date: None,
            end_date: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn total_budget_minor(mut self, total_budget_minor: i64) -> Self {
        self.total_budget_minor = Some(total_budget_minor);
        self
    }

    #[must_use]
    pub fn start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    #[must_use]
    pub fn end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }
}

/// Create an expense against a trip.
#[derive(Clone, Debug)]
pub struct ExpenseNewCmd {
    pub trip_id: Uuid,
    pub user_id: String,
    pub category: String,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl ExpenseNewCmd {
    #[must_use]
    pub fn new(
        trip_id: Uuid,
        user_id: impl Into<String>,
        category: impl Into<String>,
        amount_minor: i64,
        date: NaiveDate,
    ) -> Self {
        Self {
            trip_id,
            user_id: user_id.into(),
            category: category.into(),
            amount_minor,
            date,
            note: None,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Update an existing expense. Unset fields are left unchanged.
#[derive(Clone, Debug)]
pub struct ExpenseUpdateCmd {
    pub expense_id: Uuid,
    pub user_id: String,
    pub category: Option<String>,
    pub amount_minor: Option<i64>,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl ExpenseUpdateCmd {
    #[must_use]
    pub fn new(expense_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            expense_id,
            user_id: user_id.into(),
            category: None,
            amount_minor: None,
            date: None,
            note: None,
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
