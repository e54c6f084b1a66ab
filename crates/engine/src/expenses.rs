//! Expense primitives.
//!
//! An `Expense` is a single spend entry attached to exactly one trip. The
//! trip reference is immutable after creation; moving spending between trips
//! is delete + create.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub trip_id: Uuid,
    /// Free-form category label ("Food", "Transport", ...).
    pub category: String,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        trip_id: Uuid,
        category: String,
        amount_minor: i64,
        date: NaiveDate,
        note: Option<String>,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::Validation(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if category.trim().is_empty() {
            return Err(EngineError::Validation(
                "category must not be empty".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            trip_id,
            category,
            amount_minor,
            date,
            note,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub category: String,
    pub amount_minor: i64,
    pub date: Date,
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trips::Entity",
        from = "Column::TripId",
        to = "super::trips::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Trips,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            trip_id: ActiveValue::Set(expense.trip_id.to_string()),
            category: ActiveValue::Set(expense.category.clone()),
            amount_minor: ActiveValue::Set(expense.amount_minor),
            date: ActiveValue::Set(expense.date),
            note: ActiveValue::Set(expense.note.clone()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::Validation("invalid expense id".to_string()))?;
        let trip_id = Uuid::parse_str(&model.trip_id)
            .map_err(|_| EngineError::Validation("invalid trip id".to_string()))?;
        Ok(Self {
            id,
            trip_id,
            category: model.category,
            amount_minor: model.amount_minor,
            date: model.date,
            note: model.note,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_expense() {
        let trip_id = Uuid::new_v4();
        let expense = Expense::new(
            trip_id,
            "Food".to_string(),
            20_000,
            date(2025, 6, 2),
            Some("Lunch".to_string()),
        )
        .unwrap();

        assert_eq!(expense.trip_id, trip_id);
        assert_eq!(expense.amount_minor, 20_000);
        assert_eq!(expense.category, "Food");
    }

    #[test]
    #[should_panic(expected = "amount_minor must be > 0")]
    fn fail_zero_amount() {
        Expense::new(Uuid::new_v4(), "Food".to_string(), 0, date(2025, 6, 2), None).unwrap();
    }

    #[test]
    #[should_panic(expected = "amount_minor must be > 0")]
    fn fail_negative_amount() {
        Expense::new(
            Uuid::new_v4(),
            "Food".to_string(),
            -100,
            date(2025, 6, 2),
            None,
        )
        .unwrap();
    }

    #[test]
    #[should_panic(expected = "category must not be empty")]
    fn fail_blank_category() {
        Expense::new(Uuid::new_v4(), "  ".to_string(), 100, date(2025, 6, 2), None).unwrap();
    }
}
