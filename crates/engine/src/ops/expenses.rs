//! Expense operations.
//!
//! Every mutation here ends with exactly one budget adjustment on the owning
//! trip, inside the same transaction as the expense row write. The
//! adjustment is invoked explicitly by these methods, never implicitly by
//! the storage layer.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseNewCmd, ExpenseUpdateCmd, ResultEngine, expenses, trips,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

fn ensure_date_in_trip(trip: &trips::Model, date: NaiveDate) -> ResultEngine<()> {
    if date < trip.start_date || date > trip.end_date {
        return Err(EngineError::Validation(format!(
            "expense date {date} is outside the trip range {}..{}",
            trip.start_date, trip.end_date
        )));
    }
    Ok(())
}

impl Engine {
    /// Record a new expense against a trip and deduct it from the budget.
    pub async fn create_expense(&self, cmd: ExpenseNewCmd) -> ResultEngine<Expense> {
        let category = normalize_required_name(&cmd.category, "category")?;
        let note = normalize_optional_text(cmd.note.as_deref());

        with_tx!(self, |db_tx| {
            let trip = self
                .require_trip_owned(&db_tx, cmd.trip_id, &cmd.user_id)
                .await?;
            ensure_date_in_trip(&trip, cmd.date)?;

            let expense = Expense::new(cmd.trip_id, category, cmd.amount_minor, cmd.date, note)?;
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            self.apply_budget_delta(&db_tx, cmd.trip_id, expense.amount_minor)
                .await?;
            Ok(expense)
        })
    }

    /// Update an expense; an amount change moves the trip budget by the
    /// difference.
    pub async fn update_expense(&self, cmd: ExpenseUpdateCmd) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let (model, trip) = self
                .require_expense_owned(&db_tx, cmd.expense_id, &cmd.user_id)
                .await?;

            let category = match &cmd.category {
                Some(category) => normalize_required_name(category, "category")?,
                None => model.category.clone(),
            };
            let amount_minor = cmd.amount_minor.unwrap_or(model.amount_minor);
            if amount_minor <= 0 {
                return Err(EngineError::Validation(
                    "amount_minor must be > 0".to_string(),
                ));
            }
            let date = cmd.date.unwrap_or(model.date);
            ensure_date_in_trip(&trip, date)?;
            let note = match cmd.note.as_deref() {
                Some(note) => normalize_optional_text(Some(note)),
                None => model.note.clone(),
            };

            let delta_minor = amount_minor - model.amount_minor;

            let active = expenses::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                category: ActiveValue::Set(category),
                amount_minor: ActiveValue::Set(amount_minor),
                date: ActiveValue::Set(date),
                note: ActiveValue::Set(note),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;

            if delta_minor != 0 {
                let trip_id = Uuid::parse_str(&trip.id)
                    .map_err(|_| EngineError::Validation("invalid trip id".to_string()))?;
                self.apply_budget_delta(&db_tx, trip_id, delta_minor).await?;
            }
            Expense::try_from(updated)
        })
    }

    /// Delete an expense and restore its amount to the trip budget.
    ///
    /// Deleting the same id twice fails with `KeyNotFound` on the second
    /// call, without touching the budget again.
    pub async fn delete_expense(&self, expense_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let (model, trip) = self
                .require_expense_owned(&db_tx, expense_id, user_id)
                .await?;

            expenses::Entity::delete_by_id(model.id.clone())
                .exec(&db_tx)
                .await?;

            let trip_id = Uuid::parse_str(&trip.id)
                .map_err(|_| EngineError::Validation("invalid trip id".to_string()))?;
            self.apply_budget_delta(&db_tx, trip_id, -model.amount_minor)
                .await?;
            Ok(())
        })
    }

    /// Return a single expense; ownership resolved through the parent trip.
    pub async fn expense(&self, expense_id: Uuid, user_id: &str) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let (model, _) = self
                .require_expense_owned(&db_tx, expense_id, user_id)
                .await?;
            Expense::try_from(model)
        })
    }

    /// List a trip's expenses, most recent date first.
    pub async fn list_expenses(&self, trip_id: Uuid, user_id: &str) -> ResultEngine<Vec<Expense>> {
        with_tx!(self, |db_tx| {
            let trip = self.require_trip_owned(&db_tx, trip_id, user_id).await?;

            let models = expenses::Entity::find()
                .filter(expenses::Column::TripId.eq(trip.id))
                .order_by_desc(expenses::Column::Date)
                .all(&db_tx)
                .await?;

            models.into_iter().map(Expense::try_from).collect()
        })
    }
}
