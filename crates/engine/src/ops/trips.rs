//! Trip operations.

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Trip, TripNewCmd, TripStatus, TripUpdateCmd, expenses, reports,
    trips,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Create a new trip for a user.
    ///
    /// The remaining budget starts at the full budget and the daily average
    /// at zero; both are maintained by expense reconciliation afterwards.
    pub async fn create_trip(&self, cmd: TripNewCmd, today: NaiveDate) -> ResultEngine<Trip> {
        let name = normalize_required_name(&cmd.name, "trip name")?;
        let trip = Trip::new(
            cmd.user_id,
            name,
            cmd.total_budget_minor,
            cmd.start_date,
            cmd.end_date,
            today,
        )?;

        with_tx!(self, |db_tx| {
            self.require_no_overlap(&db_tx, &trip.user_id, trip.start_date, trip.end_date, None)
                .await?;
            trips::ActiveModel::from(&trip).insert(&db_tx).await?;
            Ok(trip)
        })
    }

    /// Update a trip's name, budget or dates.
    ///
    /// A budget change shifts the remaining budget by the same difference
    /// (additive adjustment), so amounts already spent stay deducted. Date
    /// changes re-run the overlap check excluding the trip itself.
    pub async fn update_trip(&self, cmd: TripUpdateCmd, today: NaiveDate) -> ResultEngine<Trip> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_trip_owned(&db_tx, cmd.trip_id, &cmd.user_id)
                .await?;

            let name = match &cmd.name {
                Some(name) => normalize_required_name(name, "trip name")?,
                None => model.name.clone(),
            };

            let start_date = cmd.start_date.unwrap_or(model.start_date);
            let end_date = cmd.end_date.unwrap_or(model.end_date);
            if end_date < start_date {
                return Err(EngineError::Validation(
                    "end_date must not precede start_date".to_string(),
                ));
            }
            if start_date != model.start_date || end_date != model.end_date {
                self.require_no_overlap(
                    &db_tx,
                    &model.user_id,
                    start_date,
                    end_date,
                    Some(cmd.trip_id),
                )
                .await?;
            }

            let total_budget_minor = cmd.total_budget_minor.unwrap_or(model.total_budget_minor);
            if total_budget_minor < 0 {
                return Err(EngineError::Validation(
                    "total_budget_minor must be >= 0".to_string(),
                ));
            }
            let remaining_budget_minor =
                model.remaining_budget_minor + (total_budget_minor - model.total_budget_minor);

            let daily_average = trips::daily_average_minor(
                total_budget_minor,
                remaining_budget_minor,
                start_date,
                end_date,
            );
            let status = TripStatus::derive(start_date, end_date, today);

            let active = trips::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                name: ActiveValue::Set(name),
                total_budget_minor: ActiveValue::Set(total_budget_minor),
                remaining_budget_minor: ActiveValue::Set(remaining_budget_minor),
                daily_average_minor: ActiveValue::Set(daily_average),
                start_date: ActiveValue::Set(start_date),
                end_date: ActiveValue::Set(end_date),
                status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Trip::try_from(model)
        })
    }

    /// Delete a trip and everything recorded against it.
    ///
    /// Expenses and reports die with the trip in the same transaction. No
    /// per-expense reconciliation runs: the budget rows are removed too.
    pub async fn delete_trip(&self, trip_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_trip_owned(&db_tx, trip_id, user_id).await?;

            expenses::Entity::delete_many()
                .filter(expenses::Column::TripId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            reports::Entity::delete_many()
                .filter(reports::Column::TripId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            trips::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Return a trip with its status re-derived for `today`.
    pub async fn trip(&self, trip_id: Uuid, user_id: &str, today: NaiveDate) -> ResultEngine<Trip> {
        with_tx!(self, |db_tx| {
            let model = self.require_trip_owned(&db_tx, trip_id, user_id).await?;
            let mut trip = Trip::try_from(model)?;
            trip.status = TripStatus::derive(trip.start_date, trip.end_date, today);
            Ok(trip)
        })
    }

    /// List a user's trips, most recent start date first.
    pub async fn list_trips(&self, user_id: &str, today: NaiveDate) -> ResultEngine<Vec<Trip>> {
        with_tx!(self, |db_tx| {
            let models = trips::Entity::find()
                .filter(trips::Column::UserId.eq(user_id.to_string()))
                .order_by_desc(trips::Column::StartDate)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                let mut trip = Trip::try_from(model)?;
                trip.status = TripStatus::derive(trip.start_date, trip.end_date, today);
                out.push(trip);
            }
            Ok(out)
        })
    }

    /// Bulk-refresh the stored status of every trip against `today`.
    ///
    /// Stored statuses drift as the clock moves past date boundaries for
    /// trips nobody writes to; this sweep re-aligns them. Idempotent and safe
    /// to run on any schedule. Returns the number of rows matched.
    pub async fn refresh_statuses(&self, today: NaiveDate) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            let upcoming = trips::Entity::update_many()
                .col_expr(
                    trips::Column::Status,
                    Expr::value(TripStatus::Upcoming.as_str()),
                )
                .filter(trips::Column::StartDate.gt(today))
                .exec(&db_tx)
                .await?;

            let active = trips::Entity::update_many()
                .col_expr(
                    trips::Column::Status,
                    Expr::value(TripStatus::Active.as_str()),
                )
                .filter(trips::Column::StartDate.lte(today))
                .filter(trips::Column::EndDate.gte(today))
                .exec(&db_tx)
                .await?;

            let deactive = trips::Entity::update_many()
                .col_expr(
                    trips::Column::Status,
                    Expr::value(TripStatus::Deactive.as_str()),
                )
                .filter(trips::Column::EndDate.lt(today))
                .exec(&db_tx)
                .await?;

            Ok(upcoming.rows_affected + active.rows_affected + deactive.rows_affected)
        })
    }

    /// Fails with `Conflict` when the owner already has a trip intersecting
    /// the given range. `exclude` skips the trip being updated so it never
    /// conflicts with itself.
    async fn require_no_overlap(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        exclude: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = trips::Entity::find()
            .filter(trips::Column::UserId.eq(user_id.to_string()))
            .filter(trips::Column::StartDate.lte(end_date))
            .filter(trips::Column::EndDate.gte(start_date));
        if let Some(trip_id) = exclude {
            query = query.filter(trips::Column::Id.ne(trip_id.to_string()));
        }

        if query.one(db_tx).await?.is_some() {
            return Err(EngineError::Conflict(
                "another trip is already scheduled in this date range".to_string(),
            ));
        }
        Ok(())
    }
}
