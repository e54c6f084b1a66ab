//! Persisted report operations.
//!
//! Reports are immutable snapshots; creating one reads the trip's expenses
//! once and stores the totals. Nothing reconciles them afterwards.

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Report, ResultEngine, expenses, reports, trips};

use super::{Engine, with_tx};

impl Engine {
    /// Snapshot a trip's current totals and category breakdown.
    pub async fn create_report(&self, trip_id: Uuid, user_id: &str) -> ResultEngine<Report> {
        with_tx!(self, |db_tx| {
            let trip = self.require_trip_owned(&db_tx, trip_id, user_id).await?;

            let models = expenses::Entity::find()
                .filter(expenses::Column::TripId.eq(trip.id))
                .all(&db_tx)
                .await?;

            let mut total_spent_minor = 0;
            let mut breakdown = std::collections::BTreeMap::new();
            for model in &models {
                total_spent_minor += model.amount_minor;
                *breakdown.entry(model.category.clone()).or_insert(0) += model.amount_minor;
            }

            let report = Report::new(trip_id, total_spent_minor, breakdown);
            reports::ActiveModel::from(&report).insert(&db_tx).await?;
            Ok(report)
        })
    }

    /// Return a single report; ownership resolved through the parent trip.
    pub async fn report(&self, report_id: Uuid, user_id: &str) -> ResultEngine<Report> {
        with_tx!(self, |db_tx| {
            let (model, _) = self.require_report_owned(&db_tx, report_id, user_id).await?;
            Report::try_from(model)
        })
    }

    /// List a trip's reports, newest first.
    pub async fn list_reports(&self, trip_id: Uuid, user_id: &str) -> ResultEngine<Vec<Report>> {
        with_tx!(self, |db_tx| {
            let trip = self.require_trip_owned(&db_tx, trip_id, user_id).await?;

            let models = reports::Entity::find()
                .filter(reports::Column::TripId.eq(trip.id))
                .order_by_desc(reports::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            models.into_iter().map(Report::try_from).collect()
        })
    }

    /// List every report across all of a user's trips, newest first.
    pub async fn list_all_reports(&self, user_id: &str) -> ResultEngine<Vec<Report>> {
        with_tx!(self, |db_tx| {
            let trip_ids: Vec<String> = trips::Entity::find()
                .filter(trips::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|trip| trip.id)
                .collect();

            let models = if trip_ids.is_empty() {
                Vec::new()
            } else {
                reports::Entity::find()
                    .filter(reports::Column::TripId.is_in(trip_ids))
                    .order_by_desc(reports::Column::CreatedAt)
                    .all(&db_tx)
                    .await?
            };

            models.into_iter().map(Report::try_from).collect()
        })
    }

    /// Delete a report.
    pub async fn delete_report(&self, report_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let (model, _) = self.require_report_owned(&db_tx, report_id, user_id).await?;
            reports::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
