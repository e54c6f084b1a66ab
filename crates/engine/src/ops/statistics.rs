//! Read-only spending rollups.
//!
//! Nothing here mutates trips or expenses; the aggregates are recomputed
//! from the rows on every call.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ResultEngine, expenses, trips};

use super::{Engine, with_tx};

/// Spending rollup for a single trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripStatistics {
    pub total_spent_minor: i64,
    pub total_budget_minor: i64,
    /// Clamped at zero: the figure shown to users.
    pub remaining_budget_minor: i64,
    pub category_breakdown: BTreeMap<String, i64>,
    pub daily_spending: BTreeMap<NaiveDate, i64>,
}

/// One side of a two-trip comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripSpendSummary {
    pub trip_id: Uuid,
    pub name: String,
    pub total_spent_minor: i64,
    pub breakdown: BTreeMap<String, i64>,
    /// Actual spend divided by trip duration (not budget consumption).
    pub daily_average_minor: i64,
    pub duration_days: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpendDifferences {
    pub total_spent_minor: i64,
    pub daily_average_minor: i64,
    /// `(spent2 - spent1) / spent1 * 100`. `None` when the first trip has no
    /// spending, since the ratio is undefined there.
    pub percentage: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripComparison {
    pub first: TripSpendSummary,
    pub second: TripSpendSummary,
    pub differences: SpendDifferences,
}

fn fold_expenses(models: &[expenses::Model]) -> (i64, BTreeMap<String, i64>) {
    let mut total = 0;
    let mut breakdown: BTreeMap<String, i64> = BTreeMap::new();
    for model in models {
        total += model.amount_minor;
        *breakdown.entry(model.category.clone()).or_insert(0) += model.amount_minor;
    }
    (total, breakdown)
}

impl Engine {
    /// Aggregate a trip's spending: totals plus per-category and per-day
    /// buckets.
    pub async fn trip_statistics(
        &self,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<TripStatistics> {
        with_tx!(self, |db_tx| {
            let trip = self.require_trip_owned(&db_tx, trip_id, user_id).await?;

            let models = expenses::Entity::find()
                .filter(expenses::Column::TripId.eq(trip.id.clone()))
                .all(&db_tx)
                .await?;

            let (total_spent_minor, category_breakdown) = fold_expenses(&models);
            let mut daily_spending: BTreeMap<NaiveDate, i64> = BTreeMap::new();
            for model in &models {
                *daily_spending.entry(model.date).or_insert(0) += model.amount_minor;
            }

            Ok(TripStatistics {
                total_spent_minor,
                total_budget_minor: trip.total_budget_minor,
                remaining_budget_minor: trip.remaining_budget_minor.max(0),
                category_breakdown,
                daily_spending,
            })
        })
    }

    /// Compare the spending of two trips of the same owner.
    pub async fn compare_trips(
        &self,
        first_trip_id: Uuid,
        second_trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<TripComparison> {
        with_tx!(self, |db_tx| {
            let first = self
                .trip_spend_summary(&db_tx, first_trip_id, user_id)
                .await?;
            let second = self
                .trip_spend_summary(&db_tx, second_trip_id, user_id)
                .await?;

            let spent_diff = second.total_spent_minor - first.total_spent_minor;
            let percentage = if first.total_spent_minor == 0 {
                None
            } else {
                Some(spent_diff as f64 / first.total_spent_minor as f64 * 100.0)
            };

            let differences = SpendDifferences {
                total_spent_minor: spent_diff,
                daily_average_minor: second.daily_average_minor - first.daily_average_minor,
                percentage,
            };

            Ok(TripComparison {
                first,
                second,
                differences,
            })
        })
    }

    async fn trip_spend_summary(
        &self,
        db_tx: &DatabaseTransaction,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<TripSpendSummary> {
        let trip = self.require_trip_owned(db_tx, trip_id, user_id).await?;

        let models = expenses::Entity::find()
            .filter(expenses::Column::TripId.eq(trip.id.clone()))
            .all(db_tx)
            .await?;

        let (total_spent_minor, breakdown) = fold_expenses(&models);
        let duration_days = trips::duration_days(trip.start_date, trip.end_date);

        Ok(TripSpendSummary {
            trip_id,
            name: trip.name,
            total_spent_minor,
            breakdown,
            daily_average_minor: total_spent_minor / duration_days,
            duration_days,
        })
    }
}
