//! Budget reconciliation.
//!
//! The one place that moves a trip's derived budget fields when its expenses
//! change. Expense operations call [`Engine::apply_budget_delta`] exactly
//! once per mutation, inside the same transaction as the expense row write,
//! so the two commit or roll back together.

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, trips};

use super::Engine;

impl Engine {
    /// Adjusts a trip's remaining budget by `delta_minor` and refreshes its
    /// daily average.
    ///
    /// `delta_minor` is positive for new spending and negative when spending
    /// is removed. The remaining budget is changed with an in-database
    /// increment (`remaining = remaining - delta`) instead of a
    /// read-modify-write, so two concurrent expense writes against the same
    /// trip cannot clobber each other's adjustment.
    ///
    /// The stored remainder is unclamped and goes negative once the trip is
    /// over budget; clamping to zero happens at the presentation boundary.
    /// Keeping the exact value means a later delete or reduction restores the
    /// true remainder.
    pub(super) async fn apply_budget_delta(
        &self,
        db_tx: &DatabaseTransaction,
        trip_id: Uuid,
        delta_minor: i64,
    ) -> ResultEngine<trips::Model> {
        let result = trips::Entity::update_many()
            .col_expr(
                trips::Column::RemainingBudgetMinor,
                Expr::col(trips::Column::RemainingBudgetMinor).sub(delta_minor),
            )
            .filter(trips::Column::Id.eq(trip_id.to_string()))
            .exec(db_tx)
            .await?;
        if result.rows_affected != 1 {
            return Err(EngineError::Reconciliation(format!(
                "budget adjustment matched {} rows for trip {trip_id}",
                result.rows_affected
            )));
        }

        let model = trips::Entity::find_by_id(trip_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| {
                EngineError::Reconciliation(format!(
                    "trip {trip_id} vanished during budget adjustment"
                ))
            })?;

        let average = trips::daily_average_minor(
            model.total_budget_minor,
            model.remaining_budget_minor,
            model.start_date,
            model.end_date,
        );
        let active = trips::ActiveModel {
            id: ActiveValue::Set(model.id.clone()),
            daily_average_minor: ActiveValue::Set(average),
            ..Default::default()
        };
        let model = active.update(db_tx).await?;
        Ok(model)
    }
}
