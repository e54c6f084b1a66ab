//! Ownership checks.
//!
//! Every operation resolves ownership before touching anything else. Trips
//! carry the owner directly; expenses and reports are owned transitively
//! through their parent trip, so their checks load the trip as an explicit
//! lookup step rather than trusting the caller.

use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, expenses, reports, trips};

use super::Engine;

impl Engine {
    pub(super) async fn require_trip_owned(
        &self,
        db_tx: &DatabaseTransaction,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<trips::Model> {
        let model = trips::Entity::find_by_id(trip_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("trip not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::Forbidden(
                "trip belongs to another user".to_string(),
            ));
        }
        Ok(model)
    }

    pub(super) async fn require_expense_owned(
        &self,
        db_tx: &DatabaseTransaction,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<(expenses::Model, trips::Model)> {
        let expense = expenses::Entity::find_by_id(expense_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;

        let trip_id = Uuid::parse_str(&expense.trip_id)
            .map_err(|_| EngineError::Validation("invalid trip id".to_string()))?;
        let trip = self.require_trip_owned(db_tx, trip_id, user_id).await?;
        Ok((expense, trip))
    }

    pub(super) async fn require_report_owned(
        &self,
        db_tx: &DatabaseTransaction,
        report_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<(reports::Model, trips::Model)> {
        let report = reports::Entity::find_by_id(report_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("report not exists".to_string()))?;

        let trip_id = Uuid::parse_str(&report.trip_id)
            .map_err(|_| EngineError::Validation("invalid trip id".to_string()))?;
        let trip = self.require_trip_owned(db_tx, trip_id, user_id).await?;
        Ok((report, trip))
    }
}
