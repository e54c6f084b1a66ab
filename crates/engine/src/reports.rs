//! Persisted spending reports.
//!
//! A `Report` is an immutable snapshot of a trip's totals and category
//! breakdown at the moment it was generated. Later expense writes never touch
//! existing reports.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub total_spent_minor: i64,
    pub breakdown: BTreeMap<String, i64>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(trip_id: Uuid, total_spent_minor: i64, breakdown: BTreeMap<String, i64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            trip_id,
            total_spent_minor,
            breakdown,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub total_spent_minor: i64,
    /// Category breakdown serialized as a JSON object.
    pub breakdown: String,
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

impl From<&Report> for ActiveModel {
    fn from(report: &Report) -> Self {
        Self {
            id: ActiveValue::Set(report.id.to_string()),
            trip_id: ActiveValue::Set(report.trip_id.to_string()),
            total_spent_minor: ActiveValue::Set(report.total_spent_minor),
            breakdown: ActiveValue::Set(
                serde_json::to_string(&report.breakdown).unwrap_or_else(|_| "{}".to_string()),
            ),
            created_at: ActiveValue::Set(report.created_at),
        }
    }
}

impl TryFrom<Model> for Report {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::Validation("invalid report id".to_string()))?;
        let trip_id = Uuid::parse_str(&model.trip_id)
            .map_err(|_| EngineError::Validation("invalid trip id".to_string()))?;
        let breakdown: BTreeMap<String, i64> = serde_json::from_str(&model.breakdown)
            .map_err(|_| EngineError::Validation("invalid report breakdown".to_string()))?;
        Ok(Self {
            id,
            trip_id,
            total_spent_minor: model.total_spent_minor,
            breakdown,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_round_trips_through_the_model() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert("Food".to_string(), 20_000);
        breakdown.insert("Transport".to_string(), 5_000);
        let report = Report::new(Uuid::new_v4(), 25_000, breakdown);

        let model_breakdown = match ActiveModel::from(&report).breakdown {
            ActiveValue::Set(value) => value,
            _ => panic!("breakdown not set"),
        };
        let parsed: BTreeMap<String, i64> = serde_json::from_str(&model_breakdown).unwrap();

        assert_eq!(parsed, report.breakdown);
    }
}
