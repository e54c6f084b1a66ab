use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, EngineError, TripNewCmd, TripStatus, TripUpdateCmd};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![user.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn create_trip_initializes_derived_fields() {
    let (engine, _db) = engine_with_db().await;

    let trip = engine
        .create_trip(
            TripNewCmd::new("alice", "Roma", 100_000, date(2025, 6, 1), date(2025, 6, 5)),
            date(2025, 5, 1),
        )
        .await
        .unwrap();

    assert_eq!(trip.remaining_budget_minor, 100_000);
    assert_eq!(trip.daily_average_minor, 0);
    assert_eq!(trip.status, TripStatus::Upcoming);
    assert_eq!(trip.duration_days(), 5);
}

#[tokio::test]
async fn fail_create_trip_with_inverted_dates() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_trip(
            TripNewCmd::new("alice", "Roma", 100_000, date(2025, 6, 5), date(2025, 6, 1)),
            date(2025, 5, 1),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn overlapping_trip_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let today = date(2025, 2, 1);

    engine
        .create_trip(
            TripNewCmd::new("alice", "Lisbona", 50_000, date(2025, 3, 1), date(2025, 3, 10)),
            today,
        )
        .await
        .unwrap();

    let err = engine
        .create_trip(
            TripNewCmd::new("alice", "Porto", 50_000, date(2025, 3, 5), date(2025, 3, 15)),
            today,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // An adjacent range is fine, and other users are unaffected.
    engine
        .create_trip(
            TripNewCmd::new("alice", "Porto", 50_000, date(2025, 3, 11), date(2025, 3, 20)),
            today,
        )
        .await
        .unwrap();
    engine
        .create_trip(
            TripNewCmd::new("bob", "Porto", 50_000, date(2025, 3, 5), date(2025, 3, 15)),
            today,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn update_does_not_conflict_with_itself() {
    let (engine, _db) = engine_with_db().await;
    let today = date(2025, 2, 1);

    let trip = engine
        .create_trip(
            TripNewCmd::new("alice", "Lisbona", 50_000, date(2025, 3, 1), date(2025, 3, 10)),
            today,
        )
        .await
        .unwrap();

    let updated = engine
        .update_trip(
            TripUpdateCmd::new(trip.id, "alice").start_date(date(2025, 3, 2)),
            today,
        )
        .await
        .unwrap();

    assert_eq!(updated.start_date, date(2025, 3, 2));
    assert_eq!(updated.end_date, date(2025, 3, 10));
}

#[tokio::test]
async fn budget_raise_shifts_remaining() {
    let (engine, _db) = engine_with_db().await;
    let today = date(2025, 2, 1);

    let trip = engine
        .create_trip(
            TripNewCmd::new("alice", "Lisbona", 50_000, date(2025, 3, 1), date(2025, 3, 10)),
            today,
        )
        .await
        .unwrap();

    let updated = engine
        .update_trip(
            TripUpdateCmd::new(trip.id, "alice").total_budget_minor(80_000),
            today,
        )
        .await
        .unwrap();

    assert_eq!(updated.total_budget_minor, 80_000);
    assert_eq!(updated.remaining_budget_minor, 80_000);
}

#[tokio::test]
async fn trips_are_owner_scoped() {
    let (engine, _db) = engine_with_db().await;
    let today = date(2025, 2, 1);

    let trip = engine
        .create_trip(
            TripNewCmd::new("alice", "Lisbona", 50_000, date(2025, 3, 1), date(2025, 3, 10)),
            today,
        )
        .await
        .unwrap();

    let err = engine.trip(trip.id, "bob", today).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine.delete_trip(trip.id, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    assert!(engine.list_trips("bob", today).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_trips_sorts_by_start_date_desc() {
    let (engine, _db) = engine_with_db().await;
    let today = date(2025, 2, 1);

    engine
        .create_trip(
            TripNewCmd::new("alice", "Lisbona", 50_000, date(2025, 3, 1), date(2025, 3, 10)),
            today,
        )
        .await
        .unwrap();
    engine
        .create_trip(
            TripNewCmd::new("alice", "Porto", 50_000, date(2025, 4, 1), date(2025, 4, 10)),
            today,
        )
        .await
        .unwrap();

    let trips = engine.list_trips("alice", today).await.unwrap();
    assert_eq!(trips.len(), 2);
    assert_eq!(trips[0].name, "Porto");
    assert_eq!(trips[1].name, "Lisbona");
}

#[tokio::test]
async fn status_is_rederived_on_read() {
    let (engine, _db) = engine_with_db().await;

    let trip = engine
        .create_trip(
            TripNewCmd::new("alice", "Lisbona", 50_000, date(2025, 3, 1), date(2025, 3, 10)),
            date(2025, 2, 1),
        )
        .await
        .unwrap();
    assert_eq!(trip.status, TripStatus::Upcoming);

    // Same stored row, different clock.
    let trip = engine.trip(trip.id, "alice", date(2025, 3, 5)).await.unwrap();
    assert_eq!(trip.status, TripStatus::Active);
    let trip = engine.trip(trip.id, "alice", date(2025, 4, 1)).await.unwrap();
    assert_eq!(trip.status, TripStatus::Deactive);
}

#[tokio::test]
async fn refresh_statuses_realigns_stored_rows() {
    let (engine, db) = engine_with_db().await;
    let today = date(2025, 3, 15);

    let past = engine
        .create_trip(
            TripNewCmd::new("alice", "Past", 10_000, date(2025, 3, 1), date(2025, 3, 5)),
            date(2025, 2, 1),
        )
        .await
        .unwrap();
    let current = engine
        .create_trip(
            TripNewCmd::new("alice", "Current", 10_000, date(2025, 3, 12), date(2025, 3, 20)),
            date(2025, 2, 1),
        )
        .await
        .unwrap();
    let future = engine
        .create_trip(
            TripNewCmd::new("alice", "Future", 10_000, date(2025, 4, 1), date(2025, 4, 5)),
            date(2025, 2, 1),
        )
        .await
        .unwrap();

    let refreshed = engine.refresh_statuses(today).await.unwrap();
    assert_eq!(refreshed, 3);

    let backend = db.get_database_backend();
    for (trip, expected) in [
        (past, "deactive"),
        (current, "active"),
        (future, "upcoming"),
    ] {
        let row = db
            .query_one(Statement::from_sql_and_values(
                backend,
                "SELECT status FROM trips WHERE id = ?",
                vec![trip.id.to_string().into()],
            ))
            .await
            .unwrap()
            .unwrap();
        let status: String = row.try_get("", "status").unwrap();
        assert_eq!(status, expected);
    }
}

#[tokio::test]
async fn delete_trip_cascades_to_expenses_and_reports() {
    let (engine, _db) = engine_with_db().await;
    let today = date(2025, 2, 1);

    let trip = engine
        .create_trip(
            TripNewCmd::new("alice", "Lisbona", 50_000, date(2025, 3, 1), date(2025, 3, 10)),
            today,
        )
        .await
        .unwrap();
    let expense = engine
        .create_expense(engine::ExpenseNewCmd::new(
            trip.id,
            "alice",
            "Food",
            5_000,
            date(2025, 3, 2),
        ))
        .await
        .unwrap();
    let report = engine.create_report(trip.id, "alice").await.unwrap();

    engine.delete_trip(trip.id, "alice").await.unwrap();

    let err = engine.trip(trip.id, "alice", today).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.expense(expense.id, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.report(report.id, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
