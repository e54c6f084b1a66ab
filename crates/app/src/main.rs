use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "valigia={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    if let Some(server) = settings.server {
        tracing::info!("Found server settings...");
        let db = match parse_database(&server.database).await {
            Ok(db) => db,
            Err(err) => {
                tracing::error!("failed to initialize database: {err}");
                return Ok(());
            }
        };

        let engine = match engine::Engine::builder().database(db.clone()).build().await {
            Ok(engine) => engine,
            Err(err) => {
                tracing::error!("failed to build engine from database: {err}");
                return Ok(());
            }
        };

        let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
        let addr = format!("{}:{}", bind, server.port);
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(err) => {
                tracing::error!("failed to bind server listener: {err}");
                return Ok(());
            }
        };

        let sweep_db = db.clone();
        tasks.spawn(async move {
            if let Err(err) = server::run_with_listener(engine, db, listener).await {
                tracing::error!("server failed: {err}");
            }
        });

        // Trip statuses drift as the clock crosses date boundaries for trips
        // nobody writes to; an hourly sweep realigns the stored rows.
        tasks.spawn(async move {
            let engine = match engine::Engine::builder().database(sweep_db).build().await {
                Ok(engine) => engine,
                Err(err) => {
                    tracing::error!("failed to build engine for status sweep: {err}");
                    return;
                }
            };

            let mut interval = tokio::time::interval(Duration::from_secs(3600));
            loop {
                interval.tick().await;
                match engine.refresh_statuses(chrono::Utc::now().date_naive()).await {
                    Ok(count) => tracing::debug!("status sweep touched {count} trips"),
                    Err(err) => tracing::warn!("status sweep failed: {err}"),
                }
            }
        });
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
