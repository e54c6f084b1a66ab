use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{expenses, reports, statistics, trips, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/trips", post(trips::trip_new).get(trips::list))
        .route("/trips/compare", post(statistics::compare))
        .route(
            "/trips/{id}",
            get(trips::get).patch(trips::update).delete(trips::delete),
        )
        .route("/trips/{id}/expenses", get(expenses::list_for_trip))
        .route("/trips/{id}/statistics", get(statistics::get_statistics))
        .route(
            "/trips/{id}/reports",
            post(reports::report_new).get(reports::list_for_trip),
        )
        .route("/expenses", post(expenses::expense_new))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .patch(expenses::update)
                .delete(expenses::delete),
        )
        .route("/reports", get(reports::list_all))
        .route(
            "/reports/{id}",
            get(reports::get).delete(reports::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use base64::Engine as _;
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_state() -> ServerState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let backend = db.get_database_backend();
        for username in ["alice", "bob"] {
            db.execute(Statement::from_sql_and_values(
                backend,
                "INSERT INTO users (username, password) VALUES (?, ?)",
                vec![username.into(), "password".into()],
            ))
            .await
            .unwrap();
        }

        let engine = Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap();
        ServerState {
            engine: Arc::new(engine),
            db,
        }
    }

    fn basic_auth(username: &str) -> String {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{username}:password"));
        format!("Basic {encoded}")
    }

    async fn send(
        state: &ServerState,
        method: &str,
        uri: &str,
        username: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, basic_auth(username));
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value).unwrap())
            }
            None => Body::empty(),
        };

        let response = router(state.clone())
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn trip_body() -> Value {
        json!({
            "name": "Roma",
            "total_budget_minor": 100_000,
            "start_date": "2025-06-01",
            "end_date": "2025-06-05",
        })
    }

    #[tokio::test]
    async fn rejects_bad_credentials() {
        let state = test_state().await;

        let request = HttpRequest::builder()
            .method("GET")
            .uri("/trips")
            .header(header::AUTHORIZATION, "Basic bm9ib2R5Om5vcGU=")
            .body(Body::empty())
            .unwrap();
        let response = router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // No Authorization header at all is also rejected.
        let request = HttpRequest::builder()
            .method("GET")
            .uri("/trips")
            .body(Body::empty())
            .unwrap();
        let response = router(state).oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn trip_round_trip() {
        let state = test_state().await;

        let (status, created) = send(&state, "POST", "/trips", "alice", Some(trip_body())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["remaining_budget_minor"], 100_000);
        assert_eq!(created["duration_days"], 5);

        let id = created["id"].as_str().unwrap().to_string();
        let (status, fetched) =
            send(&state, "GET", &format!("/trips/{id}"), "alice", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "Roma");

        let (status, listed) = send(&state, "GET", "/trips", "alice", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["trips"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn overlapping_trip_maps_to_409() {
        let state = test_state().await;

        send(&state, "POST", "/trips", "alice", Some(trip_body())).await;
        let (status, _) = send(
            &state,
            "POST",
            "/trips",
            "alice",
            Some(json!({
                "name": "Roma bis",
                "total_budget_minor": 50_000,
                "start_date": "2025-06-03",
                "end_date": "2025-06-10",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn foreign_trip_maps_to_403() {
        let state = test_state().await;

        let (_, created) = send(&state, "POST", "/trips", "alice", Some(trip_body())).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _) = send(&state, "GET", &format!("/trips/{id}"), "bob", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn expense_flow_updates_statistics() {
        let state = test_state().await;

        let (_, created) = send(&state, "POST", "/trips", "alice", Some(trip_body())).await;
        let trip_id = created["id"].as_str().unwrap().to_string();

        let (status, expense) = send(
            &state,
            "POST",
            "/expenses",
            "alice",
            Some(json!({
                "trip_id": trip_id,
                "category": "Food",
                "amount_minor": 20_000,
                "date": "2025-06-02",
                "note": "lunch",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, stats) = send(
            &state,
            "GET",
            &format!("/trips/{trip_id}/statistics"),
            "alice",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_spent_minor"], 20_000);
        assert_eq!(stats["remaining_budget_minor"], 80_000);
        assert_eq!(stats["category_breakdown"]["Food"], 20_000);
        assert_eq!(stats["daily_spending"]["2025-06-02"], 20_000);

        // Deleting restores the budget; a second delete is a 404.
        let expense_id = expense["id"].as_str().unwrap().to_string();
        let (status, _) = send(
            &state,
            "DELETE",
            &format!("/expenses/{expense_id}"),
            "alice",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(
            &state,
            "DELETE",
            &format!("/expenses/{expense_id}"),
            "alice",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_amount_maps_to_422() {
        let state = test_state().await;

        let (_, created) = send(&state, "POST", "/trips", "alice", Some(trip_body())).await;
        let trip_id = created["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &state,
            "POST",
            "/expenses",
            "alice",
            Some(json!({
                "trip_id": trip_id,
                "category": "Food",
                "amount_minor": 0,
                "date": "2025-06-02",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn comparison_over_http() {
        let state = test_state().await;

        let (_, first) = send(&state, "POST", "/trips", "alice", Some(trip_body())).await;
        let (_, second) = send(
            &state,
            "POST",
            "/trips",
            "alice",
            Some(json!({
                "name": "Parigi",
                "total_budget_minor": 100_000,
                "start_date": "2025-07-01",
                "end_date": "2025-07-10",
            })),
        )
        .await;
        let first_id = first["id"].as_str().unwrap().to_string();
        let second_id = second["id"].as_str().unwrap().to_string();

        send(
            &state,
            "POST",
            "/expenses",
            "alice",
            Some(json!({
                "trip_id": second_id,
                "category": "Food",
                "amount_minor": 30_000,
                "date": "2025-07-02",
            })),
        )
        .await;

        let (status, comparison) = send(
            &state,
            "POST",
            "/trips/compare",
            "alice",
            Some(json!({
                "first_trip_id": first_id,
                "second_trip_id": second_id,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(comparison["differences"]["total_spent_minor"], 30_000);
        // Zero baseline: the ratio is explicitly null.
        assert_eq!(comparison["differences"]["percentage"], Value::Null);
    }
}
