//! Route handlers for the reservation API.

pub mod health;
pub mod reservations;
pub mod tables;

use axum::extract::OriginalUri;
use axum::routing::{get, put};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// The wire envelope: requests arrive as `{"data": ...}` and every success
/// response wraps its payload the same way.
#[derive(Debug, Serialize, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

/// Parse a path segment as a record ID.
///
/// Anything that isn't an integer can't name a record, so it reports as not
/// found rather than as a malformed request.
pub(crate) fn parse_id(entity: &'static str, raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| {
            database::DatabaseError::NotFound {
                entity,
                id: raw.to_string(),
            }
            .into()
        })
}

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Reservations
        .route(
            "/reservations",
            get(reservations::list).post(reservations::create),
        )
        .route(
            "/reservations/:reservation_id",
            get(reservations::read).put(reservations::update),
        )
        .route(
            "/reservations/:reservation_id/status",
            put(reservations::update_status),
        )
        // Tables
        .route("/tables", get(tables::list).post(tables::create))
        .route(
            "/tables/:table_id/seat",
            put(tables::seat).delete(tables::finish),
        )
        // Health check
        .route("/health", get(health::health))
        .fallback(not_found)
}

/// Catch-all for unknown paths, kept in the same error envelope.
async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::PathNotFound(uri.to_string())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use database::Database;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::router;
    use crate::state::AppState;

    async fn test_app() -> axum::Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        router().with_state(AppState::new(db))
    }

    async fn send(
        app: &axum::Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = match body {
            Some(json) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn reservation_body() -> Value {
        json!({
            "data": {
                "first_name": "Frank",
                "last_name": "Lloyd",
                "mobile_number": "(555) 123-4567",
                "reservation_date": "2024-01-01",
                "reservation_time": "19:00",
                "people": 2
            }
        })
    }

    fn table_body(name: &str, capacity: i64) -> Value {
        json!({
            "data": {
                "table_name": name,
                "capacity": capacity
            }
        })
    }

    #[tokio::test]
    async fn test_create_and_read_reservation() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/reservations",
            Some(reservation_body()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "booked");
        let id = body["data"]["reservation_id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/reservations/{}", id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["first_name"], "Frank");
    }

    #[tokio::test]
    async fn test_create_reservation_validation_errors() {
        let app = test_app().await;

        let mut missing = reservation_body();
        missing["data"].as_object_mut().unwrap().remove("first_name");
        let (status, body) = send(&app, Method::POST, "/reservations", Some(missing)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "first_name is required.");

        let mut zero = reservation_body();
        zero["data"]["people"] = json!(0);
        let (status, body) = send(&app, Method::POST, "/reservations", Some(zero)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "people must be a positive number.");

        let mut seated = reservation_body();
        seated["data"]["status"] = json!("seated");
        let (status, _) = send(&app, Method::POST, "/reservations", Some(seated)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_read_unknown_reservation() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/reservations/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Reservation 999 cannot be found.");

        // Garbage IDs can't name a record either.
        let (status, _) = send(&app, Method::GET, "/reservations/abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_requires_query_parameter() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/reservations", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("date"));
    }

    #[tokio::test]
    async fn test_list_and_search() {
        let app = test_app().await;

        send(&app, Method::POST, "/reservations", Some(reservation_body())).await;

        let (status, body) =
            send(&app, Method::GET, "/reservations?date=2024-01-01", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(
            &app,
            Method::GET,
            "/reservations?mobile_number=555",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) =
            send(&app, Method::GET, "/reservations?date=2024-02-02", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_reservation() {
        let app = test_app().await;

        let (_, body) = send(
            &app,
            Method::POST,
            "/reservations",
            Some(reservation_body()),
        )
        .await;
        let id = body["data"]["reservation_id"].as_i64().unwrap();

        let mut edited = reservation_body();
        edited["data"]["people"] = json!(4);
        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/reservations/{}", id),
            Some(edited),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["people"], 4);
    }

    #[tokio::test]
    async fn test_cancel_via_status_endpoint() {
        let app = test_app().await;

        let (_, body) = send(
            &app,
            Method::POST,
            "/reservations",
            Some(reservation_body()),
        )
        .await;
        let id = body["data"]["reservation_id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/reservations/{}/status", id),
            Some(json!({"data": {"status": "cancelled"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "cancelled");

        // Terminal: no way back to booked.
        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/reservations/{}/status", id),
            Some(json!({"data": {"status": "booked"}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/reservations/{}/status", id),
            Some(json!({"data": {"status": "nonsense"}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "'nonsense' is not a known reservation status.");
    }

    #[tokio::test]
    async fn test_create_table_and_list() {
        let app = test_app().await;

        let (status, body) =
            send(&app, Method::POST, "/tables", Some(table_body("Bar #1", 2))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["occupied"], false);

        let (status, body) = send(
            &app,
            Method::POST,
            "/tables",
            Some(table_body("A", 2)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "table_name must be at least 2 characters long."
        );

        let (status, body) = send(&app, Method::GET, "/tables", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seat_and_finish_flow() {
        let app = test_app().await;

        let (_, body) = send(
            &app,
            Method::POST,
            "/reservations",
            Some(reservation_body()),
        )
        .await;
        let reservation_id = body["data"]["reservation_id"].as_i64().unwrap();

        let (_, body) =
            send(&app, Method::POST, "/tables", Some(table_body("A1", 2))).await;
        let table_id = body["data"]["table_id"].as_i64().unwrap();

        let seat_uri = format!("/tables/{}/seat", table_id);
        let seat_body = json!({"data": {"reservation_id": reservation_id}});

        let (status, body) = send(&app, Method::PUT, &seat_uri, Some(seat_body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["occupied"], true);
        assert_eq!(body["data"]["reservation_id"], reservation_id);

        // The seated reservation stays visible on the dashboard.
        let (_, body) = send(&app, Method::GET, "/reservations?date=2024-01-01", None).await;
        assert_eq!(body["data"][0]["status"], "seated");

        // Double-seating the same table is rejected.
        let (_, body) = send(
            &app,
            Method::POST,
            "/reservations",
            Some(reservation_body()),
        )
        .await;
        let other = body["data"]["reservation_id"].as_i64().unwrap();
        let (status, body) = send(
            &app,
            Method::PUT,
            &seat_uri,
            Some(json!({"data": {"reservation_id": other}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], format!("Table {} is occupied.", table_id));

        let (status, body) = send(&app, Method::DELETE, &seat_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["occupied"], false);

        // Finishing a free table is rejected.
        let (status, body) = send(&app, Method::DELETE, &seat_uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], format!("Table {} is not occupied.", table_id));

        // And the finished reservation no longer lists for the day.
        let (_, body) = send(&app, Method::GET, "/reservations?date=2024-01-01", None).await;
        let statuses: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["status"].as_str().unwrap())
            .collect();
        assert_eq!(statuses, vec!["booked"]);
    }

    #[tokio::test]
    async fn test_seat_workflow_errors() {
        let app = test_app().await;

        let (_, body) = send(
            &app,
            Method::POST,
            "/reservations",
            Some(reservation_body()),
        )
        .await;
        let reservation_id = body["data"]["reservation_id"].as_i64().unwrap();

        // Unknown table is a 404 even with a valid body.
        let (status, _) = send(
            &app,
            Method::PUT,
            "/tables/999/seat",
            Some(json!({"data": {"reservation_id": reservation_id}})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, Method::POST, "/tables", Some(table_body("A1", 2))).await;
        let table_id = body["data"]["table_id"].as_i64().unwrap();
        let seat_uri = format!("/tables/{}/seat", table_id);

        // No body at all reads as a missing reservation_id.
        let (status, body) = send(&app, Method::PUT, &seat_uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "reservation_id is required.");

        // Unknown reservation.
        let (status, _) = send(
            &app,
            Method::PUT,
            &seat_uri,
            Some(json!({"data": {"reservation_id": 999}})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Party of two at a table for one.
        let (_, body) = send(&app, Method::POST, "/tables", Some(table_body("Two-top", 1))).await;
        let small = body["data"]["table_id"].as_i64().unwrap();
        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/tables/{}/seat", small),
            Some(json!({"data": {"reservation_id": reservation_id}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            format!("Table {} does not have sufficient capacity.", small)
        );
    }

    #[tokio::test]
    async fn test_health_and_unknown_path() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(&app, Method::GET, "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Path not found: /nope");
    }
}
