use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use nhealth_api::{
    AccessCredentials, Client, ConsumerCredentials, MeasureQuery, MeasureType,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Captured = Arc<Mutex<Vec<(HashMap<String, String>, String)>>>;

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn consumer() -> ConsumerCredentials {
    ConsumerCredentials::new("consumer-key", "consumer-secret")
}

fn sample_body() -> Value {
    json!({
        "updatetime": 1504159331,
        "timezone": "Europe/Paris",
        "more": 0,
        "measuregrps": [{
            "grpid": 1,
            "attrib": 0,
            "date": 1504100000,
            "category": 1,
            "measures": [{ "value": 700, "unit": -2, "type": 1 }]
        }],
        "status": 0,
        "offset": 0,
        "message": ""
    })
}

async fn capture_and_reply(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    captured.lock().unwrap().push((params, authorization));
    Json(sample_body())
}

#[tokio::test]
async fn weight_query_round_trip() {
    let captured = Captured::default();
    let router = Router::new()
        .route("/measure", get(capture_and_reply))
        .with_state(captured.clone());
    let base_url = spawn_server(router).await;

    let client = Client::with_base_url(consumer(), base_url).unwrap();
    let access = AccessCredentials::new(13644360, "access-token", "access-secret");
    let now = Utc.timestamp_opt(1_504_159_331, 0).unwrap();
    let query = MeasureQuery::last_days(access.user_id(), MeasureType::Weight, 7, now);

    let response = client.get_measurements(&access, query).await.unwrap();

    assert_eq!(response.measure_groups.len(), 1);
    let measure = response.measure_groups[0].measures[0];
    assert_eq!(measure.value, 700);
    assert_eq!(measure.unit, -2);
    assert_eq!(measure.measure_type, MeasureType::Weight);

    let captured = captured.lock().unwrap();
    let (params, authorization) = &captured[0];
    assert_eq!(params["action"], "getmeas");
    assert_eq!(params["userid"], "13644360");
    assert_eq!(params["meastype"], "1");
    assert_eq!(params["startdate"], "1503554531");
    assert_eq!(params["enddate"], "1504159331");
    assert!(!params.contains_key("limit"));

    // Signed with the access token, never the secret in its place.
    assert!(authorization.starts_with("OAuth "));
    assert!(authorization.contains(r#"oauth_token="access-token""#));
    assert!(authorization.contains(r#"oauth_consumer_key="consumer-key""#));
}

#[tokio::test]
async fn remote_error_status_is_returned_not_raised() {
    let router = Router::new().route(
        "/measure",
        get(|| async { Json(json!({ "status": 342, "message": "invalid signature" })) }),
    );
    let base_url = spawn_server(router).await;
    let client = Client::with_base_url(consumer(), base_url).unwrap();
    let access = AccessCredentials::new(1, "token", "secret");

    let response = client
        .get_measurements(&access, MeasureQuery::new())
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.status, 342);
    assert_eq!(response.message, "invalid signature");
}

#[tokio::test]
async fn server_error_is_transport_error() {
    let router = Router::new().route(
        "/measure",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(sample_body())) }),
    );
    let base_url = spawn_server(router).await;
    let client = Client::with_base_url(consumer(), base_url).unwrap();
    let access = AccessCredentials::new(1, "token", "secret");

    let err = client
        .get_measurements(&access, MeasureQuery::new())
        .await
        .unwrap_err();

    assert!(err.is_transport(), "unexpected error: {}", err);
    match err {
        nhealth_api::HealthApiError::Transport(e) => {
            assert_eq!(e.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR))
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::with_base_url(consumer(), format!("http://{}", addr)).unwrap();
    let access = AccessCredentials::new(1, "token", "secret");

    let err = client
        .get_measurements(&access, MeasureQuery::new())
        .await
        .unwrap_err();

    assert!(err.is_transport(), "unexpected error: {}", err);
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let router = Router::new().route("/measure", get(|| async { "<html>maintenance</html>" }));
    let base_url = spawn_server(router).await;
    let client = Client::with_base_url(consumer(), base_url).unwrap();
    let access = AccessCredentials::new(1, "token", "secret");

    let err = client
        .get_measurements(&access, MeasureQuery::new())
        .await
        .unwrap_err();

    assert!(err.is_decode(), "unexpected error: {}", err);
}

#[tokio::test]
async fn schema_mismatch_is_decode_error() {
    let router = Router::new().route(
        "/measure",
        get(|| async { Json(json!({ "status": "ok", "measuregrps": "none" })) }),
    );
    let base_url = spawn_server(router).await;
    let client = Client::with_base_url(consumer(), base_url).unwrap();
    let access = AccessCredentials::new(1, "token", "secret");

    let err = client
        .get_measurements(&access, MeasureQuery::new())
        .await
        .unwrap_err();

    assert!(err.is_decode(), "unexpected error: {}", err);
}

/// Replies with the caller's user id as the measure value, after checking the
/// request was signed with that user's token.
async fn echo_user(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let user_id: i64 = params["userid"].parse().unwrap();
    let authorization = headers["authorization"].to_str().unwrap();
    let expected = format!(r#"oauth_token="token-{}""#, user_id);
    let status = if authorization.contains(&expected) { 0 } else { 342 };

    Json(json!({
        "status": status,
        "measuregrps": [{
            "grpid": user_id,
            "date": 1504100000,
            "category": 1,
            "measures": [{ "value": user_id, "unit": 0, "type": 1 }]
        }]
    }))
}

#[tokio::test]
async fn concurrent_calls_keep_their_own_state() {
    let router = Router::new().route("/measure", get(echo_user));
    let base_url = spawn_server(router).await;
    let client = Arc::new(Client::with_base_url(consumer(), base_url).unwrap());

    let mut handles = Vec::new();
    for user_id in 1..=16u64 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            let access = AccessCredentials::new(
                user_id,
                format!("token-{}", user_id),
                format!("secret-{}", user_id),
            );
            let query = MeasureQuery::new()
                .user_id(user_id)
                .measure_type(MeasureType::Weight);
            (user_id, client.get_measurements(&access, query).await.unwrap())
        }));
    }

    for handle in handles {
        let (user_id, response) = handle.await.unwrap();
        assert!(response.is_success(), "user {} got status {}", user_id, response.status);
        assert_eq!(response.measure_groups[0].group_id, user_id.to_string());
        assert_eq!(response.measure_groups[0].measures[0].value, user_id as i64);
    }
}
