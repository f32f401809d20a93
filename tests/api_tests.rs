//! End-to-end API tests against a running gateway
//!
//! Stand-in flows need nothing external; live flows point the gateway at a
//! wiremock vehicle-cloud bridge.

use mazda_gateway::{routes, AppState, GatewayConfig};
use reqwest::{header, Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, header as header_is, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "test-secret-123";

// Helper to spawn a gateway on a random port
async fn spawn_server(config: GatewayConfig) -> String {
    let state = Arc::new(AppState::new(config).unwrap());
    let app = routes::create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api", addr)
}

fn stand_in_config() -> GatewayConfig {
    GatewayConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        secret_key: SECRET.to_string(),
        use_stand_in: true,
        ..Default::default()
    }
}

fn live_config(backend_url: Option<String>) -> GatewayConfig {
    GatewayConfig {
        use_stand_in: false,
        backend_url,
        ..stand_in_config()
    }
}

async fn login(client: &Client, base_url: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{}/auth", base_url))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn token(client: &Client, base_url: &str) -> String {
    let res = login(client, base_url, json!({"email": "a@b.com", "password": "p"})).await;
    assert_eq!(res.status(), StatusCode::OK);
    res.text().await.unwrap()
}

#[tokio::test]
async fn test_stand_in_session_lifecycle() {
    let base_url = spawn_server(stand_in_config()).await;
    let client = Client::new();

    // 1. Exchange credentials for a token
    let token = token(&client, &base_url).await;
    assert!(!token.is_empty());

    // 2. List vehicles
    let res = client
        .get(format!("{}/vehicles", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let vehicles: Value = res.json().await.unwrap();
    assert_eq!(vehicles.as_array().unwrap().len(), 1);
    assert_eq!(vehicles[0]["id"], json!(12345));
    assert_eq!(vehicles[0]["vin"], "JMXXXXXXXXXXXXXXX");

    // 3. Raw status
    let res = client
        .get(format!("{}/vehicle/status/12345", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let status: Value = res.json().await.unwrap();
    assert_eq!(status["doors"]["driverDoorOpen"], json!(false));
    assert_eq!(status["fuelRemainingPercent"], json!(18.0));

    // 4. Door summary
    let res = client
        .get(format!("{}/doors/status/12345", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let summary: Value = res.json().await.unwrap();
    assert_eq!(
        summary,
        json!({"doorsClosed": true, "doorsLocked": true, "windowsClosed": true})
    );

    // 5. Every command answers 204 with an empty body
    for command in [
        "doors/lock",
        "doors/unlock",
        "lights/on",
        "lights/off",
        "engine/start",
        "engine/stop",
    ] {
        let res = client
            .get(format!("{}/{}/12345", base_url, command))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT, "{}", command);
        assert!(res.text().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let base_url = spawn_server(stand_in_config()).await;

    let res = Client::new()
        .get(format!("{}/health", base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_error_body_shape() {
    let base_url = spawn_server(stand_in_config()).await;

    let res = Client::new()
        .get(format!("{}/vehicles", base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let request_id = res.headers()["x-request-id"].to_str().unwrap().to_string();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "TokenInvalid");
    assert_eq!(body["requestId"], request_id);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_cors_preflight() {
    let base_url = spawn_server(stand_in_config()).await;

    let res = Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/vehicles", base_url))
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .send()
        .await
        .unwrap();

    assert!(res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let base_url = spawn_server(stand_in_config()).await;
    let huge = "x".repeat(128 * 1024);

    let res = login(&Client::new(), &base_url, json!({"email": huge, "password": "p"})).await;

    assert!(res.status().is_client_error());
    assert_ne!(res.status(), StatusCode::OK);
}

// ==================== Live backend ====================

#[tokio::test]
async fn test_live_session_against_bridge() {
    let bridge = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({"email": "a@b.com", "region": "MNAO"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "cloud-token"})))
        .expect(2)
        .mount(&bridge)
        .await;

    Mock::given(method("GET"))
        .and(path("/vehicles"))
        .and(header_is("authorization", "Bearer cloud-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "vin": "JM1TEST", "nickname": "Daily", "trim": "Touring"}
        ])))
        .expect(1)
        .mount(&bridge)
        .await;

    // One logout per request-scoped client
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&bridge)
        .await;

    let base_url = spawn_server(live_config(Some(bridge.uri()))).await;
    let client = Client::new();

    let token = token(&client, &base_url).await;
    let res = client
        .get(format!("{}/vehicles", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let vehicles: Value = res.json().await.unwrap();
    assert_eq!(vehicles[0]["id"], json!(7));
    assert_eq!(vehicles[0]["nickname"], "Daily");
    assert_eq!(vehicles[0]["trim"], "Touring");
}

#[tokio::test]
async fn test_live_login_rejected() {
    let bridge = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "AuthenticationError",
            "message": "Invalid email or password"
        })))
        .mount(&bridge)
        .await;

    let base_url = spawn_server(live_config(Some(bridge.uri()))).await;
    let res = login(&Client::new(), &base_url, json!({"email": "a@b.com", "password": "bad"})).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "AuthenticationError");
    assert_eq!(body["message"], "Authentication error");
    assert!(body["detail"].as_str().unwrap().contains("Invalid email or password"));
}

#[tokio::test]
async fn test_live_command_failure_is_bad_gateway() {
    let bridge = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "cloud-token"})))
        .mount(&bridge)
        .await;
    Mock::given(method("POST"))
        .and(path("/vehicles/7/engine/start"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "code": "VehicleOffline",
            "message": "Vehicle did not respond"
        })))
        .expect(1)
        .mount(&bridge)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&bridge)
        .await;

    let base_url = spawn_server(live_config(Some(bridge.uri()))).await;
    let client = Client::new();
    let token = token(&client, &base_url).await;

    let res = client
        .get(format!("{}/engine/start/7", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "BackendOperationError");
}

#[tokio::test]
async fn test_mock_flag_overrides_unconfigured_live_backend() {
    let base_url = spawn_server(live_config(None)).await;
    let client = Client::new();

    // Without the flag the live backend cannot even be built
    let res = login(&client, &base_url, json!({"email": "a@b.com", "password": "p"})).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/auth?mock=true", base_url))
        .json(&json!({"email": "a@b.com", "password": "p"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let token = res.text().await.unwrap();

    let res = client
        .get(format!("{}/vehicles?mock=t", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/vehicles", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}
