#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use six_cities_api::config::AppConfig;
use six_cities_api::database::Store;
use six_cities_api::{router, AppState};

pub const JWT_SECRET: &str = "integration-secret";
pub const SALT: &str = "integration-salt";

// ---------------------------------------------------------------------------
// Live server, one child process per test, killed when the handle drops
// ---------------------------------------------------------------------------

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // In-memory store: an empty DATABASE_URL is ignored by the config loader.
        let child = Command::new(env!("CARGO_BIN_EXE_six-cities-api"))
            .env("SERVICE_HOST", "127.0.0.1")
            .env("PORT", port.to_string())
            .env("JWT_SECRET", JWT_SECRET)
            .env("SALT", SALT)
            .env("DATABASE_URL", "")
            .env("APP_ENV", "development")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(format!("{}/health", self.base_url)).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Start a server for the calling test. Keep the handle alive for as long as
/// the test talks to it.
pub async fn spawn_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

// ---------------------------------------------------------------------------
// In-process router driven with oneshot
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn app() -> TestApp {
    let mut config = AppConfig::development();
    config.security.jwt_secret = JWT_SECRET.to_string();
    config.security.salt = SALT.to_string();
    let state = AppState::new(config, Store::memory()).expect("token service");
    TestApp {
        router: router(state.clone()),
        state,
    }
}

impl TestApp {
    /// Send a request and return the status with the parsed JSON body
    /// (`Value::Null` for an empty body).
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    /// Register a user and log in. Returns `(user id, token)`.
    pub async fn sign_up(&self, username: &str, email: &str) -> (String, String) {
        let (status, body) = self
            .send(Method::POST, "/auth/register", None, Some(register_body(username, email)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = self
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": email, "password": "secret1" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        (id, body["data"]["token"].as_str().unwrap().to_string())
    }

    /// Create an offer as `token`. Returns the offer id.
    pub async fn create_offer(&self, token: &str, city: &str, premium: bool) -> String {
        let (status, body) = self
            .send(Method::POST, "/offers", Some(token), Some(offer_body(city, premium)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn offer_count(&self) -> usize {
        self.state.offers.find(Some(usize::MAX), None).await.unwrap().len()
    }
}

pub fn register_body(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "password": "secret1",
        "status": "regular"
    })
}

pub fn offer_body(city: &str, premium: bool) -> Value {
    json!({
        "title": "Canal house with a view",
        "description": "Quiet two-room apartment right next to the water.",
        "city": city,
        "previewImage": "preview.jpg",
        "images": ["1.jpg", "2.jpg"],
        "isPremium": premium,
        "type": "apartment",
        "bedrooms": 2,
        "maxAdults": 4,
        "price": 1500,
        "goods": ["Breakfast", "Washer"],
        "latitude": 52.3676,
        "longitude": 4.9041
    })
}

pub const MISSING_ID: &str = "6b1f0c9e-2f0a-4c49-9b55-0d4d3a1f1c00";
