//! Integration tests for accounts and the session lifecycle

use chirpy::auth::validate_token;
use chirpy::configuration::{
    ApplicationSettings, DatabaseSettings, JwtSettings, Platform, PolkaSettings, Settings,
};
use chirpy::startup::run;
use chirpy::store::Storage;
use serde_json::{json, Value};
use std::net::TcpListener;
use uuid::Uuid;

const JWT_SECRET: &str = "test-secret-key-at-least-32-characters-long";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    async fn create_user(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(&format!("{}/api/users", &self.address))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(&format!("{}/api/login", &self.address))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    async fn post_with_auth(&self, path: &str, authorization: &str) -> reqwest::Response {
        self.client
            .post(&format!("{}{}", &self.address, path))
            .header("Authorization", authorization)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let settings = Settings {
        database: DatabaseSettings {
            username: "postgres".to_string(),
            password: "password".to_string(),
            port: 5432,
            host: "localhost".to_string(),
            database_name: "chirpy".to_string(),
        },
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            platform: Platform::Dev,
            static_dir: "./public".to_string(),
        },
        jwt: JwtSettings {
            secret: JWT_SECRET.to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 5_184_000,
        },
        polka: PolkaSettings {
            api_key: "test-polka-key".to_string(),
        },
    };

    let storage = Storage::in_memory(settings.jwt.refresh_token_ttl());
    let server = run(listener, storage, settings).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    }
}

// --- Account creation ---

#[tokio::test]
async fn create_user_returns_201_with_profile_only() {
    let app = spawn_app();

    let response = app.create_user("a@example.com", "secret1").await;
    assert_eq!(201, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], "a@example.com");
    assert_eq!(body["is_chirpy_red"], false);
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    assert!(body.get("created_at").is_some());
    assert!(body.get("updated_at").is_some());
    assert!(body.get("password").is_none());
    assert!(body.get("hashed_password").is_none());
}

#[tokio::test]
async fn create_user_returns_409_for_duplicate_email() {
    let app = spawn_app();

    assert_eq!(201, app.create_user("a@example.com", "secret1").await.status().as_u16());
    let response = app.create_user("a@example.com", "another").await;

    assert_eq!(409, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "DUPLICATE_ENTRY");
}

#[tokio::test]
async fn create_user_returns_400_for_invalid_input() {
    let app = spawn_app();

    let cases = vec![
        ("notanemail", "secret1", "invalid email"),
        ("user@", "secret1", "missing domain"),
        ("a@example.com", "", "empty password"),
    ];

    for (email, password, reason) in cases {
        let response = app.create_user(email, password).await;
        assert_eq!(400, response.status().as_u16(), "Should reject: {}", reason);
    }
}

// --- Login ---

#[tokio::test]
async fn login_returns_session_and_refresh_tokens() {
    let app = spawn_app();
    let created: Value = app.create_user("a@example.com", "secret1").await.json().await.unwrap();
    let user_id = Uuid::parse_str(created["id"].as_str().unwrap()).unwrap();

    let response = app.login("a@example.com", "secret1").await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["email"], "a@example.com");
    assert!(body.get("hashed_password").is_none());

    let token = body["token"].as_str().expect("token missing");
    assert_eq!(validate_token(token, JWT_SECRET).unwrap(), user_id);

    let refresh_token = body["refresh_token"].as_str().expect("refresh_token missing");
    assert_eq!(refresh_token.len(), 64);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = spawn_app();
    app.create_user("a@example.com", "secret1").await;

    let wrong_password = app.login("a@example.com", "wrong").await;
    assert_eq!(401, wrong_password.status().as_u16());
    let wrong_password: Value = wrong_password.json().await.unwrap();

    let unknown_email = app.login("nobody@example.com", "secret1").await;
    assert_eq!(401, unknown_email.status().as_u16());
    let unknown_email: Value = unknown_email.json().await.unwrap();

    assert_eq!(wrong_password["message"], unknown_email["message"]);
    assert_eq!(wrong_password["code"], unknown_email["code"]);
}

// --- Refresh and revoke ---

async fn login_refresh_token(app: &TestApp) -> String {
    app.create_user("a@example.com", "secret1").await;
    let body: Value = app.login("a@example.com", "secret1").await.json().await.unwrap();
    body["refresh_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn refresh_returns_new_session_token() {
    let app = spawn_app();
    let refresh_token = login_refresh_token(&app).await;

    for _ in 0..2 {
        let response = app
            .post_with_auth("/api/refresh", &format!("Refresh {}", refresh_token))
            .await;
        assert_eq!(200, response.status().as_u16());

        let body: Value = response.json().await.unwrap();
        let token = body["token"].as_str().expect("token missing");
        assert!(validate_token(token, JWT_SECRET).is_ok());
    }
}

#[tokio::test]
async fn refresh_rejects_wrong_scheme_and_unknown_tokens() {
    let app = spawn_app();
    let refresh_token = login_refresh_token(&app).await;

    let cases = vec![
        format!("Bearer {}", refresh_token),
        format!("refresh {}", refresh_token),
        refresh_token.clone(),
        "Refresh ".to_string() + &"0".repeat(64),
    ];

    for authorization in cases {
        let response = app.post_with_auth("/api/refresh", &authorization).await;
        assert_eq!(401, response.status().as_u16(), "Should reject: {}", authorization);
    }

    let response = app
        .client
        .post(&format!("{}/api/refresh", &app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn revoked_refresh_token_cannot_refresh() {
    let app = spawn_app();
    let refresh_token = login_refresh_token(&app).await;
    let authorization = format!("Refresh {}", refresh_token);

    let response = app.post_with_auth("/api/revoke", &authorization).await;
    assert_eq!(204, response.status().as_u16());

    let response = app.post_with_auth("/api/refresh", &authorization).await;
    assert_eq!(401, response.status().as_u16());

    // Revoking again is not an error.
    let response = app.post_with_auth("/api/revoke", &authorization).await;
    assert_eq!(204, response.status().as_u16());
}

#[tokio::test]
async fn revoke_requires_refresh_header() {
    let app = spawn_app();

    let response = app
        .client
        .post(&format!("{}/api/revoke", &app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(401, response.status().as_u16());

    let response = app.post_with_auth("/api/revoke", "Refresh never-issued").await;
    assert_eq!(204, response.status().as_u16());
}

#[tokio::test]
async fn logging_in_twice_gives_independent_refresh_tokens() {
    let app = spawn_app();
    let first = login_refresh_token(&app).await;
    let second: Value = app.login("a@example.com", "secret1").await.json().await.unwrap();
    let second = second["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(first, second);

    app.post_with_auth("/api/revoke", &format!("Refresh {}", first)).await;

    let response = app
        .post_with_auth("/api/refresh", &format!("Refresh {}", second))
        .await;
    assert_eq!(200, response.status().as_u16());
}
