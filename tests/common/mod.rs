#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use chirpy::configuration::{
    ApplicationSettings, DatabaseSettings, JwtSettings, PolkaSettings, Settings,
};
use chirpy::metrics::HitCounter;
use chirpy::startup::run;
use chirpy::store::InMemoryStore;
use serde_json::{json, Value};

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const TEST_POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub address: String,
    pub hits: HitCounter,
    pub settings: Settings,
    pub client: reqwest::Client,
}

fn test_settings(platform: &str) -> Settings {
    Settings {
        database: DatabaseSettings {
            url: String::new(),
            max_connections: 1,
            in_memory: true,
        },
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            platform: platform.to_string(),
            static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string(),
        },
        jwt: JwtSettings {
            secret: TEST_SECRET.to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 5_184_000,
        },
        polka: PolkaSettings {
            api_key: TEST_POLKA_KEY.to_string(),
        },
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_on_platform("dev").await
}

pub async fn spawn_app_on_platform(platform: &str) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let settings = test_settings(platform);
    let hits = HitCounter::new();
    let store = Arc::new(InMemoryStore::new());

    let server = run(listener, store, hits.clone(), settings.clone())
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        hits,
        settings,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_user(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/users"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Registers a user, logs in and returns the login body
    pub async fn signed_in_user(&self, email: &str, password: &str) -> Value {
        let response = self.create_user(email, password).await;
        assert_eq!(201, response.status().as_u16());

        let response = self.login(email, password).await;
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }

    pub async fn post_chirp(&self, access_token: &str, body: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/chirps"))
            .bearer_auth(access_token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub fn token_of(login_body: &Value) -> String {
    login_body["token"]
        .as_str()
        .expect("No access token in response")
        .to_string()
}

pub fn refresh_token_of(login_body: &Value) -> String {
    login_body["refresh_token"]
        .as_str()
        .expect("No refresh token in response")
        .to_string()
}
