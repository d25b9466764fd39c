#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use budget_api::auth::issue_token;
use budget_api::config::AppConfig;
use budget_api::database::models::UserCreate;
use budget_api::database::{DatabaseManager, Repositories};
use budget_api::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// A server spawned on the current test's runtime over fresh in-memory
/// repositories. Each test owns its own instance.
pub struct TestApp {
    pub base_url: String,
    pub api: String,
    pub state: AppState,
    pub client: Client,
}

pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

fn test_config(port: u16, lookup: &[(&str, &str)]) -> AppConfig {
    let port = port.to_string();
    let mut vars: Vec<(&str, &str)> = vec![
        ("APP_ENV", "local"),
        ("SECRET_KEY", TEST_SECRET),
        ("BUDGET_API_PORT", port.as_str()),
        ("SERVER_HOST", "127.0.0.1"),
    ];
    vars.extend_from_slice(lookup);
    AppConfig::from_lookup(|key| {
        vars.iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(&[]).await
    }

    /// Spawn with extra configuration variables, e.g. `("APP_ENV", "production")`.
    pub async fn spawn_with(vars: &[(&str, &str)]) -> Result<Self> {
        Self::spawn_on(Repositories::in_memory(), vars).await
    }

    /// Spawn over the given repositories, e.g. the ones from `postgres_repos`.
    pub async fn spawn_on(repos: Repositories, vars: &[(&str, &str)]) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let config = test_config(port, vars);
        let bind_addr = config.bind_addr();
        let api = format!("http://{}{}", bind_addr, config.api.prefix);

        let state = AppState::new(config, repos);
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind {}", bind_addr))?;

        let app = budget_api::app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self {
            base_url: format!("http://{}", bind_addr),
            api,
            state,
            client: Client::new(),
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(format!("{}/health", self.base_url)).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    /// Insert a user straight into the store and sign a token for it.
    pub async fn user(&self, email: &str, is_superuser: bool) -> Result<TestUser> {
        self.user_from(json!({ "email": email, "is_superuser": is_superuser })).await
    }

    pub async fn user_from(&self, body: Value) -> Result<TestUser> {
        let input: UserCreate = serde_json::from_value(body)?;
        let user = self.state.repos.users.insert(&input).await?;
        let token = issue_token(&self.state.config.security, user.id)?;
        Ok(TestUser { id: user.id, token })
    }

    pub async fn superuser(&self) -> Result<TestUser> {
        self.user("admin@example.com", true).await
    }

    pub async fn normal_user(&self) -> Result<TestUser> {
        self.user("someone@example.com", false).await
    }

    pub fn get(&self, path: &str, who: &TestUser) -> RequestBuilder {
        self.client.get(format!("{}{}", self.api, path)).bearer_auth(&who.token)
    }

    pub fn post(&self, path: &str, who: &TestUser, body: &Value) -> RequestBuilder {
        self.client.post(format!("{}{}", self.api, path)).bearer_auth(&who.token).json(body)
    }

    pub fn put(&self, path: &str, who: &TestUser, body: &Value) -> RequestBuilder {
        self.client.put(format!("{}{}", self.api, path)).bearer_auth(&who.token).json(body)
    }

    pub fn patch(&self, path: &str, who: &TestUser, body: &Value) -> RequestBuilder {
        self.client.patch(format!("{}{}", self.api, path)).bearer_auth(&who.token).json(body)
    }

    pub fn delete(&self, path: &str, who: &TestUser) -> RequestBuilder {
        self.client.delete(format!("{}{}", self.api, path)).bearer_auth(&who.token)
    }
}

/// Repositories over the database named by `DATABASE_URL` (read from the
/// environment or `.env`), migrated to the current schema. `None` when no
/// database is configured, so callers can skip.
pub async fn postgres_repos() -> Result<Option<Repositories>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        return Ok(None);
    };

    let config = AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some(url.clone()),
        "DATABASE_RUN_MIGRATIONS" => Some("true".to_string()),
        _ => None,
    });
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to DATABASE_URL")?;
    Ok(Some(Repositories::postgres(pool)))
}

/// Email that cannot collide with rows left behind by earlier runs.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

/// Status and JSON body of a response, for compact assertions.
pub async fn send(req: RequestBuilder) -> Result<(StatusCode, Value)> {
    let res = req.send().await?;
    let status = res.status();
    let text = res.text().await?;
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    Ok((status, body))
}
