use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use uuid::Uuid;

use task_api_rust::auth::{generate_jwt, Claims};

/// Secret shared between the test process (signing) and the spawned server
/// (validating) via TASK_API_JWT_SECRET.
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_task-api-rust"));
        cmd.env("TASK_API_PORT", port.to_string())
            .env("TASK_API_JWT_SECRET", TEST_JWT_SECRET)
            // Force the in-memory store so the suite never needs Postgres
            .env_remove("DATABASE_URL")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Mint a bearer token for an arbitrary principal.
#[allow(dead_code)]
pub fn bearer_token(user_id: Uuid, username: &str) -> String {
    let claims = Claims::new(user_id, username.to_string());
    generate_jwt(&claims, TEST_JWT_SECRET).expect("failed to sign test token")
}

/// A fresh principal per test keeps task sets disjoint on the shared server.
#[allow(dead_code)]
pub fn fresh_user(username: &str) -> (Uuid, String) {
    let user_id = Uuid::new_v4();
    (user_id, bearer_token(user_id, username))
}

#[allow(dead_code)]
pub fn timestamp(value: &serde_json::Value) -> chrono::DateTime<chrono::FixedOffset> {
    chrono::DateTime::parse_from_rfc3339(value.as_str().expect("timestamp should be a string"))
        .expect("timestamp should be RFC 3339")
}
