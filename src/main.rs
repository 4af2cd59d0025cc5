use std::sync::Arc;

use task_api_rust::config;
use task_api_rust::database::{postgres, DynTaskRepository, MemoryTaskRepository, PgTaskRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, TASK_API_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = config::config();
    tracing_subscriber::fmt::init();
    tracing::info!("Starting Task API in {:?} mode", config.environment);

    let repo: DynTaskRepository = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = postgres::connect(&url, &config.database).await?;
            postgres::health_check(&pool).await?;
            PgTaskRepository::ensure_schema(&pool).await?;
            Arc::new(PgTaskRepository::new(pool))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; serving from the in-memory task store");
            Arc::new(MemoryTaskRepository::new())
        }
    };

    let app = task_api_rust::app(repo);

    // Allow tests or deployments to override port via env
    let port = std::env::var("TASK_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Task API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
