use anyhow::Context;

use souk_store::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    souk_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let db_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "souk.db".to_string());
    let db = Database::connect(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("failed to open database at {db_path}"))?;

    let app = souk_api::app::build_app(db, &jwt_secret);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .with_context(|| format!("failed to bind 0.0.0.0:{port}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
