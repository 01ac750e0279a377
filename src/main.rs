use std::sync::Arc;

use tracing::{Level, info};

use blog_catalog::config::AppConfig;
use blog_catalog::identity::{IdentityVerifier, JwtVerifier};
use blog_catalog::seed::SeedData;
use blog_catalog::state::AppState;
use blog_catalog::store::{PgRecordStore, RecordStore};
use blog_catalog::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;
    let store: Arc<dyn RecordStore> = Arc::new(PgRecordStore::new(db));

    if let Some(path) = &config.seed_file {
        let data = SeedData::from_file(path)?;
        seed::apply(store.as_ref(), &data).await?;
    }

    let verifier: Arc<dyn IdentityVerifier> = Arc::new(JwtVerifier::new(&config.auth.jwt_secret));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        store,
        verifier,
        config,
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
