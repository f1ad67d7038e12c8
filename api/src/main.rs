use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
};
use config::{Env, ServerConfig};
use diesel_async::{
    AsyncPgConnection,
    pooled_connection::{AsyncDieselConnectionManager, deadpool::Pool},
};
use dotenv::dotenv;
use error::AppError;
use mimalloc::MiMalloc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use blog::store::{EntityStore, pg::PgStore};

mod blog;
mod config;
mod error;
mod identity;
mod json;
mod schema;
mod validation;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Clone)]
pub struct App {
    diesel: Pool<AsyncPgConnection>,
    store: Arc<dyn EntityStore>,
    config: Arc<ServerConfig>,
}

#[tokio::main]
async fn main() -> Result<(), eyre::Error> {
    dotenv().ok();

    init_tracing(Env::from_env());

    let config = ServerConfig::new_from_env();
    tracing::info!(env = ?config.env, "Configuration loaded");

    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
    let diesel = Pool::builder(manager)
        .max_size(config.database_max_connections)
        .wait_timeout(Some(Duration::from_secs(10)))
        .create_timeout(Some(Duration::from_secs(10)))
        .runtime(deadpool_runtime::Runtime::Tokio1)
        .build()?;

    let cors = CorsLayer::new()
        .allow_origin(config.site_url.parse::<HeaderValue>()?)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let listen_addr = config.listen_addr;

    let shared_state = App {
        store: Arc::new(PgStore::new(diesel.clone())),
        diesel,
        config: Arc::new(config),
    };

    let app = Router::new()
        .merge(blog::routes::route())
        .nest("/auth", identity::routes::route())
        .fallback(handler_404)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!("listening on {}", listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(env: Env) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "blogicum=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Env::Dev => registry.with(tracing_subscriber::fmt::layer()).init(),
        Env::Staging | Env::Production => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn handler_404() -> AppError {
    ("No route found", StatusCode::NOT_FOUND).into()
}
