use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bugtracker_api::config::ServerConfig;
use bugtracker_api::router::build_app_router;
use bugtracker_api::seed::seed_demo_data;
use bugtracker_api::state::AppState;
use bugtracker_db::{DbPool, PgStore, Store};
use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        page_size = config.page_size,
        issue_edit_admin_only = config.issue_edit_admin_only,
        "Loaded server configuration",
    );

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = connect_database(&database_url).await;
    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool.clone()));

    if config.seed_demo_data {
        seed_demo_data(Arc::clone(&store))
            .await
            .expect("Failed to seed demo data");
    }

    let app = build_app_router(AppState::new(store, config.clone()), &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Listening");

    // Serve on a task so the drain deadline can start when the signal fires.
    let signalled = Arc::new(Notify::new());
    let notify = Arc::clone(&signalled);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                notify.notify_one();
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result.expect("Server task panicked").expect("Server error");
        }
        () = signalled.notified() => {
            let drain = Duration::from_secs(config.shutdown_timeout_secs);
            match tokio::time::timeout(drain, &mut server).await {
                Ok(result) => {
                    result.expect("Server task panicked").expect("Server error");
                    tracing::info!("In-flight requests drained");
                }
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = config.shutdown_timeout_secs,
                        "Shutdown drain timed out, aborting remaining connections",
                    );
                    server.abort();
                }
            }
        }
    }

    pool.close().await;
    tracing::info!("Shutdown complete");
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "bugtracker_api=debug,bugtracker_db=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify and migrate. Any failure aborts startup.
async fn connect_database(database_url: &str) -> DbPool {
    let pool = bugtracker_db::create_pool(database_url)
        .await
        .expect("Failed to connect to database");
    bugtracker_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    bugtracker_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready (pool created, migrations applied)");
    pool
}

/// Resolves on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
