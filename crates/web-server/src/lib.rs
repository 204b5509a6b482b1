use analytics::Ledger;
use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use configuration::Config;
use database::LedgerStore;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

use handlers::{accounts, aggregates, operations, platforms};

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LedgerStore>,
    pub ledger: Ledger<dyn LedgerStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            ledger: Ledger::new(Arc::clone(&store)),
            store,
        }
    }
}

/// Builds the full application: every route under `/api`, plus CORS, request
/// tracing and a body size limit.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(handlers::health))
        // --- Accounts ---
        .route(
            "/accounts",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route(
            "/accounts/:id",
            get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        // --- Platforms ---
        .route(
            "/platforms",
            get(platforms::list_platforms).post(platforms::create_platform),
        )
        .route(
            "/platforms/:id",
            get(platforms::get_platform)
                .put(platforms::update_platform)
                .delete(platforms::delete_platform),
        )
        // --- Operations ---
        .route(
            "/operations",
            get(operations::list_operations).post(operations::create_operation),
        )
        .route(
            "/operations/:id",
            get(operations::get_operation)
                .put(operations::update_operation)
                .delete(operations::delete_operation),
        )
        .route("/operations/date/:date", get(operations::operations_by_date))
        .route("/operations/period", get(operations::operations_by_period))
        .route("/operations/platform/:link", get(operations::operations_by_platform))
        .route("/operations/account/:name", get(operations::operations_by_account))
        .route("/operations/status/:status", get(operations::operations_by_status))
        .route(
            "/operations/withdrawal-complete/:flag",
            get(operations::operations_by_withdrawal_complete),
        )
        // --- Aggregates ---
        .route("/operations/daily-profit/:date", get(aggregates::daily_profit))
        .route("/operations/daily-deposit/:date", get(aggregates::daily_deposit))
        .route("/operations/daily-net-profit/:date", get(aggregates::daily_net_profit))
        .route("/operations/daily-summary/:date", get(aggregates::daily_summary))
        .route("/operations/period-summary", get(aggregates::period_summary))
        .route("/operations/total-profit", get(aggregates::total_profit))
        .route("/operations/total-deposit", get(aggregates::total_deposit))
        .route("/operations/net-profit", get(aggregates::net_profit))
        .route("/operations/profit-by-day", get(aggregates::profit_by_day))
        .route("/operations/profit-by-platform", get(aggregates::profit_by_platform))
        .route("/operations/profit-by-account", get(aggregates::profit_by_account))
        .route(
            "/operations/profit-by-platform/:link",
            get(aggregates::profit_for_platform),
        )
        .route(
            "/operations/profit-by-account/:name",
            get(aggregates::profit_for_account),
        )
        .route(
            "/operations/net-profit-by-platform/:link",
            get(aggregates::net_profit_for_platform),
        )
        .route(
            "/operations/net-profit-by-account/:name",
            get(aggregates::net_profit_for_account),
        );

    Router::new()
        .nest("/api", api)
        .with_state(Arc::new(state))
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// Opens the configured store and serves the API until Ctrl-C.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let store = database::open_store(config.storage.backend, &config.database).await?;
    let app = app_router(AppState::new(store));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, backend = ?config.storage.backend, "Web server listening.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
}
