//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbStore, FileStore, HttpApiTransport, SmtpTransport},
    config::Config,
    error::ApiError,
    web::{
        auth::{login_handler, verify_handler},
        middleware::require_admin,
        newsletter::send_newsletter_handler,
        rest::{
            create_reflection_handler, delete_reflection_handler, list_reflections_handler,
            update_reflection_handler, ApiDoc,
        },
        state::AppState,
        subscribers::{
            delete_subscriber_handler, list_subscribers_handler, subscribe_handler,
            update_selection_handler,
        },
    },
};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use reflections_core::{
    AdminSessionManager, MailTransport, NewsletterDispatcher, ReflectionService, Store,
    SubscriberService,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Select & Connect the Store ---
    // A configured DATABASE_URL picks the document-collection backend;
    // otherwise everything lives in one JSON file on disk.
    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await?;
            let db_store = DbStore::new(db_pool);
            info!("Running database migrations...");
            db_store.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db_store)
        }
        None => {
            info!("Using file-backed store at {}", config.data_file.display());
            Arc::new(FileStore::open(&config.data_file).await?)
        }
    };

    // --- 3. Select the Mail Transport ---
    // A configured provider credential picks the HTTP API; otherwise mail
    // goes out through the SMTP relay.
    let transport: Arc<dyn MailTransport> = match &config.mail_api_token {
        Some(token) => {
            info!("Sending mail through the HTTP provider API");
            Arc::new(HttpApiTransport::from_config(&config, token.clone())?)
        }
        None => {
            info!("Sending mail through SMTP relay {}", config.smtp_host);
            Arc::new(SmtpTransport::from_config(&config)?)
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        reflections: ReflectionService::new(store.clone()),
        subscribers: SubscriberService::new(store.clone()),
        sessions: Arc::new(AdminSessionManager::new(config.admin_password.clone())),
        dispatcher: Arc::new(NewsletterDispatcher::new(transport)),
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route(
            "/api/reflections",
            get(list_reflections_handler).post(create_reflection_handler),
        )
        .route(
            "/api/reflections/{id}",
            put(update_reflection_handler).delete(delete_reflection_handler),
        )
        .route("/api/subscribe", post(subscribe_handler))
        .route("/api/admin/login", post(login_handler));

    // Protected routes (admin token required)
    let protected_routes = Router::new()
        .route("/api/admin/verify", get(verify_handler))
        .route("/api/admin/subscribers", get(list_subscribers_handler))
        .route(
            "/api/admin/subscribers/{email}",
            delete(delete_subscriber_handler),
        )
        .route(
            "/api/admin/subscribers/selection",
            put(update_selection_handler),
        )
        .route("/api/admin/newsletter", post(send_newsletter_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_admin,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(app_state);

    // The public frontend plus the admin panel page, served from disk.
    let static_assets = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")));

    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route_service("/admin", ServeFile::new(config.static_dir.join("admin.html")))
        .fallback_service(static_assets);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
