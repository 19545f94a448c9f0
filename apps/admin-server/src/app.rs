//! Service wiring and router assembly.

use std::sync::Arc;
use std::time::Duration;

use accounts_sdk::AccountsApi;
use anyhow::{Context, Result};
use axum::Router;
use master_data_sdk::MasterDataApi;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use system_settings_sdk::SystemSettingsApi;

use crate::config::{AppConfig, DatabaseConfig};
use crate::{auth, dashboard, middleware};

/// Connect and bring both module schemas up to date.
///
/// `master_data` references `users`, so accounts migrate first.
///
/// # Errors
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect_database(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(config.dsn.clone());
    opts.max_connections(config.max_conns)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to database '{}'", config.dsn))?;

    accounts::Migrator::up(&db, None)
        .await
        .context("accounts migrations failed")?;
    master_data::Migrator::up(&db, None)
        .await
        .context("master data migrations failed")?;
    tracing::info!("Database migrations applied");
    Ok(db)
}

/// Every module service built over one database connection.
#[derive(Clone)]
pub struct Services {
    pub accounts_service: Arc<accounts::domain::service::Service>,
    pub accounts: Arc<dyn AccountsApi>,
    pub master_data_service: Arc<master_data::domain::service::Service>,
    pub master_data: Arc<dyn MasterDataApi>,
    pub settings: Arc<dyn SystemSettingsApi>,
}

impl Services {
    #[must_use]
    pub fn build(db: &DatabaseConnection, config: &AppConfig) -> Self {
        let (accounts_service, accounts) = accounts::build(db.clone());
        let (master_data_service, master_data) =
            master_data::build(db.clone(), accounts.clone());
        let settings = system_settings::build(&config.settings);
        Self {
            accounts_service,
            accounts,
            master_data_service,
            master_data,
            settings,
        }
    }
}

/// Assemble module routes, the dashboard, and the middleware stack.
///
/// # Errors
/// Returns an error if the auth mode cannot be set up.
pub async fn router(services: &Services, config: &AppConfig) -> Result<Router> {
    let mut router = Router::new();
    router = accounts::api::rest::register_routes(router, services.accounts_service.clone());
    router = system_settings::api::rest::register_routes(router, services.settings.clone());
    router = master_data::api::rest::register_routes(
        router,
        services.master_data_service.clone(),
        config.master_data,
    );
    router = dashboard::register_routes(router, services);

    let mode = auth::auth_mode(&config.auth, services.accounts.clone()).await?;
    let router = dashboard::register_health(admin_security::with_auth(router, mode));
    Ok(middleware::apply(router, &config.server))
}

/// Serve until a shutdown signal arrives.
///
/// # Errors
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(router: Router, config: &AppConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %config.server.bind_addr, "HTTP server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(crate::shutdown::shutdown_signal())
        .await
        .context("HTTP server failed")?;
    tracing::info!("HTTP server stopped");
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn setup(auth_disabled: bool) -> (Services, AppConfig) {
        let mut config = AppConfig::default();
        config.apply_cli_overrides(None, true);
        config.auth.disabled = auth_disabled;
        config
            .auth
            .tokens
            .insert("admin-token".to_owned(), "admin".to_owned());
        config
            .auth
            .tokens
            .insert("jane-token".to_owned(), "jane".to_owned());

        let db = connect_database(&config.database).await.unwrap();
        let services = Services::build(&db, &config);
        services
            .accounts
            .ensure_admin("admin", "admin@example.com")
            .await
            .unwrap();
        let admin = crate::auth::operator_context(services.accounts.as_ref(), "admin")
            .await
            .unwrap();
        services
            .accounts
            .create(
                &admin,
                accounts_sdk::NewAccount {
                    username: "jane".to_owned(),
                    email: "jane@example.com".to_owned(),
                    full_name: None,
                    is_admin: false,
                },
            )
            .await
            .unwrap();
        (services, config)
    }

    async fn get(router: Router, uri: &str, token: Option<&str>) -> axum::response::Response {
        let mut req = Request::builder().uri(uri);
        if let Some(token) = token {
            req = req.header("authorization", format!("Bearer {token}"));
        }
        router.oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
    }

    async fn json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_token_and_echoes_request_id() {
        let (services, config) = setup(false).await;
        let resp = get(router(&services, &config).await.unwrap(), "/healthz", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key(middleware::REQUEST_ID_HEADER));
        assert_eq!(json(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn dashboard_counts_users_and_master_data() {
        let (services, config) = setup(false).await;
        let resp = get(
            router(&services, &config).await.unwrap(),
            "/admin/v1/dashboard",
            Some("admin-token"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json(resp).await;
        assert_eq!(body["total_users"], 2);
        assert_eq!(body["active_users"], 2);
        assert_eq!(body["master_data_records"], 0);
    }

    #[tokio::test]
    async fn dashboard_refuses_anonymous_and_non_admin() {
        let (services, config) = setup(false).await;
        let app = router(&services, &config).await.unwrap();

        let resp = get(app.clone(), "/admin/v1/dashboard", None).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = get(app, "/admin/v1/dashboard", Some("jane-token")).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(json(resp).await["code"], "DASHBOARD_PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn disabled_auth_runs_as_default_subject() {
        let (services, config) = setup(true).await;
        let app = router(&services, &config).await.unwrap();
        let resp = get(app, "/admin/v1/users", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json(resp).await["total"], 2);
    }

    #[tokio::test]
    async fn disabled_auth_with_unknown_subject_fails_to_build() {
        let (services, mut config) = setup(true).await;
        config.auth.default_subject = "ghost".to_owned();
        let err = router(&services, &config).await.unwrap_err();
        assert!(format!("{err:#}").contains("ghost"));
    }
}
