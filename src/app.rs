use std::{io::IsTerminal, sync::Arc};

use axum::{Router, routing::get};
use color_eyre::config::{HookBuilder, Theme};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{Result, config::Config, context::AppContext, controllers, middlewares};

pub struct App;

impl App {
    pub async fn run() -> Result<()> {
        HookBuilder::new()
            .theme(if std::io::stderr().is_terminal() {
                Theme::dark()
            } else {
                Theme::new()
            })
            .install()?;

        let config = Config::load()?;

        config.logger().setup()?;

        let ctx = Arc::new(AppContext::from_config(&config)?);

        sqlx::migrate!("./migrations")
            .run(ctx.bookings.pool())
            .await?;

        let listener = TcpListener::bind(config.server().address()).await?;

        tracing::info!("Listening on {}", config.server().url());

        axum::serve(listener, Self::router(&ctx))
            .await
            .map_err(Into::into)
    }

    pub fn router(ctx: &Arc<AppContext>) -> Router {
        Router::new()
            .route("/health", get(|| async { "ok" }))
            .nest("/qr", controllers::qr::router(ctx))
            .layer(CorsLayer::permissive())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(middlewares::make_span_with)
                    .on_request(middlewares::on_request)
                    .on_response(middlewares::on_response)
                    .on_failure(middlewares::on_failure),
            )
    }
}
