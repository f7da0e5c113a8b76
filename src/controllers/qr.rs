use std::sync::Arc;

use axum::{
    Json, Router, debug_handler,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::json;

use crate::{Error, Result, checkin, context::AppContext};

#[derive(Debug, Deserialize)]
pub struct MintParams {
    booking_id: String,
    ttl_seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct TokenParams {
    token: String,
}

/// Issue (or refresh) the code a guardian shows at the venue.
#[debug_handler]
async fn mint(
    State(ctx): State<Arc<AppContext>>,
    WithRejection(Json(params), _): WithRejection<Json<MintParams>, Error>,
) -> Result<Response> {
    let issued = checkin::refresh(
        &ctx.qr,
        &ctx.bookings,
        params.booking_id.trim(),
        params.ttl_seconds,
    )
    .await
    .map_err(Error::from)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "token": issued.token,
            "booking_id": issued.payload.booking_id,
            "expires_at": issued.payload.expires_at,
            "expires_in": issued.payload.expires_in(ctx.qr.now()),
        })),
    )
        .into_response())
}

#[debug_handler]
async fn verify(
    State(ctx): State<Arc<AppContext>>,
    WithRejection(Json(params), _): WithRejection<Json<TokenParams>, Error>,
) -> Result<Response> {
    let payload = ctx.qr.verify(params.token.trim()).map_err(|err| {
        tracing::debug!(reason = err.code(), "rejected QR token");
        Error::from(err)
    })?;
    let now = ctx.qr.now();

    Ok((
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "booking_id": payload.booking_id,
            "expires_at": payload.expires_at,
            "expires_in": payload.expires_in(now),
            "expiring_soon": payload.is_expiring_soon(now),
        })),
    )
        .into_response())
}

#[debug_handler]
async fn inspect(
    State(ctx): State<Arc<AppContext>>,
    WithRejection(Json(params), _): WithRejection<Json<TokenParams>, Error>,
) -> Result<Response> {
    let booking = checkin::inspect(&ctx.qr, &ctx.bookings, params.token.trim())
        .await
        .map_err(Error::from)?;

    Ok((StatusCode::OK, Json(json!({ "ok": true, "booking": booking }))).into_response())
}

#[debug_handler]
async fn check_in(
    State(ctx): State<Arc<AppContext>>,
    WithRejection(Json(params), _): WithRejection<Json<TokenParams>, Error>,
) -> Result<Response> {
    let booking = checkin::check_in(&ctx.qr, &ctx.bookings, params.token.trim())
        .await
        .map_err(Error::from)?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "booking": booking,
            "message": "Successfully checked in"
        })),
    )
        .into_response())
}

pub fn router(ctx: &Arc<AppContext>) -> Router {
    Router::new()
        .route("/mint", post(mint))
        .route("/verify", post(verify))
        .route("/inspect", post(inspect))
        .route("/check-in", post(check_in))
        .with_state(ctx.clone())
}
