//! HTTP route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::app::AppContext;
use crate::domain::{DailyRow, ForecastKind, ForecastResult};
use crate::error::ForecastError;
use crate::forecast::parse_selection;
use crate::report::format_row;
use crate::server::render::{Outcome, page};

/// Map a forecast failure to an HTTP status.
pub fn status_for(err: &ForecastError) -> StatusCode {
    match err {
        ForecastError::ComponentsNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Run the (blocking) forecast off the async executor.
async fn run_forecast(
    ctx: Arc<AppContext>,
    future_date: String,
    selected: Vec<String>,
) -> Result<ForecastResult, (StatusCode, String)> {
    let joined = tokio::task::spawn_blocking(move || ctx.forecast(&future_date, &selected)).await;
    match joined {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(err)) => {
            tracing::info!(error = %err, "forecast refused");
            Err((status_for(&err), err.to_string()))
        }
        Err(join_err) => {
            tracing::error!(error = %join_err, "forecast task failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Forecast failed.".to_string()))
        }
    }
}

pub async fn index(State(ctx): State<Arc<AppContext>>) -> Html<String> {
    Html(page(ctx.columns(), ctx.end_date(), None))
}

#[derive(Debug, Deserialize)]
pub struct ForecastForm {
    #[serde(default)]
    pub future_date: String,
    /// JSON array of column names.
    pub crops: Option<String>,
}

pub async fn submit(State(ctx): State<Arc<AppContext>>, Form(form): Form<ForecastForm>) -> Response {
    let columns = ctx.columns().clone();
    let default_date = ctx.end_date();

    let outcome = match parse_selection(form.crops.as_deref()) {
        Ok(selected) => run_forecast(ctx, form.future_date, selected).await,
        Err(err) => Err((status_for(&err), err.to_string())),
    };

    match outcome {
        Ok(result) => Html(page(&columns, default_date, Some(Outcome::Result(&result)))).into_response(),
        Err((status, message)) => {
            (status, Html(page(&columns, default_date, Some(Outcome::Error(&message))))).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    pub future_date: String,
    #[serde(default)]
    pub crops: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RowView {
    pub date: String,
    pub values: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub kind: ForecastKind,
    pub decimals: usize,
    pub steps: usize,
    pub columns: Vec<String>,
    pub rows: Vec<RowView>,
    pub trajectory: Vec<RowView>,
}

impl From<&ForecastResult> for ForecastResponse {
    fn from(result: &ForecastResult) -> Self {
        let view = |row: &DailyRow| RowView {
            date: row.date.format("%Y-%m-%d").to_string(),
            values: format_row(row, result.decimals),
        };
        Self {
            kind: result.kind,
            decimals: result.decimals,
            steps: result.steps,
            columns: result.columns.names().to_vec(),
            rows: result.rows.iter().map(view).collect(),
            trajectory: result.trajectory.iter().map(view).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub async fn forecast_api(
    State(ctx): State<Arc<AppContext>>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = rejection.body_text();
            tracing::info!(%error, "malformed forecast request");
            return (rejection.status(), Json(ErrorResponse { error })).into_response();
        }
    };

    match run_forecast(ctx, req.future_date, req.crops).await {
        Ok(result) => Json(ForecastResponse::from(&result)).into_response(),
        Err((status, error)) => (status, Json(ErrorResponse { error })).into_response(),
    }
}

/// Liveness probe.
pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: 503 until every component is loaded.
pub async fn readiness(State(ctx): State<Arc<AppContext>>) -> Response {
    let ready = ctx.readiness();
    let (status, label) = if ready.all() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    let body = serde_json::json!({
        "status": label,
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "history": ready.history,
            "model": ready.model,
            "scaler": ready.scaler,
        },
        "last_date": ctx.end_date().map(|d| d.format("%Y-%m-%d").to_string()),
    });
    (status, Json(body)).into_response()
}
