//! `POST /media-job` (start / check / download) and `GET /media-job?action=download`.

use axum::body::Body;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use url::Url;
use uuid::Uuid;
use wellspring_types::protocol::{
    CheckJobPayload, DownloadPayload, DownloadQuery, JobCheck, JobStarted, MediaJobRequest,
    StartJobPayload,
};
use wellspring_types::{GatewayError, ModelTier};

use super::ApiError;
use crate::gateway::context::GatewayContext;
use crate::gateway::upstream::wire::{job_check, video_body, Operation};

const VIDEO_MIME: &str = "video/mp4";

pub async fn handle_media_job(
    State(ctx): State<Arc<GatewayContext>>,
    payload: Result<Json<MediaJobRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let trace_id = Uuid::new_v4();
    let action = match &request {
        MediaJobRequest::Start(_) => "start",
        MediaJobRequest::Check(_) => "check",
        MediaJobRequest::Download(_) => "download",
    };
    let span = info_span!("media_job", %trace_id, action);

    async move {
        let outcome = match request {
            MediaJobRequest::Start(payload) => {
                start(&ctx, payload).await.map(|started| Json(started).into_response())
            },
            MediaJobRequest::Check(payload) => {
                check(&ctx, payload).await.map(|report| Json(report).into_response())
            },
            MediaJobRequest::Download(DownloadPayload { reference }) => {
                download(&ctx, &reference).await
            },
        };
        outcome.map_err(|err| {
            warn!(
                kind = %err.kind,
                detail = err.detail.as_deref().unwrap_or(""),
                "Media job action failed"
            );
            ApiError::from(err)
        })
    }
    .instrument(span)
    .await
}

pub async fn handle_media_download(
    State(ctx): State<Arc<GatewayContext>>,
    query: Result<Query<DownloadQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    if query.action != "download" {
        return Err(ApiError::from(GatewayError::invalid_request(format!(
            "GET only supports action=download, got {}",
            query.action
        ))));
    }
    let span = info_span!("media_job", trace_id = %Uuid::new_v4(), action = "download");
    download(&ctx, &query.payload).instrument(span).await.map_err(ApiError::from)
}

async fn start(ctx: &GatewayContext, payload: StartJobPayload) -> Result<JobStarted, GatewayError> {
    if payload.prompt.trim().is_empty() {
        return Err(GatewayError::invalid_request("prompt must not be empty"));
    }
    let model = ctx.model_for(ModelTier::SynthesisVideo);
    let body = video_body(&payload, &ctx.config().video_aspect_ratio);
    let operation: Operation =
        ctx.upstream().predict_long_running(model, &body, ctx.credential()).await?;
    info!(%model, operation = %operation.name, "Video job started");
    Ok(JobStarted { operation: operation.name })
}

async fn check(ctx: &GatewayContext, payload: CheckJobPayload) -> Result<JobCheck, GatewayError> {
    if !ctx.is_valid_operation(&payload.operation) {
        return Err(GatewayError::invalid_request("malformed operation name"));
    }
    let operation: Operation =
        ctx.upstream().get_operation(&payload.operation, ctx.credential()).await?;
    let report = job_check(operation);
    info!(operation = %report.operation, status = ?report.status, "Video job checked");
    Ok(report)
}

/// Stream a generated artifact back to the caller, credential attached server-side.
async fn download(ctx: &GatewayContext, reference: &str) -> Result<Response, GatewayError> {
    let url = Url::parse(reference)
        .map_err(|_| GatewayError::invalid_request("reference is not a URL"))?;
    if !ctx.is_provider_reference(&url) {
        return Err(GatewayError::invalid_request("reference does not point at the provider"));
    }

    let upstream = ctx.upstream().download(url.as_str(), ctx.credential()).await?;
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| v.starts_with("video/"))
        .unwrap_or(VIDEO_MIME)
        .to_string();
    let content_length = upstream.content_length();
    info!(content_type = %content_type, bytes = ?content_length, "Streaming artifact");

    let mut response = Body::from_stream(upstream.bytes_stream()).into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&content_type) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Some(length) = content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }
    Ok(response)
}
