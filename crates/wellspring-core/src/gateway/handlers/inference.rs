//! `POST /inference`

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;
use wellspring_types::protocol::InferenceSuccess;
use wellspring_types::{GatewayError, InferenceRequest, OutputModality};

use super::ApiError;
use crate::gateway::context::GatewayContext;
use crate::gateway::upstream::wire::{decode_output, generate_body, GenerateContentResponse};

pub async fn handle_inference(
    State(ctx): State<Arc<GatewayContext>>,
    payload: Result<Json<InferenceRequest>, JsonRejection>,
) -> Result<Json<InferenceSuccess>, ApiError> {
    let Json(request) = payload?;
    let trace_id = Uuid::new_v4();
    let span =
        info_span!("inference", %trace_id, feature = %request.feature, tier = %request.tier());

    async move {
        let success = forward(&ctx, request).await.map_err(|err| {
            warn!(
                kind = %err.kind,
                detail = err.detail.as_deref().unwrap_or(""),
                "Inference failed"
            );
            err
        })?;
        info!("Inference completed");
        Ok::<_, ApiError>(Json(success))
    }
    .instrument(span)
    .await
}

async fn forward(
    ctx: &GatewayContext,
    request: InferenceRequest,
) -> Result<InferenceSuccess, GatewayError> {
    if request.contents.is_empty() {
        return Err(GatewayError::invalid_request("contents must not be empty"));
    }
    let tier = request.tier();
    if tier.capabilities().modality == OutputModality::Video {
        return Err(GatewayError::invalid_request("video synthesis runs through /media-job"));
    }

    let model = ctx.model_for(tier);
    let body = generate_body(&request, &ctx.config().default_voice);
    info!(%model, parts = request.contents.len(), "Forwarding to provider");

    let response: GenerateContentResponse =
        ctx.upstream().generate_content(model, &body, ctx.credential()).await?;
    let (output, citations) = decode_output(tier, response)?;

    Ok(InferenceSuccess {
        feature: request.feature,
        output,
        grounding_metadata: (!citations.is_empty()).then_some(citations),
    })
}
