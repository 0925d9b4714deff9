//! Capacity fallback: one retry at a lower tier, never more.

use tracing::{info, warn};
use wellspring_types::{ErrorKind, GatewayError, InferenceRequest, InferenceResult, ModelTier};

use super::transport::InferenceTransport;

/// Upper bound on downgrade retries per request.
pub const MAX_DOWNGRADE_RETRIES: usize = 1;

/// Runs requests against an [`InferenceTransport`], downgrading once on capacity errors.
#[derive(Debug, Clone)]
pub struct FallbackController<T> {
    transport: T,
}

impl<T: InferenceTransport> FallbackController<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute `request`.
    ///
    /// A `RATE_LIMITED` failure on a request that used elevated reasoning is retried
    /// once at the next lower tier with reasoning disabled. The retry's outcome is
    /// returned as-is. Every other failure is returned immediately.
    pub async fn execute(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResult, GatewayError> {
        let mut request = request;
        let mut outcome = self.attempt(&request, 0).await;

        for attempt in 1..=MAX_DOWNGRADE_RETRIES {
            let Err(err) = &outcome else { break };
            let Some(lower) = downgraded(&request, err) else { break };

            warn!(
                feature = %request.feature,
                from = %request.tier(),
                to = %lower.tier(),
                "Capacity error on elevated request, retrying once at lower tier"
            );
            request = lower;
            outcome = self.attempt(&request, attempt).await;
        }

        outcome
    }

    /// Like [`execute`](Self::execute) but folds failures into the result union.
    pub async fn run(&self, request: InferenceRequest) -> InferenceResult {
        self.execute(request).await.unwrap_or_else(InferenceResult::from)
    }

    async fn attempt(
        &self,
        request: &InferenceRequest,
        attempt: usize,
    ) -> Result<InferenceResult, GatewayError> {
        let outcome = self.transport.infer(request).await;
        match &outcome {
            Ok(_) => {
                info!(feature = %request.feature, tier = %request.tier(), attempt, "Inference succeeded")
            },
            Err(err) => info!(
                feature = %request.feature,
                tier = %request.tier(),
                attempt,
                kind = %err.kind,
                "Inference failed"
            ),
        }
        outcome
    }
}

/// The retry request for `err`, if the failure qualifies for a downgrade.
fn downgraded(request: &InferenceRequest, err: &GatewayError) -> Option<InferenceRequest> {
    if err.kind != ErrorKind::RateLimited {
        return None;
    }
    let elevated =
        request.config.uses_elevated_reasoning() || request.tier() == ModelTier::Deep;
    if !elevated {
        return None;
    }
    let lower = request.tier().downgrade()?;

    let mut retry = request.clone();
    retry.config.tier = lower;
    // Reasoning off: explicit zero where the tier takes a budget, absent otherwise.
    retry.config.thinking_budget = lower.capabilities().reasoning_budget.then_some(0);
    Some(retry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use wellspring_types::{ContentPart, Feature, GenerationConfig};

    /// Replays scripted outcomes and records every request it sees.
    struct ScriptedTransport {
        script: Mutex<Vec<Result<InferenceResult, GatewayError>>>,
        seen: Mutex<Vec<InferenceRequest>>,
    }

    impl ScriptedTransport {
        fn new(mut script: Vec<Result<InferenceResult, GatewayError>>) -> Self {
            script.reverse();
            Self { script: Mutex::new(script), seen: Mutex::new(Vec::new()) }
        }

        fn seen(&self) -> Vec<InferenceRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InferenceTransport for ScriptedTransport {
        async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResult, GatewayError> {
            self.seen.lock().unwrap().push(request.clone());
            self.script.lock().unwrap().pop().expect("transport called more often than scripted")
        }
    }

    fn deep_request() -> InferenceRequest {
        InferenceRequest {
            feature: Feature::DocumentAnalysis,
            contents: vec![ContentPart::text("summarize")],
            config: GenerationConfig {
                tier: ModelTier::Deep,
                thinking_budget: Some(32_768),
                ..Default::default()
            },
        }
    }

    fn fast_request() -> InferenceRequest {
        InferenceRequest {
            feature: Feature::Chat,
            contents: vec![ContentPart::text("hi")],
            config: GenerationConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_deep_rate_limited_retries_once_without_reasoning() {
        let transport = ScriptedTransport::new(vec![
            Err(GatewayError::rate_limited("429")),
            Ok(InferenceResult::text("fallback answer")),
        ]);
        let controller = FallbackController::new(transport);

        let outcome = controller.execute(deep_request()).await;
        assert_eq!(outcome, Ok(InferenceResult::text("fallback answer")));

        let seen = controller.transport().seen();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].tier(), ModelTier::Deep);
        assert_eq!(seen[1].tier(), ModelTier::Standard);
        assert_eq!(seen[1].config.thinking_budget, Some(0));
        assert!(!seen[1].config.uses_elevated_reasoning());
    }

    #[tokio::test]
    async fn test_retry_failure_returned_as_is_without_second_retry() {
        let second = GatewayError::rate_limited("still 429").with_message("second failure");
        let transport = ScriptedTransport::new(vec![
            Err(GatewayError::rate_limited("429")),
            Err(second.clone()),
        ]);
        let controller = FallbackController::new(transport);

        let outcome = controller.execute(deep_request()).await;
        assert_eq!(outcome, Err(second));
        assert_eq!(controller.transport().seen().len(), 2);
    }

    #[tokio::test]
    async fn test_non_capacity_error_not_retried() {
        let transport = ScriptedTransport::new(vec![Err(GatewayError::network("reset"))]);
        let controller = FallbackController::new(transport);

        let outcome = controller.execute(deep_request()).await;
        assert_eq!(outcome.unwrap_err().kind, ErrorKind::Network);
        assert_eq!(controller.transport().seen().len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_without_elevated_reasoning_not_retried() {
        let transport = ScriptedTransport::new(vec![Err(GatewayError::rate_limited("429"))]);
        let controller = FallbackController::new(transport);

        let result = controller.run(fast_request()).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::RateLimited));
        assert_eq!(controller.transport().seen().len(), 1);
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let transport = ScriptedTransport::new(vec![Ok(InferenceResult::text("ok"))]);
        let controller = FallbackController::new(transport);
        assert_eq!(controller.run(deep_request()).await, InferenceResult::text("ok"));
    }

    #[test]
    fn test_downgrade_from_standard_lands_on_fast_without_budget() {
        let mut request = deep_request();
        request.config.tier = ModelTier::Standard;
        let retry = downgraded(&request, &GatewayError::rate_limited("429")).unwrap();
        assert_eq!(retry.tier(), ModelTier::Fast);
        assert_eq!(retry.config.thinking_budget, None);
    }

    #[test]
    fn test_synthesis_never_downgrades() {
        let mut request = deep_request();
        request.config.tier = ModelTier::SynthesisAudio;
        assert!(downgraded(&request, &GatewayError::rate_limited("429")).is_none());
    }
}
