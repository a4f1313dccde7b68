//! Review Extractor: runs one proposal through the model and returns a structured verdict.
//!
//! Flow: validate → build_prompt → TextGenerator::generate (exactly once) → parse_reply.
//!
//! Stateless: every call is an independent transaction. Nothing is cached, so identical
//! requests issued twice reach the model twice and may get different verdicts.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::llm_client::TextGenerator;
use crate::review::error::ReviewError;
use crate::review::models::{ReviewRequest, ReviewResult};
use crate::review::parser::parse_reply;
use crate::review::prompts::build_prompt;

#[derive(Clone)]
pub struct ReviewExtractor {
    generator: Arc<dyn TextGenerator>,
}

impl ReviewExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Reviews one proposal.
    ///
    /// Errors only on invalid input (before any call is made) or on a failed/timed-out
    /// generation call. A reply with missing or malformed fields still yields `Ok`, with
    /// those fields set to `None` and the reply kept verbatim in `raw_reply`.
    pub async fn review(&self, request: &ReviewRequest) -> Result<ReviewResult, ReviewError> {
        request.validate()?;

        let prompt = build_prompt(request);
        debug!("Review prompt built ({} chars)", prompt.as_str().len());

        let raw_reply = self
            .generator
            .generate(prompt.as_str())
            .await
            .map_err(|e| {
                warn!("Review generation failed: {e}");
                ReviewError::from(e)
            })?;

        let parsed = parse_reply(&raw_reply);
        let result = ReviewResult {
            score: parsed.score,
            explanation: parsed.explanation,
            recommendation: parsed.recommendation,
            raw_reply,
        };

        if result.is_complete() {
            info!(
                "Review parsed: score={:?}, recommendation={:?}",
                result.score, result.recommendation
            );
        } else {
            warn!(
                "Partial review extraction, missing {:?} ({} chars of reply kept for inspection)",
                result.missing_fields(),
                result.raw_reply.len()
            );
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::{FakeGenerator, FakeReply};
    use crate::review::models::Recommendation;

    fn extractor_with(fake: &Arc<FakeGenerator>) -> ReviewExtractor {
        ReviewExtractor::new(fake.clone())
    }

    fn soil_request() -> ReviewRequest {
        ReviewRequest::new("Study of soil erosion", "Quantify erosion under rainfall")
    }

    #[tokio::test]
    async fn test_full_reply_is_extracted() {
        let reply = "Score: 82\nExplanation: Clear and well-scoped.\nRecommendation: Recommended";
        let fake = Arc::new(FakeGenerator::replying(reply));

        let result = extractor_with(&fake).review(&soil_request()).await.unwrap();

        assert_eq!(result.score, Some(82));
        assert_eq!(result.explanation.as_deref(), Some("Clear and well-scoped."));
        assert_eq!(result.recommendation, Some(Recommendation::Recommended));
        assert_eq!(result.raw_reply, reply);
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn test_prompt_carries_the_proposal() {
        let fake = Arc::new(FakeGenerator::replying("Score: 50"));

        extractor_with(&fake).review(&soil_request()).await.unwrap();

        let prompt = fake.last_prompt().unwrap();
        assert!(prompt.contains("Abstract:\nStudy of soil erosion"));
        assert!(prompt.contains("Objectives:\nQuantify erosion under rainfall"));
    }

    #[tokio::test]
    async fn test_partial_reply_is_not_an_error() {
        let fake = Arc::new(FakeGenerator::replying("Explanation: Needs more detail"));

        let result = extractor_with(&fake).review(&soil_request()).await.unwrap();

        assert_eq!(result.score, None);
        assert_eq!(result.explanation.as_deref(), Some("Needs more detail"));
        assert_eq!(result.recommendation, None);
        assert_eq!(result.missing_fields(), vec!["score", "recommendation"]);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_kept_verbatim() {
        let reply = "  I'm sorry, I can't evaluate this.\n\n";
        let fake = Arc::new(FakeGenerator::replying(reply));

        let result = extractor_with(&fake).review(&soil_request()).await.unwrap();

        assert_eq!(result.raw_reply, reply);
        assert_eq!(result.missing_fields().len(), 3);
    }

    #[tokio::test]
    async fn test_identical_requests_are_not_deduplicated() {
        let fake = Arc::new(FakeGenerator::replying("Score: 70"));
        let extractor = extractor_with(&fake);
        let request = soil_request();

        let (first, second) = tokio::join!(extractor.review(&request), extractor.review(&request));

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(fake.calls(), 2);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_external_service_error() {
        let fake = Arc::new(FakeGenerator::new(FakeReply::Status(500)));

        let err = extractor_with(&fake).review(&soil_request()).await.unwrap_err();

        assert!(matches!(err, ReviewError::ExternalService(_)), "got {err:?}");
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn test_timeout_is_distinct_from_external_failure() {
        let fake = Arc::new(FakeGenerator::new(FakeReply::Timeout));

        let err = extractor_with(&fake).review(&soil_request()).await.unwrap_err();

        assert!(matches!(err, ReviewError::Timeout { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_the_model() {
        let fake = Arc::new(FakeGenerator::replying("Score: 90"));
        let request = ReviewRequest::new("Study of soil erosion", "   ");

        let err = extractor_with(&fake).review(&request).await.unwrap_err();

        assert!(matches!(err, ReviewError::Validation(_)), "got {err:?}");
        assert_eq!(fake.calls(), 0);
    }
}
