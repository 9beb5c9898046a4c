//! The generation service boundary.

use crate::error::CollaboratorResult;
use crate::types::{
    AdImageRequest, CompanyOverviewRequest, CreativeCopy, CreativeCopyRequest, GeneratedContent,
    GenerationRequest, InsightReport, TargetingRequest, TargetingTextRequest,
};
use adpilot_core::types::{CampaignMetrics, CompanyOverview, TargetingCriteria};
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, warn};

/// Text/image generation used by the wizard and the insights dashboard.
///
/// Implementations return already-normalized values; every failure is a
/// typed [`CollaboratorError`](crate::CollaboratorError).
#[async_trait]
pub trait GenerationCollaborator: Send + Sync {
    async fn company_overview(
        &self,
        request: &CompanyOverviewRequest,
    ) -> CollaboratorResult<CompanyOverview>;

    async fn targeting_from_business_info(
        &self,
        request: &TargetingRequest,
    ) -> CollaboratorResult<TargetingCriteria>;

    async fn targeting_from_text(
        &self,
        request: &TargetingTextRequest,
    ) -> CollaboratorResult<TargetingCriteria>;

    async fn creative_copy(&self, request: &CreativeCopyRequest) -> CollaboratorResult<CreativeCopy>;

    /// Returns the image as a `data:` URI.
    async fn ad_image(&self, request: &AdImageRequest) -> CollaboratorResult<String>;

    async fn insights(&self, metrics: &CampaignMetrics) -> CollaboratorResult<InsightReport>;

    async fn custom_insight(
        &self,
        metrics: &CampaignMetrics,
        question: &str,
    ) -> CollaboratorResult<String>;
}

/// Run a draft-populating request against a collaborator.
pub async fn dispatch(
    collaborator: &dyn GenerationCollaborator,
    request: &GenerationRequest,
) -> CollaboratorResult<GeneratedContent> {
    let kind = request.kind();
    let start = Instant::now();

    let result = match request {
        GenerationRequest::CompanyOverview(req) => collaborator
            .company_overview(req)
            .await
            .map(GeneratedContent::CompanyOverview),
        GenerationRequest::TargetingFromBusinessInfo(req) => collaborator
            .targeting_from_business_info(req)
            .await
            .map(GeneratedContent::Targeting),
        GenerationRequest::TargetingFromText(req) => collaborator
            .targeting_from_text(req)
            .await
            .map(GeneratedContent::Targeting),
        GenerationRequest::CreativeCopy(req) => collaborator
            .creative_copy(req)
            .await
            .map(GeneratedContent::CreativeCopy),
        GenerationRequest::AdImage(req) => collaborator
            .ad_image(req)
            .await
            .map(GeneratedContent::AdImage),
    };

    let latency_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            debug!(kind = kind.as_str(), latency_ms, "generation complete");
            metrics::counter!("genai.requests", "kind" => kind.as_str(), "outcome" => "ok")
                .increment(1);
        }
        Err(e) => {
            warn!(kind = kind.as_str(), latency_ms, error = %e, "generation failed");
            metrics::counter!("genai.requests", "kind" => kind.as_str(), "outcome" => "error")
                .increment(1);
        }
    }

    result
}
