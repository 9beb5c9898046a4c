//! Background population of the draft by the generation collaborator.
//!
//! Collaborator calls run as tokio tasks tagged with the ticket they were
//! issued for. A result only lands if its ticket is still current; tasks for
//! superseded revisions are aborted as soon as the draft moves on, and tasks
//! whose inputs were replaced by another generated result are aborted when
//! that result lands. The current step is then re-populated.

use crate::cascade::FieldUpdate;
use crate::controller::{Advance, GenerationTicket, WizardController, WizardSnapshot};
use crate::steps::{BudgetInput, WizardStep};
use adpilot_core::AdPilotResult;
use adpilot_genai::{dispatch, GenerationCollaborator, GenerationKind};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

struct InFlight {
    ticket: GenerationTicket,
    handle: JoinHandle<()>,
}

/// A wizard controller plus the collaborator tasks working on its draft.
#[derive(Clone)]
pub struct WizardSession {
    controller: Arc<Mutex<WizardController>>,
    collaborator: Arc<dyn GenerationCollaborator>,
    in_flight: Arc<Mutex<Vec<InFlight>>>,
    notice: Arc<Mutex<Option<String>>>,
    auto_populate: bool,
}

impl WizardSession {
    pub fn new(collaborator: Arc<dyn GenerationCollaborator>, auto_populate: bool) -> Self {
        Self {
            controller: Arc::new(Mutex::new(WizardController::new())),
            collaborator,
            in_flight: Arc::new(Mutex::new(Vec::new())),
            notice: Arc::new(Mutex::new(None)),
            auto_populate,
        }
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        let mut snapshot = self.controller.lock().snapshot();
        let mut in_flight = self.in_flight.lock();
        in_flight.retain(|t| !t.handle.is_finished());
        snapshot.pending = in_flight
            .iter()
            .filter(|t| t.ticket.version == snapshot.version)
            .map(|t| t.ticket.kind())
            .collect();
        snapshot.notice = self.notice.lock().clone();
        snapshot
    }

    pub fn update(&self, update: FieldUpdate) -> AdPilotResult<bool> {
        let (changed, version) = {
            let mut controller = self.controller.lock();
            let changed = controller.update(update)?;
            (changed, controller.version())
        };
        if changed {
            self.on_revision(version);
            self.auto_populate_current();
        }
        Ok(changed)
    }

    pub fn update_budget_text(&self, input: &BudgetInput) -> AdPilotResult<bool> {
        let (changed, version) = {
            let mut controller = self.controller.lock();
            let changed = controller.update_budget_text(input)?;
            (changed, controller.version())
        };
        if changed {
            self.on_revision(version);
        }
        Ok(changed)
    }

    /// Move forward. A finalized campaign is returned to the caller for registration.
    pub fn advance(&self) -> Advance {
        let (outcome, version) = {
            let mut controller = self.controller.lock();
            let outcome = controller.advance();
            (outcome, controller.version())
        };
        match &outcome {
            Advance::Moved(_) => self.auto_populate_current(),
            Advance::Finalized(_) => self.on_revision(version),
        }
        outcome
    }

    pub fn retreat(&self) -> WizardStep {
        let step = self.controller.lock().retreat();
        self.auto_populate_current();
        step
    }

    pub fn reset(&self) {
        let version = {
            let mut controller = self.controller.lock();
            controller.reset();
            controller.version()
        };
        self.on_revision(version);
    }

    /// Start a user-initiated generation against the current draft.
    pub fn request_generation(
        &self,
        kind: GenerationKind,
        free_text: Option<&str>,
    ) -> AdPilotResult<GenerationKind> {
        let ticket = self.controller.lock().ticket(kind, free_text)?;
        self.spawn(ticket);
        Ok(kind)
    }

    /// Wait for every in-flight generation to finish or be cancelled.
    pub async fn wait_idle(&self) {
        loop {
            let tasks = std::mem::take(&mut *self.in_flight.lock());
            if tasks.is_empty() {
                return;
            }
            for task in tasks {
                // Cancelled tasks resolve with a JoinError; nothing to report.
                let _ = task.handle.await;
            }
        }
    }

    fn auto_populate_current(&self) {
        if !self.auto_populate {
            return;
        }
        let Some(ticket) = self.controller.lock().auto_ticket() else {
            return;
        };
        let already_running = self
            .in_flight
            .lock()
            .iter()
            .any(|t| t.ticket == ticket && !t.handle.is_finished());
        if !already_running {
            self.spawn(ticket);
        }
    }

    fn on_revision(&self, version: u64) {
        *self.notice.lock() = None;
        let mut in_flight = self.in_flight.lock();
        let before = in_flight.len();
        in_flight.retain(|t| {
            if t.ticket.version < version {
                t.handle.abort();
                false
            } else {
                true
            }
        });
        let cancelled = before - in_flight.len();
        if cancelled > 0 {
            debug!(cancelled, version, "cancelled stale generations");
            metrics::counter!("wizard.generations.cancelled").increment(cancelled as u64);
        }
    }

    /// Abort work whose inputs were replaced by a generated result, then
    /// re-populate the current step.
    fn after_generation(&self) {
        let cancelled = {
            let controller = self.controller.lock();
            let mut in_flight = self.in_flight.lock();
            let before = in_flight.len();
            in_flight.retain(|t| {
                if t.handle.is_finished() {
                    false
                } else if controller.is_current(&t.ticket) {
                    true
                } else {
                    t.handle.abort();
                    false
                }
            });
            before - in_flight.len()
        };
        if cancelled > 0 {
            debug!(cancelled, "cancelled generations with replaced inputs");
            metrics::counter!("wizard.generations.cancelled").increment(cancelled as u64);
        }
        self.auto_populate_current();
    }

    fn spawn(&self, ticket: GenerationTicket) {
        let session = self.clone();
        let task_ticket = ticket.clone();
        let version = ticket.version;
        let kind = ticket.kind();

        let handle = tokio::spawn(async move {
            let ticket = task_ticket;
            match dispatch(session.collaborator.as_ref(), &ticket.request).await {
                Ok(content) => {
                    let applied = session.controller.lock().apply_generated(&ticket, content);
                    match applied {
                        Ok(true) => {
                            info!(kind = kind.as_str(), version, "generated content applied");
                            metrics::counter!("wizard.generations.applied").increment(1);
                        }
                        Ok(false) => {
                            debug!(kind = kind.as_str(), version, "generated content not applied");
                            metrics::counter!("wizard.generations.discarded").increment(1);
                        }
                        Err(e) => {
                            warn!(kind = kind.as_str(), error = %e, "generated content rejected");
                        }
                    }
                    session.after_generation();
                }
                Err(e) => {
                    if session.controller.lock().is_current(&ticket) {
                        *session.notice.lock() = Some(e.user_message().to_string());
                    }
                }
            }
        });

        debug!(kind = kind.as_str(), version, "generation started");
        let mut in_flight = self.in_flight.lock();
        in_flight.retain(|t| !t.handle.is_finished());
        in_flight.push(InFlight { ticket, handle });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adpilot_core::types::{CampaignMetrics, CompanyOverview, Industry, TargetingCriteria};
    use adpilot_genai::{
        AdImageRequest, CollaboratorError, CollaboratorResult, CompanyOverviewRequest,
        CreativeCopy, CreativeCopyRequest, InsightReport, OfflineCollaborator, TargetingRequest,
        TargetingTextRequest,
    };
    use async_trait::async_trait;
    use std::time::Duration;

    struct FailingCollaborator;

    #[async_trait]
    impl GenerationCollaborator for FailingCollaborator {
        async fn company_overview(
            &self,
            _: &CompanyOverviewRequest,
        ) -> CollaboratorResult<CompanyOverview> {
            Err(CollaboratorError::Unavailable("down".to_string()))
        }
        async fn targeting_from_business_info(
            &self,
            _: &TargetingRequest,
        ) -> CollaboratorResult<TargetingCriteria> {
            Err(CollaboratorError::Unavailable("down".to_string()))
        }
        async fn targeting_from_text(
            &self,
            _: &TargetingTextRequest,
        ) -> CollaboratorResult<TargetingCriteria> {
            Err(CollaboratorError::Unavailable("down".to_string()))
        }
        async fn creative_copy(&self, _: &CreativeCopyRequest) -> CollaboratorResult<CreativeCopy> {
            Err(CollaboratorError::Unavailable("down".to_string()))
        }
        async fn ad_image(&self, _: &AdImageRequest) -> CollaboratorResult<String> {
            Err(CollaboratorError::NoImage)
        }
        async fn insights(&self, _: &CampaignMetrics) -> CollaboratorResult<InsightReport> {
            Err(CollaboratorError::Unavailable("down".to_string()))
        }
        async fn custom_insight(&self, _: &CampaignMetrics, _: &str) -> CollaboratorResult<String> {
            Err(CollaboratorError::Unavailable("down".to_string()))
        }
    }

    /// Offline content, with targeting slower than copy. Records the
    /// targeting each copy request was built from.
    struct SlowTargeting {
        inner: OfflineCollaborator,
        copy_requests: Mutex<Vec<TargetingCriteria>>,
    }

    #[async_trait]
    impl GenerationCollaborator for SlowTargeting {
        async fn company_overview(
            &self,
            req: &CompanyOverviewRequest,
        ) -> CollaboratorResult<CompanyOverview> {
            self.inner.company_overview(req).await
        }
        async fn targeting_from_business_info(
            &self,
            req: &TargetingRequest,
        ) -> CollaboratorResult<TargetingCriteria> {
            tokio::time::sleep(Duration::from_millis(80)).await;
            self.inner.targeting_from_business_info(req).await
        }
        async fn targeting_from_text(
            &self,
            req: &TargetingTextRequest,
        ) -> CollaboratorResult<TargetingCriteria> {
            self.inner.targeting_from_text(req).await
        }
        async fn creative_copy(&self, req: &CreativeCopyRequest) -> CollaboratorResult<CreativeCopy> {
            self.copy_requests.lock().push(req.targeting.clone());
            self.inner.creative_copy(req).await
        }
        async fn ad_image(&self, req: &AdImageRequest) -> CollaboratorResult<String> {
            self.inner.ad_image(req).await
        }
        async fn insights(&self, metrics: &CampaignMetrics) -> CollaboratorResult<InsightReport> {
            self.inner.insights(metrics).await
        }
        async fn custom_insight(
            &self,
            metrics: &CampaignMetrics,
            question: &str,
        ) -> CollaboratorResult<String> {
            self.inner.custom_insight(metrics, question).await
        }
    }

    fn offline_session(auto_populate: bool) -> WizardSession {
        WizardSession::new(
            Arc::new(OfflineCollaborator::new().with_delay(Duration::from_millis(5))),
            auto_populate,
        )
    }

    fn name_business(session: &WizardSession) {
        session
            .update(FieldUpdate::BusinessName("Joe's Pizza".to_string()))
            .unwrap();
        session
            .update(FieldUpdate::Industry(Industry::FoodBeverage))
            .unwrap();
    }

    #[tokio::test]
    async fn test_entering_steps_populates_draft() {
        let session = offline_session(true);
        name_business(&session);

        session.advance();
        assert_eq!(session.snapshot().pending, vec![GenerationKind::CompanyOverview]);
        session.wait_idle().await;
        assert!(!session.snapshot().draft.company_overview.is_blank());

        session.advance();
        session.wait_idle().await;
        assert!(!session.snapshot().draft.targeting.is_unpopulated());

        session.advance();
        session.wait_idle().await;
        let snapshot = session.snapshot();
        assert!(!snapshot.draft.creative.headline.is_empty());
        assert!(snapshot.pending.is_empty());
    }

    #[tokio::test]
    async fn test_no_population_without_business_name() {
        let session = offline_session(true);
        session.advance();
        assert!(session.snapshot().pending.is_empty());
        session.wait_idle().await;
        assert!(session.snapshot().draft.company_overview.is_blank());
    }

    #[tokio::test]
    async fn test_result_after_draft_change_is_discarded() {
        let session = offline_session(false);
        name_business(&session);
        session
            .request_generation(GenerationKind::CompanyOverview, None)
            .unwrap();

        session
            .update(FieldUpdate::WebsiteUrl("https://joes.example".to_string()))
            .unwrap();
        session.wait_idle().await;

        let snapshot = session.snapshot();
        assert!(snapshot.draft.company_overview.is_blank());
        assert!(snapshot.pending.is_empty());
    }

    #[tokio::test]
    async fn test_reset_cancels_generation() {
        let session = offline_session(false);
        name_business(&session);
        session
            .request_generation(GenerationKind::AdImage, None)
            .unwrap();
        session.reset();
        session.wait_idle().await;
        assert!(session.snapshot().draft.creative.background_image_url.is_none());
    }

    #[tokio::test]
    async fn test_user_requested_image_and_text_targeting() {
        let session = offline_session(false);
        name_business(&session);
        session
            .request_generation(GenerationKind::TargetingFromText, Some("runners in Austin"))
            .unwrap();
        session.wait_idle().await;
        assert_eq!(session.snapshot().draft.targeting.locations, vec!["Austin"]);

        session
            .request_generation(GenerationKind::AdImage, None)
            .unwrap();
        session.wait_idle().await;
        assert!(session
            .snapshot()
            .draft
            .creative
            .background_image_url
            .is_some());
    }

    #[tokio::test]
    async fn test_failure_leaves_draft_and_sets_notice() {
        let session = WizardSession::new(Arc::new(FailingCollaborator), true);
        name_business(&session);
        let before = session.snapshot().draft;

        session.advance();
        session.wait_idle().await;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.draft, before);
        assert!(snapshot.notice.is_some());

        session
            .update(FieldUpdate::Name("Retry".to_string()))
            .unwrap();
        session.wait_idle().await;
        // A fresh revision clears the notice before the retried call fails again.
        assert!(session.snapshot().notice.is_some());
    }

    #[tokio::test]
    async fn test_finalize_cancels_outstanding_work() {
        let session = offline_session(false);
        name_business(&session);
        for _ in 0..4 {
            session.advance();
        }
        session
            .request_generation(GenerationKind::CreativeCopy, None)
            .unwrap();
        match session.advance() {
            Advance::Finalized(campaign) => assert!(campaign.creative.headline.is_empty()),
            other => panic!("expected finalize, got {other:?}"),
        }
        session.wait_idle().await;
        assert!(session.snapshot().draft.creative.headline.is_empty());
    }

    #[tokio::test]
    async fn test_copy_follows_targeting_that_lands_late() {
        let collaborator = Arc::new(SlowTargeting {
            inner: OfflineCollaborator::new(),
            copy_requests: Mutex::new(Vec::new()),
        });
        let session = WizardSession::new(collaborator.clone(), true);
        name_business(&session);
        session.advance();
        session.wait_idle().await;

        // Targeting is still running when the creative step asks for copy.
        session.advance();
        session.advance();
        assert_eq!(session.snapshot().step, WizardStep::Creative);
        session.wait_idle().await;

        let snapshot = session.snapshot();
        assert!(!snapshot.draft.targeting.is_unpopulated());
        assert!(!snapshot.draft.creative.headline.is_empty());
        assert!(snapshot.pending.is_empty());

        let copy_requests = collaborator.copy_requests.lock();
        assert!(copy_requests.len() >= 2);
        assert!(copy_requests[0].is_unpopulated());
        assert_eq!(copy_requests.last(), Some(&snapshot.draft.targeting));
    }
}
