use crate::cascade::{apply_field_update, FieldUpdate};
use crate::steps::{build_request, BudgetInput, StepView, WizardStep, STEP_COUNT};
use adpilot_core::types::{Campaign, CampaignStatus};
use adpilot_core::AdPilotResult;
use adpilot_genai::{GeneratedContent, GenerationKind, GenerationRequest};
use chrono::Utc;
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, info};
use uuid::Uuid;

/// Collaborator request bound to the draft revision it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationTicket {
    pub version: u64,
    pub request: GenerationRequest,
}

impl GenerationTicket {
    pub fn kind(&self) -> GenerationKind {
        self.request.kind()
    }
}

/// Outcome of [`WizardController::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Moved(WizardStep),
    Finalized(Campaign),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub step_index: usize,
    pub total_steps: usize,
    pub version: u64,
    pub draft: Campaign,
    pub view: StepView,
    /// Collaborator calls still in flight for this revision.
    pub pending: Vec<GenerationKind>,
    /// User-facing message from the last failed generation, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Owns the single in-progress draft and the current step.
///
/// `version` counts user revisions of the draft: edits, resets and
/// finalization. Collaborator results are applied in place and do not bump
/// it, so concurrent generations for the same revision all land unless one
/// replaces the inputs another was built from.
#[derive(Debug, Clone)]
pub struct WizardController {
    draft: Campaign,
    step: WizardStep,
    version: u64,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self {
            draft: Campaign::draft_template(),
            step: WizardStep::BusinessInfo,
            version: 0,
        }
    }

    pub fn draft(&self) -> &Campaign {
        &self.draft
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            step_index: self.step.index(),
            total_steps: STEP_COUNT,
            version: self.version,
            draft: self.draft.clone(),
            view: self.step.view(&self.draft),
            pending: Vec::new(),
            notice: None,
        }
    }

    /// Apply a user edit. Returns whether the draft changed.
    pub fn update(&mut self, update: FieldUpdate) -> AdPilotResult<bool> {
        let field = update.field();
        let changed = self.apply(update)?;
        if changed {
            self.version += 1;
            debug!(?field, version = self.version, "draft updated");
        }
        Ok(changed)
    }

    /// Apply raw budget form text as a budget edit.
    pub fn update_budget_text(&mut self, input: &BudgetInput) -> AdPilotResult<bool> {
        let budget = input.apply_to(&self.draft.budget);
        self.update(FieldUpdate::Budget(budget))
    }

    fn apply(&mut self, update: FieldUpdate) -> AdPilotResult<bool> {
        match apply_field_update(&self.draft, update)? {
            Cow::Borrowed(_) => Ok(false),
            Cow::Owned(next) => {
                self.draft = next;
                Ok(true)
            }
        }
    }

    /// Move forward; on the last step promote the draft to a campaign.
    pub fn advance(&mut self) -> Advance {
        match self.step.next() {
            Some(next) => {
                self.step = next;
                Advance::Moved(next)
            }
            None => {
                let campaign = self.finalize();
                self.restart();
                Advance::Finalized(campaign)
            }
        }
    }

    pub fn retreat(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Discard the draft and return to the first step.
    pub fn reset(&mut self) {
        self.restart();
        info!(version = self.version, "wizard reset");
    }

    fn restart(&mut self) {
        self.draft = Campaign::draft_template();
        self.step = WizardStep::BusinessInfo;
        self.version += 1;
    }

    fn finalize(&self) -> Campaign {
        let campaign = Campaign {
            id: format!("camp-{}", Uuid::new_v4().simple()),
            status: CampaignStatus::Active,
            start_date: Utc::now(),
            ..self.draft.clone()
        };
        info!(
            campaign_id = %campaign.id,
            platform = ?campaign.platform,
            hard_cap = campaign.budget.hard_cap,
            "draft finalized"
        );
        campaign
    }

    /// Build a ticket for the current revision.
    pub fn ticket(
        &self,
        kind: GenerationKind,
        free_text: Option<&str>,
    ) -> AdPilotResult<GenerationTicket> {
        Ok(GenerationTicket {
            version: self.version,
            request: build_request(&self.draft, kind, free_text)?,
        })
    }

    /// Ticket for the current step's auto-population, if it needs one.
    pub fn auto_ticket(&self) -> Option<GenerationTicket> {
        self.step
            .auto_population(&self.draft)
            .map(|request| GenerationTicket {
                version: self.version,
                request,
            })
    }

    /// True while the ticket still describes the draft: same revision, and
    /// the collaborator inputs rebuilt from the draft are unchanged.
    ///
    /// Generated results change the draft without a new revision, so a
    /// targeting result landing makes copy requested from the old targeting
    /// stale.
    pub fn is_current(&self, ticket: &GenerationTicket) -> bool {
        ticket.version == self.version
            && build_request(&self.draft, ticket.kind(), ticket.request.free_text())
                .is_ok_and(|request| request == ticket.request)
    }

    /// Apply a collaborator result for `ticket`.
    ///
    /// Results for a ticket that is no longer current are discarded. Returns
    /// whether the draft changed.
    pub fn apply_generated(
        &mut self,
        ticket: &GenerationTicket,
        content: GeneratedContent,
    ) -> AdPilotResult<bool> {
        if !self.is_current(ticket) {
            debug!(
                kind = ticket.kind().as_str(),
                ticket_version = ticket.version,
                version = self.version,
                "discarding stale generation result"
            );
            return Ok(false);
        }
        let update = match content {
            GeneratedContent::CompanyOverview(overview) => FieldUpdate::CompanyOverview(overview),
            GeneratedContent::Targeting(targeting) => FieldUpdate::Targeting(targeting),
            GeneratedContent::CreativeCopy(copy) => {
                FieldUpdate::Creative(copy.merge_into(&self.draft.creative))
            }
            GeneratedContent::AdImage(uri) => {
                let mut creative = self.draft.creative.clone();
                creative.background_image_url = Some(uri);
                FieldUpdate::Creative(creative)
            }
        };
        self.apply(update)
    }
}
