//! The five wizard steps and what each one shows and asks for.

use crate::cascade::FieldName;
use adpilot_core::types::{
    BudgetConfig, Campaign, Channel, CompanyOverview, CreativeAsset, FunnelStage, Industry,
    Platform, TargetingCriteria,
};
use adpilot_core::{AdPilotError, AdPilotResult};
use adpilot_genai::{
    AdImageRequest, CompanyOverviewRequest, CreativeCopyRequest, GenerationKind,
    GenerationRequest, TargetingRequest, TargetingTextRequest,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const STEP_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    BusinessInfo,
    ChannelSelection,
    Targeting,
    Creative,
    Budget,
}

/// Read-only projection of the draft for one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StepView {
    BusinessInfo {
        name: String,
        business_name: String,
        website_url: String,
        industry: Industry,
        industries: Vec<Industry>,
    },
    ChannelSelection {
        company_overview: CompanyOverview,
        funnel_stage: FunnelStage,
        recommended_channels: Vec<Channel>,
        channel: Channel,
        platform: Platform,
        available_platforms: Vec<Platform>,
    },
    Targeting {
        platform: Platform,
        targeting: TargetingCriteria,
        /// Search campaigns target keywords.
        shows_keywords: bool,
    },
    Creative {
        business_name: String,
        platform: Platform,
        creative: CreativeAsset,
        shows_second_headline: bool,
    },
    Budget {
        name: String,
        platform: Platform,
        budget: BudgetConfig,
        estimated_total_spend: f64,
    },
}

impl WizardStep {
    pub const ALL: [WizardStep; STEP_COUNT] = [
        WizardStep::BusinessInfo,
        WizardStep::ChannelSelection,
        WizardStep::Targeting,
        WizardStep::Creative,
        WizardStep::Budget,
    ];

    /// 1-based position in the flow.
    pub fn index(&self) -> usize {
        match self {
            WizardStep::BusinessInfo => 1,
            WizardStep::ChannelSelection => 2,
            WizardStep::Targeting => 3,
            WizardStep::Creative => 4,
            WizardStep::Budget => 5,
        }
    }

    pub fn from_index(index: usize) -> AdPilotResult<Self> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(AdPilotError::InvalidStep(index))
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::BusinessInfo => "Business Info",
            WizardStep::ChannelSelection => "Strategy",
            WizardStep::Targeting => "Audience",
            WizardStep::Creative => "Creative",
            WizardStep::Budget => "Budget",
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1).ok()
    }

    pub fn previous(&self) -> Option<Self> {
        Self::from_index(self.index() - 1).ok()
    }

    pub fn is_last(&self) -> bool {
        self.index() == STEP_COUNT
    }

    /// Draft fields this step edits.
    pub fn fields(&self) -> &'static [FieldName] {
        match self {
            WizardStep::BusinessInfo => &[
                FieldName::Name,
                FieldName::BusinessName,
                FieldName::WebsiteUrl,
                FieldName::Industry,
            ],
            WizardStep::ChannelSelection => &[
                FieldName::CompanyOverview,
                FieldName::FunnelStage,
                FieldName::Channel,
                FieldName::Platform,
            ],
            WizardStep::Targeting => &[FieldName::Targeting],
            WizardStep::Creative => &[FieldName::Creative],
            WizardStep::Budget => &[FieldName::Name, FieldName::Budget],
        }
    }

    pub fn view(&self, draft: &Campaign) -> StepView {
        match self {
            WizardStep::BusinessInfo => StepView::BusinessInfo {
                name: draft.name.clone(),
                business_name: draft.business_name.clone(),
                website_url: draft.website_url.clone(),
                industry: draft.industry,
                industries: Industry::ALL.to_vec(),
            },
            WizardStep::ChannelSelection => StepView::ChannelSelection {
                company_overview: draft.company_overview.clone(),
                funnel_stage: draft.funnel_stage,
                recommended_channels: draft.funnel_stage.recommended_channels().to_vec(),
                channel: draft.channel,
                platform: draft.platform,
                available_platforms: draft.channel.platforms().to_vec(),
            },
            WizardStep::Targeting => StepView::Targeting {
                platform: draft.platform,
                targeting: draft.targeting.clone(),
                shows_keywords: draft.channel == Channel::Search,
            },
            WizardStep::Creative => StepView::Creative {
                business_name: draft.business_name.clone(),
                platform: draft.platform,
                creative: draft.creative.clone(),
                shows_second_headline: draft.channel == Channel::Search,
            },
            WizardStep::Budget => StepView::Budget {
                name: draft.name.clone(),
                platform: draft.platform,
                budget: draft.budget.clone(),
                estimated_total_spend: draft.budget.estimated_total_spend(),
            },
        }
    }

    /// Request to issue on entering the step when its derived content is missing.
    pub fn auto_population(&self, draft: &Campaign) -> Option<GenerationRequest> {
        if draft.business_name.trim().is_empty() {
            return None;
        }
        let kind = match self {
            WizardStep::ChannelSelection if draft.company_overview.is_blank() => {
                GenerationKind::CompanyOverview
            }
            WizardStep::Targeting if draft.targeting.is_unpopulated() => {
                GenerationKind::TargetingFromBusinessInfo
            }
            WizardStep::Creative if draft.creative.headline.trim().is_empty() => {
                GenerationKind::CreativeCopy
            }
            _ => return None,
        };
        build_request(draft, kind, None).ok()
    }
}

/// Snapshot the inputs of a collaborator call from the draft.
///
/// `free_text` is required for `TargetingFromText` and ignored otherwise.
pub fn build_request(
    draft: &Campaign,
    kind: GenerationKind,
    free_text: Option<&str>,
) -> AdPilotResult<GenerationRequest> {
    if draft.business_name.trim().is_empty() {
        return Err(AdPilotError::Validation(
            "a business name is required before generating content".to_string(),
        ));
    }

    let request = match kind {
        GenerationKind::CompanyOverview => GenerationRequest::CompanyOverview(CompanyOverviewRequest {
            business_name: draft.business_name.clone(),
            website_url: draft.website_url.clone(),
            industry: draft.industry,
        }),
        GenerationKind::TargetingFromBusinessInfo => {
            GenerationRequest::TargetingFromBusinessInfo(TargetingRequest {
                business_name: draft.business_name.clone(),
                industry: draft.industry,
                website_url: draft.website_url.clone(),
                platform: draft.platform,
            })
        }
        GenerationKind::TargetingFromText => {
            let text = free_text.map(str::trim).unwrap_or_default();
            if text.is_empty() {
                return Err(AdPilotError::Validation(
                    "describe the audience to target".to_string(),
                ));
            }
            GenerationRequest::TargetingFromText(TargetingTextRequest {
                business_name: draft.business_name.clone(),
                industry: draft.industry,
                free_text: text.to_string(),
                platform: draft.platform,
            })
        }
        GenerationKind::CreativeCopy => GenerationRequest::CreativeCopy(CreativeCopyRequest {
            business_name: draft.business_name.clone(),
            industry: draft.industry,
            targeting: draft.targeting.clone(),
            platform: draft.platform,
        }),
        GenerationKind::AdImage => GenerationRequest::AdImage(AdImageRequest {
            business_name: draft.business_name.clone(),
            industry: draft.industry,
            platform: draft.platform,
            funnel_stage: draft.funnel_stage,
            targeting: draft.targeting.clone(),
        }),
    };
    Ok(request)
}

// ─── Budget form input ─────────────────────────────────────────────────────

/// Raw text from the budget form. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInput {
    pub daily_limit: Option<String>,
    pub hard_cap: Option<String>,
    pub duration: Option<String>,
}

/// Parse a money amount such as `"75"`, `"$1,200.50"` or `" 80 "`.
pub fn parse_amount(raw: &str) -> AdPilotResult<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AdPilotError::Validation(format!("not a valid amount: {raw:?}"))),
    }
}

pub fn parse_days(raw: &str) -> AdPilotResult<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| AdPilotError::Validation(format!("not a valid number of days: {raw:?}")))
}

impl BudgetInput {
    /// Overlay the parsed values onto `current`.
    ///
    /// Malformed entries keep the previous value. Range clamping happens in
    /// the cascade engine.
    pub fn apply_to(&self, current: &BudgetConfig) -> BudgetConfig {
        let mut budget = current.clone();
        if let Some(raw) = &self.daily_limit {
            match parse_amount(raw) {
                Ok(v) => budget.daily_limit = v,
                Err(e) => warn!(error = %e, "ignoring daily limit input"),
            }
        }
        if let Some(raw) = &self.hard_cap {
            match parse_amount(raw) {
                Ok(v) => budget.hard_cap = v,
                Err(e) => warn!(error = %e, "ignoring hard cap input"),
            }
        }
        if let Some(raw) = &self.duration {
            match parse_days(raw) {
                Ok(v) => budget.duration = v,
                Err(e) => warn!(error = %e, "ignoring duration input"),
            }
        }
        budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_draft() -> Campaign {
        Campaign {
            business_name: "Joe's Pizza".to_string(),
            industry: Industry::FoodBeverage,
            ..Campaign::draft_template()
        }
    }

    #[test]
    fn test_index_round_trip_and_bounds() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_index(step.index()).unwrap(), step);
        }
        assert!(matches!(
            WizardStep::from_index(0),
            Err(AdPilotError::InvalidStep(0))
        ));
        assert!(matches!(
            WizardStep::from_index(6),
            Err(AdPilotError::InvalidStep(6))
        ));
        assert_eq!(WizardStep::BusinessInfo.previous(), None);
        assert_eq!(WizardStep::Budget.next(), None);
        assert!(WizardStep::Budget.is_last());
    }

    #[test]
    fn test_every_field_belongs_to_a_step() {
        for field in crate::cascade::FieldName::ALL {
            assert!(
                WizardStep::ALL.iter().any(|s| s.fields().contains(&field)),
                "{field:?} has no step"
            );
        }
    }

    #[test]
    fn test_auto_population_needs_business_name() {
        let draft = Campaign::draft_template();
        for step in WizardStep::ALL {
            assert_eq!(step.auto_population(&draft), None);
        }
    }

    #[test]
    fn test_auto_population_per_step() {
        let draft = named_draft();
        assert_eq!(WizardStep::BusinessInfo.auto_population(&draft), None);
        assert_eq!(WizardStep::Budget.auto_population(&draft), None);
        assert_eq!(
            WizardStep::ChannelSelection
                .auto_population(&draft)
                .map(|r| r.kind()),
            Some(GenerationKind::CompanyOverview)
        );
        assert_eq!(
            WizardStep::Targeting.auto_population(&draft).map(|r| r.kind()),
            Some(GenerationKind::TargetingFromBusinessInfo)
        );
        assert_eq!(
            WizardStep::Creative.auto_population(&draft).map(|r| r.kind()),
            Some(GenerationKind::CreativeCopy)
        );
    }

    #[test]
    fn test_populated_steps_are_not_regenerated() {
        let mut draft = named_draft();
        draft.company_overview.summary = "Local pizzeria.".to_string();
        draft.targeting.locations = vec!["Chicago".to_string()];
        draft.creative.headline = "Hot slices".to_string();
        for step in WizardStep::ALL {
            assert_eq!(step.auto_population(&draft), None);
        }
    }

    #[test]
    fn test_text_targeting_requires_text() {
        let draft = named_draft();
        assert!(matches!(
            build_request(&draft, GenerationKind::TargetingFromText, Some("   ")),
            Err(AdPilotError::Validation(_))
        ));
        let request =
            build_request(&draft, GenerationKind::TargetingFromText, Some(" runners in Austin "))
                .unwrap();
        match request {
            GenerationRequest::TargetingFromText(req) => {
                assert_eq!(req.free_text, "runners in Austin")
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn test_views_follow_channel() {
        let mut draft = named_draft();
        draft.channel = Channel::Search;
        draft.platform = Platform::GoogleAds;
        match WizardStep::Creative.view(&draft) {
            StepView::Creative {
                shows_second_headline,
                ..
            } => assert!(shows_second_headline),
            other => panic!("unexpected view {other:?}"),
        }
        match WizardStep::Budget.view(&draft) {
            StepView::Budget {
                estimated_total_spend,
                ..
            } => assert_eq!(estimated_total_spend, 1500.0),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 75 ").unwrap(), 75.0);
        assert_eq!(parse_amount("$1,200.50").unwrap(), 1200.5);
        assert!(matches!(parse_amount("abc"), Err(AdPilotError::Validation(_))));
        assert!(matches!(parse_amount(""), Err(AdPilotError::Validation(_))));
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn test_budget_input_keeps_previous_on_bad_text() {
        let current = BudgetConfig::default();
        let next = BudgetInput {
            daily_limit: Some("eighty".to_string()),
            hard_cap: Some("900".to_string()),
            duration: Some("-3".to_string()),
        }
        .apply_to(&current);
        assert_eq!(next.daily_limit, current.daily_limit);
        assert_eq!(next.hard_cap, 900.0);
        assert_eq!(next.duration, current.duration);
    }
}
