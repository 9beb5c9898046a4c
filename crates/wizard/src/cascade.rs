//! Cascading field updates on a campaign draft.
//!
//! Fields are ordered in tiers. Changing a field resets every field in the
//! tiers below it to the draft template, so downstream choices never
//! outlive the upstream choice they were made for.

use adpilot_core::types::{
    BudgetConfig, Campaign, Channel, CompanyOverview, CreativeAsset, FunnelStage, Industry,
    Platform, TargetingCriteria,
};
use adpilot_core::{AdPilotError, AdPilotResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A typed field/value pair for a single draft edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldUpdate {
    Name(String),
    BusinessName(String),
    WebsiteUrl(String),
    Industry(Industry),
    CompanyOverview(CompanyOverview),
    FunnelStage(FunnelStage),
    Channel(Channel),
    Platform(Platform),
    Targeting(TargetingCriteria),
    Creative(CreativeAsset),
    Budget(BudgetConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Name,
    BusinessName,
    WebsiteUrl,
    Industry,
    CompanyOverview,
    FunnelStage,
    Channel,
    Platform,
    Targeting,
    Creative,
    Budget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CascadeTier {
    Identity,
    Strategy,
    Targeting,
    Creative,
    Budget,
}

impl FieldName {
    pub const ALL: [FieldName; 11] = [
        FieldName::Name,
        FieldName::BusinessName,
        FieldName::WebsiteUrl,
        FieldName::Industry,
        FieldName::CompanyOverview,
        FieldName::FunnelStage,
        FieldName::Channel,
        FieldName::Platform,
        FieldName::Targeting,
        FieldName::Creative,
        FieldName::Budget,
    ];

    /// `None` for fields that never cascade.
    pub fn tier(&self) -> Option<CascadeTier> {
        match self {
            FieldName::BusinessName | FieldName::WebsiteUrl | FieldName::Industry => {
                Some(CascadeTier::Identity)
            }
            FieldName::FunnelStage | FieldName::Channel | FieldName::Platform => {
                Some(CascadeTier::Strategy)
            }
            FieldName::Targeting => Some(CascadeTier::Targeting),
            FieldName::Creative => Some(CascadeTier::Creative),
            FieldName::Budget => Some(CascadeTier::Budget),
            FieldName::Name | FieldName::CompanyOverview => None,
        }
    }
}

impl CascadeTier {
    /// Fields restored to the template when a field of this tier changes.
    pub fn resets(&self) -> &'static [FieldName] {
        match self {
            CascadeTier::Identity => &[
                FieldName::CompanyOverview,
                FieldName::FunnelStage,
                FieldName::Channel,
                FieldName::Platform,
                FieldName::Targeting,
                FieldName::Creative,
                FieldName::Budget,
            ],
            CascadeTier::Strategy => &[
                FieldName::Targeting,
                FieldName::Creative,
                FieldName::Budget,
            ],
            CascadeTier::Targeting => &[FieldName::Creative, FieldName::Budget],
            CascadeTier::Creative => &[FieldName::Budget],
            CascadeTier::Budget => &[],
        }
    }
}

impl FieldUpdate {
    pub fn field(&self) -> FieldName {
        match self {
            FieldUpdate::Name(_) => FieldName::Name,
            FieldUpdate::BusinessName(_) => FieldName::BusinessName,
            FieldUpdate::WebsiteUrl(_) => FieldName::WebsiteUrl,
            FieldUpdate::Industry(_) => FieldName::Industry,
            FieldUpdate::CompanyOverview(_) => FieldName::CompanyOverview,
            FieldUpdate::FunnelStage(_) => FieldName::FunnelStage,
            FieldUpdate::Channel(_) => FieldName::Channel,
            FieldUpdate::Platform(_) => FieldName::Platform,
            FieldUpdate::Targeting(_) => FieldName::Targeting,
            FieldUpdate::Creative(_) => FieldName::Creative,
            FieldUpdate::Budget(_) => FieldName::Budget,
        }
    }

    /// Read the current value of `field` from a draft.
    pub fn current(draft: &Campaign, field: FieldName) -> FieldUpdate {
        match field {
            FieldName::Name => FieldUpdate::Name(draft.name.clone()),
            FieldName::BusinessName => FieldUpdate::BusinessName(draft.business_name.clone()),
            FieldName::WebsiteUrl => FieldUpdate::WebsiteUrl(draft.website_url.clone()),
            FieldName::Industry => FieldUpdate::Industry(draft.industry),
            FieldName::CompanyOverview => {
                FieldUpdate::CompanyOverview(draft.company_overview.clone())
            }
            FieldName::FunnelStage => FieldUpdate::FunnelStage(draft.funnel_stage),
            FieldName::Channel => FieldUpdate::Channel(draft.channel),
            FieldName::Platform => FieldUpdate::Platform(draft.platform),
            FieldName::Targeting => FieldUpdate::Targeting(draft.targeting.clone()),
            FieldName::Creative => FieldUpdate::Creative(draft.creative.clone()),
            FieldName::Budget => FieldUpdate::Budget(draft.budget.clone()),
        }
    }

    /// Clamp the value into its documented bounds.
    pub fn normalized(self) -> Self {
        match self {
            FieldUpdate::Targeting(t) => FieldUpdate::Targeting(t.normalized()),
            FieldUpdate::Creative(c) => FieldUpdate::Creative(c.normalized()),
            FieldUpdate::Budget(b) => FieldUpdate::Budget(b.normalized()),
            other => other,
        }
    }

    fn matches(&self, draft: &Campaign) -> bool {
        *self == FieldUpdate::current(draft, self.field())
    }

    fn write_into(self, draft: &mut Campaign) {
        match self {
            FieldUpdate::Name(v) => draft.name = v,
            FieldUpdate::BusinessName(v) => draft.business_name = v,
            FieldUpdate::WebsiteUrl(v) => draft.website_url = v,
            FieldUpdate::Industry(v) => draft.industry = v,
            FieldUpdate::CompanyOverview(v) => draft.company_overview = v,
            FieldUpdate::FunnelStage(v) => draft.funnel_stage = v,
            FieldUpdate::Channel(v) => {
                draft.channel = v;
                draft.platform = v.default_platform();
            }
            FieldUpdate::Platform(v) => draft.platform = v,
            FieldUpdate::Targeting(v) => draft.targeting = v,
            FieldUpdate::Creative(v) => draft.creative = v,
            FieldUpdate::Budget(v) => draft.budget = v,
        }
    }
}

fn reset_field(draft: &mut Campaign, template: &Campaign, field: FieldName) {
    FieldUpdate::current(template, field).write_into(draft);
}

/// Apply one edit to a draft.
///
/// Returns the input borrowed when the normalized value equals the current
/// one, so callers can tell a no-op apart from a change without comparing.
pub fn apply_field_update(
    draft: &Campaign,
    update: FieldUpdate,
) -> AdPilotResult<Cow<'_, Campaign>> {
    let update = update.normalized();

    if let FieldUpdate::Platform(platform) = &update {
        if !draft.channel.supports(*platform) {
            return Err(AdPilotError::InvalidPlatform {
                channel: draft.channel,
                platform: *platform,
            });
        }
    }

    if update.matches(draft) {
        return Ok(Cow::Borrowed(draft));
    }

    let field = update.field();
    let mut next = draft.clone();
    update.write_into(&mut next);

    if let Some(tier) = field.tier() {
        let resets = tier.resets();
        if !resets.is_empty() {
            let template = Campaign::draft_template();
            for reset in resets {
                reset_field(&mut next, &template, *reset);
            }
        }
    }

    Ok(Cow::Owned(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use adpilot_core::types::{Device, LayoutTemplate};
    use proptest::prelude::*;

    fn populated_draft() -> Campaign {
        Campaign {
            business_name: "Joe's Pizza".to_string(),
            website_url: "https://joespizza.example".to_string(),
            industry: Industry::FoodBeverage,
            company_overview: CompanyOverview {
                summary: "Local pizzeria.".to_string(),
                ..CompanyOverview::default()
            },
            funnel_stage: FunnelStage::Action,
            channel: Channel::Social,
            platform: Platform::LinkedInAds,
            targeting: TargetingCriteria {
                locations: vec!["Chicago".to_string()],
                interests: vec!["Pizza".to_string()],
                ..TargetingCriteria::default()
            },
            creative: CreativeAsset {
                headline: "Best Pizza in Town".to_string(),
                layout_template: LayoutTemplate::Bold,
                ..CreativeAsset::default()
            },
            budget: BudgetConfig {
                daily_limit: 80.0,
                hard_cap: 1200.0,
                ..BudgetConfig::default()
            },
            ..Campaign::draft_template()
        }
    }

    #[test]
    fn test_channel_change_resets_platform_and_downstream() {
        let draft = populated_draft();
        let next = apply_field_update(&draft, FieldUpdate::Channel(Channel::Search)).unwrap();

        assert_eq!(next.channel, Channel::Search);
        assert_eq!(next.platform, Platform::GoogleAds);
        assert_eq!(next.targeting, TargetingCriteria::default());
        assert_eq!(next.creative, CreativeAsset::default());
        assert_eq!(next.budget, BudgetConfig::default());
        // Upstream fields survive.
        assert_eq!(next.business_name, "Joe's Pizza");
        assert_eq!(next.funnel_stage, FunnelStage::Action);
        assert_eq!(next.company_overview, draft.company_overview);
    }

    #[test]
    fn test_identity_change_resets_everything_downstream() {
        let draft = populated_draft();
        let next =
            apply_field_update(&draft, FieldUpdate::Industry(Industry::Technology)).unwrap();
        let template = Campaign::draft_template();

        assert_eq!(next.industry, Industry::Technology);
        assert_eq!(next.business_name, draft.business_name);
        assert!(next.company_overview.is_blank());
        assert_eq!(next.funnel_stage, template.funnel_stage);
        assert_eq!(next.channel, template.channel);
        assert_eq!(next.platform, template.platform);
        assert_eq!(next.targeting, template.targeting);
    }

    #[test]
    fn test_untiered_fields_do_not_cascade() {
        let draft = populated_draft();
        let next =
            apply_field_update(&draft, FieldUpdate::Name("Summer Promo".to_string())).unwrap();
        assert_eq!(next.name, "Summer Promo");
        assert_eq!(next.targeting, draft.targeting);
        assert_eq!(next.budget, draft.budget);

        let next = apply_field_update(
            &draft,
            FieldUpdate::CompanyOverview(CompanyOverview::default()),
        )
        .unwrap();
        assert_eq!(next.creative, draft.creative);
    }

    #[test]
    fn test_budget_change_cascades_nowhere() {
        let draft = populated_draft();
        let next = apply_field_update(
            &draft,
            FieldUpdate::Budget(BudgetConfig {
                duration: 14,
                ..draft.budget.clone()
            }),
        )
        .unwrap();
        assert_eq!(next.budget.duration, 14);
        assert_eq!(next.creative, draft.creative);
    }

    #[test]
    fn test_platform_outside_channel_is_rejected() {
        let draft = populated_draft();
        let err = apply_field_update(&draft, FieldUpdate::Platform(Platform::YouTube)).unwrap_err();
        assert!(matches!(
            err,
            AdPilotError::InvalidPlatform {
                channel: Channel::Social,
                platform: Platform::YouTube
            }
        ));
    }

    #[test]
    fn test_same_value_is_borrowed() {
        let draft = populated_draft();
        let next = apply_field_update(&draft, FieldUpdate::Platform(Platform::LinkedInAds)).unwrap();
        assert!(matches!(next, Cow::Borrowed(_)));
    }

    #[test]
    fn test_value_equal_after_normalization_is_noop() {
        let draft = populated_draft();
        let mut budget = draft.budget.clone();
        budget.duration = 5000;
        let once = apply_field_update(&draft, FieldUpdate::Budget(budget.clone()))
            .unwrap()
            .into_owned();
        assert_eq!(once.budget.duration, 365);

        let twice = apply_field_update(&once, FieldUpdate::Budget(budget)).unwrap();
        assert!(matches!(twice, Cow::Borrowed(_)));
    }

    #[test]
    fn test_targeting_lists_are_deduplicated() {
        let draft = populated_draft();
        let next = apply_field_update(
            &draft,
            FieldUpdate::Targeting(TargetingCriteria {
                interests: vec!["Pizza".into(), "PIZZA".into(), "Pasta".into()],
                devices: vec![Device::Tablet, Device::Tablet],
                ..draft.targeting.clone()
            }),
        )
        .unwrap();
        assert_eq!(next.targeting.interests, vec!["Pizza", "Pasta"]);
        assert_eq!(next.targeting.devices, vec![Device::Tablet]);
        assert_eq!(next.creative, CreativeAsset::default());
    }

    #[test]
    fn test_update_wire_format() {
        let update: FieldUpdate =
            serde_json::from_str(r#"{"field": "channel", "value": "Search"}"#).unwrap();
        assert_eq!(update, FieldUpdate::Channel(Channel::Search));

        let update: FieldUpdate =
            serde_json::from_str(r#"{"field": "businessName", "value": "Joe's Pizza"}"#).unwrap();
        assert_eq!(update.field(), FieldName::BusinessName);
    }

    // ─── Properties ────────────────────────────────────────────────────────

    fn all_platforms() -> Vec<Platform> {
        Channel::ALL
            .iter()
            .flat_map(|c| c.platforms().iter().copied())
            .collect()
    }

    fn arb_text() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["", "Joe's Pizza", "Acme", "  padded  ", "Acme"])
            .prop_map(str::to_string)
    }

    fn arb_update() -> impl Strategy<Value = FieldUpdate> {
        prop_oneof![
            arb_text().prop_map(FieldUpdate::Name),
            arb_text().prop_map(FieldUpdate::BusinessName),
            arb_text().prop_map(FieldUpdate::WebsiteUrl),
            prop::sample::select(Industry::ALL.to_vec()).prop_map(FieldUpdate::Industry),
            arb_text().prop_map(|summary| FieldUpdate::CompanyOverview(CompanyOverview {
                summary,
                ..CompanyOverview::default()
            })),
            prop::sample::select(FunnelStage::ALL.to_vec()).prop_map(FieldUpdate::FunnelStage),
            prop::sample::select(Channel::ALL.to_vec()).prop_map(FieldUpdate::Channel),
            prop::sample::select(all_platforms()).prop_map(FieldUpdate::Platform),
            prop::collection::vec(arb_text(), 0..4).prop_map(|interests| {
                FieldUpdate::Targeting(TargetingCriteria {
                    interests,
                    ..TargetingCriteria::default()
                })
            }),
            (arb_text(), 0usize..60).prop_map(|(headline, pad)| {
                FieldUpdate::Creative(CreativeAsset {
                    headline: format!("{headline}{}", "x".repeat(pad)),
                    ..CreativeAsset::default()
                })
            }),
            (-10.0f64..500.0, 0u32..400).prop_map(|(daily_limit, duration)| {
                FieldUpdate::Budget(BudgetConfig {
                    daily_limit,
                    duration,
                    ..BudgetConfig::default()
                })
            }),
        ]
    }

    fn arb_draft() -> impl Strategy<Value = Campaign> {
        prop::collection::vec(arb_update(), 0..12).prop_map(|updates| {
            updates.into_iter().fold(Campaign::draft_template(), |draft, u| {
                match apply_field_update(&draft, u) {
                    Ok(next) => next.into_owned(),
                    Err(_) => draft,
                }
            })
        })
    }

    proptest! {
        #[test]
        fn prop_apply_is_idempotent(draft in arb_draft(), update in arb_update()) {
            if let Ok(once) = apply_field_update(&draft, update.clone()) {
                let once = once.into_owned();
                let twice = apply_field_update(&once, update).unwrap();
                prop_assert!(matches!(twice, Cow::Borrowed(_)));
                prop_assert_eq!(twice.into_owned(), once);
            }
        }

        #[test]
        fn prop_platform_valid_after_any_sequence(draft in arb_draft()) {
            prop_assert!(draft.channel.supports(draft.platform));
        }

        #[test]
        fn prop_only_downstream_fields_change(draft in arb_draft(), update in arb_update()) {
            let field = update.field();
            if let Ok(next) = apply_field_update(&draft, update) {
                let resets = field.tier().map(|t| t.resets()).unwrap_or(&[]);
                for other in FieldName::ALL {
                    let touched = other == field
                        || resets.contains(&other)
                        || (field == FieldName::Channel && other == FieldName::Platform);
                    if !touched {
                        prop_assert_eq!(
                            FieldUpdate::current(&next, other),
                            FieldUpdate::current(&draft, other)
                        );
                    }
                }
            }
        }
    }
}
