//! Deterministic collaborator used when no API key is configured.
//!
//! Produces plausible content from simple industry heuristics so the wizard
//! and dashboard stay usable offline and in tests.

use crate::collaborator::GenerationCollaborator;
use crate::error::CollaboratorResult;
use crate::normalize::DEFAULT_LOCATION;
use crate::types::{
    AdImageRequest, Anomaly, CompanyOverviewRequest, CreativeCopy, CreativeCopyRequest, Insight,
    InsightKind, InsightReport, Severity, TargetingRequest, TargetingTextRequest,
};
use adpilot_core::types::{
    truncate_chars, CampaignMetrics, CompanyOverview, Device, Industry, Platform,
    TargetingCriteria, DESCRIPTION_MAX_CHARS, HEADLINE_MAX_CHARS, HEADLINE_PART2_MAX_CHARS,
};
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

/// Spend on the latest day above this multiple of the prior average is flagged.
const SPEND_SPIKE_RATIO: f64 = 1.5;

#[derive(Debug, Clone, Default)]
pub struct OfflineCollaborator {
    delay: Option<Duration>,
}

impl OfflineCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate service latency on every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn industry_services(industry: Industry) -> &'static [&'static str] {
    match industry {
        Industry::Retail => &["In-store shopping", "Online orders", "Gift cards"],
        Industry::Services => &["Consultations", "Appointments", "Maintenance plans"],
        Industry::FoodBeverage => &["Dine-in", "Takeout", "Delivery", "Catering"],
        Industry::Technology => &["Software subscriptions", "Integrations", "Support"],
        Industry::Other => &["Products", "Services"],
    }
}

fn industry_interests(industry: Industry) -> &'static [&'static str] {
    match industry {
        Industry::Retail => &["Shopping", "Fashion", "Deals"],
        Industry::Services => &["Home improvement", "Local services", "Small business"],
        Industry::FoodBeverage => &["Food", "Restaurants", "Dining out"],
        Industry::Technology => &["Technology", "Software", "Productivity"],
        Industry::Other => &["Local events", "Community"],
    }
}

fn search_keywords(business_name: &str, industry: Industry) -> Vec<String> {
    let label = industry.label().to_lowercase();
    vec![
        business_name.to_lowercase(),
        format!("{label} near me"),
        format!("best {label}"),
    ]
}

fn cta_for(platform: Platform) -> &'static str {
    match platform {
        Platform::LinkedInAds => "Learn More",
        Platform::GoogleAds => "Get Started",
        Platform::YouTube => "Watch Now",
        Platform::MetaAds | Platform::GoogleDisplay => "Shop Now",
    }
}

#[async_trait]
impl GenerationCollaborator for OfflineCollaborator {
    async fn company_overview(
        &self,
        request: &CompanyOverviewRequest,
    ) -> CollaboratorResult<CompanyOverview> {
        self.pause().await;
        Ok(CompanyOverview {
            summary: format!(
                "{} is a {} business serving customers online and in person.",
                request.business_name,
                request.industry.label().to_lowercase()
            ),
            business_type: request.industry.label().to_string(),
            services: industry_services(request.industry)
                .iter()
                .map(|s| s.to_string())
                .collect(),
            location: DEFAULT_LOCATION.to_string(),
        })
    }

    async fn targeting_from_business_info(
        &self,
        request: &TargetingRequest,
    ) -> CollaboratorResult<TargetingCriteria> {
        self.pause().await;
        let keywords = if request.platform == Platform::GoogleAds {
            search_keywords(&request.business_name, request.industry)
        } else {
            Vec::new()
        };
        let age_range = match request.platform {
            Platform::LinkedInAds => "25-54",
            _ => "18-65+",
        };
        Ok(TargetingCriteria {
            locations: vec![DEFAULT_LOCATION.to_string()],
            interests: industry_interests(request.industry)
                .iter()
                .map(|s| s.to_string())
                .collect(),
            age_range: age_range.to_string(),
            devices: Device::default_set(),
            keywords,
            ..TargetingCriteria::default()
        }
        .normalized())
    }

    async fn targeting_from_text(
        &self,
        request: &TargetingTextRequest,
    ) -> CollaboratorResult<TargetingCriteria> {
        self.pause().await;
        let text = request.free_text.trim();

        // "... in <Place>" names the location; the remainder reads as interests.
        let (subject, location) = match text.rsplit_once(" in ") {
            Some((subject, place)) if !place.trim().is_empty() => (subject, place.trim()),
            _ => (text, DEFAULT_LOCATION),
        };
        let interests = subject
            .split([',', ';'])
            .flat_map(|part| part.split(" and "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let keywords = if request.platform == Platform::GoogleAds {
            search_keywords(&request.business_name, request.industry)
        } else {
            Vec::new()
        };

        Ok(TargetingCriteria {
            locations: vec![location.to_string()],
            interests,
            keywords,
            ..TargetingCriteria::default()
        }
        .normalized())
    }

    async fn creative_copy(&self, request: &CreativeCopyRequest) -> CollaboratorResult<CreativeCopy> {
        self.pause().await;
        let audience = request
            .targeting
            .interests
            .first()
            .map(|i| i.to_lowercase())
            .unwrap_or_else(|| "you".to_string());
        let headline_part2 = (request.platform == Platform::GoogleAds).then(|| {
            truncate_chars(
                &format!("Trusted {}", request.industry.label()),
                HEADLINE_PART2_MAX_CHARS,
            )
        });
        Ok(CreativeCopy {
            headline: truncate_chars(
                &format!("Discover {}", request.business_name),
                HEADLINE_MAX_CHARS,
            ),
            headline_part2,
            description: truncate_chars(
                &format!(
                    "{} made for {}. See why locals choose {}.",
                    request.industry.label(),
                    audience,
                    request.business_name
                ),
                DESCRIPTION_MAX_CHARS,
            ),
            cta_text: cta_for(request.platform).to_string(),
        })
    }

    async fn ad_image(&self, request: &AdImageRequest) -> CollaboratorResult<String> {
        self.pause().await;
        let svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1200\" height=\"628\">\
             <rect width=\"100%\" height=\"100%\" fill=\"#1e293b\"/>\
             <text x=\"50%\" y=\"50%\" fill=\"#f8fafc\" font-size=\"48\" text-anchor=\"middle\">{}</text>\
             </svg>",
            escape_xml(request.industry.label())
        );
        let encoded = base64::engine::general_purpose::STANDARD.encode(svg);
        Ok(format!("data:image/svg+xml;base64,{encoded}"))
    }

    async fn insights(&self, metrics: &CampaignMetrics) -> CollaboratorResult<InsightReport> {
        self.pause().await;
        let mut insights = Vec::new();

        if metrics.impressions > 0 {
            let (kind, message) = if metrics.ctr >= 2.0 {
                (
                    InsightKind::Success,
                    format!(
                        "Your ad is resonating: {:.1}% of people who see it click through.",
                        metrics.ctr
                    ),
                )
            } else {
                (
                    InsightKind::Warning,
                    "Lots of people see your ad but few click. Try a stronger headline."
                        .to_string(),
                )
            };
            insights.push(Insight {
                id: format!("insight-{}", insights.len() + 1),
                kind,
                message,
            });
        }

        if metrics.conversions > 0 {
            insights.push(Insight {
                id: format!("insight-{}", insights.len() + 1),
                kind: InsightKind::Info,
                message: format!(
                    "Each sale is costing about ${:.2}.",
                    metrics.spend / metrics.conversions as f64
                ),
            });
        } else if metrics.clicks > 0 {
            insights.push(Insight {
                id: format!("insight-{}", insights.len() + 1),
                kind: InsightKind::Danger,
                message: "People are clicking but nobody has bought yet. Check your landing page."
                    .to_string(),
            });
        }

        Ok(InsightReport {
            insights,
            anomaly: spend_anomaly(&metrics.daily_spend),
        })
    }

    async fn custom_insight(
        &self,
        metrics: &CampaignMetrics,
        _question: &str,
    ) -> CollaboratorResult<String> {
        self.pause().await;
        Ok(format!(
            "So far you have spent ${:.2} for {} clicks and {} conversions, \
             with {:.2}% of viewers clicking.",
            metrics.spend, metrics.clicks, metrics.conversions, metrics.ctr
        ))
    }
}

fn spend_anomaly(daily_spend: &[f64]) -> Anomaly {
    let Some((last, prior)) = daily_spend.split_last() else {
        return Anomaly::default();
    };
    if prior.is_empty() {
        return Anomaly::default();
    }
    let average = prior.iter().sum::<f64>() / prior.len() as f64;
    if average > 0.0 && *last > average * SPEND_SPIKE_RATIO {
        Anomaly {
            detected: true,
            description: format!(
                "Yesterday's spend of ${last:.2} is well above your ${average:.2} daily average."
            ),
            severity: Severity::Medium,
        }
    } else {
        Anomaly::default()
    }
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
