//! Demo campaigns for the dashboard's "Reset Demo" action.

use adpilot_core::types::{
    BudgetConfig, Campaign, CampaignMetrics, CampaignStatus, Channel, CompanyOverview,
    CreativeAsset, FunnelStage, Industry, LayoutTemplate, Platform, TargetingCriteria,
};
use chrono::{DateTime, Duration, Utc};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const WEEKLY_SPEND: [f64; 7] = [120.0, 145.0, 130.0, 160.0, 150.0, 180.0, 135.0];

fn weekly_metrics(impressions: u64, clicks: u64, conversions: u64, spend: f64) -> CampaignMetrics {
    let mut metrics = CampaignMetrics {
        impressions,
        clicks,
        conversions,
        spend,
        dates: WEEKDAYS.iter().map(|d| d.to_string()).collect(),
        daily_spend: WEEKLY_SPEND.to_vec(),
        ..CampaignMetrics::default()
    };
    metrics.recompute_derived();
    metrics
}

fn pizza_place(now: DateTime<Utc>) -> Campaign {
    Campaign {
        id: "demo-123".to_string(),
        name: "Summer Sale - Pizza Place".to_string(),
        start_date: now - Duration::days(14),
        business_name: "Joe's Pizza".to_string(),
        website_url: "https://joespizza.example".to_string(),
        industry: Industry::FoodBeverage,
        company_overview: CompanyOverview {
            summary: "Joe's Pizza is a beloved local pizzeria serving authentic New York-style \
                      slices and whole pies, with a casual dining room and fast delivery."
                .to_string(),
            business_type: "Restaurant / Pizzeria".to_string(),
            services: ["Dine-in", "Takeout", "Delivery", "Catering"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            location: "New York, NY".to_string(),
        },
        funnel_stage: FunnelStage::Action,
        channel: Channel::Social,
        platform: Platform::MetaAds,
        status: CampaignStatus::Active,
        targeting: TargetingCriteria {
            locations: vec!["New York, NY".to_string()],
            interests: vec![
                "Pizza".to_string(),
                "Italian food".to_string(),
                "Food delivery".to_string(),
            ],
            age_range: "18-45".to_string(),
            ..TargetingCriteria::default()
        },
        creative: CreativeAsset {
            headline: "Best Pizza in Town".to_string(),
            headline_part2: Some("Order Online Today".to_string()),
            description: "Authentic NY Style Pizza. Order online now!".to_string(),
            primary_color: "#ef4444".to_string(),
            cta_text: "Order Now".to_string(),
            layout_template: LayoutTemplate::Bold,
            background_image_url: Some(
                "https://images.unsplash.com/photo-1574071318508-1cdbab80d002?auto=format&fit=crop&w=600&h=400"
                    .to_string(),
            ),
        },
        budget: BudgetConfig {
            daily_limit: 100.0,
            hard_cap: 2000.0,
            currency: "USD".to_string(),
            duration: 30,
        },
        metrics: weekly_metrics(45_000, 1_200, 85, 1020.0),
    }
}

/// The three demo campaigns, newest first. Start dates are relative to `now`
/// so the dashboard shows flights in progress.
pub fn demo_campaigns(now: DateTime<Utc>) -> Vec<Campaign> {
    let base = pizza_place(now);

    let retargeting = Campaign {
        id: "demo-456".to_string(),
        name: "Retargeting - Website Visitors".to_string(),
        start_date: now - Duration::days(7),
        funnel_stage: FunnelStage::Action,
        status: CampaignStatus::Active,
        budget: BudgetConfig {
            daily_limit: 40.0,
            hard_cap: 800.0,
            currency: "USD".to_string(),
            duration: 30,
        },
        metrics: weekly_metrics(12_500, 450, 32, 540.0),
        ..base.clone()
    };

    // Spend sits exactly on the cap, so loading it locks the campaign.
    let awareness = Campaign {
        id: "demo-789".to_string(),
        name: "Brand Awareness - Local".to_string(),
        start_date: now - Duration::days(45),
        funnel_stage: FunnelStage::Awareness,
        status: CampaignStatus::Paused,
        budget: BudgetConfig {
            daily_limit: 60.0,
            hard_cap: 1200.0,
            currency: "USD".to_string(),
            duration: 60,
        },
        metrics: weekly_metrics(80_000, 900, 15, 1200.0),
        ..base.clone()
    };

    vec![base, retargeting, awareness]
}
