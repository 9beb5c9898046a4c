//! Prompt text and JSON response schemas for each generation call.

use crate::types::{
    metrics_summary, AdImageRequest, CompanyOverviewRequest, CreativeCopyRequest,
    TargetingRequest, TargetingTextRequest,
};
use adpilot_core::types::{CampaignMetrics, Platform};
use serde_json::{json, Value};

pub fn company_overview(req: &CompanyOverviewRequest) -> String {
    format!(
        "Analyze the business name \"{name}\", industry \"{industry}\", and website URL \"{url}\".\n\
         1. Generate a brief, professional summary of what the business likely does (max 2 sentences).\n\
         2. Determine the specific business type (e.g. 'Italian Restaurant', 'SaaS Platform').\n\
         3. List 3-5 key services or products they likely offer.\n\
         4. Infer the likely location or service area (default to 'United States' if unknown).\n\
         Return ONLY JSON.",
        name = req.business_name,
        industry = req.industry.label(),
        url = req.website_url,
    )
}

pub fn targeting_from_business_info(req: &TargetingRequest) -> String {
    format!(
        "Act as an expert ad targeting specialist for {platform}.\n\
         Context: Business \"{name}\" in industry \"{industry}\" with website URL \"{url}\".\n\
         Based on this information and the chosen platform ({platform}), infer the specific \
         targeting criteria (demographics, interests, devices).\n\
         {platform_hint}\n\
         If the location is not obvious from the name, default to \"United States\".\n\
         Return ONLY JSON.",
        platform = req.platform.label(),
        name = req.business_name,
        industry = req.industry.label(),
        url = req.website_url,
        platform_hint = platform_hint(req.platform),
    )
}

pub fn targeting_from_text(req: &TargetingTextRequest) -> String {
    format!(
        "Act as an expert ad targeting specialist (NLT engine) for {platform}.\n\
         Context: Business \"{name}\" in industry \"{industry}\".\n\
         User request: \"{text}\"\n\
         Extract specific targeting criteria relevant to {platform}.\n\
         Return ONLY JSON.",
        platform = req.platform.label(),
        name = req.business_name,
        industry = req.industry.label(),
        text = req.free_text,
    )
}

pub fn creative_copy(req: &CreativeCopyRequest) -> String {
    let second_headline = if req.platform == Platform::GoogleAds {
        "Also provide a second headline (max 30 chars).\n"
    } else {
        ""
    };
    format!(
        "Create ad copy for \"{name}\" ({industry}) specifically for {platform}.\n\
         Target audience: {interests}; {locations}.\n\
         Generate a catchy headline (max 40 chars), a persuasive description (max 90 chars), \
         and a call to action.\n\
         {second_headline}\
         Ensure the tone matches the platform (e.g. professional for LinkedIn, casual for Meta).",
        name = req.business_name,
        industry = req.industry.label(),
        platform = req.platform.label(),
        interests = req.targeting.interests.join(", "),
        locations = req.targeting.locations.join(", "),
    )
}

pub fn ad_image(req: &AdImageRequest) -> String {
    let interests: Vec<&str> = req
        .targeting
        .interests
        .iter()
        .take(3)
        .map(String::as_str)
        .collect();
    format!(
        "Generate a high-quality, professional advertising image for a business named \"{name}\" \
         in the {industry} industry.\n\
         The ad will run on {platform}.\n\
         The campaign goal is {stage}.\n\
         Target audience interests: {interests}.\n\
         Style: professional, photorealistic, engaging. Ensure no text is overlaid on the image.",
        name = req.business_name,
        industry = req.industry.label(),
        platform = req.platform.label(),
        stage = req.funnel_stage.label(),
        interests = interests.join(", "),
    )
}

pub fn insights(metrics: &CampaignMetrics) -> String {
    format!(
        "Analyze these ad campaign metrics:\n{summary}\n\
         1. Provide 2-3 plain English insights that translate the data into business value. \
         Avoid jargon.\n\
         2. Detect whether there is a statistical anomaly (positive or negative) requiring \
         immediate attention.",
        summary = metrics_summary(metrics),
    )
}

pub fn custom_insight(metrics: &CampaignMetrics, question: &str) -> String {
    let metrics_json = serde_json::to_string_pretty(metrics).unwrap_or_default();
    format!(
        "You are an expert advertising analyst.\n\
         Here are the campaign metrics:\n{metrics_json}\n\
         User question: \"{question}\"\n\
         Provide a clear, concise answer (max 2-3 sentences) based strictly on the provided data. \
         Use plain English suitable for a small business owner."
    )
}

fn platform_hint(platform: Platform) -> &'static str {
    match platform {
        Platform::LinkedInAds => "Focus on job titles, seniority and industries.",
        Platform::MetaAds => "Focus on interests and behaviors.",
        Platform::GoogleAds => "Focus on high-intent search keywords.",
        Platform::GoogleDisplay => "Focus on topics and site categories.",
        Platform::YouTube => "Focus on viewing interests and channels.",
    }
}

// ─── Response schemas ──────────────────────────────────────────────────────

pub fn company_overview_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "businessType": { "type": "STRING" },
            "services": { "type": "ARRAY", "items": { "type": "STRING" } },
            "location": { "type": "STRING" }
        }
    })
}

pub fn targeting_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "locations": { "type": "ARRAY", "items": { "type": "STRING" } },
            "interests": { "type": "ARRAY", "items": { "type": "STRING" } },
            "ageRange": { "type": "STRING" },
            "gender": { "type": "STRING", "enum": ["All", "Male", "Female"] },
            "devices": {
                "type": "ARRAY",
                "items": { "type": "STRING", "enum": ["Mobile", "Desktop", "Tablet"] }
            },
            "keywords": { "type": "ARRAY", "items": { "type": "STRING" } }
        }
    })
}

pub fn creative_copy_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "headline": { "type": "STRING" },
            "headlinePart2": { "type": "STRING" },
            "description": { "type": "STRING" },
            "ctaText": { "type": "STRING" }
        }
    })
}

pub fn insights_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "insights": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "type": { "type": "STRING", "enum": ["success", "warning", "info", "danger"] },
                        "message": { "type": "STRING" }
                    }
                }
            },
            "anomaly": {
                "type": "OBJECT",
                "properties": {
                    "detected": { "type": "BOOLEAN" },
                    "description": { "type": "STRING" },
                    "severity": { "type": "STRING", "enum": ["low", "medium", "high"] }
                }
            }
        }
    })
}
