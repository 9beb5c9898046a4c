//! Defensive normalization of raw generation output.
//!
//! The service is asked for JSON matching a schema but nothing guarantees it.
//! Missing or mistyped lists become empty, missing scalars take documented
//! fallbacks, and anything that is not a JSON object is a `Malformed` error.

use crate::error::{CollaboratorError, CollaboratorResult};
use crate::types::{
    Anomaly, CompanyOverviewRequest, CreativeCopy, Insight, InsightKind, InsightReport, Severity,
};
use adpilot_core::types::{
    dedupe_text, truncate_chars, CompanyOverview, Device, Gender, TargetingCriteria,
    DEFAULT_AGE_RANGE, DEFAULT_CTA_TEXT, DESCRIPTION_MAX_CHARS, HEADLINE_MAX_CHARS,
    HEADLINE_PART2_MAX_CHARS,
};
use serde_json::Value;

pub const DEFAULT_LOCATION: &str = "United States";
pub const FALLBACK_ANSWER: &str = "Could not generate an answer.";

/// Parse model text into a JSON object, tolerating a Markdown code fence.
pub fn parse_json_object(text: &str) -> CollaboratorResult<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CollaboratorError::EmptyResponse);
    }
    let body = strip_code_fence(trimmed);
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(CollaboratorError::Malformed(
            "expected a JSON object".to_string(),
        ));
    }
    Ok(value)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn text_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn text_list(raw: &Value, key: &str) -> Vec<String> {
    let items = raw
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    dedupe_text(items)
}

pub fn company_overview(raw: &Value, request: &CompanyOverviewRequest) -> CompanyOverview {
    CompanyOverview {
        summary: text_field(raw, "summary").unwrap_or_else(|| {
            format!(
                "A {} business operating as {}.",
                request.industry.label(),
                request.business_name
            )
        }),
        business_type: text_field(raw, "businessType")
            .unwrap_or_else(|| request.industry.label().to_string()),
        services: text_list(raw, "services"),
        location: text_field(raw, "location").unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
    }
}

pub fn targeting(raw: &Value) -> TargetingCriteria {
    let gender = match text_field(raw, "gender").as_deref() {
        Some(g) if g.eq_ignore_ascii_case("male") => Gender::Male,
        Some(g) if g.eq_ignore_ascii_case("female") => Gender::Female,
        _ => Gender::All,
    };

    let devices = match raw.get("devices").and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(Device::parse)
            .collect(),
        None => Device::default_set(),
    };

    TargetingCriteria {
        locations: text_list(raw, "locations"),
        interests: text_list(raw, "interests"),
        age_range: text_field(raw, "ageRange").unwrap_or_else(|| DEFAULT_AGE_RANGE.to_string()),
        gender,
        devices,
        keywords: text_list(raw, "keywords"),
    }
    .normalized()
}

pub fn creative_copy(raw: &Value) -> CreativeCopy {
    CreativeCopy {
        headline: truncate_chars(
            &text_field(raw, "headline").unwrap_or_default(),
            HEADLINE_MAX_CHARS,
        ),
        headline_part2: text_field(raw, "headlinePart2")
            .map(|h| truncate_chars(&h, HEADLINE_PART2_MAX_CHARS)),
        description: truncate_chars(
            &text_field(raw, "description").unwrap_or_default(),
            DESCRIPTION_MAX_CHARS,
        ),
        cta_text: text_field(raw, "ctaText").unwrap_or_else(|| DEFAULT_CTA_TEXT.to_string()),
    }
}

pub fn insight_report(raw: &Value) -> InsightReport {
    let insights = raw
        .get("insights")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(idx, item)| {
                    let message = text_field(item, "message")?;
                    let kind = match text_field(item, "type").as_deref() {
                        Some("success") => InsightKind::Success,
                        Some("warning") => InsightKind::Warning,
                        Some("danger") => InsightKind::Danger,
                        _ => InsightKind::Info,
                    };
                    Some(Insight {
                        id: text_field(item, "id").unwrap_or_else(|| format!("insight-{}", idx + 1)),
                        kind,
                        message,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let anomaly = raw
        .get("anomaly")
        .filter(|a| a.is_object())
        .map(|a| Anomaly {
            detected: a.get("detected").and_then(Value::as_bool).unwrap_or(false),
            description: text_field(a, "description").unwrap_or_default(),
            severity: match text_field(a, "severity").as_deref() {
                Some("high") => Severity::High,
                Some("medium") => Severity::Medium,
                _ => Severity::Low,
            },
        })
        .unwrap_or_default();

    InsightReport { insights, anomaly }
}

pub fn custom_answer(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        FALLBACK_ANSWER.to_string()
    } else {
        trimmed.to_string()
    }
}
