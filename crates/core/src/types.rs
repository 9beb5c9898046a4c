use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id carried by every campaign that has not been promoted out of the wizard.
pub const DRAFT_PLACEHOLDER_ID: &str = "temp-1";

pub const HEADLINE_MAX_CHARS: usize = 40;
pub const HEADLINE_PART2_MAX_CHARS: usize = 30;
pub const DESCRIPTION_MAX_CHARS: usize = 90;

pub const MIN_DAILY_LIMIT: f64 = 5.0;
pub const MIN_DURATION_DAYS: u32 = 1;
pub const MAX_DURATION_DAYS: u32 = 365;

pub const DEFAULT_AGE_RANGE: &str = "18-65+";
pub const DEFAULT_CTA_TEXT: &str = "Shop Now";
pub const DEFAULT_PRIMARY_COLOR: &str = "#3b82f6";

// ─── Campaign ──────────────────────────────────────────────────────────────

/// The campaign aggregate. A draft while it lives in the wizard, a managed
/// entity once promoted into the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub business_name: String,
    pub website_url: String,
    pub industry: Industry,
    #[serde(default)]
    pub company_overview: CompanyOverview,
    pub funnel_stage: FunnelStage,
    pub channel: Channel,
    pub platform: Platform,
    pub status: CampaignStatus,
    #[serde(default)]
    pub targeting: TargetingCriteria,
    #[serde(default)]
    pub creative: CreativeAsset,
    #[serde(default)]
    pub budget: BudgetConfig,
    #[serde(default)]
    pub metrics: CampaignMetrics,
}

impl Campaign {
    /// The initial draft template. Every cascade reset restores values from here.
    pub fn draft_template() -> Self {
        Self {
            id: DRAFT_PLACEHOLDER_ID.to_string(),
            name: "New Campaign".to_string(),
            start_date: Utc::now(),
            business_name: String::new(),
            website_url: String::new(),
            industry: Industry::default(),
            company_overview: CompanyOverview::default(),
            funnel_stage: FunnelStage::default(),
            channel: Channel::default(),
            platform: Platform::default(),
            status: CampaignStatus::Draft,
            targeting: TargetingCriteria::default(),
            creative: CreativeAsset::default(),
            budget: BudgetConfig::default(),
            metrics: CampaignMetrics::default(),
        }
    }

    pub fn is_draft_placeholder(&self) -> bool {
        self.id == DRAFT_PLACEHOLDER_ID
    }

    /// True when cumulative spend has met or passed the hard cap.
    pub fn cap_exceeded(&self) -> bool {
        self.metrics.spend >= self.budget.hard_cap
    }
}

impl Default for Campaign {
    fn default() -> Self {
        Self::draft_template()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Completed,
    CapReached,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Industry {
    #[default]
    Retail,
    Services,
    #[serde(rename = "Food & Beverage")]
    FoodBeverage,
    Technology,
    Other,
}

impl Industry {
    pub const ALL: [Industry; 5] = [
        Industry::Retail,
        Industry::Services,
        Industry::FoodBeverage,
        Industry::Technology,
        Industry::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Industry::Retail => "Retail",
            Industry::Services => "Services",
            Industry::FoodBeverage => "Food & Beverage",
            Industry::Technology => "Technology",
            Industry::Other => "Other",
        }
    }
}

/// AIDA classification of campaign intent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FunnelStage {
    #[default]
    Awareness,
    Interest,
    Desire,
    Action,
}

impl FunnelStage {
    pub const ALL: [FunnelStage; 4] = [
        FunnelStage::Awareness,
        FunnelStage::Interest,
        FunnelStage::Desire,
        FunnelStage::Action,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FunnelStage::Awareness => "Awareness",
            FunnelStage::Interest => "Interest",
            FunnelStage::Desire => "Desire",
            FunnelStage::Action => "Action",
        }
    }

    /// Channels suggested for this stage, strongest first.
    pub fn recommended_channels(&self) -> &'static [Channel] {
        match self {
            FunnelStage::Awareness => &[Channel::Video, Channel::Display, Channel::Social],
            FunnelStage::Interest | FunnelStage::Desire => &[Channel::Social, Channel::Search],
            FunnelStage::Action => &[Channel::Search, Channel::Social],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Channel {
    Search,
    #[default]
    Social,
    Display,
    Video,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Search,
        Channel::Social,
        Channel::Display,
        Channel::Video,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Channel::Search => "Paid Search (SEM)",
            Channel::Social => "Social Advertising",
            Channel::Display => "Display Advertising",
            Channel::Video => "Video Advertising",
        }
    }

    /// Platforms that can serve this channel. The first entry is the default.
    pub fn platforms(&self) -> &'static [Platform] {
        match self {
            Channel::Search => &[Platform::GoogleAds],
            Channel::Social => &[Platform::MetaAds, Platform::LinkedInAds],
            Channel::Display => &[Platform::GoogleDisplay],
            Channel::Video => &[Platform::YouTube],
        }
    }

    pub fn default_platform(&self) -> Platform {
        self.platforms()[0]
    }

    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms().contains(&platform)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Platform {
    GoogleAds,
    #[default]
    MetaAds,
    LinkedInAds,
    GoogleDisplay,
    YouTube,
}

impl Platform {
    pub fn label(&self) -> &'static str {
        match self {
            Platform::GoogleAds => "Google Ads",
            Platform::MetaAds => "Meta Ads",
            Platform::LinkedInAds => "LinkedIn Ads",
            Platform::GoogleDisplay => "Google Display Network",
            Platform::YouTube => "YouTube Ads",
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            Platform::GoogleAds => Channel::Search,
            Platform::MetaAds | Platform::LinkedInAds => Channel::Social,
            Platform::GoogleDisplay => Channel::Display,
            Platform::YouTube => Channel::Video,
        }
    }
}

// ─── Company Overview ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyOverview {
    pub summary: String,
    pub business_type: String,
    pub services: Vec<String>,
    pub location: String,
}

impl CompanyOverview {
    pub fn is_blank(&self) -> bool {
        self.summary.trim().is_empty()
    }
}

// ─── Targeting ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    #[default]
    All,
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Device {
    Mobile,
    Desktop,
    Tablet,
}

impl Device {
    pub fn default_set() -> Vec<Device> {
        vec![Device::Mobile, Device::Desktop]
    }

    pub fn parse(raw: &str) -> Option<Device> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mobile" => Some(Device::Mobile),
            "desktop" => Some(Device::Desktop),
            "tablet" => Some(Device::Tablet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetingCriteria {
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default = "default_age_range")]
    pub age_range: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default = "Device::default_set")]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn default_age_range() -> String {
    DEFAULT_AGE_RANGE.to_string()
}

impl Default for TargetingCriteria {
    fn default() -> Self {
        Self {
            locations: Vec::new(),
            interests: Vec::new(),
            age_range: default_age_range(),
            gender: Gender::All,
            devices: Device::default_set(),
            keywords: Vec::new(),
        }
    }
}

impl TargetingCriteria {
    /// True when neither interests nor locations have been filled in.
    pub fn is_unpopulated(&self) -> bool {
        self.interests.is_empty() && self.locations.is_empty()
    }

    /// Set semantics: trims entries, drops blanks and duplicates, keeps first-seen order.
    pub fn normalized(mut self) -> Self {
        self.locations = dedupe_text(self.locations);
        self.interests = dedupe_text(self.interests);
        self.keywords = dedupe_text(self.keywords);
        let mut devices = Vec::with_capacity(self.devices.len());
        for device in self.devices {
            if !devices.contains(&device) {
                devices.push(device);
            }
        }
        self.devices = devices;
        if self.age_range.trim().is_empty() {
            self.age_range = default_age_range();
        }
        self
    }
}

/// Trim, drop blanks and drop case-insensitive duplicates, preserving order.
pub fn dedupe_text(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        if out.iter().any(|v| v.eq_ignore_ascii_case(trimmed)) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}

// ─── Creative ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LayoutTemplate {
    #[default]
    Classic,
    Bold,
    Minimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreativeAsset {
    pub headline: String,
    /// Second headline, only rendered for Search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline_part2: Option<String>,
    pub description: String,
    pub primary_color: String,
    pub cta_text: String,
    pub layout_template: LayoutTemplate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
}

impl Default for CreativeAsset {
    fn default() -> Self {
        Self {
            headline: String::new(),
            headline_part2: None,
            description: String::new(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            cta_text: DEFAULT_CTA_TEXT.to_string(),
            layout_template: LayoutTemplate::Classic,
            background_image_url: None,
        }
    }
}

impl CreativeAsset {
    /// Clamp copy to its character limits and collapse empty optionals to `None`.
    pub fn normalized(mut self) -> Self {
        self.headline = truncate_chars(&self.headline, HEADLINE_MAX_CHARS);
        self.description = truncate_chars(&self.description, DESCRIPTION_MAX_CHARS);
        self.headline_part2 = self
            .headline_part2
            .map(|h| truncate_chars(&h, HEADLINE_PART2_MAX_CHARS))
            .filter(|h| !h.is_empty());
        self.background_image_url = self.background_image_url.filter(|u| !u.trim().is_empty());
        if self.cta_text.trim().is_empty() {
            self.cta_text = DEFAULT_CTA_TEXT.to_string();
        }
        if self.primary_color.trim().is_empty() {
            self.primary_color = DEFAULT_PRIMARY_COLOR.to_string();
        }
        self
    }
}

pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

// ─── Budget ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetConfig {
    pub daily_limit: f64,
    /// The safety lock: spend at or above this value stops the campaign.
    pub hard_cap: f64,
    pub currency: String,
    /// Duration in days.
    pub duration: u32,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            daily_limit: 50.0,
            hard_cap: 500.0,
            currency: "USD".to_string(),
            duration: 30,
        }
    }
}

impl BudgetConfig {
    /// Clamp every field into its valid range; non-finite amounts fall back to the template.
    pub fn normalized(mut self) -> Self {
        let template = BudgetConfig::default();
        self.daily_limit = if self.daily_limit.is_finite() {
            self.daily_limit.max(MIN_DAILY_LIMIT)
        } else {
            template.daily_limit
        };
        self.hard_cap = if self.hard_cap.is_finite() {
            self.hard_cap.max(0.0)
        } else {
            template.hard_cap
        };
        self.duration = self.duration.clamp(MIN_DURATION_DAYS, MAX_DURATION_DAYS);
        if self.currency.trim().is_empty() {
            self.currency = template.currency;
        }
        self
    }

    /// Projected spend if the daily limit is used every day.
    pub fn estimated_total_spend(&self) -> f64 {
        self.daily_limit * f64::from(self.duration)
    }
}

// ─── Metrics ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignMetrics {
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: f64,
    pub cpc: f64,
    /// Click-through rate as a percentage.
    pub ctr: f64,
    pub dates: Vec<String>,
    pub daily_spend: Vec<f64>,
}

impl CampaignMetrics {
    pub fn is_aligned(&self) -> bool {
        self.dates.len() == self.daily_spend.len()
    }

    /// Recompute `cpc` and `ctr` from the raw counters.
    pub fn recompute_derived(&mut self) {
        self.cpc = if self.clicks > 0 {
            self.spend / self.clicks as f64
        } else {
            0.0
        };
        self.ctr = if self.impressions > 0 {
            self.clicks as f64 / self.impressions as f64 * 100.0
        } else {
            0.0
        };
    }

    /// Append one day of spend, keeping `dates` and `daily_spend` aligned.
    pub fn record_daily_spend(&mut self, day: impl Into<String>, amount: f64) {
        self.dates.push(day.into());
        self.daily_spend.push(amount);
        self.spend += amount;
        self.recompute_derived();
    }
}
