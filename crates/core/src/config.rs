use crate::error::AdPilotResult;
use serde::Deserialize;

/// Root application configuration. Loaded from an optional `adpilot.toml`
/// and environment variables with the prefix `ADPILOT__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub genai: GenAiConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Settings for the generative AI collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct GenAiConfig {
    #[serde(default = "default_genai_base_url")]
    pub base_url: String,
    /// Without a key the offline collaborator is used.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_genai_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_genai_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_genai_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WizardConfig {
    /// Issue collaborator calls automatically when a step is entered with missing content.
    #[serde(default = "default_auto_populate")]
    pub auto_populate: bool,
    /// Seed the registry with the demo campaigns at startup.
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

// Default functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_enabled() -> bool {
    true
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_genai_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}
fn default_genai_timeout_ms() -> u64 {
    30_000
}
fn default_genai_max_retries() -> u32 {
    2
}
fn default_genai_retry_delay_ms() -> u64 {
    250
}
fn default_auto_populate() -> bool {
    true
}
fn default_seed_demo_data() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            port: default_metrics_port(),
        }
    }
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_genai_base_url(),
            api_key: None,
            text_model: default_text_model(),
            image_model: default_image_model(),
            timeout_ms: default_genai_timeout_ms(),
            max_retries: default_genai_max_retries(),
            retry_delay_ms: default_genai_retry_delay_ms(),
        }
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            auto_populate: default_auto_populate(),
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            genai: GenAiConfig::default(),
            wizard: WizardConfig::default(),
        }
    }
}

impl GenAiConfig {
    /// True when a non-blank API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }
}

impl AppConfig {
    /// Load configuration from an optional `adpilot.toml` and environment variables.
    pub fn load() -> AdPilotResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("adpilot").required(false))
            .add_source(
                config::Environment::with_prefix("ADPILOT")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
