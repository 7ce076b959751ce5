//! Environment-driven configuration.
//!
//! Call [`load_dotenv`] once at startup, then [`Config::from_env`].

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub rules: RulesConfig,
    pub llm: LlmConfig,
    pub github: GithubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; `*` means any.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Directory scanned for detection rule files.
    pub rules_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Gemini API key; enrichment is disabled when unset.
    pub api_key: Option<String>,
    pub model: String,
    /// Path to the MITRE ATT&CK dataset handed to the classifier.
    pub knowledge_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env_or("DW_HOST", "0.0.0.0"),
                port: env_u16("DW_PORT", 8000),
                cors_origins: env_or("DW_CORS_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            rules: RulesConfig {
                rules_dir: PathBuf::from(env_or("DW_RULES_DIR", "rules")),
            },
            llm: LlmConfig {
                api_key: env_opt("GEMINI_API_KEY"),
                model: env_or("DW_LLM_MODEL", "gemini-2.5-flash-lite"),
                knowledge_path: PathBuf::from(env_or(
                    "DW_MITRE_DATA",
                    "data/mitre_attack.json",
                )),
            },
            github: GithubConfig {
                token: env_opt("GITHUB_TOKEN"),
                owner: env_opt("GITHUB_OWNER"),
                repo: env_opt("GITHUB_REPO"),
            },
        }
    }

    /// Warn about configuration gaps that disable features.
    ///
    /// Returns false when any gap was found; startup continues either way.
    pub fn validate(&self) -> bool {
        let mut ok = true;
        if self.llm.api_key.is_none() {
            warn!("GEMINI_API_KEY not set, enrichment pipeline disabled");
            ok = false;
        }
        if self.github.token.is_none() || self.github.owner.is_none() || self.github.repo.is_none()
        {
            warn!("GitHub credentials incomplete, tickets will be emitted on the bus only");
            ok = false;
        }
        if !self.rules.rules_dir.exists() {
            warn!(
                rules_dir = %self.rules.rules_dir.display(),
                "rules directory does not exist, rule matching will find nothing"
            );
            ok = false;
        }
        ok
    }
}
