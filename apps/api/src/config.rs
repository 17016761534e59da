use anyhow::{Context, Result};

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_CHAT_IDLE_TIMEOUT_SECS: u64 = 60 * 60;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. When unset, records live in process memory.
    pub database_url: Option<String>,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_url: String,
    /// Request timeout for the language-model call. `None` means the call may block indefinitely.
    pub llm_timeout_secs: Option<u64>,
    /// End the interview automatically once the chat reaches its closing message.
    pub chat_auto_end: bool,
    /// Chats untouched for this long are dropped from memory.
    pub chat_idle_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_url: optional_env("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
            llm_timeout_secs: optional_env("LLM_TIMEOUT_SECS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            chat_auto_end: optional_env("CHAT_AUTO_END")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            chat_idle_timeout_secs: optional_env("CHAT_IDLE_TIMEOUT_SECS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("CHAT_IDLE_TIMEOUT_SECS must be a whole number of seconds")?
                .unwrap_or(DEFAULT_CHAT_IDLE_TIMEOUT_SECS),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_truthy_values() {
        for v in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(parse_flag(v), "{v} should be truthy");
        }
    }

    #[test]
    fn test_parse_flag_rejects_everything_else() {
        for v in ["0", "false", "no", "off", "maybe", ""] {
            assert!(!parse_flag(v), "{v} should be falsy");
        }
    }
}
