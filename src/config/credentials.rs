use crate::ConfigError;
use std::fmt;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const EXA_API_KEY: &str = "EXA_API_KEY";

/// API keys for the external services the report generator talks to
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub exa_api_key: String,
}

impl Credentials {
    /// Reads both keys from the process environment
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honored.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads both keys through an arbitrary lookup; empty values count as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingCredential(key))
        };

        Ok(Self {
            openai_api_key: require(OPENAI_API_KEY)?,
            exa_api_key: require(EXA_API_KEY)?,
        })
    }
}

// Keys never reach the logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"***")
            .field("exa_api_key", &"***")
            .finish()
    }
}
