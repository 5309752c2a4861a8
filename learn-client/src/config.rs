use crate::api::AuthToken;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Base url of the REST API, without trailing slash
    pub base: String,
    pub token: Option<AuthToken>,
}

impl Config {
    pub fn new(base: &str, token: Option<&str>) -> Config {
        Config {
            base: String::from(base.trim_end_matches('/')),
            token: AuthToken::from_raw(token),
        }
    }

    /// Reads `LEARN_API_BASE` and `LEARN_AUTH_TOKEN`
    pub fn from_env() -> Config {
        let base = std::env::var("LEARN_API_BASE").ok();
        let token = std::env::var("LEARN_AUTH_TOKEN").ok();
        Config::new(
            base.as_deref()
                .filter(|b| !b.trim().is_empty())
                .unwrap_or(DEFAULT_API_BASE),
            token.as_deref(),
        )
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new(DEFAULT_API_BASE, None)
    }
}
