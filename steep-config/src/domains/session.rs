//! Simulated user configuration

use crate::error::ConfigResult;
use crate::validation::{validate_ordered, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a flow treats a login page that carries no anti-forgery token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenPolicy {
    /// The login step fails with a `token-missing` tag and no credentials are posted
    #[default]
    Required,
    /// Credentials are posted without a token
    Optional,
}

/// Simulated user configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Test account
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Text that must appear after a successful login
    #[serde(default = "default_login_marker")]
    pub login_marker: String,

    #[serde(default)]
    pub token_policy: TokenPolicy,

    /// Form field the token is posted under
    #[serde(default = "default_token_field")]
    pub token_field: String,

    /// Lower bound of the pause between iterations
    #[serde(
        with = "crate::domains::utils::serde_duration_millis",
        default = "default_wait_min"
    )]
    pub wait_min: Duration,

    /// Upper bound of the pause between iterations
    #[serde(
        with = "crate::domains::utils::serde_duration_millis",
        default = "default_wait_max"
    )]
    pub wait_max: Duration,

    /// Reset the storefront database before a load run
    #[serde(default = "crate::domains::utils::default_false")]
    pub reset_database: bool,

    /// Reset endpoint, relative to the target base path
    #[serde(default = "default_reset_path")]
    pub reset_path: String,

    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// Ordered fallback selectors, tried first to last.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Hidden inputs whose `value` holds the token
    #[serde(default = "default_token_inputs")]
    pub token_inputs: Vec<String>,

    /// Meta tags whose `content` holds the token
    #[serde(default = "default_token_meta")]
    pub token_meta: Vec<String>,

    /// Regexes over raw markup; capture group 1 is the token
    #[serde(default = "default_token_patterns")]
    pub token_patterns: Vec<String>,

    #[serde(default = "default_category_links")]
    pub category_links: Vec<String>,

    #[serde(default = "default_product_links")]
    pub product_links: Vec<String>,

    #[serde(default = "default_product_names")]
    pub product_names: Vec<String>,

    /// Inputs whose `value` holds the product identifier
    #[serde(default = "default_product_ids")]
    pub product_ids: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
            login_marker: default_login_marker(),
            token_policy: TokenPolicy::default(),
            token_field: default_token_field(),
            wait_min: default_wait_min(),
            wait_max: default_wait_max(),
            reset_database: false,
            reset_path: default_reset_path(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            token_inputs: default_token_inputs(),
            token_meta: default_token_meta(),
            token_patterns: default_token_patterns(),
            category_links: default_category_links(),
            product_links: default_product_links(),
            product_names: default_product_names(),
            product_ids: default_product_ids(),
        }
    }
}

impl Validatable for SessionConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.username, "username", self.domain_name())?;
        validate_required_string(&self.login_marker, "login_marker", self.domain_name())?;
        validate_required_string(&self.token_field, "token_field", self.domain_name())?;
        validate_required_string(&self.reset_path, "reset_path", self.domain_name())?;
        validate_ordered(
            self.wait_min.as_millis(),
            self.wait_max.as_millis(),
            "wait",
            self.domain_name(),
        )?;
        self.selectors.validate()
    }

    fn domain_name(&self) -> &'static str {
        "session"
    }
}

impl Validatable for SelectorConfig {
    fn validate(&self) -> ConfigResult<()> {
        let lists = [
            ("category_links", &self.category_links),
            ("product_links", &self.product_links),
            ("product_names", &self.product_names),
        ];
        for (name, list) in lists {
            if list.is_empty() {
                return Err(self.validation_error(format!("{} needs at least one selector", name)));
            }
        }

        if self.token_inputs.is_empty() && self.token_meta.is_empty() && self.token_patterns.is_empty()
        {
            return Err(self.validation_error("no token extraction strategy configured"));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "session.selectors"
    }
}

fn default_username() -> String {
    "user1".to_string()
}

fn default_password() -> String {
    "password".to_string()
}

fn default_login_marker() -> String {
    "Logout".to_string()
}

fn default_token_field() -> String {
    "_csrf".to_string()
}

fn default_wait_min() -> Duration {
    Duration::from_secs(1)
}

fn default_wait_max() -> Duration {
    Duration::from_secs(2)
}

fn default_reset_path() -> String {
    "/services/rest/persistence/reset".to_string()
}

fn default_token_inputs() -> Vec<String> {
    vec![
        "input[name='_csrf']".to_string(),
        "input[name='csrf']".to_string(),
        "input[name='token']".to_string(),
    ]
}

fn default_token_meta() -> Vec<String> {
    vec![
        "meta[name='_csrf']".to_string(),
        "meta[name='csrf-token']".to_string(),
    ]
}

fn default_token_patterns() -> Vec<String> {
    vec![
        r#"name=["']_csrf["'][^>]*?value=["']([^"']+)["']"#.to_string(),
        r#"value=["']([^"']+)["'][^>]*?name=["']_csrf["']"#.to_string(),
    ]
}

fn default_category_links() -> Vec<String> {
    vec![
        "ul.nav-sidebar a.menulink".to_string(),
        "a.menulink".to_string(),
        "a[href*='category']".to_string(),
    ]
}

fn default_product_links() -> Vec<String> {
    vec![
        "div.thumbnail a".to_string(),
        "a[href*='product']".to_string(),
    ]
}

fn default_product_names() -> Vec<String> {
    vec![
        "h2.product-title".to_string(),
        "h2.minipage-title".to_string(),
        "h2".to_string(),
    ]
}

fn default_product_ids() -> Vec<String> {
    vec!["input[name='productid']".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.username, "user1");
        assert_eq!(config.login_marker, "Logout");
        assert_eq!(config.token_policy, TokenPolicy::Required);
        assert_eq!(config.selectors.category_links[0], "ul.nav-sidebar a.menulink");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_wait_bounds_must_be_ordered() {
        let config = SessionConfig {
            wait_min: Duration::from_millis(2500),
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_selector_lists_cannot_be_empty() {
        let mut config = SessionConfig::default();
        config.selectors.product_links.clear();
        assert!(config.validate().is_err());

        let mut config = SessionConfig::default();
        config.selectors.token_inputs.clear();
        config.selectors.token_meta.clear();
        config.selectors.token_patterns.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_policy_from_yaml() {
        let config: SessionConfig = serde_yaml::from_str("token_policy: optional\nwait_min: 250\n").unwrap();
        assert_eq!(config.token_policy, TokenPolicy::Optional);
        assert_eq!(config.wait_min, Duration::from_millis(250));
        assert_eq!(config.password, "password");
    }
}
