//! Extension pour intégrer les sources de flux dans atcconfig
//!
//! Ce module fournit le trait `StreamConfigExt` qui ajoute à
//! `atcconfig::Config` les réglages des sources amont (gabarits d'URL,
//! User-Agent, timeout).
//!
//! # Exemple
//!
//! ```no_run
//! use atcconfig::get_config;
//! use atcstream::StreamConfigExt;
//!
//! let config = get_config();
//! let resolver = config.build_resolver()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::resolver::{
    UpstreamResolver, DEFAULT_DIRECT_STREAM_TEMPLATE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SCANNER_PAGE_TEMPLATE, DEFAULT_USER_AGENT,
};
use anyhow::Result;
use atcconfig::Config;
use serde_yaml::Value;
use std::time::Duration;

const SCANNER_PAGE_TEMPLATE_PATH: &[&str] = &["sources", "radioscanner", "page_template"];
const DIRECT_STREAM_TEMPLATE_PATH: &[&str] = &["sources", "liveatc", "stream_template"];
const USER_AGENT_PATH: &[&str] = &["sources", "user_agent"];
const REQUEST_TIMEOUT_PATH: &[&str] = &["sources", "request_timeout_secs"];

/// Trait d'extension pour la configuration des sources de flux
pub trait StreamConfigExt {
    /// Gabarit de la page scanner (`{code}` = code station en minuscules)
    fn get_scanner_page_template(&self) -> String;

    fn set_scanner_page_template(&self, template: &str) -> Result<()>;

    /// Gabarit des flux directs (le cache-buster est ajouté à la résolution)
    fn get_direct_stream_template(&self) -> String;

    fn set_direct_stream_template(&self, template: &str) -> Result<()>;

    /// User-Agent envoyé aux sources amont
    fn get_upstream_user_agent(&self) -> String;

    /// Timeout des requêtes de page scanner, en secondes (défaut: 30)
    fn get_upstream_timeout_secs(&self) -> u64;

    /// Construit un résolveur à partir de ces réglages
    fn build_resolver(&self) -> Result<UpstreamResolver>;
}

impl StreamConfigExt for Config {
    fn get_scanner_page_template(&self) -> String {
        self.get_string_or(SCANNER_PAGE_TEMPLATE_PATH, DEFAULT_SCANNER_PAGE_TEMPLATE)
    }

    fn set_scanner_page_template(&self, template: &str) -> Result<()> {
        self.set_value(
            SCANNER_PAGE_TEMPLATE_PATH,
            Value::String(template.to_string()),
        )
    }

    fn get_direct_stream_template(&self) -> String {
        self.get_string_or(DIRECT_STREAM_TEMPLATE_PATH, DEFAULT_DIRECT_STREAM_TEMPLATE)
    }

    fn set_direct_stream_template(&self, template: &str) -> Result<()> {
        self.set_value(
            DIRECT_STREAM_TEMPLATE_PATH,
            Value::String(template.to_string()),
        )
    }

    fn get_upstream_user_agent(&self) -> String {
        self.get_string_or(USER_AGENT_PATH, DEFAULT_USER_AGENT)
    }

    fn get_upstream_timeout_secs(&self) -> u64 {
        self.get_u64_or(REQUEST_TIMEOUT_PATH, DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    fn build_resolver(&self) -> Result<UpstreamResolver> {
        let resolver = UpstreamResolver::builder()
            .scanner_page_template(self.get_scanner_page_template())
            .direct_stream_template(self.get_direct_stream_template())
            .user_agent(self.get_upstream_user_agent())
            .timeout(Duration::from_secs(self.get_upstream_timeout_secs()))
            .build()?;
        Ok(resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        (dir, config)
    }

    #[test]
    fn test_defaults() {
        let (_dir, config) = temp_config();
        assert_eq!(config.get_scanner_page_template(), DEFAULT_SCANNER_PAGE_TEMPLATE);
        assert_eq!(config.get_direct_stream_template(), DEFAULT_DIRECT_STREAM_TEMPLATE);
        assert_eq!(config.get_upstream_user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(config.get_upstream_timeout_secs(), DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_templates_feed_the_resolver() {
        let (_dir, config) = temp_config();
        config
            .set_scanner_page_template("http://127.0.0.1:9/pages/{code}.html")
            .unwrap();

        let resolver = config.build_resolver().unwrap();
        assert_eq!(
            resolver.scanner_page_url("ULLI").unwrap().as_str(),
            "http://127.0.0.1:9/pages/ulli.html"
        );
    }
}
