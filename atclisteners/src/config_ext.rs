//! Extension atcconfig pour le registre d'auditeurs

use crate::registry::DEFAULT_LISTENER_TIMEOUT_SECS;
use anyhow::Result;
use atcconfig::Config;
use serde_yaml::Value;

const TIMEOUT_PATH: &[&str] = &["listeners", "timeout_secs"];

pub trait ListenersConfigExt {
    /// Fenêtre d'expiration des sessions, en secondes (défaut: 60)
    fn get_listeners_timeout_secs(&self) -> u64;

    fn set_listeners_timeout_secs(&self, secs: u64) -> Result<()>;
}

impl ListenersConfigExt for Config {
    fn get_listeners_timeout_secs(&self) -> u64 {
        match self.get_u64_or(TIMEOUT_PATH, DEFAULT_LISTENER_TIMEOUT_SECS) {
            0 => DEFAULT_LISTENER_TIMEOUT_SECS,
            secs => secs,
        }
    }

    fn set_listeners_timeout_secs(&self, secs: u64) -> Result<()> {
        self.set_value(TIMEOUT_PATH, Value::Number(serde_yaml::Number::from(secs)))
    }
}
