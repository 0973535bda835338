//! Extension atcconfig pour la météo

use crate::client::{
    WeatherClient, DEFAULT_AVIATION_API_BASE, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SUN_API_BASE,
};
use anyhow::Result;
use atcconfig::Config;
use serde_yaml::Value;
use std::time::Duration;

const AVIATION_API_PATH: &[&str] = &["weather", "aviation_api_base"];
const SUN_API_PATH: &[&str] = &["weather", "sun_api_base"];
const TIMEOUT_PATH: &[&str] = &["weather", "request_timeout_secs"];

pub trait WeatherConfigExt {
    fn get_weather_aviation_api_base(&self) -> String;

    fn set_weather_aviation_api_base(&self, url: &str) -> Result<()>;

    fn get_weather_sun_api_base(&self) -> String;

    /// Timeout des requêtes météo, en secondes (défaut: 10)
    fn get_weather_timeout_secs(&self) -> u64;

    fn build_weather_client(&self) -> Result<WeatherClient>;
}

impl WeatherConfigExt for Config {
    fn get_weather_aviation_api_base(&self) -> String {
        self.get_string_or(AVIATION_API_PATH, DEFAULT_AVIATION_API_BASE)
    }

    fn set_weather_aviation_api_base(&self, url: &str) -> Result<()> {
        self.set_value(AVIATION_API_PATH, Value::String(url.to_string()))
    }

    fn get_weather_sun_api_base(&self) -> String {
        self.get_string_or(SUN_API_PATH, DEFAULT_SUN_API_BASE)
    }

    fn get_weather_timeout_secs(&self) -> u64 {
        self.get_u64_or(TIMEOUT_PATH, DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    fn build_weather_client(&self) -> Result<WeatherClient> {
        let client = WeatherClient::builder()
            .aviation_api_base(self.get_weather_aviation_api_base())
            .sun_api_base(self.get_weather_sun_api_base())
            .timeout(Duration::from_secs(self.get_weather_timeout_secs()))
            .build()?;
        Ok(client)
    }
}
