use crate::error::SettingsError;
use crate::settings::SettingsPayload;
use log::debug;
use serde::Deserialize;

/// Duty document of the single-channel predecessor protocol
/// (`GET /controller?getconfig=1`).
#[derive(Debug, Deserialize)]
struct LegacyConfig {
    duty: i64,
}

/// HTTP client for the controller's embedded web server.
///
/// All endpoints are plain GET requests; updates travel as query parameters.
/// For the write endpoints the firmware's reply body and status are not
/// inspected — like the pages' `fetch`, success means "no transport error".
#[derive(Debug, Clone)]
pub struct DeviceClient {
    base: String,
    client: reqwest::Client,
}

impl DeviceClient {
    pub fn new(base_url: &str) -> Result<Self, SettingsError> {
        let base = base_url.trim_end_matches('/').to_string();
        if base.is_empty() {
            return Err(SettingsError::Config("empty device base URL".to_string()));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SettingsError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(DeviceClient { base, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Read the full settings document.
    pub async fn fetch_settings(&self) -> Result<SettingsPayload, SettingsError> {
        let url = format!("{}/settings", self.base);
        debug!("fetch_settings: GET {url}");

        let response = self.client.get(&url).send().await.map_err(fetch_error)?;
        let body = response.text().await.map_err(fetch_error)?;

        serde_json::from_str(&body)
            .map_err(|e| SettingsError::Parse(format!("malformed settings document: {e}")))
    }

    /// Apply a partial or full settings update as key/value query pairs.
    pub async fn apply_settings(&self, pairs: &[(&'static str, String)]) -> Result<(), SettingsError> {
        self.command("/settings", pairs).await
    }

    /// Persist the control page's duty pair.
    pub async fn apply_duties(&self, fan_duty: i64, mos_duty: i64) -> Result<(), SettingsError> {
        let pairs = [
            ("pwm_fan_duty", fan_duty.to_string()),
            ("pwm_mos_duty", mos_duty.to_string()),
        ];
        self.command("/settings", &pairs).await
    }

    /// Fire-and-forget device restart.
    pub async fn restart(&self) -> Result<(), SettingsError> {
        self.command("/restart", &[]).await
    }

    /// Fire-and-forget reset to factory settings.
    pub async fn reset_settings(&self) -> Result<(), SettingsError> {
        self.command("/reset_settings", &[]).await
    }

    /// Read the current duty through the single-channel predecessor
    /// protocol.
    pub async fn legacy_duty(&self) -> Result<i64, SettingsError> {
        let url = format!("{}/controller", self.base);
        debug!("legacy_duty: GET {url}?getconfig=1");

        let response = self
            .client
            .get(&url)
            .query(&[("getconfig", "1")])
            .send()
            .await
            .map_err(fetch_error)?;
        let body = response.text().await.map_err(fetch_error)?;

        let config: LegacyConfig = serde_json::from_str(&body)
            .map_err(|e| SettingsError::Parse(format!("malformed duty document: {e}")))?;
        Ok(config.duty)
    }

    async fn command(
        &self,
        path: &str,
        pairs: &[(&'static str, String)],
    ) -> Result<(), SettingsError> {
        let url = format!("{}{path}", self.base);
        debug!("command: GET {url} with {} pairs", pairs.len());

        let mut request = self.client.get(&url);
        if !pairs.is_empty() {
            request = request.query(pairs);
        }

        // Response body ignored.
        request.send().await.map_err(fetch_error)?;
        Ok(())
    }
}

fn fetch_error(e: reqwest::Error) -> SettingsError {
    SettingsError::Fetch(e.to_string())
}
