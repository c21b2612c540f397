use crate::error::SettingsError;
use crate::percent::DutyBounds;
use serde::{Deserialize, Deserializer, Serialize, de};

/// Integer coercion with the semantics of the pages' `parseInt`: leading
/// whitespace and an optional sign are accepted, parsing stops at the first
/// non-digit, and an empty digit run is the NaN case (`None`). `"80x"`
/// coerces to 80.
pub fn js_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: &str = {
        let end = rest
            .as_bytes()
            .iter()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };

    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// The firmware emits numbers for values it parsed and strings for values it
/// stored verbatim. Accept both and keep the raw text; numeric use goes
/// through [`js_int`].
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Raw settings document as served by `GET /settings`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct SettingsPayload {
    #[serde(deserialize_with = "lenient_string")]
    pub pwm_fan_channel: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pwm_fan_frequency: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pwm_fan_gpio: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pwm_fan_duty: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pwm_fan_duty_min: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pwm_fan_duty_max: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pwm_mos_channel: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pwm_mos_frequency: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pwm_mos_gpio: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pwm_mos_duty: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pwm_mos_duty_min: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pwm_mos_duty_max: String,
    pub wifi_ssid: String,
    pub wifi_password: String,
    #[serde(deserialize_with = "lenient_string")]
    pub wifi_channel: String,
    pub dhcps_ip: String,
    pub dhcps_netmask: String,
    #[serde(deserialize_with = "lenient_string")]
    pub dhcps_as_router: String,
}

impl SettingsPayload {
    /// Fan channel duty range as reported by the device. Non-numeric or
    /// degenerate bounds are a device/config error; duties must not be
    /// scaled or validated without them.
    pub fn fan_bounds(&self) -> Result<DutyBounds, SettingsError> {
        Self::bounds("fan", &self.pwm_fan_duty_min, &self.pwm_fan_duty_max)
    }

    /// LED/MOSFET channel duty range as reported by the device.
    pub fn mos_bounds(&self) -> Result<DutyBounds, SettingsError> {
        Self::bounds("mos", &self.pwm_mos_duty_min, &self.pwm_mos_duty_max)
    }

    pub fn fan_duty(&self) -> Option<i64> {
        js_int(&self.pwm_fan_duty)
    }

    pub fn mos_duty(&self) -> Option<i64> {
        js_int(&self.pwm_mos_duty)
    }

    fn bounds(channel: &str, min: &str, max: &str) -> Result<DutyBounds, SettingsError> {
        let (Some(min), Some(max)) = (js_int(min), js_int(max)) else {
            return Err(SettingsError::Config(format!(
                "device reported non-numeric {channel} duty bounds [{min}, {max}]"
            )));
        };
        DutyBounds::new(min, max)
    }
}

/// The editable candidate configuration: the settings page's input fields,
/// kept as raw strings until validation coerces them. Duty values are not
/// part of this form; the control page persists them through the channel
/// toggles.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsForm {
    pub pwm_fan_channel: String,
    pub pwm_fan_frequency: String,
    pub pwm_fan_gpio: String,
    pub pwm_mos_channel: String,
    pub pwm_mos_frequency: String,
    pub pwm_mos_gpio: String,
    pub wifi_ssid: String,
    pub wifi_password: String,
    pub wifi_channel: String,
    pub dhcps_ip: String,
    pub dhcps_netmask: String,
    pub dhcps_as_router: String,
}

impl SettingsForm {
    /// Serialize the full field set as key/value pairs for the save query,
    /// in the page's fixed field order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("pwm_fan_channel", self.pwm_fan_channel.clone()),
            ("pwm_fan_frequency", self.pwm_fan_frequency.clone()),
            ("pwm_fan_gpio", self.pwm_fan_gpio.clone()),
            ("pwm_mos_channel", self.pwm_mos_channel.clone()),
            ("pwm_mos_frequency", self.pwm_mos_frequency.clone()),
            ("pwm_mos_gpio", self.pwm_mos_gpio.clone()),
            ("wifi_ssid", self.wifi_ssid.clone()),
            ("wifi_password", self.wifi_password.clone()),
            ("wifi_channel", self.wifi_channel.clone()),
            ("dhcps_ip", self.dhcps_ip.clone()),
            ("dhcps_netmask", self.dhcps_netmask.clone()),
            ("dhcps_as_router", self.dhcps_as_router.clone()),
        ]
    }
}

impl From<&SettingsPayload> for SettingsForm {
    fn from(payload: &SettingsPayload) -> Self {
        SettingsForm {
            pwm_fan_channel: payload.pwm_fan_channel.clone(),
            pwm_fan_frequency: payload.pwm_fan_frequency.clone(),
            pwm_fan_gpio: payload.pwm_fan_gpio.clone(),
            pwm_mos_channel: payload.pwm_mos_channel.clone(),
            pwm_mos_frequency: payload.pwm_mos_frequency.clone(),
            pwm_mos_gpio: payload.pwm_mos_gpio.clone(),
            wifi_ssid: payload.wifi_ssid.clone(),
            wifi_password: payload.wifi_password.clone(),
            wifi_channel: payload.wifi_channel.clone(),
            dhcps_ip: payload.dhcps_ip.clone(),
            dhcps_netmask: payload.dhcps_netmask.clone(),
            dhcps_as_router: payload.dhcps_as_router.clone(),
        }
    }
}
