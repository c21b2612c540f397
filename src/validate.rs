use crate::error::SettingsError;
use crate::settings::{SettingsForm, js_int};

/// Validate a candidate configuration against the hardware and protocol
/// constraints the firmware enforces.
///
/// Rules run in the page's fixed order and the first violated rule
/// determines the reported message (short-circuit; never accumulate).
/// Numeric fields are integer-coerced first, the NaN case fails the rule.
pub fn validate(form: &SettingsForm) -> Result<(), SettingsError> {
    int_in_range("PWM fan channel", &form.pwm_fan_channel, 0, 4)?;
    int_in_range("PWM fan frequency", &form.pwm_fan_frequency, 1000, 30000)?;
    int_in_range("PWM fan GPIO", &form.pwm_fan_gpio, 0, 42)?;
    int_in_range("LED channel", &form.pwm_mos_channel, 0, 4)?;
    int_in_range("LED frequency", &form.pwm_mos_frequency, 1000, 30000)?;
    int_in_range("LED GPIO", &form.pwm_mos_gpio, 0, 42)?;

    if !(3..=20).contains(&form.wifi_ssid.chars().count()) {
        return Err(SettingsError::Validation(
            "WiFi SSID length must be between 3 and 20 characters".to_string(),
        ));
    }
    if !(8..=20).contains(&form.wifi_password.chars().count()) {
        return Err(SettingsError::Validation(
            "WiFi password length must be between 8 and 20 characters".to_string(),
        ));
    }

    int_in_range("WiFi channel", &form.wifi_channel, 1, 11)?;

    if !is_valid_ip(&form.dhcps_ip, false) {
        return Err(SettingsError::Validation(format!(
            "invalid DHCP server IP: {}",
            form.dhcps_ip
        )));
    }
    if !is_valid_ip(&form.dhcps_netmask, true) {
        return Err(SettingsError::Validation(format!(
            "invalid DHCP server netmask: {}",
            form.dhcps_netmask
        )));
    }

    int_in_range("as-router flag", &form.dhcps_as_router, 0, 1)?;

    Ok(())
}

fn int_in_range(field: &str, raw: &str, min: i64, max: i64) -> Result<(), SettingsError> {
    match js_int(raw) {
        Some(v) if (min..=max).contains(&v) => Ok(()),
        _ => Err(SettingsError::Validation(format!(
            "invalid {field}: {raw} (expected {min} to {max})"
        ))),
    }
}

/// Dotted-quad check used for the DHCP server address and netmask: string
/// length in [7, 15], exactly four octets in [0, 255], first octet nonzero
/// (guards against the firmware's all-zero default, not full IPv4
/// validation). In netmask mode the last octet must additionally be 0 — a
/// simplification that rejects /23 and smaller masks, kept as-is because it
/// is the firmware's accepted contract.
pub fn is_valid_ip(raw: &str, netmask: bool) -> bool {
    if !(7..=15).contains(&raw.len()) {
        return false;
    }

    let mut octets = [0i64; 4];
    let parts: Vec<&str> = raw.split('.').collect();
    if parts.len() != 4 {
        return false;
    }
    for (slot, part) in octets.iter_mut().zip(&parts) {
        match js_int(part) {
            Some(v) if (0..=255).contains(&v) => *slot = v,
            _ => return false,
        }
    }

    if octets[0] == 0 {
        return false;
    }
    if netmask && octets[3] != 0 {
        return false;
    }
    true
}
