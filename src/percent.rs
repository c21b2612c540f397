use crate::error::SettingsError;

/// Device-reported duty range of one PWM channel.
///
/// The firmware reports the range alongside the current duty
/// (`pwm_*_duty_min`/`pwm_*_duty_max`); it is never hardcoded here. The
/// constructor enforces `max > min`, so scaling through a `DutyBounds` can
/// never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyBounds {
    min: i64,
    max: i64,
}

impl DutyBounds {
    pub fn new(min: i64, max: i64) -> Result<Self, SettingsError> {
        if max <= min {
            return Err(SettingsError::Config(format!(
                "duty bounds must satisfy max > min, got [{min}, {max}]"
            )));
        }
        Ok(DutyBounds { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }
}

/// Map a raw duty value to a display percentage:
/// `round((value - min) * 100 / (max - min))`.
///
/// Values inside the bounds land in `[0, 100]`; out-of-range values scale
/// beyond that rather than being clamped, matching the page behavior.
pub fn percent_of(bounds: &DutyBounds, value: i64) -> i64 {
    let span = (bounds.max - bounds.min) as f64;
    (((value - bounds.min) * 100) as f64 / span).round() as i64
}

/// Render a duty for display, `"80 (31 %)"` style. A missing value (the
/// non-numeric "NaN" case) renders as the `"N/A"` sentinel instead of
/// failing.
pub fn format_duty(bounds: &DutyBounds, value: Option<i64>) -> String {
    match value {
        Some(v) => format!("{v} ({} %)", percent_of(bounds, v)),
        None => "N/A".to_string(),
    }
}
