use crate::percent::{DutyBounds, format_duty};

/// Per-channel toggle behavior. Thresholds and defaults differ between the
/// paired fan/LED page and the legacy single-fan page, so they are explicit
/// configuration rather than shared literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelProfile {
    pub name: &'static str,
    /// A persisted duty must be strictly greater than this for the channel
    /// to load as enabled.
    pub enable_threshold: i64,
    /// Duty applied when the user switches the channel on.
    pub default_duty: i64,
}

/// Fan channel of the paired fan/LED control page.
pub const FAN: ChannelProfile = ChannelProfile {
    name: "fan",
    enable_threshold: 1,
    default_duty: 80,
};

/// LED/MOSFET channel of the paired fan/LED control page.
pub const LED: ChannelProfile = ChannelProfile {
    name: "led",
    enable_threshold: 1,
    default_duty: 28,
};

/// Fan channel of the legacy single-fan page.
pub const SINGLE_FAN: ChannelProfile = ChannelProfile {
    name: "fan",
    enable_threshold: 10,
    default_duty: 20,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToggleState {
    Disabled,
    Enabled { duty: i64 },
}

/// Keeps one channel's enable checkbox and its duty control consistent.
///
/// `Disabled` forces the duty to 0, hides the control and displays `"N/A"`;
/// `Enabled` holds a duty within the device-reported bounds and displays the
/// formatted percentage. Constructed only after settings were successfully
/// loaded, because the bounds come from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelToggle {
    profile: ChannelProfile,
    bounds: DutyBounds,
    state: ToggleState,
}

impl ChannelToggle {
    /// Derive the initial state from a persisted duty. The channel loads as
    /// enabled iff the duty coerced to a number strictly greater than the
    /// profile threshold; the NaN case loads as disabled.
    pub fn from_loaded(profile: ChannelProfile, bounds: DutyBounds, duty: Option<i64>) -> Self {
        let state = match duty {
            Some(d) if d > profile.enable_threshold => ToggleState::Enabled { duty: d },
            _ => ToggleState::Disabled,
        };
        ChannelToggle {
            profile,
            bounds,
            state,
        }
    }

    /// User toggled the enable checkbox. Switching on resets the duty to the
    /// profile default; switching off forces it to 0.
    pub fn set_enabled(&mut self, on: bool) {
        self.state = if on {
            ToggleState::Enabled {
                duty: self.profile.default_duty,
            }
        } else {
            ToggleState::Disabled
        };
    }

    /// User edited the duty control. Only possible while enabled (the
    /// control is hidden otherwise); the value is clamped to the
    /// device-reported range like the range input's min/max attributes.
    pub fn set_duty(&mut self, duty: i64) {
        if let ToggleState::Enabled { .. } = self.state {
            self.state = ToggleState::Enabled {
                duty: self.bounds.clamp(duty),
            };
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, ToggleState::Enabled { .. })
    }

    /// The duty control is only shown while the channel is enabled.
    pub fn is_visible(&self) -> bool {
        self.is_enabled()
    }

    pub fn profile(&self) -> &ChannelProfile {
        &self.profile
    }

    pub fn bounds(&self) -> &DutyBounds {
        &self.bounds
    }

    /// The value that gets persisted: the current duty, or exactly 0 while
    /// disabled.
    pub fn persisted_duty(&self) -> i64 {
        match self.state {
            ToggleState::Disabled => 0,
            ToggleState::Enabled { duty } => duty,
        }
    }

    /// Display string for the percentage label.
    pub fn display(&self) -> String {
        match self.state {
            ToggleState::Disabled => format_duty(&self.bounds, None),
            ToggleState::Enabled { duty } => format_duty(&self.bounds, Some(duty)),
        }
    }
}
