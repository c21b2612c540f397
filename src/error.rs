use thiserror::Error;

/// Error taxonomy of the settings engine.
///
/// The session recovers differently per class: a `Fetch` or `Parse` failure
/// on the initial load is terminal for the session, a `Validation` failure is
/// reported inline and the user may correct and retry, and `Config` marks a
/// caller error (e.g. inverted duty bounds) that must never reach the device.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// Network/transport failure talking to the device.
    #[error("failed to reach device: {0}")]
    Fetch(String),

    /// The device answered, but the response could not be decoded.
    #[error("failed to parse device response: {0}")]
    Parse(String),

    /// The candidate configuration violates a constraint. Carries the
    /// human-readable reason of the first violated rule.
    #[error("{0}")]
    Validation(String),

    /// Caller-side misuse of the engine itself.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SettingsError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SettingsError::Validation(_))
    }
}
