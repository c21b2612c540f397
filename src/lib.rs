//! Settings engine for the fancontrol PWM controller web UI.
//!
//! Loads the device's current configuration, keeps the per-channel toggle
//! state consistent with it, validates a candidate configuration against the
//! firmware's constraints before it is sent, and maps raw duty values to
//! display percentages. The embedded HTTP server on the device is the
//! external collaborator; this crate is its client.

pub mod channel;
pub mod device_client;
pub mod error;
pub mod percent;
pub mod session;
pub mod settings;
pub mod validate;

pub use channel::{ChannelProfile, ChannelToggle};
pub use device_client::DeviceClient;
pub use error::SettingsError;
pub use percent::DutyBounds;
pub use session::{ControlEvent, SessionView, SettingsSession};
pub use settings::{SettingsForm, SettingsPayload};
