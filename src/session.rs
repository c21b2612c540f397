use crate::channel::{self, ChannelToggle};
use crate::device_client::DeviceClient;
use crate::error::SettingsError;
use crate::settings::{SettingsForm, SettingsPayload};
use crate::validate::validate;
use log::{debug, error, info};

/// UI events of the control page. Events produce state transitions on the
/// in-memory view; rendering is a projection of that view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    FanToggled(bool),
    FanDutyEdited(i64),
    LedToggled(bool),
    LedDutyEdited(i64),
}

/// The rendered state of one session: the editable settings form plus the
/// two channel toggles. Exists only after a successful load, because the
/// toggles need the device-reported duty bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub form: SettingsForm,
    pub fan: ChannelToggle,
    pub led: ChannelToggle,
}

impl SessionView {
    pub fn from_payload(payload: &SettingsPayload) -> Result<Self, SettingsError> {
        let fan = ChannelToggle::from_loaded(
            channel::FAN,
            payload.fan_bounds()?,
            payload.fan_duty(),
        );
        let led = ChannelToggle::from_loaded(
            channel::LED,
            payload.mos_bounds()?,
            payload.mos_duty(),
        );

        Ok(SessionView {
            form: SettingsForm::from(payload),
            fan,
            led,
        })
    }

    pub fn apply(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::FanToggled(on) => self.fan.set_enabled(on),
            ControlEvent::FanDutyEdited(duty) => self.fan.set_duty(duty),
            ControlEvent::LedToggled(on) => self.led.set_enabled(on),
            ControlEvent::LedDutyEdited(duty) => self.led.set_duty(duty),
        }
    }
}

/// One UI session against the device.
///
/// The device is the source of truth: after every successful save the whole
/// session is re-fetched, which is the only re-synchronization mechanism.
/// Saves are serialized by construction (`&mut self` suspending calls); a
/// failed initial load is terminal for the session and leaves the view
/// unrendered.
pub struct SettingsSession {
    client: DeviceClient,
    view: Option<SessionView>,
}

impl SettingsSession {
    pub fn new(client: DeviceClient) -> Self {
        SettingsSession { client, view: None }
    }

    pub fn view(&self) -> Option<&SessionView> {
        self.view.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.view.is_some()
    }

    /// Fetch current settings and hydrate the view. On failure the view
    /// stays unrendered; the caller must not proceed with partial data.
    pub async fn load(&mut self) -> Result<(), SettingsError> {
        self.view = None;

        let payload = self.client.fetch_settings().await.inspect_err(|e| {
            error!("settings load failed: {e}");
        })?;
        let view = SessionView::from_payload(&payload).inspect_err(|e| {
            error!("settings load failed: {e}");
        })?;

        debug!(
            "session loaded: fan {}, led {}",
            view.fan.display(),
            view.led.display()
        );
        self.view = Some(view);
        Ok(())
    }

    /// Apply a control page event. Ignored while no view is loaded (the
    /// controls are not rendered then).
    pub fn handle(&mut self, event: ControlEvent) {
        match &mut self.view {
            Some(view) => view.apply(event),
            None => debug!("control event before load, ignored: {event:?}"),
        }
    }

    /// Replace the settings form with the user's edited snapshot.
    pub fn update_form(&mut self, form: SettingsForm) {
        if let Some(view) = &mut self.view {
            view.form = form;
        }
    }

    /// Validate and persist the settings form.
    ///
    /// A validation failure aborts the save before any network call; the
    /// view keeps its pre-save state so the user can correct and retry. A
    /// transport failure likewise leaves the view untouched, because no
    /// write happened on the device that the view could disagree with. On
    /// success the session reloads in full.
    pub async fn save_settings(&mut self) -> Result<(), SettingsError> {
        let Some(view) = &self.view else {
            return Err(SettingsError::Config(
                "cannot save before settings were loaded".to_string(),
            ));
        };

        validate(&view.form)?;

        self.client.apply_settings(&view.form.query_pairs()).await?;

        info!("settings saved, reloading session");
        self.load().await
    }

    /// Persist the control page's effective duties (0 for a disabled
    /// channel), then reload the session.
    pub async fn save_duties(&mut self) -> Result<(), SettingsError> {
        let Some(view) = &self.view else {
            return Err(SettingsError::Config(
                "cannot save before settings were loaded".to_string(),
            ));
        };

        self.client
            .apply_duties(view.fan.persisted_duty(), view.led.persisted_duty())
            .await?;

        info!("duties saved, reloading session");
        self.load().await
    }
}
