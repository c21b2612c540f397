use anyhow::{Context, Result, bail};
use env_logger::{Builder, Env, Target};
use fancontrol_ui::{DeviceClient, SettingsSession};
use log::info;
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    info!("fancontrol-ui version: {}", env!("CARGO_PKG_VERSION"));

    let base_url = std::env::var("DEVICE_URL").unwrap_or("http://192.168.4.1".to_string());
    let client = DeviceClient::new(&base_url).context("failed to create device client")?;

    let command = std::env::args().nth(1).unwrap_or("show".to_string());
    match command.as_str() {
        "show" => show(client).await,
        "duty" => duty(client).await,
        "restart" => restart(client).await,
        "reset" => reset(client).await,
        other => bail!("unknown command {other:?} (expected show, duty, restart or reset)"),
    }
}

/// Load the current settings and print the hydrated session state.
async fn show(client: DeviceClient) -> Result<()> {
    let mut session = SettingsSession::new(client);
    session
        .load()
        .await
        .context("failed to load device settings")?;

    let view = session.view().context("session not rendered")?;
    let form = &view.form;

    println!("fan:  channel {}, {} Hz, gpio {}", form.pwm_fan_channel, form.pwm_fan_frequency, form.pwm_fan_gpio);
    println!("      duty {}", view.fan.display());
    println!("led:  channel {}, {} Hz, gpio {}", form.pwm_mos_channel, form.pwm_mos_frequency, form.pwm_mos_gpio);
    println!("      duty {}", view.led.display());
    println!("wifi: ssid {:?}, channel {}", form.wifi_ssid, form.wifi_channel);
    println!("dhcp: ip {}, netmask {}, as router: {}", form.dhcps_ip, form.dhcps_netmask, form.dhcps_as_router);

    Ok(())
}

/// Read the duty through the single-channel predecessor protocol.
async fn duty(client: DeviceClient) -> Result<()> {
    let duty = client
        .legacy_duty()
        .await
        .context("failed to read duty from controller")?;
    println!("duty: {duty}");
    Ok(())
}

async fn restart(client: DeviceClient) -> Result<()> {
    client.restart().await.context("failed to request restart")?;
    // Fixed confirmation, the firmware's reply body is not inspected.
    println!("Restart requested, reconnect to the controller WiFi in a few seconds.");
    Ok(())
}

async fn reset(client: DeviceClient) -> Result<()> {
    client
        .reset_settings()
        .await
        .context("failed to reset settings")?;
    println!("Settings have been reset.");
    Ok(())
}
