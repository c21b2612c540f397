use fancontrol_ui::{ControlEvent, DeviceClient, SettingsError, SettingsSession};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

// Integration tests against a mock controller speaking the firmware's plain
// HTTP protocol.

const SETTINGS_BODY: &str = r#"{
    "pwm_fan_channel": 0,
    "pwm_fan_frequency": 25000,
    "pwm_fan_gpio": 4,
    "pwm_fan_duty": 80,
    "pwm_fan_duty_min": 0,
    "pwm_fan_duty_max": 255,
    "pwm_mos_channel": 1,
    "pwm_mos_frequency": 1000,
    "pwm_mos_gpio": 5,
    "pwm_mos_duty": 0,
    "pwm_mos_duty_min": 0,
    "pwm_mos_duty_max": 255,
    "wifi_ssid": "fancontrol",
    "wifi_password": "controller",
    "wifi_channel": 6,
    "dhcps_ip": "192.168.4.1",
    "dhcps_netmask": "255.255.255.0",
    "dhcps_as_router": 1
}"#;

type RequestLog = Arc<Mutex<Vec<String>>>;

/// Start a mock controller on an ephemeral port. Every request target is
/// recorded; the body served depends on the path, like the firmware's
/// URI-wildcard handler.
async fn start_mock_controller(
    settings_body: &'static str,
    ready_tx: oneshot::Sender<(String, RequestLog)>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));

    // Signal that the server is ready
    let _ = ready_tx.send((base_url, log.clone()));

    loop {
        let (mut stream, _) = listener.accept().await?;
        let log = log.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(&mut stream);

            let mut request_line = String::new();
            if reader.read_line(&mut request_line).await.is_err() {
                return;
            }
            let target = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            log.lock().unwrap().push(target.clone());

            // Drain the headers
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).await.is_err() {
                    return;
                }
                if line.trim().is_empty() {
                    break;
                }
            }

            let body = if target == "/settings" {
                settings_body
            } else if target.starts_with("/controller?getconfig=1") {
                r#"{ "duty": 42 }"#
            } else {
                // Write endpoints answer with a body the client ignores.
                "OK"
            };
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
        });
    }
}

async fn mock_controller(settings_body: &'static str) -> (String, RequestLog) {
    let (ready_tx, ready_rx) = oneshot::channel();
    tokio::spawn(start_mock_controller(settings_body, ready_tx));
    ready_rx.await.expect("mock controller failed to start")
}

#[tokio::test]
async fn load_hydrates_the_session_from_the_device() {
    let (base_url, _log) = mock_controller(SETTINGS_BODY).await;

    let client = DeviceClient::new(&base_url).unwrap();
    let mut session = SettingsSession::new(client);
    session.load().await.expect("load failed");

    let view = session.view().expect("view not rendered");
    assert_eq!(view.form.wifi_ssid, "fancontrol");
    assert!(view.fan.is_enabled());
    assert_eq!(view.fan.display(), "80 (31 %)");
    assert!(!view.led.is_enabled());
    assert_eq!(view.led.display(), "N/A");
}

#[tokio::test]
async fn save_sends_the_full_pair_set_and_reloads() {
    let (base_url, log) = mock_controller(SETTINGS_BODY).await;

    let client = DeviceClient::new(&base_url).unwrap();
    let mut session = SettingsSession::new(client);
    session.load().await.expect("load failed");
    session.save_settings().await.expect("save failed");

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests.len(), 3, "load, save, forced reload: {requests:?}");
    assert_eq!(requests[0], "/settings");
    assert!(requests[1].starts_with("/settings?pwm_fan_channel=0&"));
    assert!(requests[1].contains("wifi_ssid=fancontrol"));
    assert!(requests[1].contains("dhcps_netmask=255.255.255.0"));
    assert!(requests[1].contains("dhcps_as_router=1"));
    assert_eq!(requests[2], "/settings", "forced full reload after save");
    assert!(session.is_loaded());
}

#[tokio::test]
async fn rejected_candidate_issues_no_network_request() {
    let (base_url, log) = mock_controller(SETTINGS_BODY).await;

    let client = DeviceClient::new(&base_url).unwrap();
    let mut session = SettingsSession::new(client);
    session.load().await.expect("load failed");

    let mut form = session.view().unwrap().form.clone();
    form.wifi_ssid = "ab".to_string();
    session.update_form(form);

    let err = session.save_settings().await.unwrap_err();
    let SettingsError::Validation(msg) = &err else {
        panic!("expected a validation failure, got {err:?}");
    };
    assert!(msg.contains("SSID length"), "message was {msg:?}");

    // Only the initial load went over the wire; the save was aborted and the
    // session kept its pre-save state for correction and retry.
    assert_eq!(log.lock().unwrap().len(), 1);
    assert!(session.is_loaded());
    assert_eq!(session.view().unwrap().form.wifi_ssid, "ab");
}

#[tokio::test]
async fn duty_save_persists_zero_for_a_disabled_channel() {
    let (base_url, log) = mock_controller(SETTINGS_BODY).await;

    let client = DeviceClient::new(&base_url).unwrap();
    let mut session = SettingsSession::new(client);
    session.load().await.expect("load failed");

    session.handle(ControlEvent::FanToggled(false));
    session.handle(ControlEvent::LedToggled(true));
    session.save_duties().await.expect("duty save failed");

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests[1], "/settings?pwm_fan_duty=0&pwm_mos_duty=28");
    assert_eq!(requests[2], "/settings", "forced full reload after save");
}

#[tokio::test]
async fn malformed_settings_document_is_a_parse_error() {
    let (base_url, _log) = mock_controller("{ not json").await;

    let client = DeviceClient::new(&base_url).unwrap();
    let mut session = SettingsSession::new(client);

    let err = session.load().await.unwrap_err();
    assert!(matches!(err, SettingsError::Parse(_)), "got {err:?}");
    // Terminal for the session: nothing gets rendered.
    assert!(!session.is_loaded());
}

#[tokio::test]
async fn unreachable_device_is_a_fetch_error() {
    // Nothing listens here.
    let client = DeviceClient::new("http://127.0.0.1:9").unwrap();
    let mut session = SettingsSession::new(client);

    let err = session.load().await.unwrap_err();
    assert!(matches!(err, SettingsError::Fetch(_)), "got {err:?}");
    assert!(!session.is_loaded());
}

#[tokio::test]
async fn legacy_controller_protocol_reads_the_duty() {
    let (base_url, log) = mock_controller(SETTINGS_BODY).await;

    let client = DeviceClient::new(&base_url).unwrap();
    let duty = client.legacy_duty().await.expect("legacy read failed");

    assert_eq!(duty, 42);
    assert_eq!(log.lock().unwrap()[0], "/controller?getconfig=1");
}

#[tokio::test]
async fn device_commands_hit_their_endpoints() {
    let (base_url, log) = mock_controller(SETTINGS_BODY).await;

    let client = DeviceClient::new(&base_url).unwrap();
    client.restart().await.expect("restart failed");
    client.reset_settings().await.expect("reset failed");

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests, vec!["/restart", "/reset_settings"]);
}
