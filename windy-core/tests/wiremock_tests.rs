//! Integration tests for the Windy client against a mock HTTP server.

use chrono::DateTime;
use std::{
    io::{Read, Write},
    net::TcpListener,
    thread,
};
use windy_core::{
    Coordinate, ForecastError, ForecastSource, WindyClient, get_forecasts,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

const FORECAST_PATH: &str = "/api/point-forecast/v2";

fn series(count: i64) -> serde_json::Value {
    let hours: Vec<i64> = (0..count).map(|h| h * 3600).collect();
    let surface: Vec<f64> = (0..count).map(|h| 10.0 + h as f64).collect();
    serde_json::json!({ "hours": hours, "surface": surface })
}

fn sample_response() -> serde_json::Value {
    serde_json::json!({
        "temp": series(200),
        "precip": series(200),
        "wind": series(200),
    })
}

fn create_test_client(mock_server: &MockServer) -> WindyClient {
    WindyClient::new("TEST_KEY".into(), format!("{}{FORECAST_PATH}", mock_server.uri()), 5)
        .expect("Failed to create client")
}

#[tokio::test]
async fn fetch_posts_expected_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FORECAST_PATH))
        .and(body_json(serde_json::json!({
            "lat": 40.7128,
            "lon": -74.006,
            "model": "gfs",
            "parameters": ["temp", "wind"],
            "levels": ["surface"],
            "key": "TEST_KEY",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let raw = client
        .fetch(Coordinate::new(40.7128, -74.006), &["temp", "wind"], 7)
        .await
        .expect("fetch succeeds");

    assert_eq!(raw.0, sample_response());
}

#[tokio::test]
async fn fetch_passes_out_of_range_coordinates_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid lat"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.fetch(Coordinate::new(123.0, 456.0), &["temp"], 7).await.unwrap_err();

    match err {
        ForecastError::RequestFailed { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "invalid lat");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn service_unavailable_is_request_failed_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let now = DateTime::from_timestamp(0, 0).expect("epoch");
    let err = get_forecasts(&client, Coordinate::new(52.52, 13.405), now).await.unwrap_err();

    assert!(matches!(err, ForecastError::RequestFailed { status: 503, .. }));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.fetch(Coordinate::new(0.0, 0.0), &["temp"], 7).await.unwrap_err();

    assert!(matches!(err, ForecastError::MalformedResponse { parameter: None, .. }));
}

#[tokio::test]
async fn get_forecasts_builds_bundle_from_mock() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let now = DateTime::from_timestamp(0, 0).expect("epoch");
    let bundle = get_forecasts(&client, Coordinate::new(40.7128, -74.006), now)
        .await
        .expect("bundle");

    assert_eq!(bundle.current_temperature, 10.0);
    assert_eq!(bundle.tomorrow_forecast["temp"].timestamp, 25 * 3600);
    assert_eq!(bundle.tomorrow_forecast["temp"].value, 35.0);
    assert_eq!(bundle.day_after_tomorrow_forecast["precip"].timestamp, 49 * 3600);
    assert_eq!(bundle.week_forecast["wind"].len(), 168);
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    // Nothing listens on the discard port.
    let client = WindyClient::new("KEY".into(), "http://127.0.0.1:9/".into(), 2)
        .expect("Failed to create client");

    let err = client.fetch(Coordinate::new(0.0, 0.0), &["temp"], 7).await.unwrap_err();
    assert!(matches!(err, ForecastError::Transport(_)));
}

/// Serves one request: reads it fully, answers with `response`, then hangs up.
fn serve_once(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];

        loop {
            let n = stream.read(&mut buf).expect("read");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&request);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    break;
                }
            }
        }

        stream.write_all(response.as_bytes()).expect("write");
    });

    format!("http://{addr}{FORECAST_PATH}")
}

#[tokio::test]
async fn truncated_error_body_keeps_status() {
    let endpoint = serve_once(
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 100\r\nConnection: close\r\n\r\nshort",
    );
    let client = WindyClient::new("KEY".into(), endpoint, 5).expect("Failed to create client");

    let err = client.fetch(Coordinate::new(0.0, 0.0), &["temp"], 7).await.unwrap_err();

    assert!(
        matches!(err, ForecastError::RequestFailed { status: 503, .. }),
        "unexpected error: {err:?}"
    );
}
