//! Integration tests for `Connection` using wiremock.
//!
//! These exercise the default reqwest transport against a mock forecast.io server.

use chrono::{TimeZone, Utc};
use forecast_core::{Connection, ForecastError, Units};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FULL: &str = include_str!("fixtures/full_report.json");
const NO_EXCLUDES: [&str; 0] = [];

fn connection(server: &MockServer) -> Connection {
    Connection::new("KEY").with_base_url(format!("{}/forecast", server.uri()))
}

#[tokio::test]
async fn test_forecast_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast/KEY/37.826700,-122.423000"))
        .and(query_param("units", "si"))
        .and(query_param("exclude", "minutely,flags"))
        .and(query_param("extend", "hourly"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(FULL)
                .insert_header("X-Forecast-API-Calls", "42"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let conn = connection(&mock_server);
    conn.set_units("si").await.unwrap();

    let mut report = conn
        .forecast(37.8267, -122.423, &["minutely", "flags"], true)
        .await
        .unwrap();
    report.normalize_times();

    assert_eq!(conn.api_calls().await, 42);
    assert_eq!(report.timezone, "America/Los_Angeles");
    assert_eq!(report.hourly.as_ref().unwrap().data.len(), 3);
    assert_eq!(report.daily.as_ref().unwrap().data.len(), 2);
    assert_eq!(
        report.currently.unwrap().time,
        Some(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn test_forecast_at_time_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast/KEY/51.500000,-0.120000,1609459200"))
        .and(query_param("units", "auto"))
        .and(query_param("exclude", "hourly"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(FULL)
                .insert_header("X-Forecast-API-Calls", "7"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let conn = connection(&mock_server);
    let when = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();

    let report = conn.forecast_at_time(51.5, -0.12, when, &["hourly"]).await.unwrap();

    assert_eq!(conn.api_calls().await, 7);
    assert_eq!(report.alerts.unwrap().len(), 1);
}

#[tokio::test]
async fn test_forecast_at_time_raw_string_passed_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast/KEY/0.000000,0.000000,2013-05-06T12:00:00-0400"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FULL))
        .expect(1)
        .mount(&mock_server)
        .await;

    let conn = connection(&mock_server);

    conn.forecast_at_time(0.0, 0.0, "2013-05-06T12:00:00-0400", &NO_EXCLUDES)
        .await
        .unwrap();

    // No header in the response: counter stays at its initial value.
    assert_eq!(conn.api_calls().await, 0);
}

#[tokio::test]
async fn test_invalid_exclude_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FULL))
        .expect(0)
        .mount(&mock_server)
        .await;

    let conn = connection(&mock_server);

    let err = conn.forecast(0.0, 0.0, &["yearly"], false).await.unwrap_err();
    assert!(matches!(err, ForecastError::InvalidExclude(_)));

    let err = conn.forecast_at_time(0.0, 0.0, 0_i64, &[""]).await.unwrap_err();
    assert!(matches!(err, ForecastError::InvalidExclude(_)));
}

#[tokio::test]
async fn test_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"code":400,"error":"The given location is invalid."}"#)
                .insert_header("X-Forecast-API-Calls", "3"),
        )
        .mount(&mock_server)
        .await;

    let conn = connection(&mock_server);
    let err = conn.forecast(999.0, 0.0, &NO_EXCLUDES, false).await.unwrap_err();

    match err {
        ForecastError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("location is invalid"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(conn.api_calls().await, 3);
}

#[tokio::test]
async fn test_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let conn = connection(&mock_server);
    let err = conn.forecast(0.0, 0.0, &NO_EXCLUDES, false).await.unwrap_err();

    assert!(matches!(err, ForecastError::Parse(_)));
}

#[tokio::test]
async fn test_connection_refused() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let conn = Connection::new("KEY")
        .with_base_url(format!("http://127.0.0.1:{port}/forecast"))
        .with_units(Units::Us);

    let err = conn.forecast(0.0, 0.0, &NO_EXCLUDES, false).await.unwrap_err();

    match err {
        ForecastError::Transport(source) => {
            let source = source
                .downcast_ref::<reqwest::Error>()
                .expect("source must be the reqwest error");
            assert!(source.is_connect());
        }
        other => panic!("expected transport error, got {other:?}"),
    }
    assert_eq!(conn.api_calls().await, 0);
}
