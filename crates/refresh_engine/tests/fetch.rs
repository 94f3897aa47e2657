use std::time::Duration;

use refresh_engine::{FailureKind, FetchSettings, ReqwestTransport, Transport};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(settings: FetchSettings) -> ReqwestTransport {
    ReqwestTransport::new(settings).expect("client")
}

#[tokio::test]
async fn transport_returns_body_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/finance/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<div id="a">X</div>"#, "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/finance/?refresh-live", server.uri());
    let output = transport(FetchSettings::default())
        .fetch(&url)
        .await
        .expect("fetch ok");

    assert_eq!(output.status, 200);
    assert_eq!(output.bytes, br#"<div id="a">X</div>"#);
    assert!(output.content_type.unwrap().starts_with("text/html"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), Some("refresh-live"));
}

#[tokio::test]
async fn transport_fails_on_http_status_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/go"))
        .respond_with(ResponseTemplate::new(500).set_body_string("bad state"))
        .mount(&server)
        .await;

    let url = format!("{}/go?refresh-account", server.uri());
    let err = transport(FetchSettings::default())
        .fetch(&url)
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.body.as_deref(), Some("bad state"));
    assert_eq!(err.report_text(), "bad state");
}

#[tokio::test]
async fn error_body_is_decoded_with_its_charset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/go"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_raw(b"caf\xe9 ferm\xe9".to_vec(), "text/plain; charset=ISO-8859-1"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/go?refresh-live", server.uri());
    let err = transport(FetchSettings::default())
        .fetch(&url)
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.body.as_deref(), Some("café fermé"));
}

#[tokio::test]
async fn empty_error_body_is_reported_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = transport(FetchSettings::default())
        .fetch(&url)
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    let report: serde_json::Value = serde_json::from_str(&err.report_text()).unwrap();
    assert_eq!(report["status"], 404);
}

#[tokio::test]
async fn transport_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let url = format!("{}/slow", server.uri());

    let err = transport(settings).fetch(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn transport_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let url = format!("{}/large", server.uri());

    let err = transport(settings).fetch(&url).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn invalid_url_is_rejected_before_sending() {
    let err = transport(FetchSettings::default())
        .fetch("not a url")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
