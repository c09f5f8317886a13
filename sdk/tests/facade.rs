//! Facade behavior against a recording transport.
//!
//! Nothing in this test binary calls `configure`, so the global record stays
//! unset for every test here.

mod common;

use chrono::{TimeZone, Utc};
use common::{profile_json, track_response_json, RecordingTransport};
use ludiks::{
    Auth, Credentials, GetProfileOptions, HttpMethod, InitUserOptions, Ludiks, LudiksError,
    TrackEvent, TrackEventOptions, User, DEFAULT_BASE_URL,
};

const BASE_URL: &str = "http://localhost:3000";

fn auth() -> Auth {
    Auth::Explicit(Credentials::new("test-key").with_base_url(BASE_URL))
}

// --- init_user ---

#[tokio::test]
async fn init_user_posts_once_and_preserves_id() {
    let transport = RecordingTransport::new();
    transport.respond(201, "");
    let sdk = Ludiks::with_transport(transport.clone());

    let user = User::new("user/42 é", "Ada Lovelace").with_picture("https://cdn/ada.png");
    sdk.init_user(&user, &auth()).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].url, "http://localhost:3000/api/end-user");
    assert_eq!(requests[0].header("authorization"), Some("Bearer test-key"));
    assert_eq!(requests[0].header("content-type"), Some("application/json"));

    let body = transport.last_body();
    assert_eq!(body["id"], "user/42 é");
    assert_eq!(body["fullName"], "Ada Lovelace");
    assert_eq!(body["picture"], "https://cdn/ada.png");
    assert!(body.get("email").is_none());
}

#[tokio::test]
async fn init_user_with_options_defaults_base_url() {
    let transport = RecordingTransport::new();
    let sdk = Ludiks::with_transport(transport.clone());

    let options = InitUserOptions {
        api_key: "explicit-key".to_string(),
        user: User::new("u-1", "Ada"),
        base_url: None,
    };
    sdk.init_user_with(&options).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].url, format!("{DEFAULT_BASE_URL}/api/end-user"));
    assert_eq!(requests[0].header("authorization"), Some("Bearer explicit-key"));
}

// --- track_event ---

#[tokio::test]
async fn track_event_returns_decoded_body_unchanged() {
    let transport = RecordingTransport::new();
    let expected = track_response_json();
    transport.respond(200, &expected.to_string());
    let sdk = Ludiks::with_transport(transport.clone());

    let ts = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    let event = TrackEvent::new("u-1", "lesson_completed")
        .with_value(2.5)
        .with_timestamp(ts);
    let response = sdk.track_event(&event, &auth()).await.unwrap();

    assert_eq!(serde_json::to_value(&response).unwrap(), expected);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "http://localhost:3000/api/tracking");
    let body = transport.last_body();
    assert_eq!(
        body,
        serde_json::json!({
            "userId": "u-1",
            "eventName": "lesson_completed",
            "value": 2.5,
            "timestamp": "2025-06-01T08:00:00Z"
        })
    );
}

#[tokio::test]
async fn track_event_keeps_fractional_points() {
    let transport = RecordingTransport::new();
    let mut expected = track_response_json();
    expected["points"] = serde_json::json!(2.5);
    transport.respond(200, &expected.to_string());
    let sdk = Ludiks::with_transport(transport);

    let event = TrackEvent::new("u-1", "lesson_completed").with_value(0.5);
    let response = sdk.track_event(&event, &auth()).await.unwrap();

    assert_eq!(response.points.as_ref().and_then(|p| p.as_f64()), Some(2.5));
    assert_eq!(serde_json::to_value(&response).unwrap(), expected);
}

#[tokio::test]
async fn track_event_with_options_never_needs_global_config() {
    let transport = RecordingTransport::new();
    transport.respond(200, &track_response_json().to_string());
    let sdk = Ludiks::with_transport(transport.clone());

    let options = TrackEventOptions {
        api_key: "explicit-key".to_string(),
        user_id: "u-1".to_string(),
        event_name: "login".to_string(),
        value: None,
        timestamp: None,
        base_url: Some(BASE_URL.to_string()),
    };
    let response = sdk.track_event_with(&options).await.unwrap();
    assert!(response.success);

    let body = transport.last_body();
    assert_eq!(body, serde_json::json!({"userId": "u-1", "eventName": "login"}));
}

#[tokio::test]
async fn track_event_propagates_transport_errors() {
    let transport = RecordingTransport::new();
    transport.fail("connection refused");
    let sdk = Ludiks::with_transport(transport.clone());

    let err = sdk
        .track_event(&TrackEvent::new("u-1", "login"), &auth())
        .await
        .unwrap_err();
    assert!(matches!(err, LudiksError::Transport(ref reason) if reason == "connection refused"));
}

#[tokio::test]
async fn track_event_propagates_decode_errors() {
    let transport = RecordingTransport::new();
    transport.respond(200, r#"{"success":true}"#);
    let sdk = Ludiks::with_transport(transport);

    let err = sdk
        .track_event(&TrackEvent::new("u-1", "login"), &auth())
        .await
        .unwrap_err();
    assert!(matches!(err, LudiksError::Decode(_)));
}

// --- get_profile ---

#[tokio::test]
async fn get_profile_encodes_user_id_in_path() {
    let transport = RecordingTransport::new();
    transport.respond(200, &profile_json("a b").to_string());
    let sdk = Ludiks::with_transport(transport.clone());

    let profile = sdk.get_profile("a b", &auth()).await.unwrap();
    assert_eq!(profile.id, "a b");

    let requests = transport.requests();
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert!(requests[0].url.ends_with("/api/end-user/a%20b"));
    assert!(requests[0].body.is_none());
}

#[tokio::test]
async fn get_profile_decodes_nested_progressions() {
    let transport = RecordingTransport::new();
    let expected = profile_json("u-1");
    transport.respond(200, &expected.to_string());
    let sdk = Ludiks::with_transport(transport);

    let options = GetProfileOptions {
        api_key: "test-key".to_string(),
        user_id: "u-1".to_string(),
        base_url: Some(BASE_URL.to_string()),
    };
    let profile = sdk.get_profile_with(&options).await.unwrap();

    assert_eq!(
        profile.progressions[0].step_progressions[0].completion_threshold,
        serde_json::Number::from(1)
    );
    assert_eq!(profile.rewards[0].circuit_name, "Onboarding");
    assert_eq!(serde_json::to_value(&profile).unwrap(), expected);
}

// --- errors shared by all operations ---

#[tokio::test]
async fn not_found_body_message_surfaces_for_every_operation() {
    let transport = RecordingTransport::new();
    for _ in 0..3 {
        transport.respond(404, r#"{"message":"not found"}"#);
    }
    let sdk = Ludiks::with_transport(transport.clone());

    let errors = [
        sdk.init_user(&User::new("u-1", "Ada"), &auth()).await.unwrap_err(),
        sdk.track_event(&TrackEvent::new("u-1", "login"), &auth())
            .await
            .unwrap_err(),
        sdk.get_profile("u-1", &auth()).await.unwrap_err(),
    ];

    for err in errors {
        assert!(matches!(err, LudiksError::Request { status: 404, .. }));
        assert_eq!(err.to_string(), "not found");
    }
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn global_form_without_configure_fails_before_sending() {
    let transport = RecordingTransport::new();
    let sdk = Ludiks::with_transport(transport.clone());

    let err = sdk
        .track_event(&TrackEvent::new("u-1", "login"), &Auth::Global)
        .await
        .unwrap_err();
    assert!(matches!(err, LudiksError::NotConfigured));

    let err = sdk.get_profile("u-1", &Auth::Global).await.unwrap_err();
    assert!(matches!(err, LudiksError::NotConfigured));

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn free_function_global_form_without_configure_fails() {
    let err = ludiks::track_event("u-1", "login", None, None).await.unwrap_err();
    assert!(matches!(err, LudiksError::NotConfigured));

    let err = ludiks::init_user(&User::new("u-1", "Ada")).await.unwrap_err();
    assert!(matches!(err, LudiksError::NotConfigured));
}
