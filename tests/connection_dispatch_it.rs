mod common;

// std
use std::sync::Arc;
// crates.io
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::Duration;
// self
use common::*;
use management_api::{
	connection::ApiConnection,
	error::{ConfigError, Error},
	http::HttpResponse,
	request::{ApiRequest, Method},
};

#[derive(Debug, Deserialize, PartialEq)]
struct User {
	user_id: String,
	email: String,
}

#[derive(Serialize)]
struct UserCreate {
	email: &'static str,
	connection: &'static str,
	nickname: Option<&'static str>,
	user_metadata: Option<Value>,
}

#[derive(Serialize)]
struct UserUpdate {
	blocked: Option<bool>,
	name: Option<&'static str>,
}

const USER_JSON: &str = r#"{"user_id":"auth0|42","email":"ada@example.com"}"#;

fn expected_user() -> User {
	User { user_id: "auth0|42".into(), email: "ada@example.com".into() }
}

#[tokio::test]
async fn delete_sends_delete_to_substituted_resource() {
	let client = Arc::new(RecordingHttpClient::replying(HttpResponse::new(204, "")));
	let connection = build_recording_connection(client.clone());

	connection
		.delete::<()>("users/{id}", &[("id", "abc123")])
		.await
		.expect("Delete should succeed with an empty body.");

	let request = client.last_request();

	assert_eq!(request.method, Method::Delete);
	assert_eq!(request.url.as_str(), "https://tenant.example.com/api/v2/users/abc123");
	assert_eq!(request.header("authorization"), Some("Bearer test-token"));
	assert_eq!(request.header("accept"), Some("application/json"));
	assert_eq!(request.header("content-type"), None);
	assert!(request.body.is_none());
}

#[tokio::test]
async fn get_applies_segments_and_query() {
	let client = Arc::new(RecordingHttpClient::ok_json(USER_JSON));
	let connection = build_recording_connection(client.clone());
	let user = connection
		.get::<User>(
			"users/{id}",
			&[("id", "auth0 42")],
			&[("fields", "user_id,email"), ("include_fields", "true")],
		)
		.await
		.expect("Get should decode the user.");

	assert_eq!(user, expected_user());

	let request = client.last_request();
	let query = request.url.query_pairs().into_owned().collect::<Vec<_>>();

	assert_eq!(request.method, Method::Get);
	assert_eq!(request.url.path(), "/api/v2/users/auth0%2042");
	assert_eq!(
		query,
		vec![
			("fields".to_owned(), "user_id,email".to_owned()),
			("include_fields".to_owned(), "true".to_owned()),
		]
	);
	assert_eq!(request.header("Authorization"), Some("Bearer test-token"));
}

#[tokio::test]
async fn post_omits_null_fields_from_body() {
	let client = Arc::new(RecordingHttpClient::ok_json(USER_JSON));
	let connection = build_recording_connection(client.clone());
	let body = UserCreate {
		email: "ada@example.com",
		connection: "Username-Password-Authentication",
		nickname: None,
		user_metadata: Some(json!({ "plan": null, "team": "core" })),
	};
	let user = connection.post::<User, _>("users", &body).await.expect("Post should succeed.");

	assert_eq!(user, expected_user());

	let request = client.last_request();

	assert_eq!(request.method, Method::Post);
	assert_eq!(request.url.as_str(), "https://tenant.example.com/api/v2/users");
	assert_eq!(request.header("content-type"), Some("application/json"));
	assert_eq!(
		request.json_body(),
		Some(json!({
			"email": "ada@example.com",
			"connection": "Username-Password-Authentication",
			"user_metadata": { "team": "core" },
		}))
	);
}

#[tokio::test]
async fn patch_sends_body_and_segments() {
	let client = Arc::new(RecordingHttpClient::ok_json(USER_JSON));
	let connection = build_recording_connection(client.clone());

	connection
		.patch::<User, _>(
			"users/{id}",
			&UserUpdate { blocked: Some(true), name: None },
			&[("id", "abc123")],
		)
		.await
		.expect("Patch should succeed.");

	let request = client.last_request();

	assert_eq!(request.method, Method::Patch);
	assert_eq!(request.url.path(), "/api/v2/users/abc123");
	assert_eq!(request.json_body(), Some(json!({ "blocked": true })));
	assert_eq!(request.header("authorization"), Some("Bearer test-token"));
}

#[tokio::test]
async fn send_merges_default_and_request_headers() {
	let client = Arc::new(RecordingHttpClient::ok_json("{}"));
	let connection = ApiConnection::<RecordingHttpClient>::with_http_client(
		TEST_TOKEN,
		TEST_BASE_URL,
		client.clone(),
	)
	.default_header("x-tenant", "acme")
	.default_header("x-client", "default")
	.build()
	.expect("Connection should build.");
	let request = ApiRequest::put("roles/{id}")
		.url_segment("id", "rol_1")
		.header("X-Client", "override")
		.json_body(&json!({ "name": "admin" }))
		.expect("Body should serialize.");
	let _: Value = connection.send(request).await.expect("Put should succeed.");
	let sent = client.last_request();

	assert_eq!(sent.method, Method::Put);
	assert_eq!(sent.header("x-tenant"), Some("acme"));
	assert_eq!(sent.header("x-client"), Some("override"));
	assert_eq!(
		sent.headers.iter().filter(|(name, _)| name.eq_ignore_ascii_case("x-client")).count(),
		1
	);
	assert_eq!(sent.header("authorization"), Some("Bearer test-token"));
}

#[tokio::test]
async fn reserved_request_headers_are_rejected_before_sending() {
	let client = Arc::new(RecordingHttpClient::ok_json("{}"));
	let connection = build_recording_connection(client.clone());
	let err = connection
		.send::<Value>(ApiRequest::get("users").header("Authorization", "Bearer other"))
		.await
		.expect_err("Overriding the authorization header should fail.");

	assert!(matches!(err, Error::Config(ConfigError::ReservedHeader { .. })));
	assert!(client.requests().is_empty());
}

#[tokio::test]
async fn missing_segment_fails_before_sending() {
	let client = Arc::new(RecordingHttpClient::ok_json("{}"));
	let connection = build_recording_connection(client.clone());
	let err = connection
		.delete::<()>("users/{id}", &[])
		.await
		.expect_err("Missing segment should fail.");

	assert!(matches!(err, Error::Config(ConfigError::MissingUrlSegment { .. })));
	assert!(client.requests().is_empty());
}

#[tokio::test]
async fn failure_invokes_hook_and_surfaces_status() {
	let client = Arc::new(RecordingHttpClient::replying(
		HttpResponse::new(429, r#"{"error":"Too Many Requests"}"#).with_header("Retry-After", "30"),
	));
	let hook = Arc::new(RecordingErrorHook::default());
	let connection =
		ApiConnection::<RecordingHttpClient>::with_http_client(TEST_TOKEN, TEST_BASE_URL, client)
			.error_hook(hook.clone())
			.build()
			.expect("Connection should build.");
	let err = connection
		.get::<Value>("users", &[], &[])
		.await
		.expect_err("HTTP 429 should surface as an error.");

	match err {
		Error::Status { status, metadata, body } => {
			assert_eq!(status, 429);
			assert_eq!(metadata.retry_after, Some(Duration::seconds(30)));
			assert!(body.contains("Too Many Requests"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	let seen = hook.seen();

	assert_eq!(seen.len(), 1, "Hook must observe a single failure.");
	assert_eq!(seen[0].status, 429);
}

#[tokio::test]
async fn default_hook_leaves_status_error_untouched() {
	let client = Arc::new(RecordingHttpClient::replying(HttpResponse::new(404, "")));
	let connection = build_recording_connection(client);
	let err = connection
		.get::<Value>("users/{id}", &[("id", "missing")], &[])
		.await
		.expect_err("HTTP 404 should surface as an error.");

	assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn mismatched_body_reports_decode_error() {
	let client = Arc::new(RecordingHttpClient::ok_json(r#"{"user_id":42}"#));
	let connection = build_recording_connection(client);
	let err = connection
		.get::<User>("users/{id}", &[("id", "42")], &[])
		.await
		.expect_err("Body should not match the user shape.");

	match err {
		Error::Decode { status, source } => {
			assert_eq!(status, 200);
			assert_eq!(source.path().to_string(), "user_id");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
