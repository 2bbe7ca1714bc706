//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use parking_lot::Mutex;
// self
use management_api::{
	connection::ApiConnection,
	error::Result,
	hook::ErrorHook,
	http::{
		ApiHttpClient, HttpFuture, HttpRequest, HttpResponse, ReqwestHttpClient, ResponseMetadata,
	},
	reqwest::Client as ReqwestClient,
};

pub const TEST_BASE_URL: &str = "https://tenant.example.com/api/v2/";
pub const TEST_TOKEN: &str = "test-token";

/// Transport that records every request and replies with a canned response.
#[derive(Debug)]
pub struct RecordingHttpClient {
	response: HttpResponse,
	requests: Mutex<Vec<HttpRequest>>,
}
impl RecordingHttpClient {
	pub fn replying(response: HttpResponse) -> Self {
		Self { response, requests: Mutex::new(Vec::new()) }
	}

	pub fn ok_json(body: &str) -> Self {
		Self::replying(HttpResponse::new(200, body).with_header("content-type", "application/json"))
	}

	pub fn requests(&self) -> Vec<HttpRequest> {
		self.requests.lock().clone()
	}

	pub fn last_request(&self) -> HttpRequest {
		self.requests().pop().expect("At least one request should have been recorded.")
	}
}
impl ApiHttpClient for RecordingHttpClient {
	fn execute<'a>(&'a self, request: &'a HttpRequest) -> HttpFuture<'a> {
		self.requests.lock().push(request.clone());

		let response: Result<HttpResponse> = Ok(self.response.clone());

		Box::pin(async move { response })
	}
}

/// Error hook that records the metadata of every failure it sees.
#[derive(Debug, Default)]
pub struct RecordingErrorHook {
	seen: Mutex<Vec<ResponseMetadata>>,
}
impl RecordingErrorHook {
	pub fn seen(&self) -> Vec<ResponseMetadata> {
		self.seen.lock().clone()
	}
}
impl ErrorHook for RecordingErrorHook {
	fn on_error(&self, _: &HttpRequest, _: &HttpResponse, metadata: &ResponseMetadata) {
		self.seen.lock().push(metadata.clone());
	}
}

pub fn build_recording_connection(
	client: Arc<RecordingHttpClient>,
) -> ApiConnection<RecordingHttpClient> {
	ApiConnection::<RecordingHttpClient>::with_http_client(TEST_TOKEN, TEST_BASE_URL, client)
		.build()
		.expect("Recording connection should build.")
}

/// Builds a reqwest-backed connection that accepts the self-signed certificates produced by
/// `httpmock` during tests.
pub fn build_reqwest_test_connection(base_url: &str) -> ApiConnection<ReqwestHttpClient> {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ApiConnection::<ReqwestHttpClient>::with_http_client(
		TEST_TOKEN,
		base_url,
		ReqwestHttpClient::with_client(client),
	)
	.build()
	.expect("Reqwest test connection should build.")
}
