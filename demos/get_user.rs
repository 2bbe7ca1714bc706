//! Fetches and updates a user through the default reqwest transport against a local mock
//! tenant, showing URL segment substitution, query parameters, and null-field pruning.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
// self
use management_api::connection::ApiConnection;

#[derive(Debug, Deserialize)]
struct User {
	user_id: String,
	email: String,
}

#[derive(Serialize)]
struct UserPatch<'a> {
	nickname: Option<&'a str>,
	blocked: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let get_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v2/users/usr_42")
				.query_param("fields", "user_id,email")
				.header("authorization", "Bearer demo-token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"user_id":"usr_42","email":"ada@example.com"}"#);
		})
		.await;
	let patch_mock = server
		.mock_async(|when, then| {
			when.method(PATCH)
				.path("/api/v2/users/usr_42")
				.json_body(json!({ "nickname": "ada" }));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"user_id":"usr_42","email":"ada@example.com"}"#);
		})
		.await;
	let connection = ApiConnection::new("demo-token", server.url("/api/v2/"))?;
	let user = connection
		.get::<User>("users/{id}", &[("id", "usr_42")], &[("fields", "user_id,email")])
		.await?;

	println!("Fetched {} <{}>.", user.user_id, user.email);

	let patch = UserPatch { nickname: Some("ada"), blocked: None };
	let updated = connection.patch::<User, _>("users/{id}", &patch, &[("id", "usr_42")]).await?;

	println!("Updated {}.", updated.user_id);

	get_mock.assert_async().await;
	patch_mock.assert_async().await;

	Ok(())
}
