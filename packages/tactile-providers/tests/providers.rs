use reqwest::header::{AUTHORIZATION, HeaderName};
use serde_json::{Map, Value};

#[test]
fn builds_bearer_auth_header() {
	let headers =
		tactile_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn forwards_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-org".to_string(), Value::String("switch-lab".to_string()));

	let headers =
		tactile_providers::auth_headers("secret", &defaults).expect("Failed to build headers.");
	let value =
		headers.get(HeaderName::from_static("x-org")).expect("Missing default header.");

	assert_eq!(value, "switch-lab");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-retries".to_string(), Value::from(3));

	let err = tactile_providers::auth_headers("secret", &defaults)
		.expect_err("Expected invalid header config.");

	assert!(matches!(err, tactile_providers::Error::InvalidConfig { .. }));
}
