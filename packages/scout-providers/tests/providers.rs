use reqwest::header::{AUTHORIZATION, HeaderName};
use serde_json::{Map, Value};

#[test]
fn builds_bearer_auth_header() {
	let headers =
		scout_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");
	assert_eq!(value, "Bearer secret");
}

#[test]
fn merges_default_headers() {
	let mut defaults = Map::new();
	defaults.insert("x-requested-with".to_string(), Value::String("XMLHttpRequest".to_string()));
	let headers =
		scout_providers::auth_headers("secret", &defaults).expect("Failed to build headers.");
	let value = headers
		.get(HeaderName::from_static("x-requested-with"))
		.expect("Missing default header.");
	assert_eq!(value, "XMLHttpRequest");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();
	defaults.insert("x-retries".to_string(), Value::from(3));
	assert!(scout_providers::auth_headers("secret", &defaults).is_err());
}
