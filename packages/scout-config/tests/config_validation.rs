use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use scout_config::{Config, DEFAULT_PROMPT_TEMPLATE, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with_search(result_limit: i64, max_distance: f64) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");
	let search = root
		.get_mut("search")
		.and_then(Value::as_table_mut)
		.expect("Template config must include [search].");

	search.insert("result_limit".to_string(), Value::Integer(result_limit));
	search.insert("max_distance".to_string(), Value::Float(max_distance));

	toml::to_string(&value).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("scout_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse test config.")
}

#[test]
fn sample_config_loads_with_defaults() {
	let path = write_temp_config(SAMPLE_CONFIG_TEMPLATE_TOML.to_string());
	let result = scout_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Sample config must load.");

	assert_eq!(cfg.mattermost.api_base, "https://chat.example.com");
	assert_eq!(cfg.mattermost.api_path, "/api/v4");
	assert_eq!(cfg.storage.qdrant.distance, "cosine");
	assert_eq!(cfg.storage.qdrant.document_field, "document");
	assert_eq!(cfg.storage.qdrant.channel_field, "channel_id");
	assert_eq!(cfg.search.deadline_ms, None);
	assert_eq!(cfg.enrichment.user_fields, vec!["username", "first_name", "last_name"]);
	assert_eq!(cfg.enrichment.channel_fields, vec!["name", "display_name", "team_id"]);
	assert_eq!(cfg.providers.llm.prompt_template(), DEFAULT_PROMPT_TEMPLATE);
}

#[test]
fn result_limit_must_be_positive() {
	let path = write_temp_config(sample_toml_with_search(0, 0.4));
	let result = scout_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected result_limit validation error.");

	assert!(
		err.to_string().contains("search.result_limit must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn max_distance_must_not_be_negative() {
	let path = write_temp_config(sample_toml_with_search(10, -0.1));
	let result = scout_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected max_distance validation error.");

	assert!(
		err.to_string().contains("search.max_distance must be zero or greater."),
		"Unexpected error: {err}"
	);
}

#[test]
fn max_distance_zero_is_allowed() {
	let mut cfg = base_config();

	cfg.search.max_distance = 0.0;

	assert!(scout_config::validate(&cfg).is_ok());
}

#[test]
fn max_distance_must_be_finite() {
	let mut cfg = base_config();

	cfg.search.max_distance = f32::NAN;

	let err = scout_config::validate(&cfg).expect_err("Expected max_distance validation error.");

	assert!(
		err.to_string().contains("search.max_distance must be a finite number."),
		"Unexpected error: {err}"
	);
}

#[test]
fn deadline_must_be_positive_when_set() {
	let mut cfg = base_config();

	cfg.search.deadline_ms = Some(0);

	let err = scout_config::validate(&cfg).expect_err("Expected deadline validation error.");

	assert!(
		err.to_string().contains("search.deadline_ms must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn embedding_dimensions_must_match_vector_dim() {
	let mut cfg = base_config();

	cfg.providers.embedding.dimensions = 768;

	let err = scout_config::validate(&cfg).expect_err("Expected dimension validation error.");

	assert!(
		err.to_string()
			.contains("providers.embedding.dimensions must match storage.qdrant.vector_dim."),
		"Unexpected error: {err}"
	);
}

#[test]
fn distance_metric_must_be_known() {
	let mut cfg = base_config();

	cfg.storage.qdrant.distance = "manhattan".to_string();

	let err = scout_config::validate(&cfg).expect_err("Expected distance validation error.");

	assert!(
		err.to_string().contains("storage.qdrant.distance must be one of cosine, euclid, or dot."),
		"Unexpected error: {err}"
	);
}

#[test]
fn access_token_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.mattermost.access_token = "  ".to_string();

	let err = scout_config::validate(&cfg).expect_err("Expected access token validation error.");

	assert!(
		err.to_string().contains("mattermost.access_token must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn provider_api_keys_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.providers.llm.api_key = String::new();

	let err = scout_config::validate(&cfg).expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("Provider llm api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn prompt_template_requires_placeholders() {
	let mut cfg = base_config();

	cfg.providers.llm.prompt_template = Some("Answer {query}.".to_string());

	let err = scout_config::validate(&cfg).expect_err("Expected prompt template validation error.");

	assert!(
		err.to_string().contains("providers.llm.prompt_template must contain {context} and {query}."),
		"Unexpected error: {err}"
	);
}

#[test]
fn missing_file_reports_read_error() {
	let mut path = env::temp_dir();

	path.push("scout_config_test_missing_file.toml");

	let err = scout_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err}");
}
