use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use tactile_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &[&str], key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let mut table = root.as_table_mut().expect("Template config must be a table.");

	for name in section {
		table = table
			.get_mut(*name)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{name}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn sample_toml_without(section: &str) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");

	root.as_table_mut().expect("Template config must be a table.").remove(section);

	toml::to_string(&root).expect("Failed to render template config.")
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

	path.push(format!("tactile_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> tactile_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = tactile_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation_message(payload: String, expected: &str) {
	let err = load_payload(payload).expect_err("Expected validation error.");
	let message = err.to_string();

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error kind: {err:?}");
	assert!(message.contains(expected), "Unexpected error message: {message}");
}

#[test]
fn sample_config_loads() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Sample config must be valid.");

	assert_eq!(cfg.retrieval.k, 10);
	assert_eq!(cfg.storage.qdrant.vector_dim, 1_024);
	assert_eq!(cfg.contextualizer.max_history_turns, 6);
}

#[test]
fn api_base_trailing_slash_is_trimmed() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Sample config must be valid.");

	assert_eq!(cfg.providers.embedding.api_base, "https://embeddings.example.com/v1");
}

#[test]
fn retrieval_section_defaults_when_missing() {
	let cfg = load_payload(sample_toml_without("retrieval")).expect("Config must be valid.");

	assert_eq!(cfg.retrieval.k, 10);
	assert!((cfg.retrieval.confidence_threshold - 0.35).abs() < f32::EPSILON);
	assert!((cfg.retrieval.rrf_k - 60.0).abs() < f32::EPSILON);
	assert!(cfg.retrieval.enable_embedding_search);
	assert!(cfg.retrieval.enable_fuzzy_matching);
}

#[test]
fn contextualizer_section_defaults_when_missing() {
	let cfg = load_payload(sample_toml_without("contextualizer")).expect("Config must be valid.");

	assert_eq!(cfg.contextualizer.timeout_ms, 5_000);
	assert_eq!(cfg.contextualizer.max_history_turns, 6);
}

#[test]
fn embedding_dimensions_must_match_vector_dim() {
	expect_validation_message(
		sample_toml_with(&["providers", "embedding"], "dimensions", Value::Integer(768)),
		"providers.embedding.dimensions must match storage.qdrant.vector_dim.",
	);
}

#[test]
fn k_must_be_positive() {
	expect_validation_message(
		sample_toml_with(&["retrieval"], "k", Value::Integer(0)),
		"retrieval.k must be greater than zero.",
	);
}

#[test]
fn confidence_threshold_must_be_in_unit_range() {
	expect_validation_message(
		sample_toml_with(&["retrieval"], "confidence_threshold", Value::Float(1.5)),
		"retrieval.confidence_threshold must be in the range 0.0-1.0.",
	);
}

#[test]
fn rrf_k_must_not_be_negative() {
	expect_validation_message(
		sample_toml_with(&["retrieval"], "rrf_k", Value::Float(-1.0)),
		"retrieval.rrf_k must be zero or greater.",
	);
}

#[test]
fn contextualizer_timeout_must_be_positive() {
	expect_validation_message(
		sample_toml_with(&["contextualizer"], "timeout_ms", Value::Integer(0)),
		"contextualizer.timeout_ms must be greater than zero.",
	);
}

#[test]
fn provider_api_key_must_be_non_empty() {
	expect_validation_message(
		sample_toml_with(&["providers", "llm_rewriter"], "api_key", Value::String("  ".into())),
		"Provider llm_rewriter api_key must be non-empty.",
	);
}

#[test]
fn missing_file_reports_read_error() {
	let mut path = env::temp_dir();

	path.push("tactile_config_test_missing_file.toml");

	let err = tactile_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}

#[test]
fn malformed_file_reports_parse_error() {
	let err = load_payload("[service\nlog_level = ".to_string()).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }));
}
