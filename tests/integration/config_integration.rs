//! Integration tests for Configuration System

use crate::integration::test_utils::with_isolated_env;
use tarantino::config::{global_config_path, workspace_config_path, ConfigLoader, TarantinoConfig};
use tarantino::provider::{DEFAULT_MODEL, JSON_ONLY_INSTRUCTION};
use tempfile::TempDir;

fn write(path: &std::path::Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

#[test]
fn test_defaults_without_any_file() {
    let temp = TempDir::new().unwrap();
    with_isolated_env(&temp, || {
        let workspace = temp.path().join("doc");
        std::fs::create_dir_all(&workspace).unwrap();

        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.provider.model, DEFAULT_MODEL);
        assert_eq!(config.provider.max_output_tokens, 16000);
        assert_eq!(
            config.provider.system_instruction.as_deref(),
            Some(JSON_ONLY_INSTRUCTION)
        );
        assert_eq!(config.logging.level, "warn");
        assert!(config.provider.resolve_api_key().is_none());
    });
}

#[test]
fn test_layer_precedence_global_workspace_env() {
    let temp = TempDir::new().unwrap();
    with_isolated_env(&temp, || {
        let workspace = temp.path().join("doc");
        let global = global_config_path().unwrap();
        assert!(global.starts_with(temp.path()));

        write(
            &global,
            r#"
[provider]
model = "global-model"
max_output_tokens = 8000

[logging]
level = "info"
"#,
        );
        write(
            &workspace_config_path(&workspace),
            r#"
[provider]
model = "workspace-model"
"#,
        );

        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.provider.model, "workspace-model");
        assert_eq!(config.provider.max_output_tokens, 8000);
        assert_eq!(config.logging.level, "info");

        std::env::set_var("TARANTINO__PROVIDER__MODEL", "env-model");
        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.provider.model, "env-model");
    });
}

#[test]
fn test_environment_specific_workspace_file() {
    let temp = TempDir::new().unwrap();
    with_isolated_env(&temp, || {
        let workspace = temp.path().join("doc");
        write(
            &workspace.join("config").join("config.toml"),
            "[provider]\nmodel = \"base\"\n",
        );
        write(
            &workspace.join("config").join("staging.toml"),
            "[provider]\nmodel = \"staging\"\n",
        );

        std::env::set_var("TARANTINO_ENV", "staging");
        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.provider.model, "staging");
    });
}

#[test]
fn test_credential_from_configured_env_var() {
    let temp = TempDir::new().unwrap();
    with_isolated_env(&temp, || {
        let workspace = temp.path().join("doc");
        std::env::set_var("ANTHROPIC_API_KEY", "sk-from-env");

        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.provider.resolve_api_key().as_deref(), Some("sk-from-env"));
    });
}

#[test]
fn test_invalid_values_are_rejected() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("bad.toml");
    std::fs::write(
        &file,
        r#"
[provider]
endpoint = "ftp://example.invalid"
max_output_tokens = 0
"#,
    )
    .unwrap();

    let err = ConfigLoader::load_from_file(&file).unwrap_err().to_string();
    assert!(err.contains("Endpoint must be an http(s) URL"));
    assert!(!err.contains("max_output_tokens"), "first provider error wins: {}", err);
}

#[test]
fn test_load_from_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let err = ConfigLoader::load_from_file(&temp.path().join("missing.toml")).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_written_default_config_loads_back() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("config.toml");
    std::fs::write(&file, TarantinoConfig::default().to_toml().unwrap()).unwrap();

    let config = ConfigLoader::load_from_file(&file).unwrap();
    assert_eq!(config.provider, TarantinoConfig::default().provider);
    assert_eq!(config.storage, TarantinoConfig::default().storage);
}
