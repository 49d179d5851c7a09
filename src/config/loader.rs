// Configuration loader
// Loads credentials from ~/.edulingua/config.toml or environment variables

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use super::settings::{Config, DEFAULT_MODEL};

/// Load configuration from the config file or environment
pub fn load_config() -> Result<Config> {
    if let Some(config) = try_load_from_file()? {
        return Ok(config);
    }

    if let Some(config) = try_load_from_env() {
        return Ok(config);
    }

    bail!(
        "No configuration found. Create ~/.edulingua/config.toml:\n\n\
        openai_api_key = \"sk-...\"\n\
        supabase_url = \"https://<project>.supabase.co\"\n\
        supabase_service_key = \"...\"\n\n\
        Alternatively, set environment variables:\n\
        export OPENAI_API_KEY=\"sk-...\"\n\
        export SUPABASE_URL=\"https://<project>.supabase.co\"\n\
        export SUPABASE_SERVICE_KEY=\"...\""
    );
}

fn try_load_from_file() -> Result<Option<Config>> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    load_from_path(&home.join(".edulingua/config.toml"))
}

fn load_from_path(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    parse_config_toml(&contents).map(Some)
}

fn parse_config_toml(contents: &str) -> Result<Config> {
    #[derive(serde::Deserialize)]
    struct TomlConfig {
        openai_api_key: String,
        #[serde(default)]
        openai_model: Option<String>,
        supabase_url: String,
        supabase_service_key: String,
    }

    let toml_config: TomlConfig =
        toml::from_str(contents).context("Failed to parse config.toml")?;

    let mut config = Config::new(
        toml_config.openai_api_key,
        toml_config.supabase_url,
        toml_config.supabase_service_key,
    );
    if let Some(model) = toml_config.openai_model {
        config.openai_model = model;
    }

    Ok(config)
}

fn try_load_from_env() -> Option<Config> {
    let openai_api_key = non_empty_env("OPENAI_API_KEY")?;
    let supabase_url = non_empty_env("SUPABASE_URL")?;
    let supabase_service_key = non_empty_env("SUPABASE_SERVICE_KEY")?;

    let mut config = Config::new(openai_api_key, supabase_url, supabase_service_key);
    if let Some(model) = non_empty_env("OPENAI_MODEL") {
        config.openai_model = model;
    }

    Some(config)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_config_toml(
            r#"
            openai_api_key = "sk-test"
            supabase_url = "https://project.supabase.co"
            supabase_service_key = "service-key"
            "#,
        )
        .unwrap();

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_model, DEFAULT_MODEL);
        assert_eq!(config.supabase_url, "https://project.supabase.co");
    }

    #[test]
    fn test_parse_config_with_model_override() {
        let config = parse_config_toml(
            r#"
            openai_api_key = "sk-test"
            openai_model = "gpt-4o"
            supabase_url = "https://project.supabase.co"
            supabase_service_key = "service-key"
            "#,
        )
        .unwrap();

        assert_eq!(config.openai_model, "gpt-4o");
    }

    #[test]
    fn test_missing_credential_fails() {
        let result = parse_config_toml(r#"openai_api_key = "sk-test""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_missing_path_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_from_path(&dir.path().join("config.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "openai_api_key = \"sk-file\"\n\
             supabase_url = \"https://project.supabase.co\"\n\
             supabase_service_key = \"service-key\"\n",
        )
        .unwrap();

        let config = load_from_path(&path).unwrap().unwrap();
        assert_eq!(config.openai_api_key, "sk-file");
        assert_eq!(config.openai_model, DEFAULT_MODEL);
    }
}
