//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use linkboard_core::Config;

use crate::output::{Output, OutputFormat};

/// Keys accepted by `config set`
const KEYS: &str = "data_dir, remote_url, remote_enabled, remote_timeout_secs, seed_samples, log_file";

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "remote_url": config.remote_url,
                    "remote_enabled": config.remote_enabled,
                    "remote_timeout_secs": config.remote_timeout_secs,
                    "seed_samples": config.seed_samples,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:            {}", config.data_dir.display());
            println!(
                "  remote_url:          {}",
                config.remote_url.as_deref().unwrap_or("(not set)")
            );
            println!("  remote_enabled:      {}", config.remote_enabled);
            println!("  remote_timeout_secs: {}", config.remote_timeout_secs);
            println!("  seed_samples:        {}", config.seed_samples);
            println!(
                "  log_file:            {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply one `key = value` change
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let unset = value.is_empty() || value == "none";

    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "remote_url" => {
            config.remote_url = if unset { None } else { Some(value.to_string()) };
        }
        "remote_enabled" => {
            config.remote_enabled = value
                .parse()
                .context("Invalid value for remote_enabled. Use 'true' or 'false'.")?;
        }
        "remote_timeout_secs" => {
            config.remote_timeout_secs = value
                .parse()
                .context("Invalid value for remote_timeout_secs. Use a number of seconds.")?;
        }
        "seed_samples" => {
            config.seed_samples = value
                .parse()
                .context("Invalid value for seed_samples. Use 'true' or 'false'.")?;
        }
        "log_file" => {
            config.log_file = if unset { None } else { Some(value.into()) };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                KEYS
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Config loading reads LINKBOARD_* variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvGuard {
        _lock: std::sync::MutexGuard<'static, ()>,
    }

    impl EnvGuard {
        fn new() -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            for var in [
                "LINKBOARD_DATA_DIR",
                "LINKBOARD_REMOTE_URL",
                "LINKBOARD_REMOTE_ENABLED",
                "LINKBOARD_CONFIG",
            ] {
                std::env::remove_var(var);
            }
            Self { _lock: lock }
        }
    }

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::default();

        apply(&mut config, "remote_url", "http://localhost:8080").unwrap();
        apply(&mut config, "remote_enabled", "true").unwrap();
        apply(&mut config, "remote_timeout_secs", "3").unwrap();
        apply(&mut config, "seed_samples", "false").unwrap();
        assert_eq!(config.active_remote_url(), Some("http://localhost:8080"));
        assert_eq!(config.remote_timeout_secs, 3);
        assert!(!config.seed_samples);

        apply(&mut config, "remote_url", "none").unwrap();
        assert!(config.remote_url.is_none());
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut config = Config::default();
        assert!(apply(&mut config, "remote_enabled", "maybe").is_err());
        assert!(apply(&mut config, "remote_timeout_secs", "soon").is_err());
        assert!(apply(&mut config, "favorite_tag", "x").is_err());
    }

    #[test]
    fn test_set_writes_file() {
        let _guard = EnvGuard::new();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let data_dir = temp_dir.path().join("data");
        std::fs::write(&path, format!("data_dir = {:?}\n", data_dir)).unwrap();
        let output = Output::new(OutputFormat::Quiet);

        set("seed_samples".into(), "false".into(), Some(&path), &output).unwrap();
        set(
            "remote_url".into(),
            "http://localhost:8080".into(),
            Some(&path),
            &output,
        )
        .unwrap();
        assert!(set("bogus".into(), "1".into(), Some(&path), &output).is_err());

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.data_dir, data_dir);
        assert_eq!(config.remote_url.as_deref(), Some("http://localhost:8080"));
        assert!(!config.remote_enabled);
        assert!(!config.seed_samples);
    }
}
