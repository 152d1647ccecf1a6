mod cli;
mod commands;
mod error;

use crate::cli::{parse_args, USAGE};
use crate::error::CliError;
use lyrisync_core::{CoreError, LyrisyncConfig};
use std::fs::File;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Check config for logging.enabled before full config load
    let file_logging_enabled = check_file_logging_enabled();
    init_tracing(file_logging_enabled);

    match execute(std::env::args().skip(1), &LyrisyncConfig::config_path()) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e @ (CliError::Usage(_) | CliError::InvalidNumber { .. })) => {
            eprintln!("{e}\n\n{USAGE}");
            ExitCode::from(2)
        }
        Err(e) => {
            // The session already warned about rejected LRC documents
            if !is_import_error(&e) {
                error!("{e}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Parse arguments, then load config and run the command.
///
/// Arguments come first so a bad invocation never touches the config file.
fn execute<I>(args: I, config_path: &Path) -> Result<String, CliError>
where
    I: IntoIterator<Item = String>,
{
    let command = parse_args(args)?;
    let config = load_config(config_path)?;
    commands::run(&command, &config)
}

fn load_config(config_path: &Path) -> Result<LyrisyncConfig, CliError> {
    match LyrisyncConfig::load_or_create_at(config_path) {
        Ok(config) => Ok(config),
        Err(CoreError::ConfigNotFound { path }) => {
            info!("Created config template at {}", path.display());
            Ok(LyrisyncConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

fn is_import_error(e: &CliError) -> bool {
    matches!(
        e,
        CliError::Core(CoreError::LrcParseError { .. } | CoreError::LrcEncodingError(_))
    )
}

fn check_file_logging_enabled() -> bool {
    // Minimal structs to parse just the logging.enabled field
    #[derive(serde::Deserialize)]
    struct PartialConfig {
        #[serde(default)]
        logging: PartialLoggingConfig,
    }
    #[derive(serde::Deserialize, Default)]
    struct PartialLoggingConfig {
        #[serde(default)]
        enabled: bool,
    }

    let config_path = LyrisyncConfig::config_path();
    let Ok(content) = std::fs::read_to_string(&config_path) else {
        return false;
    };

    toml::from_str::<PartialConfig>(&content).is_ok_and(|c| c.logging.enabled)
}

/// Initialize tracing with stderr output and optional file logging
fn init_tracing(file_logging_enabled: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Keep stdout clean for command output
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if file_logging_enabled {
        let log_path = lyrisync_core::log_file_path();

        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match File::create(&log_path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .with(file_layer)
                    .init();

                return;
            }
            Err(e) => {
                eprintln!("Failed to create log file at {}: {e}", log_path.display());
            }
        }
    }

    // Fallback: stderr only
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_bad_arguments_leave_config_alone() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("lyrisync").join("config.toml");

        let result = execute(args(&["frobnicate"]), &config_path);
        assert!(matches!(result, Err(CliError::Usage(_))));
        assert!(!config_path.exists());
        assert!(!dir.path().join("lyrisync").exists());
    }

    #[test]
    fn test_first_run_writes_template_and_runs() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        let lyrics = dir.path().join("lyrics.txt");
        std::fs::write(&lyrics, "One\nTwo\n").unwrap();

        let output = execute(args(&["split", lyrics.to_str().unwrap()]), &config_path).unwrap();
        assert_eq!(output, "   0  One\n   1  Two\n");
        assert!(config_path.exists());
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[editing]\nnudge_step_secs = -1.0\n").unwrap();
        let lyrics = dir.path().join("lyrics.txt");
        std::fs::write(&lyrics, "One\n").unwrap();

        let result = execute(args(&["split", lyrics.to_str().unwrap()]), &config_path);
        assert!(matches!(
            result,
            Err(CliError::Core(CoreError::ConfigInvalid { .. }))
        ));
    }

    #[test]
    fn test_import_errors_are_not_logged_twice() {
        let parse = CliError::Core(CoreError::LrcParseError {
            reason: "empty".to_string(),
        });
        assert!(is_import_error(&parse));
        assert!(!is_import_error(&CliError::Usage("x".to_string())));
    }
}
