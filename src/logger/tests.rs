//! Tests for the logger module

use crate::logger::config::*;
use crate::logger::open_log_file;
use std::io::Write;
use std::path::PathBuf;

#[cfg(test)]
mod config_tests {
    use super::*;

    /// Helper function to create a test configuration
    fn create_test_config() -> LoggerConfig {
        LoggerConfig {
            console: ConsoleConfig {
                enabled: true,
                colored: false,
            },
            file: FileConfig {
                enabled: false,
                path: PathBuf::from("test.log"),
                append: true,
                format: LogFormat::Full,
            },
            level: "info".to_string(),
        }
    }

    #[test]
    fn test_default_config_creation() {
        let config = LoggerConfig::default();
        assert!(config.console.enabled);
        assert!(config.console.colored);
        assert!(!config.file.enabled);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = create_test_config();
        assert!(config.validate().is_ok());

        // Both outputs disabled
        config.console.enabled = false;
        config.file.enabled = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut config = create_test_config();
        config.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_filter_directives_rejected() {
        let mut config = create_test_config();
        config.level = "skland_notify=debug".to_string();
        assert!(config.validate().is_err());

        config.level = "WARN".to_string();
        assert_eq!(config.parse_level().unwrap(), tracing::Level::WARN);
    }

    #[test]
    fn test_file_enabled_requires_path() {
        let mut config = create_test_config();
        config.file.enabled = true;
        config.file.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::default(), LogFormat::Full);
    }
}

#[cfg(test)]
mod file_tests {
    use super::*;
    use tempfile::TempDir;

    fn file_config(path: PathBuf, append: bool) -> FileConfig {
        FileConfig {
            enabled: true,
            path,
            append,
            format: LogFormat::Json,
        }
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/run.log");

        open_log_file(&file_config(path.clone(), true)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_append_mode_keeps_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        std::fs::write(&path, "first\n").unwrap();

        let mut file = open_log_file(&file_config(path.clone(), true)).unwrap();
        file.write_all(b"second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_truncate_mode_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        std::fs::write(&path, "stale\n").unwrap();

        let mut file = open_log_file(&file_config(path.clone(), false)).unwrap();
        file.write_all(b"fresh\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn property_known_levels_validate(
            level in prop::sample::select(vec!["trace", "DEBUG", "Info", "warn", "error"])
        ) {
            let config = LoggerConfig {
                level: level.to_string(),
                ..LoggerConfig::default()
            };
            prop_assert!(config.validate().is_ok());
        }
    }
}
