//! Logging config and setup

use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Logging related options
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// The log level to use for tracing
    #[serde(deserialize_with = "level")]
    pub level: Level,

    /// Directory to write log files to, instead of stderr
    pub path: Option<PathBuf>,

    /// Log file rotation period to use when a path is provided
    pub rotation: LogRotation,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            path: None,
            rotation: LogRotation::Hourly,
        }
    }
}

/// How often the log file is rotated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[serde(alias = "MINUTELY")]
    Minutely,
    #[serde(alias = "HOURLY")]
    Hourly,
    #[serde(alias = "DAILY")]
    Daily,
    #[serde(alias = "NEVER")]
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(value: LogRotation) -> Self {
        match value {
            LogRotation::Minutely => Rotation::MINUTELY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

fn level<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer)?
        .parse()
        .map_err(serde::de::Error::custom)
}

impl Logging {
    pub fn env_filter(logging: &Logging) -> Result<EnvFilter, anyhow::Error> {
        let mut env_filter = EnvFilter::from_default_env().add_directive(logging.level.into());

        if logging.level == Level::INFO {
            env_filter = env_filter
                .add_directive("hyper_util=warn".parse()?)
                .add_directive("reqwest=warn".parse()?);
        }
        Ok(env_filter)
    }

    /// Install the global subscriber, writing to a rolling file when a path is
    /// configured and to stderr otherwise.
    pub fn init(
        logging: &Logging,
        env_filter: EnvFilter,
    ) -> Result<Option<WorkerGuard>, anyhow::Error> {
        let (writer, guard, with_ansi) = match Self::file_writer(logging) {
            Some((writer, guard)) => (writer, Some(guard), false),
            None => (BoxMakeWriter::new(std::io::stderr), None, true),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(with_ansi)
                    .with_target(false),
            )
            .try_init()?;

        Ok(guard)
    }

    /// A non-blocking rolling file writer, or `None` when logging to stderr
    fn file_writer(logging: &Logging) -> Option<(BoxMakeWriter, WorkerGuard)> {
        let path = logging.path.as_ref()?;

        let appender = std::fs::create_dir_all(path)
            .map_err(|e| e.to_string())
            .and_then(|_| {
                RollingFileAppender::builder()
                    .rotation(logging.rotation.into())
                    .filename_prefix("graphql_ops")
                    .filename_suffix("log")
                    .build(path)
                    .map_err(|e| e.to_string())
            });

        match appender {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                Some((BoxMakeWriter::new(writer), guard))
            }
            Err(e) => {
                eprintln!("Log file setup failed ({e}) - falling back to stderr");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn it_defaults_to_info_on_stderr() {
        let logging = serde_json::from_str::<Logging>("{}").unwrap();

        assert_eq!(logging.level, Level::INFO);
        assert!(logging.path.is_none());
        assert_eq!(logging.rotation, LogRotation::Hourly);
    }

    #[test]
    fn it_parses_levels_from_strings() {
        let logging =
            serde_json::from_str::<Logging>(r#"{ "level": "trace", "rotation": "DAILY" }"#)
                .unwrap();

        assert_eq!(logging.level, Level::TRACE);
        assert_eq!(logging.rotation, LogRotation::Daily);
    }

    #[test]
    fn it_rejects_unknown_levels() {
        assert!(serde_json::from_str::<Logging>(r#"{ "level": "loud" }"#).is_err());
    }

    #[rstest]
    #[case(LogRotation::Minutely, Rotation::MINUTELY)]
    #[case(LogRotation::Hourly, Rotation::HOURLY)]
    #[case(LogRotation::Daily, Rotation::DAILY)]
    #[case(LogRotation::Never, Rotation::NEVER)]
    fn it_maps_to_rotation_correctly(#[case] rotation: LogRotation, #[case] expected: Rotation) {
        assert_eq!(expected, Rotation::from(rotation));
    }

    #[test]
    fn it_writes_to_the_configured_directory() {
        let dir = std::env::temp_dir().join(format!("graphql-ops-logs-{}", std::process::id()));
        let logging = Logging {
            path: Some(dir.clone()),
            ..Logging::default()
        };

        let writer = Logging::file_writer(&logging);

        assert!(writer.is_some());
        assert!(dir.is_dir());
        drop(writer);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn stderr_is_used_without_a_path() {
        assert!(Logging::file_writer(&Logging::default()).is_none());
    }
}
