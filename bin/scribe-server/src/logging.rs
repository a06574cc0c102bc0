//! Tracing subscriber setup.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "scribe-server.log";

/// `RUST_LOG` wins over `SCRIBE_LOG`. An unparsable `SCRIBE_LOG` is reported
/// on stderr (the subscriber does not exist yet) and replaced by `info`.
fn filter(level: &str) -> EnvFilter {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return from_env;
    }
    level.parse().unwrap_or_else(|e| {
        eprintln!("WARN: SCRIBE_LOG='{level}' is not a valid tracing filter ({e}); using 'info'");
        EnvFilter::new("info")
    })
}

/// Install the global subscriber. With `log_dir` set, records go to a daily
/// rolling file through a background writer; the returned guard flushes it
/// and must live until shutdown.
pub fn init(cfg: &Config) -> Option<WorkerGuard> {
    let (writer, guard) = match cfg.log_dir.as_deref() {
        Some(dir) => {
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX));
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(&cfg.log_level))
        .with_writer(writer)
        .with_ansi(guard.is_none())
        .with_target(true);
    if cfg.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
    guard
}
