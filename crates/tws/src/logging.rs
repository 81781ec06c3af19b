//! Tracing setup for the command line.
//!
//! Events go to stderr, filtered by `RUST_LOG` or, when unset, by the
//! `-q`/`-v` flags. With `log_dir` configured they are also written to a
//! daily rotated `tws.log` there.

use camino::Utf8Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;
use tws_conf::Settings;

use crate::args::GlobalArgs;

fn default_level(global: &GlobalArgs, settings: &Settings) -> &'static str {
    if global.quiet {
        return "error";
    }
    match global.verbose {
        0 if settings.debug => "debug",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber.
///
/// Returns the guard of the file writer, which must be kept alive for
/// buffered events to be flushed.
pub fn init_tracing(
    global: &GlobalArgs,
    settings: &Settings,
    project_root: &Utf8Path,
) -> Option<WorkerGuard> {
    let level = default_level(global, settings);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(env_filter(level));

    let (file_layer, guard) = match &settings.log_dir {
        Some(log_dir) => {
            let log_dir = if log_dir.is_relative() {
                project_root.join(log_dir)
            } else {
                log_dir.clone()
            };
            let file_appender = tracing_appender::rolling::daily(log_dir, "tws.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(env_filter(level));

            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = Registry::default()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(quiet: bool, verbose: u8) -> GlobalArgs {
        GlobalArgs {
            project: None,
            quiet,
            verbose,
        }
    }

    #[test]
    fn test_default_level() {
        let settings = Settings::default();

        assert_eq!(default_level(&global(false, 0), &settings), "warn");
        assert_eq!(default_level(&global(false, 1), &settings), "info");
        assert_eq!(default_level(&global(false, 3), &settings), "trace");
        assert_eq!(default_level(&global(true, 0), &settings), "error");

        let debug = Settings {
            debug: true,
            ..Settings::default()
        };
        assert_eq!(default_level(&global(false, 0), &debug), "debug");
    }
}
