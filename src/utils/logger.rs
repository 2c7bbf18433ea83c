use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::LogConfig;

/// Console logging always; a daily-rolling JSON file under `dir` when `file_enabled`.
/// `RUST_LOG` takes precedence over the configured levels.
pub fn init_logging(log_config: &LogConfig) {
    let file_layer = log_config
        .dir
        .as_ref()
        .filter(|_| log_config.file_enabled)
        .map(|dir| {
            let file_appender = tracing_appender::rolling::daily(dir, "storefront.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // the writer flushes on drop of the guard; keep it for the whole process
            std::mem::forget(guard);

            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true)
                .boxed()
        });

    let console_layer = match log_config.console_format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
        "compact" => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
        _ => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_config.filter_directives()));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer);

    if let Some(file_layer) = file_layer {
        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }
}
