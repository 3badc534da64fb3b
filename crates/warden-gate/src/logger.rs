use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

pub(super) struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: Level,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { format: LoggerFormat::Json, level: Level::INFO }
    }
}

pub(super) enum LoggerFormat {
    Json,
}

pub(super) fn init_logger(config: LoggerConfig) {
    let builder = SubscriberBuilder::default().with_max_level(config.level);

    match config.format {
        LoggerFormat::Json => builder.json().init(),
    }
}
