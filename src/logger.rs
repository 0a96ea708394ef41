use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::Dispatch;
use log::LevelFilter;

/// Installs the server-side logger. `RUST_LOG` wins over the configured
/// level; anything unparsable falls back to `info`.
pub fn init(configured_level: &str) {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| configured_level.to_string());
    let level_filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    let result = Dispatch::new()
        .level(level_filter)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr())
        .apply();

    match result {
        Ok(()) => log::info!("logger initialised at {}", level_filter),
        Err(e) => eprintln!("Failed to apply logger configuration: {}", e),
    }
}
