use std::path::PathBuf;
use std::time::SystemTime;

use color_eyre::Result;
use fern::colors::{Color, ColoredLevelConfig};

/// Wire up the console and optional file sinks at their own levels.
///
/// The console stays compact; the file gets timestamped lines so old runs can
/// be reconstructed afterwards.
pub fn setup_logging(
    console_level: log::LevelFilter,
    log_file: Option<PathBuf>,
    file_level: log::LevelFilter,
) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red)
        .debug(Color::BrightBlack);

    let console = fern::Dispatch::new()
        .level(console_level)
        .format(move |out, message, record| {
            out.finish(format_args!("[{}] {}", colors.color(record.level()), message))
        })
        .chain(std::io::stdout());

    let mut dispatch = fern::Dispatch::new().chain(console);

    if let Some(path) = log_file {
        let file = fern::Dispatch::new()
            .level(file_level)
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{} {} {}] {}",
                    humantime::format_rfc3339_seconds(SystemTime::now()),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(fern::log_file(path)?);
        dispatch = dispatch.chain(file);
    }

    dispatch.apply()?;
    Ok(())
}
