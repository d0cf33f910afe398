// src/utils/mod.rs
use log::{info, LevelFilter};
use std::future::Future;
use std::time::Instant;

pub mod timing;

pub use timing::Timer;

/// Installs a stdout logger. Noisy HTTP internals are capped at `Warn`.
pub fn setup_logging(level: LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("rustls", LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()?;
    info!("Logging initialized.");
    Ok(())
}

/// Awaits `f` and logs how long it took under `label`.
pub async fn log_timed<T>(label: &str, f: impl Future<Output = T>) -> T {
    let start = Instant::now();
    let result = f.await;
    log::debug!("{} completed in {} ms", label, start.elapsed().as_millis());
    result
}
