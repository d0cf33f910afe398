pub mod settings;

pub use settings::SdkConfig;

use crate::error::SdkError;
use std::sync::Arc;

/// Loads `.env` (if present), reads the environment, validates and logs the result.
pub fn load_config() -> Result<Arc<SdkConfig>, SdkError> {
    dotenv::dotenv().ok();

    let config = SdkConfig::from_env();
    config.validate()?;
    config.log_settings();

    Ok(Arc::new(config))
}
