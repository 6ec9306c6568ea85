pub mod loan;
pub mod rate;
pub mod simulate;

use credito_core::rates::config::ProviderConfig;
use credito_core::rates::RateProvider;

use crate::input;

/// Settings shared by every command.
pub struct Context {
    pub provider: ProviderConfig,
    pub timeout_ms: Option<u64>,
}

impl Context {
    pub fn load(
        config_path: Option<&str>,
        timeout_ms: Option<u64>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let provider = input::config::load_provider_config(config_path)?;
        if timeout_ms == Some(0) {
            return Err("--timeout-ms must be positive".into());
        }
        Ok(Context {
            provider,
            timeout_ms,
        })
    }

    pub fn rate_provider(&self) -> RateProvider {
        RateProvider::new(self.provider.clone())
    }
}
