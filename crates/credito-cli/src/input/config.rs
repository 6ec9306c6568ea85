use credito_core::rates::config::ProviderConfig;

use super::file;

/// Load the rate provider configuration; defaults when no path is given.
///
/// `.json` files are read as JSON, anything else as YAML.
pub fn load_provider_config(path: Option<&str>) -> Result<ProviderConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(ProviderConfig::default());
    };

    let (canonical, contents) = file::read_text(path)?;
    let is_json = canonical
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let config: ProviderConfig = if is_json {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };

    config.validate()?;
    tracing::debug!(path = %canonical.display(), sources = config.sources.len(), "loaded provider config");
    Ok(config)
}
