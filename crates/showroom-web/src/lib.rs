//! Showroom Web - rotating car viewer for a page panel
//!
//! Mounts a Bevy app into the page's container element and drives the
//! showroom scene controller from it.

mod actions;
mod app;
mod controls;
mod dom;
mod overlay;
mod render;
mod scene;

use showroom_core::ShowroomConfig;
use wasm_bindgen::prelude::*;

/// Embedded viewer configuration
const CONFIG_TOML: &str = include_str!("../showroom.toml");

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    let (config, config_error) = match ShowroomConfig::from_toml(CONFIG_TOML) {
        Ok(config) => (config, None),
        Err(e) => (ShowroomConfig::default(), Some(e)),
    };

    // Keep wgpu noise down unless the config asks for more
    let max_level = config
        .page
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::WARN);
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(max_level)
            .build()
    );

    if let Some(e) = config_error {
        tracing::warn!("Using default config: {}", e);
    }

    app::run(config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = ShowroomConfig::from_toml(CONFIG_TOML).unwrap();
        assert_eq!(config.page.container_id, "tesla-3d");
        assert!(config.page.log_level.parse::<tracing::Level>().is_ok());
        assert_eq!(config.page.initial_model, showroom_core::ModelName::Model3);
        assert!(config.orbit.min_distance <= config.orbit.max_distance);
    }
}
