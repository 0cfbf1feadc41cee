//! Tunables for the web build: embedded defaults plus URL query overrides

use anyhow::{bail, Context, Result};
use strider_core::config::{KeyLayout, Tunables};
use tracing::{info, warn};

/// Default tunables shipped with the page
const EMBEDDED_TUNABLES: &str = include_str!("../strider.toml");

/// Overrides accepted from the page URL (`?debug=1&lock_drag=1&keys=arrows`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOverrides {
    pub debug: Option<bool>,
    pub lock_drag: Option<bool>,
    pub keys: Option<KeyLayout>,
}

impl QueryOverrides {
    /// Parse a `location.search` string; unknown parameters are ignored
    pub fn parse(search: &str) -> Result<Self> {
        let mut overrides = Self::default();
        if let Some(value) = parse_query_param(search, "debug") {
            overrides.debug = Some(parse_flag(&value).context("Invalid ?debug value")?);
        }
        if let Some(value) = parse_query_param(search, "lock_drag") {
            overrides.lock_drag = Some(parse_flag(&value).context("Invalid ?lock_drag value")?);
        }
        if let Some(value) = parse_query_param(search, "keys") {
            overrides.keys = Some(value.parse().context("Invalid ?keys value")?);
        }
        Ok(overrides)
    }

    pub fn apply(&self, tunables: &mut Tunables) {
        if let Some(debug) = self.debug {
            tunables.debug.enabled = debug;
        }
        if let Some(lock_drag) = self.lock_drag {
            tunables.look.lock_drag = lock_drag;
        }
        if let Some(keys) = self.keys {
            tunables.movement.key_layout = keys;
        }
    }
}

fn parse_query_param(search: &str, param: &str) -> Option<String> {
    let search = search.trim_start_matches('?');
    for pair in search.split('&') {
        let mut parts = pair.splitn(2, '=');
        if let Some(key) = parts.next() {
            if key == param {
                // bare `?debug` means on
                return Some(parts.next().unwrap_or("1").to_string());
            }
        }
    }
    None
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => bail!("expected a boolean, got '{}'", other),
    }
}

/// Parse the tunables embedded in the binary
pub fn embedded_tunables() -> Result<Tunables> {
    Tunables::from_toml(EMBEDDED_TUNABLES).context("Embedded strider.toml is invalid")
}

/// Build the tunables for this page load, falling back to defaults on any error
pub fn load_tunables(search: Option<&str>) -> Tunables {
    let mut tunables = embedded_tunables().unwrap_or_else(|e| {
        warn!("{:#}, using built-in defaults", e);
        Tunables::default()
    });

    if let Some(search) = search {
        match QueryOverrides::parse(search) {
            Ok(overrides) => {
                if overrides != QueryOverrides::default() {
                    info!(?overrides, "Applying URL overrides");
                }
                overrides.apply(&mut tunables);
            }
            Err(e) => warn!("Ignoring URL overrides: {:#}", e),
        }
    }

    tunables
}

/// Query string of the current page
#[cfg(target_arch = "wasm32")]
pub fn browser_query() -> Option<String> {
    web_sys::window()?.location().search().ok()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn browser_query() -> Option<String> {
    None
}
