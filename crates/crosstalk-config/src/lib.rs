//! Shared configuration for the crosstalk console and device daemon.
//!
//! Layering, lowest to highest precedence: built-in defaults → TOML file
//! (platform config dir, or an explicit `--config` path) → environment
//! variables prefixed `CROSSTALK_` (section and key joined by a double
//! underscore, e.g. `CROSSTALK_NET__PORT=5006`,
//! `CROSSTALK_CONSOLE__WINDOW_MS=750`). CLI flags are applied on top by
//! the binaries themselves.
//!
//! The collection window and the duplicate-response policy are explicit,
//! documented configuration: the protocol deliberately refuses to guess
//! either.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crosstalk_core::{DuplicatePolicy, Identity};

/// Default collection window, in milliseconds. A few hundred ms covers a
/// LAN round trip with headroom for sleepy devices.
pub const DEFAULT_WINDOW_MS: u64 = 400;

/// Default well-known broadcast port.
pub const DEFAULT_PORT: u16 = 5005;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Sections ────────────────────────────────────────────────────────

/// Top-level settings shared by both binaries.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub net: NetSection,

    #[serde(default)]
    pub console: ConsoleSection,

    #[serde(default)]
    pub device: DeviceSection,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetSection {
    /// Broadcast port every participant binds.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for NetSection {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleSection {
    /// Collection window `T` in milliseconds.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// What to do with duplicate responses inside one window.
    #[serde(default)]
    pub duplicates: DuplicatePolicy,

    /// Talker name announced to peers. Empty means "generate one".
    #[serde(default)]
    pub name: String,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            duplicates: DuplicatePolicy::default(),
            name: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeviceSection {
    /// Device name. Required to start the daemon (flag or config).
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub channel: u32,

    /// Description returned for `talk`.
    #[serde(default = "default_description")]
    pub description: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_window_ms() -> u64 {
    DEFAULT_WINDOW_MS
}
fn default_description() -> String {
    "A crosstalk device".to_owned()
}

// ── Loading ─────────────────────────────────────────────────────────

/// Resolve the config file path via platform conventions
/// (`~/.config/crosstalk/config.toml` on Linux).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "crosstalk", "crosstalk").map_or_else(
        || PathBuf::from("crosstalk.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Load and validate settings. A missing file is fine (defaults apply);
/// a present-but-invalid one is not.
pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = path.map_or_else(config_path, Path::to_path_buf);
    let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
        .merge(Toml::file(file))
        .merge(Env::prefixed("CROSSTALK_").split("__"))
        .extract()?;
    settings.validate()?;
    Ok(settings)
}

impl Settings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.net.port == 0 {
            return Err(ConfigError::Validation {
                field: "net.port".into(),
                reason: "port 0 cannot be shared by participants".into(),
            });
        }
        if self.console.window_ms == 0 {
            return Err(ConfigError::Validation {
                field: "console.window_ms".into(),
                reason: "the collection window must be at least 1 ms".into(),
            });
        }
        if let Some(name) = &self.device.name {
            Identity::new(name.clone(), self.device.channel).map_err(|err| {
                ConfigError::Validation {
                    field: "device.name".into(),
                    reason: err.to_string(),
                }
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_apply_without_a_file() {
        figment::Jail::expect_with(|_jail| {
            let settings = load(Some(Path::new("missing.toml"))).expect("defaults");
            assert_eq!(settings.net.port, DEFAULT_PORT);
            assert_eq!(settings.console.window_ms, DEFAULT_WINDOW_MS);
            assert_eq!(settings.console.duplicates, DuplicatePolicy::First);
            assert_eq!(settings.device.name, None);
            Ok(())
        });
    }

    #[test]
    fn toml_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "crosstalk.toml",
                r#"
                    [net]
                    port = 6000

                    [console]
                    window_ms = 750
                    duplicates = "last"

                    [device]
                    name = "Nano"
                    channel = 3
                "#,
            )?;
            let settings = load(Some(Path::new("crosstalk.toml"))).expect("load");
            assert_eq!(settings.net.port, 6000);
            assert_eq!(settings.console.window_ms, 750);
            assert_eq!(settings.console.duplicates, DuplicatePolicy::Last);
            assert_eq!(settings.device.name.as_deref(), Some("Nano"));
            assert_eq!(settings.device.channel, 3);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_the_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("crosstalk.toml", "[net]\nport = 6000\n")?;
            jail.set_env("CROSSTALK_NET__PORT", "7000");
            jail.set_env("CROSSTALK_CONSOLE__WINDOW_MS", "250");
            let settings = load(Some(Path::new("crosstalk.toml"))).expect("load");
            assert_eq!(settings.net.port, 7000);
            assert_eq!(settings.console.window_ms, 250);
            Ok(())
        });
    }

    #[test]
    fn zero_window_is_refused() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("crosstalk.toml", "[console]\nwindow_ms = 0\n")?;
            let err = load(Some(Path::new("crosstalk.toml"))).expect_err("must fail");
            assert!(matches!(err, ConfigError::Validation { .. }));
            Ok(())
        });
    }

    #[test]
    fn unaddressable_device_name_is_refused() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("crosstalk.toml", "[device]\nname = \"42\"\n")?;
            let err = load(Some(Path::new("crosstalk.toml"))).expect_err("must fail");
            assert!(matches!(err, ConfigError::Validation { .. }));
            Ok(())
        });
    }

    #[test]
    fn unknown_duplicate_policy_is_refused() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("crosstalk.toml", "[console]\nduplicates = \"newest\"\n")?;
            assert!(load(Some(Path::new("crosstalk.toml"))).is_err());
            Ok(())
        });
    }
}
