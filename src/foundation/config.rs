use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{ComputeError, ComputeResult};

/// Environment variable overriding [`DeviceOptions::transfer_mode`].
pub const ENV_TRANSFER_MODE: &str = "TEXCOMPUTE_TRANSFER_MODE";
/// Environment variable overriding [`DeviceOptions::force_fallback_adapter`].
pub const ENV_FORCE_FALLBACK_ADAPTER: &str = "TEXCOMPUTE_FORCE_FALLBACK_ADAPTER";

/// Adapter selection hint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerPreference {
    /// Prefer a discrete GPU.
    #[default]
    HighPerformance,
    /// Prefer an integrated GPU.
    LowPower,
    /// Let the backend decide.
    None,
}

impl From<PowerPreference> for wgpu::PowerPreference {
    fn from(value: PowerPreference) -> Self {
        match value {
            PowerPreference::HighPerformance => wgpu::PowerPreference::HighPerformance,
            PowerPreference::LowPower => wgpu::PowerPreference::LowPower,
            PowerPreference::None => wgpu::PowerPreference::None,
        }
    }
}

/// How the transfer mode is chosen at device creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferModePreference {
    /// Use native float textures when the adapter can render to them.
    #[default]
    Auto,
    /// Always use native float textures, even if render targets may be rejected.
    NativeFloat,
    /// Always pack values into 8-bit channels.
    PackedByte,
}

impl TransferModePreference {
    fn parse(raw: &str) -> ComputeResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "native" | "native-float" => Ok(Self::NativeFloat),
            "packed" | "packed-byte" => Ok(Self::PackedByte),
            other => Err(ComputeError::config(format!(
                "{ENV_TRANSFER_MODE}: unknown transfer mode '{other}' (expected auto, native-float or packed-byte)"
            ))),
        }
    }
}

/// Options used when creating a [`Device`](crate::Device).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceOptions {
    /// Adapter selection hint.
    pub power_preference: PowerPreference,
    /// Transfer mode selection.
    pub transfer_mode: TransferModePreference,
    /// Ask for a software adapter.
    pub force_fallback_adapter: bool,
    /// Debug label for the wgpu device.
    pub label: Option<String>,
}

impl DeviceOptions {
    /// Parse options from a JSON document.
    pub fn from_json_str(s: &str) -> ComputeResult<Self> {
        serde_json::from_str(s).map_err(|e| ComputeError::config(format!("invalid options: {e}")))
    }

    /// Read options from a JSON file.
    pub fn from_path(path: &Path) -> ComputeResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read options '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Apply the `TEXCOMPUTE_*` environment overrides.
    pub fn with_env_overrides(self) -> ComputeResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ComputeResult<Self> {
        if let Some(raw) = lookup(ENV_TRANSFER_MODE) {
            self.transfer_mode = TransferModePreference::parse(&raw)?;
        }
        if let Some(raw) = lookup(ENV_FORCE_FALLBACK_ADAPTER) {
            self.force_fallback_adapter = truthy(&raw);
        }
        Ok(self)
    }
}

fn truthy(raw: &str) -> bool {
    let raw = raw.trim();
    raw == "1" || raw.eq_ignore_ascii_case("true")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
