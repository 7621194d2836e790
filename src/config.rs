//! Device configuration
//!
//! Everything the firmware would otherwise bake in with preprocessor
//! branches: product name, bootloader and MCU family, split transport,
//! and which half of a split board this image runs on.  A single
//! [`DeviceConfig`] is injected into the engine at startup, so one binary
//! can serve either side.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Capacity of every string field in [`DeviceConfig`].
pub const CONFIG_STR_CAP: usize = 32;

/// Upper bound on the pause between the bootloader response and the jump.
pub const MAX_BOOTLOADER_DELAY_MS: u32 = 1000;

/// Transport name reported by boards that are not split.
pub const NO_SPLIT_PROTOCOL: &str = "none";

/// Fixed-capacity string used for configuration fields.
pub type ConfigStr = heapless::String<CONFIG_STR_CAP>;

/// Which half of a split keyboard this firmware image drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and behaviour of the device answering Field Kit requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Firmware identity ---
    /// Product name reported as `KEYBOARD=`
    pub keyboard_name: ConfigStr,
    /// Bootloader family reported as `BOOTLOADER=`
    pub bootloader: ConfigStr,
    /// MCU family reported as `MCU=`
    pub mcu: ConfigStr,
    /// Split transport reported as `PROTOCOL=`
    pub protocol: ConfigStr,

    // --- Split ---
    /// Half this image was built for
    pub side: Side,
    /// Whether the board is a split keyboard at all
    pub split: bool,

    // --- Timing ---
    /// Pause after the bootloader response so the host can read it (ms)
    pub bootloader_delay_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            keyboard_name: fixed("QMK Keyboard"),
            bootloader: fixed("rp2040"),
            mcu: fixed("rp2040"),
            protocol: fixed("serial"),

            // Boards without a handedness flag report as the right half.
            side: Side::Right,
            split: true,

            bootloader_delay_ms: 100,
        }
    }
}

impl DeviceConfig {
    /// Check every field before the config is handed to the engine.
    ///
    /// String fields end up inside `KEY=value|KEY=value` payloads, so the
    /// delimiters themselves are rejected rather than escaped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("keyboard_name", &self.keyboard_name),
            ("bootloader", &self.bootloader),
            ("mcu", &self.mcu),
            ("protocol", &self.protocol),
        ] {
            validate_field(name, value)?;
        }

        if self.bootloader_delay_ms > MAX_BOOTLOADER_DELAY_MS {
            return Err(ConfigError::DelayOutOfRange);
        }
        Ok(())
    }

    /// Build a configuration from a QMK `keyboard.json` manifest.
    ///
    /// Reads `keyboard_name`, `bootloader`, `split.enabled` and
    /// `split.transport.protocol`; unknown keys are ignored.  A split board
    /// without a transport entry uses `serial`; a board that is not split
    /// reports [`NO_SPLIT_PROTOCOL`].  The MCU family is derived from the
    /// bootloader with [`mcu_family`].  The result is validated before it
    /// is returned.
    pub fn from_keyboard_json(json: &str, side: Side) -> Result<Self, ConfigError> {
        let manifest: KeyboardManifest = serde_json::from_str(json).map_err(|e| {
            log::warn!("keyboard.json rejected: {}", e);
            ConfigError::Manifest
        })?;

        let defaults = Self::default();
        let keyboard_name = match manifest.keyboard_name.as_deref() {
            Some(name) => bounded("keyboard_name", name)?,
            None => defaults.keyboard_name,
        };
        let bootloader = manifest.bootloader.as_deref().unwrap_or("unknown");
        let split = manifest.split.unwrap_or_default();
        let protocol = if split.enabled {
            split
                .transport
                .and_then(|t| t.protocol)
                .unwrap_or_else(|| String::from("serial"))
        } else {
            String::from(NO_SPLIT_PROTOCOL)
        };

        let config = Self {
            keyboard_name,
            bootloader: bounded("bootloader", bootloader)?,
            mcu: fixed(mcu_family(bootloader)),
            protocol: bounded("protocol", &protocol)?,
            side,
            split: split.enabled,
            bootloader_delay_ms: defaults.bootloader_delay_ms,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Map a QMK bootloader name onto the MCU family it implies.
pub fn mcu_family(bootloader: &str) -> &'static str {
    match bootloader {
        "rp2040" => "rp2040",
        "atmel-dfu" | "caterina" | "halfkay" => "avr",
        "stm32-dfu" | "stm32duino" => "arm",
        _ => "unknown",
    }
}

// ── keyboard.json subset ──────────────────────────────────────

#[derive(Debug, Deserialize)]
struct KeyboardManifest {
    keyboard_name: Option<String>,
    bootloader: Option<String>,
    split: Option<SplitManifest>,
}

#[derive(Debug, Default, Deserialize)]
struct SplitManifest {
    #[serde(default)]
    enabled: bool,
    transport: Option<TransportManifest>,
}

#[derive(Debug, Deserialize)]
struct TransportManifest {
    protocol: Option<String>,
}

// ── Helpers ───────────────────────────────────────────────────

/// Returns `true` if every byte of `s` is in the printable ASCII range
/// `0x20..=0x7E` (space through tilde, inclusive).
fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_field(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Empty(name));
    }
    if !is_printable_ascii(value) {
        return Err(ConfigError::NotPrintable(name));
    }
    if value.contains(['|', '=']) {
        return Err(ConfigError::ReservedCharacter(name));
    }
    Ok(())
}

fn bounded(name: &'static str, value: &str) -> Result<ConfigStr, ConfigError> {
    let mut out = ConfigStr::new();
    out.push_str(value).map_err(|()| ConfigError::TooLong(name))?;
    Ok(out)
}

/// For literals known to be shorter than [`CONFIG_STR_CAP`].
fn fixed(value: &str) -> ConfigStr {
    let mut out = ConfigStr::new();
    let pushed = out.push_str(value);
    debug_assert!(pushed.is_ok(), "config literal {value:?} too long");
    out
}
