use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Construction-time description of one effect instance
///
/// `source` and `surface` are opaque identifiers; resolving them to live
/// objects is the host's job (the demo binary maps them to its synthetic
/// source and in-memory surface).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectConfig {
    /// Effect type to construct (only "blur" is built in)
    pub effect: String,

    /// Identifier of the video source to sample from
    pub source: String,

    /// Identifier of the presentation surface to draw to
    pub surface: String,

    /// Effect options; anything omitted falls back to its default
    #[serde(default)]
    pub options: EffectOptions,
}

/// Optional knobs supplied at construction
///
/// Every field distinguishes "absent" from "present": absence means the
/// documented default. For `flicker` the distinction carries meaning, since
/// supplying the table at all (even empty) is what switches the flicker
/// stage on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectOptions {
    /// Blur strength (>= 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,

    /// Paint fixed black borders on the frame edges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borders: Option<bool>,

    /// Downscale divisor applied to the surface size when the working
    /// frame is allocated (>= 1); consumed at construction, not live
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_factor: Option<u32>,

    /// Flicker sub-parameters; presence of this table enables the stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flicker: Option<FlickerOptions>,
}

/// Flicker modulation knobs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlickerOptions {
    /// Baseline brightness (> 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,

    /// Phase advance per frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,

    /// Modulation amplitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,

    /// Rows per modulation band (>= 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f32>,
}

impl EffectConfig {
    /// Load an effect configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: EffectConfig = toml::from_str(&content).map_err(|_| ConfigError::ParseFailed {
            path: path.display().to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the supplied option values
    pub fn validate(&self) -> Result<()> {
        validate_options(&self.options)
    }
}

/// Validate effect options ahead of construction
///
/// Construction rejects values the stages could not start from. Live
/// mutation can still drive parameters degenerate later; the flicker
/// stage hardens against that at apply time instead.
pub fn validate_options(options: &EffectOptions) -> Result<()> {
    if let Some(radius) = options.radius {
        if !radius.is_finite() || radius < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "options.radius".to_string(),
                value: radius.to_string(),
            }
            .into());
        }
    }

    if let Some(scale) = options.scale_factor {
        if scale == 0 {
            return Err(ConfigError::InvalidValue {
                key: "options.scale_factor".to_string(),
                value: scale.to_string(),
            }
            .into());
        }
    }

    if let Some(flicker) = &options.flicker {
        if let Some(brightness) = flicker.brightness {
            if !brightness.is_finite() || brightness <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: "options.flicker.brightness".to_string(),
                    value: brightness.to_string(),
                }
                .into());
            }
        }

        if let Some(spacing) = flicker.spacing {
            if !spacing.is_finite() || spacing < 1.0 {
                return Err(ConfigError::InvalidValue {
                    key: "options.flicker.spacing".to_string(),
                    value: spacing.to_string(),
                }
                .into());
            }
        }

        if let Some(strength) = flicker.strength {
            if !strength.is_finite() {
                return Err(ConfigError::InvalidValue {
                    key: "options.flicker.strength".to_string(),
                    value: strength.to_string(),
                }
                .into());
            }
        }
    }

    Ok(())
}
