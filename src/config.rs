use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a faint check resolves when both sides are wiped out in the same step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DoubleFaintRule {
    /// The first side checked in roster order (the player's) loses.
    #[default]
    FirstChecked,
    /// Neither side wins.
    Draw,
}

/// Timing and rule knobs for a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Accumulated milliseconds per value-animation step.
    pub animation_frame_ms: f32,
    /// Animation speed is `sqrt(|final - initial|) / hp_animation_divisor` per step.
    pub hp_animation_divisor: f32,
    /// An animated value this close to its target snaps to it.
    pub animation_snap_epsilon: f32,
    pub char_delay_ms: f32,
    /// Time a fully revealed text stays on screen before the next task runs.
    pub text_hold_ms: f32,
    /// Prepended to opponent names in move narration.
    pub foe_prefix: String,
    pub double_faint_rule: DoubleFaintRule,
    pub exp_share_factor: u32,
    pub exp_item_multiplier: f64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            animation_frame_ms: 16.0,
            hp_animation_divisor: 6.7,
            animation_snap_epsilon: 0.1,
            char_delay_ms: 16.0,
            text_hold_ms: 0.0,
            foe_prefix: "Foe ".to_string(),
            double_faint_rule: DoubleFaintRule::FirstChecked,
            exp_share_factor: 1,
            exp_item_multiplier: 1.0,
        }
    }
}

impl BattleConfig {
    /// Parses a RON config; missing fields keep their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: BattleConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a RON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("animation_frame_ms", self.animation_frame_ms),
            ("char_delay_ms", self.char_delay_ms),
            ("text_hold_ms", self.text_hold_ms),
            ("animation_snap_epsilon", self.animation_snap_epsilon),
        ];
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be a non-negative number, got {}", value),
                });
            }
        }
        if self.hp_animation_divisor.is_nan() || self.hp_animation_divisor <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "hp_animation_divisor",
                reason: "must be positive".to_string(),
            });
        }
        if self.exp_share_factor == 0 {
            return Err(ConfigError::InvalidValue {
                field: "exp_share_factor",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
