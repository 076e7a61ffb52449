//! Configuration loading and validation for [`EngineConfig`].

use crate::error::{EngineError, EngineResult};
use crate::types::{EngineConfig, TileColor, MAX_BOARD_EDGE, MAX_FALL_MS_PER_ROW, MIN_BOARD_EDGE};

/// Smallest palette that can still form matches without a dead board.
pub const MIN_COLOR_COUNT: usize = 3;

/// Validation and parsing on top of the plain config data.
pub trait EngineConfigExt: Sized {
    fn validate(&self) -> EngineResult<()>;

    /// Parse JSON; omitted fields take their defaults. The result is validated.
    fn from_json_str(s: &str) -> EngineResult<Self>;
}

impl EngineConfigExt for EngineConfig {
    fn validate(&self) -> EngineResult<()> {
        let edges = MIN_BOARD_EDGE..=MAX_BOARD_EDGE;
        if !edges.contains(&self.width) || !edges.contains(&self.height) {
            return Err(EngineError::InvalidConfig(format!(
                "board {}x{} outside {MIN_BOARD_EDGE}..={MAX_BOARD_EDGE}",
                self.width, self.height
            )));
        }
        let max_colors = TileColor::ALL.len();
        if !(MIN_COLOR_COUNT..=max_colors).contains(&self.color_count) {
            return Err(EngineError::InvalidConfig(format!(
                "color_count {} outside {MIN_COLOR_COUNT}..={max_colors}",
                self.color_count
            )));
        }
        if self.bomb_radius > MAX_BOARD_EDGE {
            return Err(EngineError::InvalidConfig(format!(
                "bomb_radius {} above {MAX_BOARD_EDGE}",
                self.bomb_radius
            )));
        }
        if self.fall_ms_per_row > MAX_FALL_MS_PER_ROW {
            return Err(EngineError::InvalidConfig(format!(
                "fall_ms_per_row {} above {MAX_FALL_MS_PER_ROW}",
                self.fall_ms_per_row
            )));
        }
        if self.max_shuffle_attempts == 0 {
            return Err(EngineError::InvalidConfig(
                "max_shuffle_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn from_json_str(s: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_tiny_board_and_bad_palette() {
        let small = EngineConfig::default().with_dimensions(2, 9, 5);
        assert!(matches!(small.validate(), Err(EngineError::InvalidConfig(_))));

        let colors = EngineConfig::default().with_dimensions(8, 9, 9);
        assert!(colors.validate().is_err());

        let two = EngineConfig::default().with_dimensions(8, 9, 2);
        assert!(two.validate().is_err());
    }

    #[test]
    fn test_from_json_str() {
        let cfg = EngineConfig::from_json_str(r#"{"width": 6, "height": 6, "seed": 42}"#).unwrap();
        assert_eq!((cfg.width, cfg.height, cfg.seed), (6, 6, 42));

        assert!(matches!(
            EngineConfig::from_json_str("{not json"),
            Err(EngineError::ConfigParse(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"max_shuffle_attempts": 0}"#),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_huge_bomb_radius() {
        let json = format!(r#"{{"bomb_radius": {}}}"#, usize::MAX);
        assert!(matches!(
            EngineConfig::from_json_str(&json),
            Err(EngineError::InvalidConfig(_))
        ));

        let edge = format!(r#"{{"bomb_radius": {MAX_BOARD_EDGE}}}"#);
        assert!(EngineConfig::from_json_str(&edge).is_ok());
    }

    #[test]
    fn test_rejects_huge_fall_timer() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"fall_ms_per_row": 4294967295}"#),
            Err(EngineError::InvalidConfig(_))
        ));

        let edge = format!(r#"{{"fall_ms_per_row": {MAX_FALL_MS_PER_ROW}}}"#);
        assert!(EngineConfig::from_json_str(&edge).is_ok());
    }
}
