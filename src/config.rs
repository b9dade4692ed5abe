// ============================================
// World Config - Настройки мира из JSON
// ============================================

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Максимальная амплитуда "неровного потолка"
pub const MAX_HEIGHT_AMPLITUDE: f32 = 0.1;

/// Параметры генерации и стриминга
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Сторона чанка в мировых единицах
    pub chunk_size: f32,
    /// Радиус загрузки в чанках
    pub load_radius: i32,
    /// Сид мира
    pub world_seed: u32,
    /// Сегментов стены на каждую сторону чанка
    pub wall_segments_per_side: u32,
    /// Плиток пола на сторону (N x N)
    pub floor_tiles_per_side: u32,
    /// Базовая высота стены
    pub wall_height: f32,
    /// Амплитуда jitter высоты стен
    pub height_amplitude: f32,
    /// Максимальная пауза перед повтором, в проходах стриминга
    pub max_retry_backoff: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16.0,
            load_radius: 2,
            world_seed: 0,
            wall_segments_per_side: 4,
            floor_tiles_per_side: 8,
            wall_height: 3.0,
            height_amplitude: 0.08,
            max_retry_backoff: 16,
        }
    }
}

impl WorldConfig {
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.world_seed = seed;
        self
    }

    pub fn with_radius(mut self, radius: i32) -> Self {
        self.load_radius = radius;
        self
    }

    /// Загрузить из JSON строки (с валидацией)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Загрузить из файла
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Проверка при старте: ошибка конфига фатальна
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.chunk_size > 0.0) || !self.chunk_size.is_finite() {
            return Err(ConfigError::NonPositiveChunkSize(self.chunk_size));
        }
        if self.load_radius < 0 {
            return Err(ConfigError::NegativeLoadRadius(self.load_radius));
        }
        if self.wall_segments_per_side == 0 {
            return Err(ConfigError::ZeroWallSegments);
        }
        if self.floor_tiles_per_side == 0 {
            return Err(ConfigError::ZeroFloorTiles);
        }
        if !(0.0..=MAX_HEIGHT_AMPLITUDE).contains(&self.height_amplitude) {
            return Err(ConfigError::AmplitudeOutOfRange(self.height_amplitude));
        }
        Ok(())
    }
}

/// Ошибки конфигурации
#[derive(Debug)]
pub enum ConfigError {
    NonPositiveChunkSize(f32),
    NegativeLoadRadius(i32),
    ZeroWallSegments,
    ZeroFloorTiles,
    AmplitudeOutOfRange(f32),
    Io(std::io::Error),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveChunkSize(size) => {
                write!(f, "chunk_size must be positive, got {}", size)
            }
            ConfigError::NegativeLoadRadius(radius) => {
                write!(f, "load_radius must be non-negative, got {}", radius)
            }
            ConfigError::ZeroWallSegments => write!(f, "wall_segments_per_side must be at least 1"),
            ConfigError::ZeroFloorTiles => write!(f, "floor_tiles_per_side must be at least 1"),
            ConfigError::AmplitudeOutOfRange(a) => {
                write!(f, "height_amplitude must be in [0, {}], got {}", MAX_HEIGHT_AMPLITUDE, a)
            }
            ConfigError::Io(e) => write!(f, "failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size, 16.0);
        assert_eq!(config.load_radius, 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = WorldConfig::from_json(r#"{ "load_radius": 4, "world_seed": 42 }"#).unwrap();
        assert_eq!(config.load_radius, 4);
        assert_eq!(config.world_seed, 42);
        assert_eq!(config.chunk_size, 16.0);
        assert_eq!(config.wall_segments_per_side, 4);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            WorldConfig::from_json(r#"{ "chunk_size": 0.0 }"#),
            Err(ConfigError::NonPositiveChunkSize(_))
        ));
        assert!(matches!(
            WorldConfig::from_json(r#"{ "chunk_size": -4.0 }"#),
            Err(ConfigError::NonPositiveChunkSize(_))
        ));
        assert!(matches!(
            WorldConfig::from_json(r#"{ "load_radius": -1 }"#),
            Err(ConfigError::NegativeLoadRadius(-1))
        ));
        assert!(matches!(
            WorldConfig::from_json(r#"{ "height_amplitude": 0.5 }"#),
            Err(ConfigError::AmplitudeOutOfRange(_))
        ));
        assert!(matches!(
            WorldConfig::from_json(r#"{ "wall_segments_per_side": 0 }"#),
            Err(ConfigError::ZeroWallSegments)
        ));
        assert!(matches!(WorldConfig::from_json("not json"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = WorldConfig::default().with_seed(7).with_radius(3);
        let json = config.to_json().unwrap();
        assert_eq!(WorldConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            WorldConfig::from_file("definitely_missing_world_config.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
