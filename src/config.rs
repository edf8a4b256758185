use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::vehicle::VehicleConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Invalid value {value} for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub tick_hz: u32,
    /// Extra height above ride height when a car is spawned.
    pub spawn_height: f32,
    /// Starting settings for every new player.
    pub vehicle: VehicleConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:9001".to_string(),
            tick_hz: 60,
            spawn_height: 1.0,
            vehicle: VehicleConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: ServerConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1000).contains(&self.tick_hz) {
            return Err(ConfigError::InvalidValue {
                field: "tick_hz",
                value: self.tick_hz.to_string(),
                reason: "must be in 1..=1000",
            });
        }
        if !self.spawn_height.is_finite() || self.spawn_height < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "spawn_height",
                value: self.spawn_height.to_string(),
                reason: "must be finite and >= 0",
            });
        }
        self.vehicle.validate()
    }

    pub fn dt(&self) -> f32 {
        1.0 / self.tick_hz as f32
    }
}

/// No path means defaults; a path that cannot be read is an error.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    match path {
        Some(p) => ServerConfig::from_toml_str(&std::fs::read_to_string(p)?),
        None => Ok(ServerConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, ServerConfig::default());
        assert!((cfg.dt() - 1.0 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn partial_vehicle_table() {
        let cfg = ServerConfig::from_toml_str(
            r#"
            tick_hz = 120
            [vehicle]
            motor_power = 2000.0
            dragOnGround = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.tick_hz, 120);
        assert_eq!(cfg.vehicle.motor_power, 2000.0);
        assert_eq!(cfg.vehicle.drag_coefficient, 0.5);
        assert_eq!(cfg.vehicle.brake_power, 3000.0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ServerConfig::from_toml_str("tick_hz = 0"),
            Err(ConfigError::InvalidValue { field: "tick_hz", .. })
        ));
        assert!(matches!(
            ServerConfig::from_toml_str("[vehicle]\nmax_steer_angle_deg = 120.0"),
            Err(ConfigError::InvalidValue { field: "max_steer_angle_deg", .. })
        ));
        assert!(matches!(
            ServerConfig::from_toml_str("tick_hz = \"fast\""),
            Err(ConfigError::TomlError(_))
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileError(_)));
        assert!(load_config(None).is_ok());
    }
}
