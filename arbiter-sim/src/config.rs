use std::path::Path;

use glam::Vec2;
use internment::Intern;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use arbiter::{Runway, RunwayEnd, TimingThresholds};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to parse config file {path}: {source}")]
  Toml {
    path: String,
    #[source]
    source: toml::de::Error,
  },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
  #[serde(default)]
  thresholds: TimingThresholds,
  #[serde(default)]
  runway: RunwayConfig,
  #[serde(default)]
  sim: SimConfig,
}

impl Config {
  pub fn from_path<T: AsRef<Path>>(path: T) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.display().to_string(),
      source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Toml {
      path: path.display().to_string(),
      source,
    })
  }

  pub fn thresholds(&self) -> TimingThresholds {
    self.thresholds
  }

  pub fn runway_end(&self) -> RunwayEnd {
    self.runway.to_runway_end()
  }

  pub fn sim(&self) -> &SimConfig {
    &self.sim
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunwayConfig {
  #[serde(default = "default_runway_id")]
  pub id: String,
  #[serde(default = "default_heading")]
  pub heading: f32,
  #[serde(default)]
  pub center_x: f32,
  #[serde(default)]
  pub center_y: f32,
  #[serde(default = "default_length_ft")]
  pub length_ft: f32,
  #[serde(default = "default_width_ft")]
  pub width_ft: f32,
  #[serde(default = "default_elevation_ft")]
  pub elevation_ft: f32,
}

impl RunwayConfig {
  fn to_runway_end(&self) -> RunwayEnd {
    Runway::new(
      Intern::from(self.id.clone()),
      Vec2::new(self.center_x, self.center_y),
      self.heading,
      self.length_ft,
      self.width_ft,
      self.elevation_ft,
    )
    .end(self.heading)
  }
}

impl Default for RunwayConfig {
  fn default() -> Self {
    Self {
      id: default_runway_id(),
      heading: default_heading(),
      center_x: 0.0,
      center_y: 0.0,
      length_ft: default_length_ft(),
      width_ft: default_width_ft(),
      elevation_ft: default_elevation_ft(),
    }
  }
}

fn default_runway_id() -> String {
  "09".to_string()
}
fn default_heading() -> f32 {
  90.0
}
fn default_length_ft() -> f32 {
  9000.0
}
fn default_width_ft() -> f32 {
  150.0
}
fn default_elevation_ft() -> f32 {
  400.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
  #[serde(default = "default_tick_rate_hz")]
  pub tick_rate_hz: f32,
}

impl Default for SimConfig {
  fn default() -> Self {
    Self {
      tick_rate_hz: default_tick_rate_hz(),
    }
  }
}

fn default_tick_rate_hz() -> f32 {
  1.0
}
