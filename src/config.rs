use std::{fs, path::Path};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::timer::{DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES};

#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
}

impl ThemeName {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Startup settings. Read once, never written back.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub theme: ThemeName,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            theme: ThemeName::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config = serde_json::from_str(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Command-line values win over the file and the defaults.
    pub fn with_overrides(mut self, work: Option<u32>, rest: Option<u32>, theme: Option<ThemeName>) -> Self {
        if let Some(w) = work { self.work_minutes = w; }
        if let Some(r) = rest { self.break_minutes = r; }
        if let Some(t) = theme { self.theme = t; }
        self
    }
}
