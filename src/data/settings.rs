use crate::data::persistence::{get_data_dir, YamlDocument};
use crate::data::Locale;
use anyhow::{bail, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CalendarSettings {
    pub locale: Locale,
    /// First column of the grid and the weekday header.
    pub week_start: Weekday,
    /// A drag must travel further than this (logical units) to change month.
    pub swipe_threshold: u32,
    /// Logical units per terminal column of mouse travel.
    pub units_per_column: u32,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        CalendarSettings {
            locale: Locale::Ko,
            week_start: Weekday::Sun,
            swipe_threshold: 100,
            units_per_column: 10,
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: CalendarSettings,
}

impl YamlDocument for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
}

impl CalendarSettings {
    pub fn load() -> Result<Self> {
        Self::load_from(&get_data_dir()?)
    }

    pub fn load_from(dir: &std::path::Path) -> Result<Self> {
        let settings = SettingsWrapper::load_from(dir)?.settings;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values that would make drag travel meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.units_per_column == 0 || self.units_per_column > i32::MAX as u32 {
            bail!(
                "settings.units_per_column must be in 1..={}, got {}",
                i32::MAX,
                self.units_per_column
            );
        }
        if self.swipe_threshold > i32::MAX as u32 {
            bail!(
                "settings.swipe_threshold must be at most {}, got {}",
                i32::MAX,
                self.swipe_threshold
            );
        }
        Ok(())
    }

    pub fn save_to(&self, dir: &std::path::Path) -> Result<()> {
        let wrapper = SettingsWrapper {
            settings: self.clone(),
        };
        wrapper.save_to(dir)
    }
}
