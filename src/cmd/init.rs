use crate::data::persistence::get_data_dir;
use crate::data::CalendarSettings;
use anyhow::Result;
use log::info;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = get_data_dir()?;
    run_in_dir(&dir)?;
    println!("Config initialized in {}.", dir.display());
    Ok(())
}

/// Writes the default config.yaml into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    CalendarSettings::default().save_to(dir)?;
    info!("wrote default settings to {}", dir.join("config.yaml").display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_in_dir_creates_config() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        assert!(tmp.path().join("config.yaml").exists());
    }

    #[test]
    fn test_config_yaml_contains_settings_key() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        let content = fs::read_to_string(tmp.path().join("config.yaml")).unwrap();
        assert!(content.contains("settings:"));
        assert!(content.contains("swipe_threshold: 100"));
        assert!(content.contains("locale: ko"));
    }

    #[test]
    fn test_written_config_loads_back_as_defaults() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        let loaded = CalendarSettings::load_from(tmp.path()).unwrap();
        assert_eq!(loaded, CalendarSettings::default());
    }

    #[test]
    fn test_run_in_dir_overwrites_existing_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.yaml"), "settings:\n  locale: en\n").unwrap();
        run_in_dir(tmp.path()).unwrap();
        let loaded = CalendarSettings::load_from(tmp.path()).unwrap();
        assert_eq!(loaded.locale, crate::data::Locale::Ko);
    }
}
