//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::portion::PortionSettings;
use crate::recognition::RecognitionSettings;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Onboarding flow settings
    pub onboarding: OnboardingSettings,
    /// Camera screen settings
    pub camera: CameraSettings,
    /// Recognition pipeline settings
    pub recognition: RecognitionSettings,
    /// Portion stack settings
    pub portion: PortionSettings,
}

/// Onboarding carousel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingSettings {
    /// Number of carousel pages; Begin unlocks on the last one
    pub pages: usize,
}

impl Default for OnboardingSettings {
    fn default() -> Self {
        Self { pages: 5 }
    }
}

/// Camera screen settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Below this surface distance the camera screen asks the user to move back
    pub min_distance_cm: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            min_distance_cm: 10.0,
        }
    }
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "nutriscan", "NutriScan")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert_eq!(config.onboarding.pages, 5);
        assert!((config.camera.min_distance_cm - 10.0).abs() < 0.01);

        assert!((config.recognition.min_confidence - 0.5).abs() < 0.01);
        assert!(!config.recognition.preprocessing.enabled);

        assert!((config.portion.cube_size_m - 0.01).abs() < 1e-6);
        assert!((config.portion.initial_height_m - 0.5).abs() < 1e-6);
        assert_eq!(config.portion.cascade_step_ms, 200);
        assert_eq!(config.portion.drop_duration_ms, 250);
        assert_eq!(config.portion.unit_label, "1gr");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig::default();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.onboarding.pages, config.onboarding.pages);
        assert_eq!(parsed.portion.cascade_step_ms, config.portion.cascade_step_ms);
        assert_eq!(parsed.recognition.min_confidence, config.recognition.min_confidence);
        assert_eq!(parsed.camera.min_distance_cm, config.camera.min_distance_cm);
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.camera.min_distance_cm = 25.0;
        config.portion.cube_size_m = 0.02;
        config.recognition.preprocessing.enabled = true;
        config.recognition.preprocessing.scale = 2;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert!((parsed.camera.min_distance_cm - 25.0).abs() < 0.01);
        assert!((parsed.portion.cube_size_m - 0.02).abs() < 1e-6);
        assert!(parsed.recognition.preprocessing.enabled);
        assert_eq!(parsed.recognition.preprocessing.scale, 2);
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();
        let temp_file = NamedTempFile::new().unwrap();

        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(loaded.onboarding.pages, config.onboarding.pages);
        assert_eq!(loaded.portion.unit_label, config.portion.unit_label);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[camera]\nmin_distance_cm = 15.0").unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert!((config.camera.min_distance_cm - 15.0).abs() < 0.01);
        assert_eq!(config.onboarding.pages, 5);
    }
}
