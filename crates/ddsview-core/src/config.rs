use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DDS_EXTENSION, DEFAULT_BIAS_STEP, DEFAULT_SCALE_FACTOR, FALLBACK_SCREEN_SIZE,
    JUMP_STEP_DIVISOR, JUMP_STEP_MIN, MIN_SUGGESTED_HEIGHT, MIN_SUGGESTED_WIDTH,
    PAGE_STEP_DIVISOR, PAGE_STEP_MIN, SCREEN_MARGIN,
};
use crate::error::{DdsViewError, Result};

/// Tunables shared by the viewer and the CLI, stored as TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub adjust: AdjustConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub files: FilesConfig,
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            DdsViewError::FileNotFound {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_toml(&contents)
            .map_err(|e| DdsViewError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| DdsViewError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DdsViewError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.navigation.page_divisor == 0 || self.navigation.jump_divisor == 0 {
            return Err(DdsViewError::Config(
                "navigation divisors must be positive".into(),
            ));
        }
        if !(self.adjust.scale_factor.is_finite() && self.adjust.scale_factor > 0.0) {
            return Err(DdsViewError::Config(format!(
                "scale_factor must be a positive number, got {}",
                self.adjust.scale_factor
            )));
        }
        if !self.adjust.bias_step.is_finite() {
            return Err(DdsViewError::Config("bias_step must be finite".into()));
        }
        Ok(())
    }
}

/// Step sizes for directory navigation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub page_divisor: usize,
    pub page_min: usize,
    pub jump_divisor: usize,
    pub jump_min: usize,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            page_divisor: PAGE_STEP_DIVISOR,
            page_min: PAGE_STEP_MIN,
            jump_divisor: JUMP_STEP_DIVISOR,
            jump_min: JUMP_STEP_MIN,
        }
    }
}

impl NavigationConfig {
    /// File-count dependent step for PageUp/PageDown.
    pub fn page_step(&self, file_count: usize) -> usize {
        (file_count / self.page_divisor).max(self.page_min)
    }

    /// File-count dependent step for Home/End.
    pub fn jump_step(&self, file_count: usize) -> usize {
        (file_count / self.jump_divisor).max(self.jump_min)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustConfig {
    pub scale_factor: f32,
    pub bias_step: f32,
}

impl Default for AdjustConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            bias_step: DEFAULT_BIAS_STEP,
        }
    }
}

/// Suggested window size rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub screen_margin: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub fallback_screen: [u32; 2],
    /// Halve the suggested size in a remote-display session.
    pub halve_when_remote: bool,
    /// Force remote-session handling on or off instead of detecting it.
    pub remote_session: Option<bool>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            screen_margin: SCREEN_MARGIN,
            min_width: MIN_SUGGESTED_WIDTH,
            min_height: MIN_SUGGESTED_HEIGHT,
            fallback_screen: FALLBACK_SCREEN_SIZE,
            halve_when_remote: true,
            remote_session: None,
        }
    }
}

/// Which files directory navigation picks up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub extension: String,
    pub case_sensitive: bool,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extension: DDS_EXTENSION.to_string(),
            case_sensitive: false,
        }
    }
}

impl FilesConfig {
    pub fn matches(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let wanted = self.extension.trim_start_matches('.');
        if self.case_sensitive {
            ext == wanted
        } else {
            ext.eq_ignore_ascii_case(wanted)
        }
    }
}
