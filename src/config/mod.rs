use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::geometry::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "pagemark";
const APP_CONFIG_FILE: &str = "config.json";

const DEFAULT_SIDE_PANEL_WIDTH: u32 = 320;
const DEFAULT_HORIZONTAL_PADDING: u32 = 48;
const DEFAULT_VERTICAL_CHROME: u32 = 96;
const DEFAULT_TOAST_DURATION_MS: u64 = 3000;
const DEFAULT_CLOSE_DELAY_MS: u64 = 1500;
const DEFAULT_COLOR: Color = Color::new(0xff, 0x3b, 0x30);
const DEFAULT_STROKE_WIDTH: u8 = 3;
const DEFAULT_FONT_SIZE: u8 = 24;
const DEFAULT_TEXT_PLACEHOLDER: &str = "Type here";

/// Editor settings from `config.json`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    pub side_panel_width: u32,
    pub horizontal_padding: u32,
    pub vertical_chrome: u32,
    pub toast_duration_ms: u64,
    pub close_delay_ms: u64,
    pub default_color: Color,
    pub default_stroke_width: u8,
    pub default_font_size: u8,
    pub text_placeholder: String,
    pub font_path: Option<PathBuf>,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            side_panel_width: DEFAULT_SIDE_PANEL_WIDTH,
            horizontal_padding: DEFAULT_HORIZONTAL_PADDING,
            vertical_chrome: DEFAULT_VERTICAL_CHROME,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            close_delay_ms: DEFAULT_CLOSE_DELAY_MS,
            default_color: DEFAULT_COLOR,
            default_stroke_width: DEFAULT_STROKE_WIDTH,
            default_font_size: DEFAULT_FONT_SIZE,
            text_placeholder: DEFAULT_TEXT_PLACEHOLDER.to_string(),
            font_path: None,
        }
    }
}

impl AnnotatorConfig {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

pub fn load_app_config() -> AnnotatorConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AnnotatorConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AnnotatorConfig::default(),
    };
    if !path.exists() {
        return AnnotatorConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AnnotatorConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AnnotatorConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
