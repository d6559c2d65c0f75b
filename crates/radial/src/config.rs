use crate::events::AppEvent;
use crate::gui::theme::HexColor;
use async_channel::Sender;
use dial::{AnimationConfig, Metrics, ValueRange};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SliderConfig {
    pub minimum: f64,
    pub maximum: f64,
    /// Starting value; the minimum when unset.
    pub value: Option<f64>,
    pub continuous: bool,
}

impl Default for SliderConfig {
    fn default() -> Self {
        let range = ValueRange::default();
        Self {
            minimum: range.minimum(),
            maximum: range.maximum(),
            value: None,
            continuous: true,
        }
    }
}

impl SliderConfig {
    pub fn range(&self) -> ValueRange {
        ValueRange::new(self.minimum, self.maximum)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StyleConfig {
    pub thickness: f64,
    pub padding: f64,
    pub thumb_padding: f64,
    pub zero_indicator_padding: f64,
    pub background_image: Option<PathBuf>,
    pub circle_background_image: Option<PathBuf>,
    pub thumb_image: Option<PathBuf>,
    pub zero_indicator_image: Option<PathBuf>,
    pub thumb_tint_color: Option<HexColor>,
    pub circle_background_color: Option<HexColor>,
    pub circle_active_color: Option<HexColor>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let metrics = Metrics::default();
        Self {
            thickness: metrics.thickness,
            padding: metrics.padding,
            thumb_padding: metrics.thumb_padding,
            zero_indicator_padding: metrics.zero_indicator_padding,
            background_image: None,
            circle_background_image: None,
            thumb_image: None,
            zero_indicator_image: None,
            thumb_tint_color: None,
            circle_background_color: None,
            circle_active_color: None,
        }
    }
}

impl StyleConfig {
    pub fn metrics(&self) -> Metrics {
        Metrics {
            thickness: self.thickness,
            padding: self.padding,
            thumb_padding: self.thumb_padding,
            zero_indicator_padding: self.zero_indicator_padding,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub slider: SliderConfig,
    pub animation: AnimationConfig,
    pub style: StyleConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "radial", "radial-demo").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// `RADIAL_<SECTION>__<KEY>` variables, e.g. `RADIAL_SLIDER__MAXIMUM=10`.
fn environment() -> config::Environment {
    config::Environment::with_prefix("RADIAL")
        .prefix_separator("_")
        .separator("__")
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with(path, environment())
}

fn load_config_with(path: &Path, env: config::Environment) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(env)
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default(path: &Path) -> Config {
    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

pub fn write_default_config(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(path.to_path_buf())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dial::Easing;

    #[test]
    fn test_default_config_parses() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.slider.minimum, 0.0);
        assert_eq!(config.slider.maximum, 100.0);
        assert_eq!(config.slider.value, Some(25.0));
        assert!(config.slider.continuous);
        assert_eq!(config.animation.easing, Easing::EaseInOut);
        assert_eq!(config.style.thickness, 14.0);
        assert_eq!(config.style.thumb_image, None);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.style.metrics(), Metrics::default());
    }

    #[test]
    fn test_partial_config() {
        let config = parse_config(
            r##"
[slider]
maximum = 360
continuous = false

[animation]
duration_ms = 0
easing = "linear"

[style]
circle_active_color = "#ff8800"
thumb_image = "/tmp/thumb.png"
"##,
        )
        .unwrap();

        assert_eq!(config.slider.minimum, 0.0);
        assert_eq!(config.slider.maximum, 360.0);
        assert!(!config.slider.continuous);
        assert_eq!(config.animation.duration_ms, 0);
        assert_eq!(config.animation.easing, Easing::Linear);
        assert_eq!(
            config.style.circle_active_color.map(|c| c.to_string()),
            Some("#ff8800ff".to_string())
        );
        assert_eq!(
            config.style.thumb_image,
            Some(PathBuf::from("/tmp/thumb.png"))
        );
    }

    #[test]
    fn test_inverted_range_is_repaired() {
        let config = parse_config("[slider]\nminimum = 5\nmaximum = 1\n").unwrap();
        let range = config.slider.range();
        assert_eq!(range.minimum(), 1.0);
        assert_eq!(range.maximum(), 5.0);
    }

    #[test]
    fn test_bad_color_is_an_error() {
        assert!(parse_config("[style]\nthumb_tint_color = \"purple\"\n").is_err());
    }

    fn fake_env(vars: &[(&str, &str)]) -> config::Environment {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(vars))
    }

    #[test]
    fn test_environment_overrides_file() {
        let env = fake_env(&[
            ("RADIAL_SLIDER__MAXIMUM", "10"),
            ("RADIAL_ANIMATION__EASING", "linear"),
            ("OTHER_SLIDER__MINIMUM", "5"),
        ]);
        let config = load_config_with(Path::new("/nonexistent/radial/config.toml"), env).unwrap();
        assert_eq!(config.slider.maximum, 10.0);
        assert_eq!(config.slider.minimum, 0.0);
        assert_eq!(config.animation.easing, Easing::Linear);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/radial/config.toml")).unwrap();
        assert_eq!(config.slider, SliderConfig::default());
    }
}
