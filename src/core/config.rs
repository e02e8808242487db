//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.decknav/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! The gesture thresholds here were tuned by feel against real trackpads and
//! wheels. They are kept as plain numbers rather than derived from anything.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DeckConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub lock: LockConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Deck file to open. Relative paths resolve against `~/.decknav/`.
    pub deck: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NavigationConfig {
    pub wheel_threshold: Option<f64>,
    pub wheel_debounce_ms: Option<u64>,
    pub swipe_min_delta: Option<f64>,
    pub edge_epsilon: Option<f64>,
    pub edge_window_ms: Option<u64>,
    pub edge_settle_ms: Option<u64>,
    pub carousel_cooldown_ms: Option<u64>,
    pub key_scroll_step: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LockConfig {
    pub wait_for_splash: Option<bool>,
    pub safety_timeout_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_WHEEL_THRESHOLD: f64 = 50.0;
pub const DEFAULT_WHEEL_DEBOUNCE_MS: u64 = 200;
pub const DEFAULT_SWIPE_MIN_DELTA: f64 = 50.0;
pub const DEFAULT_EDGE_EPSILON: f64 = 5.0;
pub const DEFAULT_EDGE_WINDOW_MS: u64 = 1500;
pub const DEFAULT_EDGE_SETTLE_MS: u64 = 300;
pub const DEFAULT_CAROUSEL_COOLDOWN_MS: u64 = 400;
pub const DEFAULT_KEY_SCROLL_STEP: f64 = 60.0;
pub const DEFAULT_SAFETY_TIMEOUT_MS: u64 = 12_000;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// Gesture arbitration tuning, shared by the normalizer, gate and carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavTuning {
    /// Accumulated wheel delta that must be exceeded to change section.
    pub wheel_threshold: f64,
    /// Quiet period after which the wheel accumulator forgets residue.
    pub wheel_debounce: Duration,
    /// Minimum vertical swipe distance.
    pub swipe_min_delta: f64,
    /// Sub-pixel tolerance for scroll-edge checks.
    pub edge_epsilon: f64,
    /// How long an armed edge waits for the confirming gesture.
    pub edge_window: Duration,
    /// Quiet period separating one edge gesture from the next.
    pub edge_settle: Duration,
    /// Minimum spacing between two carousel steps.
    pub carousel_cooldown: Duration,
    /// Nested-scroll amount for one arrow/page key press.
    pub key_scroll_step: f64,
}

impl Default for NavTuning {
    fn default() -> Self {
        Self {
            wheel_threshold: DEFAULT_WHEEL_THRESHOLD,
            wheel_debounce: Duration::from_millis(DEFAULT_WHEEL_DEBOUNCE_MS),
            swipe_min_delta: DEFAULT_SWIPE_MIN_DELTA,
            edge_epsilon: DEFAULT_EDGE_EPSILON,
            edge_window: Duration::from_millis(DEFAULT_EDGE_WINDOW_MS),
            edge_settle: Duration::from_millis(DEFAULT_EDGE_SETTLE_MS),
            carousel_cooldown: Duration::from_millis(DEFAULT_CAROUSEL_COOLDOWN_MS),
            key_scroll_step: DEFAULT_KEY_SCROLL_STEP,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// `None` = built-in deck.
    pub deck_path: Option<PathBuf>,
    pub wait_for_splash: bool,
    pub safety_timeout: Duration,
    pub tuning: NavTuning,
}

/// Overrides taken from the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub deck: Option<PathBuf>,
    pub no_splash: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.decknav/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".decknav"))
}

/// Returns the path to `~/.decknav/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.decknav/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `DeckConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<DeckConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(DeckConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(DeckConfig::default());
    }

    load_config_from(&path)
}

/// Load config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<DeckConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: DeckConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# decknav configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# deck = "talk.toml"                 # Relative to ~/.decknav/, or absolute

# [navigation]
# wheel_threshold = 50.0             # Accumulated wheel delta needed to change section
# wheel_debounce_ms = 200            # Wheel residue is forgotten after this much quiet
# swipe_min_delta = 50.0             # Shorter vertical swipes are ignored
# edge_epsilon = 5.0                 # Scroll-edge tolerance
# edge_window_ms = 1500              # Time allowed for the confirming edge gesture
# edge_settle_ms = 300               # Quiet gap that separates two edge gestures
# carousel_cooldown_ms = 400         # Minimum spacing between carousel steps
# key_scroll_step = 60.0             # Nested scroll per arrow key

# [lock]
# wait_for_splash = true             # Lock navigation until the intro finishes
# safety_timeout_ms = 12000          # Force-unlock if the intro never reports ready
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &DeckConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Deck: CLI → env → config → built-in
    let deck_path = cli
        .deck
        .clone()
        .or_else(|| std::env::var("DECKNAV_DECK").ok().map(PathBuf::from))
        .or_else(|| config.general.deck.as_deref().map(resolve_deck_path));

    // Splash: --no-splash → env → config → default (on)
    let wait_for_splash = if cli.no_splash {
        false
    } else {
        std::env::var("DECKNAV_WAIT_FOR_SPLASH")
            .ok()
            .and_then(|v| parse_bool(&v))
            .or(config.lock.wait_for_splash)
            .unwrap_or(true)
    };

    let nav = &config.navigation;
    let defaults = NavTuning::default();
    let tuning = NavTuning {
        wheel_threshold: nav.wheel_threshold.unwrap_or(defaults.wheel_threshold),
        wheel_debounce: nav
            .wheel_debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.wheel_debounce),
        swipe_min_delta: nav.swipe_min_delta.unwrap_or(defaults.swipe_min_delta),
        edge_epsilon: nav.edge_epsilon.unwrap_or(defaults.edge_epsilon),
        edge_window: nav
            .edge_window_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.edge_window),
        edge_settle: nav
            .edge_settle_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.edge_settle),
        carousel_cooldown: nav
            .carousel_cooldown_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.carousel_cooldown),
        key_scroll_step: nav.key_scroll_step.unwrap_or(defaults.key_scroll_step),
    };

    ResolvedConfig {
        deck_path,
        wait_for_splash,
        safety_timeout: Duration::from_millis(
            config
                .lock
                .safety_timeout_ms
                .unwrap_or(DEFAULT_SAFETY_TIMEOUT_MS),
        ),
        tuning,
    }
}

/// Relative deck paths in the config file live next to it in `~/.decknav/`.
fn resolve_deck_path(deck: &str) -> PathBuf {
    let path = PathBuf::from(deck);
    if path.is_absolute() {
        return path;
    }
    match config_dir() {
        Some(dir) => dir.join(path),
        None => path,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = DeckConfig::default();
        assert!(config.general.deck.is_none());
        assert!(config.navigation.wheel_threshold.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = DeckConfig::default();
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.tuning, NavTuning::default());
        assert_eq!(resolved.tuning.wheel_threshold, 50.0);
        assert_eq!(resolved.tuning.wheel_debounce, Duration::from_millis(200));
        assert_eq!(resolved.safety_timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = DeckConfig {
            navigation: NavigationConfig {
                wheel_threshold: Some(80.0),
                edge_window_ms: Some(900),
                ..Default::default()
            },
            lock: LockConfig {
                wait_for_splash: Some(false),
                safety_timeout_ms: Some(3000),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.tuning.wheel_threshold, 80.0);
        assert_eq!(resolved.tuning.edge_window, Duration::from_millis(900));
        assert_eq!(resolved.tuning.swipe_min_delta, DEFAULT_SWIPE_MIN_DELTA);
        assert_eq!(resolved.safety_timeout, Duration::from_millis(3000));
    }

    #[test]
    fn test_resolve_cli_deck_and_no_splash_win() {
        let config = DeckConfig {
            general: GeneralConfig {
                deck: Some("/decks/config.toml".to_string()),
            },
            lock: LockConfig {
                wait_for_splash: Some(true),
                safety_timeout_ms: None,
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            deck: Some(PathBuf::from("/decks/cli.toml")),
            no_splash: true,
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.deck_path, Some(PathBuf::from("/decks/cli.toml")));
        assert!(!resolved.wait_for_splash);
    }

    #[test]
    fn test_absolute_deck_path_is_kept() {
        assert_eq!(
            resolve_deck_path("/tmp/talk.toml"),
            PathBuf::from("/tmp/talk.toml")
        );
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[navigation]
wheel_debounce_ms = 150
"#;
        let config: DeckConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.navigation.wheel_debounce_ms, Some(150));
        assert!(config.navigation.wheel_threshold.is_none());
        assert!(config.lock.wait_for_splash.is_none());
        assert!(config.general.deck.is_none());
    }

    #[test]
    fn test_full_toml_parses() {
        let toml_str = r#"
[general]
deck = "talk.toml"

[navigation]
wheel_threshold = 40.0
wheel_debounce_ms = 250
swipe_min_delta = 30.0
edge_epsilon = 2.0
edge_window_ms = 1000
edge_settle_ms = 200
carousel_cooldown_ms = 300
key_scroll_step = 40.0

[lock]
wait_for_splash = false
safety_timeout_ms = 5000
"#;
        let config: DeckConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.deck.as_deref(), Some("talk.toml"));
        assert_eq!(config.navigation.edge_settle_ms, Some(200));
        assert_eq!(config.lock.wait_for_splash, Some(false));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("decknav-cfg-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[navigation\nwheel_threshold = ").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("config parse error"));
        let _ = fs::remove_dir_all(&dir);
    }
}
