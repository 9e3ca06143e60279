use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use crate::motion::easing::Ease;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub snap: SnapConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Timeline parameters shared by every section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pinned span length as a fraction of viewport height (1.3 = 130%)
    #[serde(default = "default_scroll_length")]
    pub scroll_length: f64,
    /// Progress at which every entrance has completed
    #[serde(default = "default_entrance_end")]
    pub entrance_end: f64,
    /// Progress at which exits begin
    #[serde(default = "default_exit_start")]
    pub exit_start: f64,
    /// Playhead lag behind scroll for pinned timelines (0 = exact)
    #[serde(default = "default_pin_scrub_ms")]
    pub pin_scrub_ms: u64,
    /// Playhead lag behind scroll for reveal timelines
    #[serde(default = "default_reveal_scrub_ms")]
    pub reveal_scrub_ms: u64,
    /// Reset element properties when scrolling back above a pinned section
    #[serde(default = "default_true")]
    pub reset_on_leave_back: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scroll_length: default_scroll_length(),
            entrance_end: default_entrance_end(),
            exit_start: default_exit_start(),
            pin_scrub_ms: default_pin_scrub_ms(),
            reveal_scrub_ms: default_reveal_scrub_ms(),
            reset_on_leave_back: default_true(),
        }
    }
}

impl EngineConfig {
    /// Config with scrub smoothing disabled, so playheads track scroll exactly
    pub fn exact() -> Self {
        Self {
            pin_scrub_ms: 0,
            reveal_scrub_ms: 0,
            ..Default::default()
        }
    }

    pub fn pin_scrub(&self) -> Duration {
        Duration::from_millis(self.pin_scrub_ms)
    }

    pub fn reveal_scrub(&self) -> Duration {
        Duration::from_millis(self.reveal_scrub_ms)
    }

    /// Check phase boundaries are ordered inside [0, 1]
    pub fn validate(&self) -> crate::Result<()> {
        let ordered = 0.0 < self.entrance_end
            && self.entrance_end <= self.exit_start
            && self.exit_start < 1.0;
        if !ordered {
            return Err(crate::Error::Config(format!(
                "engine phases must satisfy 0 < entrance_end <= exit_start < 1 (got {} / {})",
                self.entrance_end, self.exit_start
            )));
        }
        if !(self.scroll_length > 0.0 && self.scroll_length.is_finite()) {
            return Err(crate::Error::Config(format!(
                "engine.scroll_length must be positive (got {})",
                self.scroll_length
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapConfig {
    /// Install the snap rule at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Tolerance around each pinned range, in scroll fraction
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Delay after mount before pinned ranges are measured
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Shortest snap transition
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,
    /// Longest snap transition
    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: u64,
    /// Easing of the snap transition
    #[serde(default = "default_snap_ease")]
    pub ease: Ease,
    /// Re-measure pinned ranges after the viewport changes size
    #[serde(default = "default_true")]
    pub recompute_on_resize: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            tolerance: default_tolerance(),
            settle_delay_ms: default_settle_delay_ms(),
            min_duration_ms: default_min_duration_ms(),
            max_duration_ms: default_max_duration_ms(),
            ease: default_snap_ease(),
            recompute_on_resize: default_true(),
        }
    }
}

impl SnapConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn min_duration(&self) -> Duration {
        Duration::from_millis(self.min_duration_ms.min(self.max_duration_ms))
    }

    pub fn max_duration(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms.max(self.min_duration_ms))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds when nothing is animating
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while timelines or transitions are moving
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Quiet period after the last scroll input that ends a gesture
    #[serde(default = "default_gesture_end_ms")]
    pub gesture_end_ms: u64,
    /// Rows scrolled per line step or wheel notch
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
    /// Palette overrides
    #[serde(default)]
    pub colors: ThemeColorOverrides,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            gesture_end_ms: default_gesture_end_ms(),
            scroll_lines: default_scroll_lines(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

impl UiConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Frame duration for animation FPS
    pub fn frame_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }

    pub fn gesture_end(&self) -> Duration {
        Duration::from_millis(self.gesture_end_ms)
    }
}

/// Optional color overrides for the page palette
/// Each color is a hex string (e.g., "#ff6a00" or "ff6a00")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    /// Page background
    pub background: Option<String>,
    /// Card and panel background
    pub card: Option<String>,
    /// Primary text
    pub text: Option<String>,
    /// Secondary text
    pub muted: Option<String>,
    /// Brand orange
    pub accent: Option<String>,
    /// Rating stars
    pub star: Option<String>,
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-d>" (Ctrl+d), "<S-g>" (Shift+g), "<CR>" (Enter), "<Esc>", "<Tab>", "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the preview
    #[serde(default = "default_key_quit")]
    pub quit: String,

    // Scrolling
    /// Scroll down by `ui.scroll_lines`
    #[serde(default = "default_key_scroll_down")]
    pub scroll_down: String,
    /// Scroll up by `ui.scroll_lines`
    #[serde(default = "default_key_scroll_up")]
    pub scroll_up: String,
    /// Scroll half page down
    #[serde(default = "default_key_scroll_half_down")]
    pub scroll_half_down: String,
    /// Scroll half page up
    #[serde(default = "default_key_scroll_half_up")]
    pub scroll_half_up: String,
    /// Scroll full page down
    #[serde(default = "default_key_scroll_page_down")]
    pub scroll_page_down: String,
    /// Scroll full page up
    #[serde(default = "default_key_scroll_page_up")]
    pub scroll_page_up: String,
    /// Jump to top of page
    #[serde(default = "default_key_jump_to_top")]
    pub jump_to_top: String,
    /// Jump to bottom of page
    #[serde(default = "default_key_jump_to_bottom")]
    pub jump_to_bottom: String,

    // Navigation bar targets
    /// Smooth-scroll to the menu
    #[serde(default = "default_key_goto_menu")]
    pub goto_menu: String,
    /// Smooth-scroll to the reviews
    #[serde(default = "default_key_goto_reviews")]
    pub goto_reviews: String,
    /// Smooth-scroll to ordering and location
    #[serde(default = "default_key_goto_order")]
    pub goto_order: String,

    // Links
    /// Focus next outbound link
    #[serde(default = "default_key_next_link")]
    pub next_link: String,
    /// Focus previous outbound link
    #[serde(default = "default_key_prev_link")]
    pub prev_link: String,
    /// Open focused link with the system opener
    #[serde(default = "default_key_open_link")]
    pub open_link: String,

    // Toggles
    /// Enable/disable snapping
    #[serde(default = "default_key_toggle_snap")]
    pub toggle_snap: String,
    /// Show pinned range overlay
    #[serde(default = "default_key_toggle_overlay")]
    pub toggle_overlay: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            scroll_down: default_key_scroll_down(),
            scroll_up: default_key_scroll_up(),
            scroll_half_down: default_key_scroll_half_down(),
            scroll_half_up: default_key_scroll_half_up(),
            scroll_page_down: default_key_scroll_page_down(),
            scroll_page_up: default_key_scroll_page_up(),
            jump_to_top: default_key_jump_to_top(),
            jump_to_bottom: default_key_jump_to_bottom(),
            goto_menu: default_key_goto_menu(),
            goto_reviews: default_key_goto_reviews(),
            goto_order: default_key_goto_order(),
            next_link: default_key_next_link(),
            prev_link: default_key_prev_link(),
            open_link: default_key_open_link(),
            toggle_snap: default_key_toggle_snap(),
            toggle_overlay: default_key_toggle_overlay(),
        }
    }
}

// Default keymap values (Vim-style notation)
fn default_key_quit() -> String { "q".to_string() }
fn default_key_scroll_down() -> String { "j".to_string() }
fn default_key_scroll_up() -> String { "k".to_string() }
fn default_key_scroll_half_down() -> String { "<C-d>".to_string() }
fn default_key_scroll_half_up() -> String { "<C-u>".to_string() }
fn default_key_scroll_page_down() -> String { "<Space>".to_string() }
fn default_key_scroll_page_up() -> String { "<C-b>".to_string() }
fn default_key_jump_to_top() -> String { "gg".to_string() }
fn default_key_jump_to_bottom() -> String { "G".to_string() }
fn default_key_goto_menu() -> String { "m".to_string() }
fn default_key_goto_reviews() -> String { "r".to_string() }
fn default_key_goto_order() -> String { "o".to_string() }
fn default_key_next_link() -> String { "<Tab>".to_string() }
fn default_key_prev_link() -> String { "<S-Tab>".to_string() }
fn default_key_open_link() -> String { "<CR>".to_string() }
fn default_key_toggle_snap() -> String { "s".to_string() }
fn default_key_toggle_overlay() -> String { "d".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("takana")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_scroll_length() -> f64 {
    1.3
}

fn default_entrance_end() -> f64 {
    0.3
}

fn default_exit_start() -> f64 {
    0.7
}

fn default_pin_scrub_ms() -> u64 {
    600
}

fn default_reveal_scrub_ms() -> u64 {
    500
}

fn default_tolerance() -> f64 {
    0.02
}

fn default_settle_delay_ms() -> u64 {
    500
}

fn default_min_duration_ms() -> u64 {
    150
}

fn default_max_duration_ms() -> u64 {
    350
}

fn default_snap_ease() -> Ease {
    Ease::Power2Out
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_gesture_end_ms() -> u64 {
    150
}

fn default_scroll_lines() -> u16 {
    2
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults when it does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.engine.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/takana/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("takana")
            .join("config.toml")
    }

    /// Get the log file path used while the terminal preview owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("takana.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
