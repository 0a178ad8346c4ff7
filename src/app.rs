use crate::config::DeployConfig;
use crate::notify::NoticeLevel;
use std::time::Instant;

// UI constants
pub const NOTIFICATION_TTL_SECS: u64 = 5;
pub const ERROR_TTL_SECS: u64 = 10;
pub const SPINNER_FRAME_COUNT: usize = 10;
pub const QUICK_SELECT_MAX: usize = 9;
pub const NARROW_WIDTH_THRESHOLD: u16 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub name: String,
    pub label: String,
}

/// `Idle -> Triggering -> (Polling | Failed)`; a new trigger restarts from `Triggering`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Triggering(String),
    Polling(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
    pub timestamp: Instant,
}

pub struct ConfirmOverlay {
    pub title: String,
    pub message: String,
    pub environment: String,
}

/// At most one overlay at a time.
pub enum ActiveOverlay {
    None,
    Confirm(ConfirmOverlay),
}

/// Immutable configuration set at startup.
pub struct AppConfig {
    pub version_string: String,
    pub poll_interval_secs: u64,
}

pub struct AppState {
    pub config: AppConfig,

    // Environment menu
    pub environments: Vec<MenuEntry>,
    pub menu_open: bool,
    pub menu_cursor: usize,

    // Deployment
    pub phase: Phase,
    pub active_environment: Option<String>,
    pub badge_url: Option<String>,
    pub badge_status: Option<String>,
    pub last_refresh: Option<Instant>,

    // Transient UI
    pub notifications: Vec<Notification>,
    pub error: Option<(String, Instant)>,
    pub spinner_frame: usize,
    pub should_quit: bool,
    pub overlay: ActiveOverlay,
}

impl AppState {
    pub fn new(config: &DeployConfig) -> Self {
        Self {
            config: AppConfig {
                version_string: format!("deployw v{}", env!("CARGO_PKG_VERSION")),
                poll_interval_secs: config.poll_interval.as_secs(),
            },
            environments: config
                .environments
                .iter()
                .map(|e| MenuEntry {
                    name: e.name.clone(),
                    label: e.label.clone(),
                })
                .collect(),
            menu_open: false,
            menu_cursor: 0,
            phase: Phase::Idle,
            active_environment: None,
            badge_url: None,
            badge_status: None,
            last_refresh: None,
            notifications: Vec::new(),
            error: None,
            spinner_frame: 0,
            should_quit: false,
            overlay: ActiveOverlay::None,
        }
    }

    // --- Menu ---

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    pub fn move_cursor_up(&mut self) {
        if self.menu_cursor > 0 {
            self.menu_cursor -= 1;
        }
    }

    pub fn move_cursor_down(&mut self) {
        if !self.environments.is_empty() && self.menu_cursor < self.environments.len() - 1 {
            self.menu_cursor += 1;
        }
    }

    /// Ask for confirmation to deploy the environment under the cursor.
    pub fn select_current(&mut self) {
        if let Some(entry) = self.environments.get(self.menu_cursor).cloned() {
            self.close_menu();
            self.open_confirm_overlay(&entry);
        }
    }

    /// Same as moving to the nth entry (1-indexed) and selecting it.
    pub fn quick_select(&mut self, n: usize) {
        if n == 0 || n > QUICK_SELECT_MAX || n > self.environments.len() {
            return;
        }
        self.menu_cursor = n - 1;
        self.select_current();
    }

    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.environments
            .iter()
            .find(|e| e.name == name)
            .map_or(name, |e| e.label.as_str())
    }

    // --- Confirm overlay ---

    pub fn has_confirm_overlay(&self) -> bool {
        matches!(self.overlay, ActiveOverlay::Confirm(_))
    }

    fn open_confirm_overlay(&mut self, entry: &MenuEntry) {
        self.overlay = ActiveOverlay::Confirm(ConfirmOverlay {
            title: "Confirm Deploy".to_string(),
            message: format!("Deploy to {}?", entry.label),
            environment: entry.name.clone(),
        });
    }

    pub fn close_confirm_overlay(&mut self) {
        self.overlay = ActiveOverlay::None;
    }

    /// Close the overlay and return the environment it was confirming.
    pub fn take_confirmed(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.overlay, ActiveOverlay::None) {
            ActiveOverlay::Confirm(o) => Some(o.environment),
            ActiveOverlay::None => None,
        }
    }

    // --- Deployment phases ---

    pub fn begin_trigger(&mut self, environment: &str) {
        self.close_menu();
        self.phase = Phase::Triggering(environment.to_string());
    }

    pub fn trigger_accepted(&mut self, environment: &str) {
        self.phase = Phase::Polling(environment.to_string());
        if self.active_environment.as_deref() != Some(environment) {
            self.badge_url = None;
            self.badge_status = None;
        }
        self.active_environment = Some(environment.to_string());
    }

    pub fn trigger_failed(&mut self, environment: &str) {
        self.phase = Phase::Failed(environment.to_string());
    }

    /// Back to `Idle` from `Polling`, or from `Triggering` when the pending
    /// result is abandoned.
    pub fn stop_polling(&mut self) {
        if matches!(self.phase, Phase::Polling(_) | Phase::Triggering(_)) {
            self.phase = Phase::Idle;
        }
    }

    pub fn is_polling(&self) -> bool {
        matches!(self.phase, Phase::Polling(_))
    }

    pub fn is_triggering(&self) -> bool {
        matches!(self.phase, Phase::Triggering(_))
    }

    pub fn set_badge_url(&mut self, url: String) {
        self.badge_url = Some(url);
        self.last_refresh = Some(Instant::now());
    }

    pub fn set_badge_status(&mut self, status: Option<String>) {
        self.badge_status = status;
    }

    /// Seconds until the next badge refresh, when polling.
    pub fn next_refresh_in(&self) -> Option<u64> {
        if !self.is_polling() {
            return None;
        }
        let elapsed = self.last_refresh?.elapsed().as_secs();
        Some(self.config.poll_interval_secs.saturating_sub(elapsed))
    }

    // --- Notifications / errors ---

    pub fn add_notification(&mut self, level: NoticeLevel, message: String) {
        self.notifications.push(Notification {
            level,
            message,
            timestamp: Instant::now(),
        });
    }

    pub fn prune_notifications(&mut self) {
        let now = Instant::now();
        self.notifications
            .retain(|n| now.duration_since(n.timestamp).as_secs() < NOTIFICATION_TTL_SECS);
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAME_COUNT;
    }

    pub fn set_error(&mut self, msg: String) {
        self.error = Some((msg, Instant::now()));
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn prune_error(&mut self) {
        if let Some((_, ts)) = &self.error {
            if ts.elapsed().as_secs() >= ERROR_TTL_SECS {
                self.error = None;
            }
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|(msg, _)| msg.as_str())
    }
}
