//! HUD state: the pending notification, interaction prompt, open panel and refresh flag.
//!
//! Nothing here draws. The frame loop reads the HUD after each update and
//! mirrors it into the window title.

/// Prompt shown when nothing more specific is configured.
pub const DEFAULT_PROMPT: &str = "Press [E] to interact";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    pub tone: Tone,
    pub time_remaining: f32,
}

/// Modal panels. At most one is open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Closed,
    Dialogue { speaker: String, text: String },
    Document { title: String, body: String },
    Market,
    Inventory,
    Help,
}

/// One on-screen interaction prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractPrompt {
    pub text: String,
}

#[derive(Debug)]
pub struct Hud {
    notification: Option<Notification>,
    prompt: Option<InteractPrompt>,
    panel: Panel,
    default_duration: f32,
    dirty: bool,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl Hud {
    pub fn new(default_duration: f32) -> Self {
        Self {
            notification: None,
            prompt: None,
            panel: Panel::Closed,
            default_duration,
            dirty: true,
        }
    }

    /// Show `text` for `duration` seconds, replacing whatever is pending.
    pub fn notify_for(&mut self, text: impl Into<String>, tone: Tone, duration: f32) {
        let text = text.into();
        match tone {
            Tone::Warning => log::warn!("[notice] {}", text),
            Tone::Info | Tone::Success => log::info!("[notice] {}", text),
        }
        self.notification = Some(Notification {
            text,
            tone,
            time_remaining: duration,
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.notify_for(text, Tone::Info, self.default_duration);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.notify_for(text, Tone::Success, self.default_duration);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.notify_for(text, Tone::Warning, self.default_duration);
    }

    /// Tick the dismissal timer.
    pub fn update(&mut self, dt: f32) {
        if let Some(n) = &mut self.notification {
            n.time_remaining -= dt;
            if n.time_remaining <= 0.0 {
                self.notification = None;
            }
        }
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn show_prompt(&mut self, text: Option<&str>) {
        self.prompt = Some(InteractPrompt {
            text: text.unwrap_or(DEFAULT_PROMPT).to_string(),
        });
    }

    pub fn hide_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn prompt(&self) -> Option<&InteractPrompt> {
        self.prompt.as_ref()
    }

    pub fn open(&mut self, panel: Panel) {
        self.panel = panel;
    }

    pub fn close_panel(&mut self) {
        self.panel = Panel::Closed;
    }

    /// Open `panel`, or close it when it is already the open one.
    pub fn toggle(&mut self, panel: Panel) {
        if self.panel == panel {
            self.panel = Panel::Closed;
        } else {
            self.panel = panel;
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn is_market_open(&self) -> bool {
        self.panel == Panel::Market
    }

    /// Ask for the resource/mission readout to be rebuilt.
    pub fn request_refresh(&mut self) {
        self.dirty = true;
    }

    /// Returns true once per batch of refresh requests.
    pub fn take_refresh(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_notification_replaces_pending_one() {
        let mut hud = Hud::new(3.0);
        hud.info("first");
        hud.update(2.5);
        hud.warning("second");
        hud.update(1.0);
        let n = hud.notification().unwrap();
        assert_eq!(n.text, "second");
        assert_eq!(n.tone, Tone::Warning);
        assert!((n.time_remaining - 3.0).abs() < 1e-6);
    }

    #[test]
    fn notification_dismisses_on_timer() {
        let mut hud = Hud::new(3.0);
        hud.notify_for("short", Tone::Info, 0.5);
        hud.update(0.3);
        assert!(hud.notification().is_some());
        hud.update(0.3);
        assert!(hud.notification().is_none());
    }

    #[test]
    fn prompt_falls_back_to_default_text() {
        let mut hud = Hud::default();
        hud.show_prompt(None);
        assert_eq!(hud.prompt().unwrap().text, DEFAULT_PROMPT);
        hud.show_prompt(Some("Talk to Otto"));
        assert_eq!(hud.prompt().unwrap().text, "Talk to Otto");
        hud.hide_prompt();
        assert!(hud.prompt().is_none());
    }

    #[test]
    fn toggling_a_panel_twice_closes_it() {
        let mut hud = Hud::default();
        hud.toggle(Panel::Inventory);
        assert_eq!(hud.panel(), &Panel::Inventory);
        hud.toggle(Panel::Help);
        assert_eq!(hud.panel(), &Panel::Help);
        hud.toggle(Panel::Help);
        assert_eq!(hud.panel(), &Panel::Closed);
    }

    #[test]
    fn refresh_requests_collapse() {
        let mut hud = Hud::default();
        assert!(hud.take_refresh());
        hud.request_refresh();
        hud.request_refresh();
        assert!(hud.take_refresh());
        assert!(!hud.take_refresh());
    }
}
