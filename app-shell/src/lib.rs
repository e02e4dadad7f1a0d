use serde::{Deserialize, Serialize};
use view_engine::Tone;

/// Colour model for the dashboard, extensible if needed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Palette {
    pub background: String,
    pub card: String,
    pub primary: String,
    pub accent: String,
    pub text: String,
    pub success: String,
    pub warning: String,
    pub danger: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            background: "#1a1a2e".into(),
            card: "#16213e".into(),
            primary: "#0f3460".into(),
            accent: "#e94560".into(),
            text: "#ffffff".into(),
            success: "#4ecca3".into(),
            warning: "#ffc107".into(),
            danger: "#ff6b6b".into(),
        }
    }

    pub fn color(&self, tone: Tone) -> &str {
        match tone {
            Tone::Neutral => &self.text,
            Tone::Accent => &self.accent,
            Tone::Success => &self.success,
            Tone::Warning => &self.warning,
            Tone::Danger => &self.danger,
        }
    }

    /// CSS custom properties consumed by the stylesheet.
    pub fn css_variables(&self) -> String {
        format!(
            ":root {{\n  --bg: {};\n  --card: {};\n  --primary: {};\n  --accent: {};\n  --text: {};\n  --success: {};\n  --warning: {};\n  --danger: {};\n}}\n",
            self.background,
            self.card,
            self.primary,
            self.accent,
            self.text,
            self.success,
            self.warning,
            self.danger
        )
    }
}

/// Stylesheet class carrying the colour of `tone`.
pub fn tone_class(tone: Tone) -> &'static str {
    match tone {
        Tone::Neutral => "tone-neutral",
        Tone::Accent => "tone-accent",
        Tone::Success => "tone-success",
        Tone::Warning => "tone-warning",
        Tone::Danger => "tone-danger",
    }
}

/// The one piece of page state: which subject is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorState {
    options: Vec<String>,
    selected: String,
}

impl SelectorState {
    /// Options are sorted and deduplicated; the first one starts selected.
    pub fn new(mut options: Vec<String>) -> Self {
        options.sort();
        options.dedup();
        let selected = options.first().cloned().unwrap_or_default();
        Self { options, selected }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Replace the selection wholesale; the last call wins.
    pub fn select(&mut self, subject: impl Into<String>) {
        self.selected = subject.into();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
