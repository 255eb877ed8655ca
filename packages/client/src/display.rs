//! The display region the notifier writes into.

use std::io::Write;

use welcome_shared::time::{Clock, SystemClock, timestamp_to_rfc3339};

/// Text shown until the first welcome message arrives.
pub const PLACEHOLDER: &str = "Waiting for user...";

/// Name of the region the notifier owns.
pub const DEFAULT_REGION: &str = "welcome";

/// How message text is inserted into the paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkupPolicy {
    /// Insert the text as received; markup in it stays live.
    #[default]
    Verbatim,
    /// HTML-escape the text first so it always shows literally.
    Escaped,
}

/// A single paragraph container around a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The placeholder paragraph shown on page load
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render as `<p>…</p>` under the given policy
    pub fn render(&self, policy: MarkupPolicy) -> String {
        match policy {
            MarkupPolicy::Verbatim => format!("<p>{}</p>", self.text),
            MarkupPolicy::Escaped => {
                format!("<p>{}</p>", htmlescape::encode_minimal(&self.text))
            }
        }
    }
}

/// A named area whose content is replaced wholesale on every update.
pub trait DisplayRegion {
    /// Name the region is addressed by (e.g. `welcome`)
    fn name(&self) -> &str;

    /// Replace the whole content of the region
    fn replace(&mut self, content: String);
}

/// Region kept in memory; remembers only the current content.
#[derive(Debug, Clone)]
pub struct MemoryRegion {
    name: String,
    content: Option<String>,
    replacements: usize,
}

impl MemoryRegion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: None,
            replacements: 0,
        }
    }

    /// Current content, `None` if nothing was shown yet
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// How many times the content has been replaced
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl DisplayRegion for MemoryRegion {
    fn name(&self) -> &str {
        &self.name
    }

    fn replace(&mut self, content: String) {
        self.content = Some(content);
        self.replacements += 1;
    }
}

/// Region rendered as timestamped lines on stdout.
pub struct TerminalRegion {
    name: String,
    clock: Box<dyn Clock>,
}

impl TerminalRegion {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_clock(name, Box::new(SystemClock))
    }

    pub fn with_clock(name: impl Into<String>, clock: Box<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            clock,
        }
    }

    /// Format one display line: `[time] #region content`
    pub fn format_line(&self, content: &str) -> String {
        format!(
            "[{}] #{} {}",
            timestamp_to_rfc3339(self.clock.now_millis()),
            self.name,
            content
        )
    }
}

impl DisplayRegion for TerminalRegion {
    fn name(&self) -> &str {
        &self.name
    }

    fn replace(&mut self, content: String) {
        let line = self.format_line(&content);
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", line).and_then(|_| stdout.flush()) {
            tracing::warn!("Failed to write to region '{}': {}", self.name, e);
        }
    }
}
