//! Label surfaces that show a machine's remaining time

use std::io::Write;

/// Sink for the text of a machine's time label
pub trait DisplaySurface: Send {
    fn show(&mut self, text: &str);
}

/// Prints a machine's label to stdout whenever its text changes
#[derive(Debug)]
pub struct TerminalLabel {
    name: &'static str,
    last_shown: Option<String>,
}

impl TerminalLabel {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            last_shown: None,
        }
    }

    /// Text currently on the label
    pub fn text(&self) -> Option<&str> {
        self.last_shown.as_deref()
    }
}

impl DisplaySurface for TerminalLabel {
    fn show(&mut self, text: &str) {
        // Ticks arrive five times a second; only print when the label changes
        if self.last_shown.as_deref() == Some(text) {
            return;
        }

        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{:>7}  {}", self.name, text) {
            tracing::debug!("Failed to write {} label: {}", self.name, e);
        }
        self.last_shown = Some(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_label_remembers_last_text() {
        let mut label = TerminalLabel::new("washer");
        assert_eq!(label.text(), None);

        label.show("45:00");
        label.show("45:00");
        assert_eq!(label.text(), Some("45:00"));

        label.show("44:59");
        assert_eq!(label.text(), Some("44:59"));
    }
}
