//! Card-style chat replies

use serde::Serialize;

/// Accent color of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    /// Completed
    Green,
    /// Completed with warnings
    Yellow,
    /// Failed or refused
    Red,
}

impl std::fmt::Display for CardColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Green => write!(f, "green"),
            Self::Yellow => write!(f, "yellow"),
            Self::Red => write!(f, "red"),
        }
    }
}

/// A structured reply: optional pretext and body plus labelled fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Line shown above the card
    pub pretext: Option<String>,
    /// Main text
    pub body: Option<String>,
    /// Label/value pairs
    pub fields: Vec<(String, String)>,
    /// Accent color
    pub color: CardColor,
}

impl Card {
    /// An empty card of the given color
    pub const fn new(color: CardColor) -> Self {
        Self {
            pretext: None,
            body: None,
            fields: Vec::new(),
            color,
        }
    }

    /// Green card
    pub const fn success() -> Self {
        Self::new(CardColor::Green)
    }

    /// Red card
    pub const fn failure() -> Self {
        Self::new(CardColor::Red)
    }

    /// Set the pretext
    #[must_use]
    pub fn pretext(mut self, pretext: impl Into<String>) -> Self {
        self.pretext = Some(pretext.into());
        self
    }

    /// Set the body
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append a field
    #[must_use]
    pub fn field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((label.into(), value.into()));
        self
    }

    /// Change the color
    #[must_use]
    pub fn color(mut self, color: CardColor) -> Self {
        self.color = color;
        self
    }

    /// Look up a field value by label
    pub fn field_value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Plain-text rendering for line-oriented chat backends
    pub fn render(&self) -> String {
        let marker = match self.color {
            CardColor::Green => "[ok]",
            CardColor::Yellow => "[warn]",
            CardColor::Red => "[error]",
        };
        let mut lines = Vec::new();
        match (&self.pretext, &self.body) {
            (Some(pretext), Some(body)) => {
                lines.push(format!("{marker} {pretext}"));
                lines.push(body.clone());
            }
            (Some(text), None) | (None, Some(text)) => lines.push(format!("{marker} {text}")),
            (None, None) => lines.push(marker.to_string()),
        }
        lines.extend(
            self.fields
                .iter()
                .map(|(label, value)| format!("  {label}: {value}")),
        );
        lines.join("\n")
    }
}
