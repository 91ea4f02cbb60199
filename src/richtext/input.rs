// Input Events
// Critical inputs are the ones whose default host handling would
// desynchronize the model from the visible content

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Critical input identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Input {
    Enter,
    Backspace,
    Delete,
    Paste,
    Keypress,
}

impl Input {
    pub fn name(&self) -> &'static str {
        match self {
            Input::Enter => "Enter",
            Input::Backspace => "Backspace",
            Input::Delete => "Delete",
            Input::Paste => "Paste",
            Input::Keypress => "Keypress",
        }
    }

    /// Map a physical key code onto a critical input
    pub fn from_key_code(code: &str) -> Option<Input> {
        match code {
            "Enter" => Some(Input::Enter),
            "Backspace" => Some(Input::Backspace),
            "Delete" => Some(Input::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Input {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paste" => Ok(Input::Paste),
            "Keypress" => Ok(Input::Keypress),
            other => Input::from_key_code(other).ok_or_else(|| format!("unknown input '{}'", other)),
        }
    }
}

/// A raw event delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A non-printing key, named by its key code
    Key { code: String },
    /// A printable character
    Keypress { ch: char },
    /// Plain-text clipboard content
    Paste { text: String },
}

impl InputEvent {
    pub fn key(code: impl Into<String>) -> Self {
        InputEvent::Key { code: code.into() }
    }

    pub fn keypress(ch: char) -> Self {
        InputEvent::Keypress { ch }
    }

    pub fn paste(text: impl Into<String>) -> Self {
        InputEvent::Paste { text: text.into() }
    }

    /// Resolve the critical input for this event, honoring key aliases
    pub fn input(&self, aliases: &HashMap<String, Input>) -> Option<Input> {
        match self {
            InputEvent::Key { code } => aliases
                .get(code)
                .copied()
                .or_else(|| Input::from_key_code(code)),
            InputEvent::Keypress { .. } => Some(Input::Keypress),
            InputEvent::Paste { .. } => Some(Input::Paste),
        }
    }

    /// Text carried by the event, if any
    pub fn text(&self) -> Option<String> {
        match self {
            InputEvent::Key { .. } => None,
            InputEvent::Keypress { ch } => Some(ch.to_string()),
            InputEvent::Paste { text } => Some(text.clone()),
        }
    }
}

/// Lookup key for behavior tables. Range-bearing invocations are keyed
/// separately from caret-only ones ("Selection+Backspace" vs "Backspace").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerKey {
    pub input: Input,
    pub selection: bool,
}

impl HandlerKey {
    pub fn new(input: Input, selection: bool) -> Self {
        HandlerKey { input, selection }
    }

    pub fn caret(input: Input) -> Self {
        Self::new(input, false)
    }

    pub fn selection(input: Input) -> Self {
        Self::new(input, true)
    }
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.selection {
            write!(f, "Selection+{}", self.input)
        } else {
            write!(f, "{}", self.input)
        }
    }
}
