//! Commands and types used throughout padstat.
//!
//! This module defines the vocabulary that the host and the widget share:
//! [`Command`] describes every action the widget can perform, and
//! [`MouseButton`] / [`Callbacks`] describe how bar clicks are routed to
//! those actions.
//!
//! Bars and key-bind helpers forward raw button names; the daemon parses
//! them leniently (e.g. "Button1", "1", "left").

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A pointer button as reported by the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Button1,
    Button2,
    Button3,
    Button4,
    Button5,
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MouseButton::Button1 => write!(f, "Button1"),
            MouseButton::Button2 => write!(f, "Button2"),
            MouseButton::Button3 => write!(f, "Button3"),
            MouseButton::Button4 => write!(f, "Button4"),
            MouseButton::Button5 => write!(f, "Button5"),
        }
    }
}

/// Parse a button name (case-insensitive; accepts "Button1", "1", "left",
/// "scroll-up", etc.).
pub fn parse_button(s: &str) -> Option<MouseButton> {
    let normalized: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect();
    match normalized.as_str() {
        "button1" | "1" | "left" => Some(MouseButton::Button1),
        "button2" | "2" | "middle" => Some(MouseButton::Button2),
        "button3" | "3" | "right" => Some(MouseButton::Button3),
        "button4" | "4" | "scrollup" => Some(MouseButton::Button4),
        "button5" | "5" | "scrolldown" => Some(MouseButton::Button5),
        _ => None,
    }
}

impl Serialize for MouseButton {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MouseButton {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = MouseButton;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "button name or number")
            }
            fn visit_u64<E>(self, n: u64) -> Result<MouseButton, E>
            where
                E: DeError,
            {
                parse_button(&n.to_string())
                    .ok_or_else(|| DeError::custom(format!("invalid button: {}", n)))
            }
            fn visit_str<E>(self, s: &str) -> Result<MouseButton, E>
            where
                E: DeError,
            {
                parse_button(s).ok_or_else(|| DeError::custom(format!("invalid button: {:?}", s)))
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Every action the widget can perform.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and consumed by
/// [`TouchpadWidget::handle`](crate::widget::TouchpadWidget::handle).
///
/// On the wire: `"Toggle"`, `"Refresh"`, `{"Click":"Button1"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Flip the touchpad state and refresh the display immediately.
    Toggle,

    /// Re-read the state without changing it.
    Refresh,

    /// A click on the widget, routed through the [`Callbacks`] table.
    Click(MouseButton),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Toggle => write!(f, "toggle"),
            Command::Refresh => write!(f, "refresh"),
            Command::Click(b) => write!(f, "click {}", b),
        }
    }
}

/// Click subscriptions: which [`Command`] a button press on the widget runs.
///
/// Built once from configuration and handed to the widget; it is never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Callbacks {
    inner: HashMap<MouseButton, Command>,
}

impl Callbacks {
    /// Create a table from `(button, command)` pairs.
    pub fn new(pairs: impl IntoIterator<Item = (MouseButton, Command)>) -> Self {
        Self {
            inner: pairs.into_iter().collect(),
        }
    }

    /// An empty table: clicks do nothing.
    pub fn none() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Look up the command bound to `button`.
    ///
    /// A binding that is itself a click would recurse, so it resolves to
    /// nothing.
    pub fn get(&self, button: MouseButton) -> Option<Command> {
        match self.inner.get(&button).copied() {
            Some(Command::Click(_)) => None,
            other => other,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for Callbacks {
    /// Left click toggles.
    fn default() -> Self {
        Self::new([(MouseButton::Button1, Command::Toggle)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_display() {
        assert_eq!(MouseButton::Button1.to_string(), "Button1");
        assert_eq!(MouseButton::Button5.to_string(), "Button5");
    }

    #[test]
    fn parse_button_aliases() {
        assert_eq!(parse_button("Button1"), Some(MouseButton::Button1));
        assert_eq!(parse_button("button3"), Some(MouseButton::Button3));
        assert_eq!(parse_button(" 2 "), Some(MouseButton::Button2));
        assert_eq!(parse_button("LEFT"), Some(MouseButton::Button1));
        assert_eq!(parse_button("scroll-up"), Some(MouseButton::Button4));
        assert_eq!(parse_button("scroll_down"), Some(MouseButton::Button5));
        assert_eq!(parse_button("button9"), None);
        assert_eq!(parse_button(""), None);
    }

    #[test]
    fn command_wire_format() {
        let toggle: Command = serde_json::from_str(r#""Toggle""#).unwrap();
        assert_eq!(toggle, Command::Toggle);
        let refresh: Command = serde_json::from_str(r#""Refresh""#).unwrap();
        assert_eq!(refresh, Command::Refresh);
        let click: Command = serde_json::from_str(r#"{"Click":"left"}"#).unwrap();
        assert_eq!(click, Command::Click(MouseButton::Button1));
        let click_num: Command = serde_json::from_str(r#"{"Click":3}"#).unwrap();
        assert_eq!(click_num, Command::Click(MouseButton::Button3));
    }

    #[test]
    fn command_serializes_canonical_names() {
        assert_eq!(serde_json::to_string(&Command::Toggle).unwrap(), r#""Toggle""#);
        assert_eq!(
            serde_json::to_string(&Command::Click(MouseButton::Button2)).unwrap(),
            r#"{"Click":"Button2"}"#
        );
    }

    #[test]
    fn invalid_button_rejected() {
        assert!(serde_json::from_str::<Command>(r#"{"Click":"Button7"}"#).is_err());
    }

    #[test]
    fn default_callbacks_bind_left_click_to_toggle() {
        let cb = Callbacks::default();
        assert_eq!(cb.get(MouseButton::Button1), Some(Command::Toggle));
        assert_eq!(cb.get(MouseButton::Button3), None);
        assert_eq!(cb.len(), 1);
    }

    #[test]
    fn callbacks_from_json() {
        let cb: Callbacks =
            serde_json::from_str(r#"{ "Button3": "Toggle", "middle": "Refresh" }"#).unwrap();
        assert_eq!(cb.get(MouseButton::Button3), Some(Command::Toggle));
        assert_eq!(cb.get(MouseButton::Button2), Some(Command::Refresh));
        assert_eq!(cb.get(MouseButton::Button1), None);
    }

    #[test]
    fn click_bound_to_click_resolves_to_nothing() {
        let cb = Callbacks::new([(
            MouseButton::Button1,
            Command::Click(MouseButton::Button1),
        )]);
        assert_eq!(cb.get(MouseButton::Button1), None);
    }

    #[test]
    fn empty_callbacks() {
        let cb = Callbacks::none();
        assert!(cb.is_empty());
        assert_eq!(cb.get(MouseButton::Button1), None);
    }
}
