//! Line-oriented [`Renderer`] for bars that read a child process's stdout
//! (polybar `tail`, lemonbar, waybar `custom` modules, i3blocks
//! persistent blocks, …).
//!
//! Two output modes:
//!
//! * [`OutputMode::Plain`] — one line of text per refresh.  A failed poll
//!   re-prints the last good text; the error only goes to the log.
//! * [`OutputMode::Json`] — one waybar-style JSON object per line:
//!   `{"text":"[on]"}`, or on failure
//!   `{"text":"<last good text>","tooltip":"<error>","class":"error"}`.

use crate::traits::Renderer;
use crate::widget::WidgetError;
use serde::Serialize;
use std::io::{self, Write};

/// How each refresh is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Plain,
    Json,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tooltip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    class: Option<&'static str>,
}

/// Writes one line per refresh to `out`, flushing after each line so the
/// bar sees it immediately.
pub struct LineRenderer<W: Write> {
    out: W,
    mode: OutputMode,
    last_text: String,
}

impl<W: Write> LineRenderer<W> {
    pub fn new(out: W, mode: OutputMode) -> Self {
        Self {
            out,
            mode,
            last_text: String::new(),
        }
    }

    /// The last successfully rendered text (empty before the first success).
    pub fn last_text(&self) -> &str {
        &self.last_text
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }

    fn json(&mut self, tooltip: Option<String>, class: Option<&'static str>) -> io::Result<()> {
        let line = serde_json::to_string(&JsonLine {
            text: &self.last_text,
            tooltip,
            class,
        })
        .map_err(io::Error::other)?;
        self.write_line(&line)
    }
}

impl<W: Write> Renderer for LineRenderer<W> {
    fn render(&mut self, text: &str) -> io::Result<()> {
        // Bars treat a newline as the end of an update.
        self.last_text = text.replace('\n', " ");
        match self.mode {
            OutputMode::Plain => {
                let line = self.last_text.clone();
                self.write_line(&line)
            }
            OutputMode::Json => self.json(None, None),
        }
    }

    fn render_error(&mut self, err: &WidgetError) -> io::Result<()> {
        match self.mode {
            OutputMode::Plain => {
                let line = self.last_text.clone();
                self.write_line(&line)
            }
            OutputMode::Json => self.json(Some(err.to_string()), Some("error")),
        }
    }
}
