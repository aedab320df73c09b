//! Core traits that decouple padstat from any specific device utility,
//! bar, or transport mechanism.
//!
//! Every concrete backend (`xinput`, stdout, a Unix-socket listener, a test
//! harness, …) implements one of these traits.  The
//! [`TouchpadWidget`](crate::widget::TouchpadWidget) only depends on these
//! abstractions.

use crate::command::Command;
use crate::widget::WidgetError;
use std::io;
use std::sync::mpsc;

/// Abstraction over the external resource whose on/off state the widget
/// shows.
///
/// The default implementation drives `xinput`; tests use an in-memory fake.
/// Implementations are shared between the poll thread and the thread that
/// handles user commands, so every method takes `&self`.
pub trait DeviceBackend {
    /// The error type produced by this backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Find the identifier of the device to watch.
    ///
    /// Called at most once per widget, and only when no identifier was
    /// configured.  Must fail rather than guess when nothing matches.
    fn discover(&self) -> Result<String, Self::Error>;

    /// Read whether `device` is currently enabled.
    fn read_state(&self, device: &str) -> Result<bool, Self::Error>;

    /// Enable or disable `device`.
    ///
    /// No read-back is performed; the widget's forced refresh serves as
    /// confirmation.
    fn write_state(&self, device: &str, enabled: bool) -> Result<(), Self::Error>;
}

/// Where widget text ends up: the host's bar.
///
/// An `Err` return means the output is gone (the bar closed our pipe) and
/// the poll loop should stop.
pub trait Renderer {
    /// Show freshly polled text.
    fn render(&mut self, text: &str) -> io::Result<()>;

    /// Report a failed poll.
    ///
    /// The display need not blank; implementations typically keep the last
    /// good text and surface the error some other way.
    fn render_error(&mut self, err: &WidgetError) -> io::Result<()>;
}

/// A source of [`Command`]s.
///
/// Implementations listen on some transport — a Unix socket, stdin click
/// events, an in-memory channel, … — and forward parsed commands into the
/// provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    ///
    /// This method blocks the calling thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}
