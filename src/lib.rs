//! **padstat** — a touchpad status widget for tiling window manager bars.
//!
//! The widget shows whether the touchpad is enabled and flips it on a
//! click or a key binding.  It is a plugin for a host: the window manager
//! or bar owns rendering, key grabbing and the event loop; padstat only
//! reads and writes the touchpad state and produces a short text label.
//!
//! # Architecture
//!
//! The crate is organised around three traits:
//!
//! * [`traits::DeviceBackend`] — discovers the device and reads / writes its
//!   on/off state, so the widget is not coupled to any control utility.
//! * [`traits::Renderer`] — where the text goes (stdout lines for a bar).
//! * [`traits::CommandSource`] — abstracts the transport that delivers
//!   user intent (toggle, refresh, clicks).
//!
//! [`widget::TouchpadWidget`] holds the logic; [`poller::PollLoop`] refreshes
//! it on a timer and on demand.  Concrete implementations live in
//! [`xinput`] (the default backend), [`output`] (line renderer) and [`ipc`]
//! (Unix-socket commands).

pub mod command;
pub mod config;
pub mod format;
pub mod ipc;
pub mod output;
pub mod poller;
pub mod traits;
pub mod widget;
pub mod xinput;
