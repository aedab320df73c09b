//! `xinput`-specific implementations.
//!
//! This module provides the default
//! [`DeviceBackend`](crate::traits::DeviceBackend), powered by the `xinput`
//! command-line utility (X11 only).
//!
//! Nothing outside this module should reference `xinput` directly.

pub mod backend;
