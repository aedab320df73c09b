//! The refresh loop that drives a widget on behalf of the host.
//!
//! The widget never owns a thread.  [`PollLoop::run`] polls it once up
//! front, then again every time the interval elapses *or* a
//! [`Refresher`] asks for an out-of-band refresh (which is what
//! [`TouchpadWidget::toggle`](crate::widget::TouchpadWidget::toggle) does).
//! Each refresh request produces exactly one fresh poll.

use crate::traits::{DeviceBackend, Renderer};
use crate::widget::TouchpadWidget;
use log::{debug, error};
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

/// Cloneable handle that requests an immediate refresh.
#[derive(Debug, Clone)]
pub struct Refresher {
    tx: mpsc::Sender<()>,
}

impl Refresher {
    pub fn new(tx: mpsc::Sender<()>) -> Self {
        Self { tx }
    }

    /// Enqueue one refresh.  A no-op once the loop is gone.
    pub fn request(&self) {
        if self.tx.send(()).is_err() {
            debug!("refresh requested but the poll loop has stopped");
        }
    }
}

/// What the host hands to a widget in
/// [`configure`](crate::widget::TouchpadWidget::configure).
#[derive(Debug, Clone, Default)]
pub struct HostContext {
    pub refresher: Option<Refresher>,
}

impl HostContext {
    pub fn new(refresher: Refresher) -> Self {
        Self {
            refresher: Some(refresher),
        }
    }
}

/// Timer plus refresh queue for one widget.
pub struct PollLoop {
    tx: mpsc::Sender<()>,
    rx: mpsc::Receiver<()>,
    interval: Duration,
}

impl PollLoop {
    pub fn new(interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx, interval }
    }

    /// A context wired to this loop's refresh queue.
    pub fn context(&self) -> HostContext {
        HostContext::new(Refresher::new(self.tx.clone()))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll `widget` once and hand the result to `renderer`.
    pub fn tick<B, R>(widget: &TouchpadWidget<B>, renderer: &mut R) -> io::Result<()>
    where
        B: DeviceBackend,
        R: Renderer + ?Sized,
    {
        match widget.poll() {
            Ok(text) => renderer.render(&text),
            Err(e) => {
                error!("poll failed: {}", e);
                renderer.render_error(&e)
            }
        }
    }

    /// Run until `renderer` reports that its output is gone.
    ///
    /// This method blocks the calling thread.  Pending refresh requests are
    /// served one poll each, in order; timer ticks only happen when the
    /// queue is idle for a whole interval.
    pub fn run<B, R>(self, widget: &TouchpadWidget<B>, renderer: &mut R) -> io::Result<()>
    where
        B: DeviceBackend,
        R: Renderer + ?Sized,
    {
        loop {
            Self::tick(widget, renderer)?;
            match self.rx.recv_timeout(self.interval) {
                Ok(()) => debug!("forced refresh"),
                Err(RecvTimeoutError::Timeout) => {}
                // We hold a sender ourselves, so this only happens if the
                // channel is torn down from under us.  Fall back to the timer.
                Err(RecvTimeoutError::Disconnected) => std::thread::sleep(self.interval),
            }
        }
    }
}
