//! The touchpad status widget.
//!
//! [`TouchpadWidget`] owns no thread and caches no state: every
//! [`poll`](TouchpadWidget::poll) is a fresh read from its
//! [`DeviceBackend`], and every [`toggle`](TouchpadWidget::toggle) is a
//! read, a negated write, and one forced refresh through the host's
//! [`Refresher`](crate::poller::Refresher).

use crate::command::Command;
use crate::config::WidgetConfig;
use crate::poller::{HostContext, Refresher};
use crate::traits::DeviceBackend;
use log::{debug, info};
use std::sync::OnceLock;
use std::time::Duration;

/// Possible errors from the widget.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// The device could not be resolved.  Fatal: the host should not keep
    /// running with a guessed device.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// `poll` or `toggle` was called before `configure`.
    #[error("widget used before configure()")]
    NotConfigured,

    /// Reading the state failed.
    #[error("failed to read touchpad state: {0}")]
    StateRead(String),

    /// Writing the state failed.
    #[error("failed to set touchpad state: {0}")]
    StateWrite(String),
}

/// A status widget that shows whether a touchpad is enabled.
///
/// The widget is generic over any [`DeviceBackend`], so the same logic
/// runs against `xinput` in production and an in-memory fake in tests.
/// It is [`Sync`] whenever the backend is, which lets the host poll from a
/// worker thread while toggling from the thread handling user input.
///
/// # Typical usage
///
/// ```ignore
/// let widget = TouchpadWidget::new(XinputBackend::default(), WidgetConfig::default());
/// let poll_loop = PollLoop::new(widget.update_interval());
/// widget.configure(poll_loop.context())?;
/// poll_loop.run(&widget, &mut renderer)?;
/// ```
pub struct TouchpadWidget<B: DeviceBackend> {
    backend: B,
    config: WidgetConfig,
    device: OnceLock<String>,
    refresher: OnceLock<Refresher>,
}

impl<B: DeviceBackend> TouchpadWidget<B> {
    /// Create a widget.  A `device_id` in `config` is taken as already
    /// resolved; otherwise it is discovered in [`configure`](Self::configure).
    pub fn new(backend: B, config: WidgetConfig) -> Self {
        let device = OnceLock::new();
        if let Some(id) = &config.device_id {
            let _ = device.set(id.clone());
        }
        Self {
            backend,
            config,
            device,
            refresher: OnceLock::new(),
        }
    }

    /// Attach the widget to its host and resolve the device.
    ///
    /// Called once by the host after construction.  A second call keeps
    /// the device and refresher from the first one.
    pub fn configure(&self, ctx: HostContext) -> Result<(), WidgetError> {
        if let Some(refresher) = ctx.refresher {
            if self.refresher.set(refresher).is_err() {
                debug!("already attached to a host, keeping the first refresher");
            }
        }

        if let Some(device) = self.device.get() {
            debug!("using touchpad {:?}", device);
            return Ok(());
        }

        let discovered = self
            .backend
            .discover()
            .map_err(|e| WidgetError::Configuration(e.to_string()))?;
        if discovered.trim().is_empty() {
            return Err(WidgetError::Configuration(
                "device discovery returned an empty name".into(),
            ));
        }
        info!("discovered touchpad {:?}", discovered);
        // A concurrent configure may have won the race; either value came
        // from the same discovery, and the first one set stays.
        let _ = self.device.set(discovered);
        Ok(())
    }

    /// The resolved device identifier, if [`configure`](Self::configure)
    /// has run (or one was configured statically).
    pub fn device_id(&self) -> Option<&str> {
        self.device.get().map(String::as_str)
    }

    fn device(&self) -> Result<&str, WidgetError> {
        self.device_id().ok_or(WidgetError::NotConfigured)
    }

    /// Seconds between timer-driven polls, as a [`Duration`].
    pub fn update_interval(&self) -> Duration {
        self.config.interval()
    }

    /// The backend this widget reads and writes through.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Text for a given state.  Pure: depends only on `enabled` and the
    /// configuration.
    pub fn text_for(&self, enabled: bool) -> String {
        let state = if enabled {
            &self.config.enabled_char
        } else {
            &self.config.disabled_char
        };
        self.config.format.render(state)
    }

    fn read(&self, device: &str) -> Result<bool, WidgetError> {
        self.backend
            .read_state(device)
            .map_err(|e| WidgetError::StateRead(format!("{}: {}", device, e)))
    }

    /// Read the current state and format it.
    ///
    /// Read-only with respect to the widget; safe to call from any thread.
    pub fn poll(&self) -> Result<String, WidgetError> {
        let device = self.device()?;
        let enabled = self.read(device)?;
        Ok(self.text_for(enabled))
    }

    /// Flip the touchpad and refresh the display immediately.
    ///
    /// Exactly one write is issued, with the negation of the state read just
    /// before it.  The forced refresh is requested even if the write fails,
    /// so the display shows the real (unchanged) state.
    pub fn toggle(&self) -> Result<(), WidgetError> {
        let device = self.device()?;
        let enabled = !self.read(device)?;
        info!(
            "{} touchpad {:?}",
            if enabled { "enabling" } else { "disabling" },
            device
        );
        let written = self
            .backend
            .write_state(device, enabled)
            .map_err(|e| WidgetError::StateWrite(format!("{}: {}", device, e)));
        self.force_update();
        written
    }

    /// Ask the host for an out-of-band refresh.
    pub fn force_update(&self) {
        match self.refresher.get() {
            Some(r) => r.request(),
            None => debug!("no host attached, skipping refresh"),
        }
    }

    /// Process a single [`Command`].
    pub fn handle(&self, cmd: Command) -> Result<(), WidgetError> {
        match cmd {
            Command::Toggle => self.toggle(),
            Command::Refresh => {
                self.force_update();
                Ok(())
            }
            Command::Click(button) => match self.config.callbacks.get(button) {
                Some(bound) => {
                    debug!("{} -> {}", button, bound);
                    self.handle(bound)
                }
                None => {
                    debug!("no callback bound to {}", button);
                    Ok(())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Callbacks, MouseButton};
    use crate::format::Template;
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};

    /// Record-keeping fake touchpad.
    #[derive(Debug)]
    struct RecorderPad {
        name: Option<String>,
        enabled: Mutex<bool>,
        reads: Mutex<Vec<String>>,
        writes: Mutex<Vec<(String, bool)>>,
        fail_read: bool,
        fail_write: bool,
    }

    impl RecorderPad {
        fn new(enabled: bool) -> Self {
            Self {
                name: Some("Foo Touchpad".into()),
                enabled: Mutex::new(enabled),
                reads: Mutex::new(Vec::new()),
                writes: Mutex::new(Vec::new()),
                fail_read: false,
                fail_write: false,
            }
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("recorder error: {0}")]
    struct RecorderErr(&'static str);

    impl DeviceBackend for RecorderPad {
        type Error = RecorderErr;

        fn discover(&self) -> Result<String, RecorderErr> {
            self.name.clone().ok_or(RecorderErr("no touchpad"))
        }

        fn read_state(&self, device: &str) -> Result<bool, RecorderErr> {
            self.reads.lock().unwrap().push(device.into());
            if self.fail_read {
                return Err(RecorderErr("read"));
            }
            Ok(*self.enabled.lock().unwrap())
        }

        fn write_state(&self, device: &str, enabled: bool) -> Result<(), RecorderErr> {
            self.writes.lock().unwrap().push((device.into(), enabled));
            if self.fail_write {
                return Err(RecorderErr("write"));
            }
            *self.enabled.lock().unwrap() = enabled;
            Ok(())
        }
    }

    fn on_off_config() -> WidgetConfig {
        WidgetConfig {
            format: Template::parse("{state}").unwrap(),
            enabled_char: "[on]".into(),
            disabled_char: "[off]".into(),
            ..Default::default()
        }
    }

    fn attached(pad: RecorderPad) -> (TouchpadWidget<RecorderPad>, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel();
        let w = TouchpadWidget::new(pad, on_off_config());
        w.configure(HostContext::new(Refresher::new(tx))).unwrap();
        (w, rx)
    }

    #[test]
    fn configure_discovers_device() {
        let w = TouchpadWidget::new(RecorderPad::new(true), on_off_config());
        assert_eq!(w.device_id(), None);
        w.configure(HostContext::default()).unwrap();
        assert_eq!(w.device_id(), Some("Foo Touchpad"));
    }

    #[test]
    fn configure_without_match_fails() {
        let mut pad = RecorderPad::new(true);
        pad.name = None;
        let w = TouchpadWidget::new(pad, on_off_config());
        let err = w.configure(HostContext::default()).unwrap_err();
        assert!(matches!(err, WidgetError::Configuration(_)));
        assert_eq!(w.device_id(), None);
        assert!(matches!(w.poll(), Err(WidgetError::NotConfigured)));
    }

    #[test]
    fn configure_rejects_empty_discovery() {
        let mut pad = RecorderPad::new(true);
        pad.name = Some("  ".into());
        let w = TouchpadWidget::new(pad, on_off_config());
        assert!(matches!(
            w.configure(HostContext::default()),
            Err(WidgetError::Configuration(_))
        ));
    }

    #[test]
    fn static_device_id_skips_discovery() {
        let mut pad = RecorderPad::new(true);
        pad.name = None;
        let cfg = WidgetConfig {
            device_id: Some("Static Pad".into()),
            ..on_off_config()
        };
        let w = TouchpadWidget::new(pad, cfg);
        w.configure(HostContext::default()).unwrap();
        assert_eq!(w.device_id(), Some("Static Pad"));
        w.poll().unwrap();
        assert_eq!(w.backend().reads.lock().unwrap().as_slice(), &["Static Pad".to_string()]);
    }

    #[test]
    fn resolved_device_survives_reconfigure() {
        let w = TouchpadWidget::new(RecorderPad::new(true), on_off_config());
        w.configure(HostContext::default()).unwrap();
        w.configure(HostContext::default()).unwrap();
        assert_eq!(w.device_id(), Some("Foo Touchpad"));
    }

    #[test]
    fn poll_is_deterministic() {
        let (w, _rx) = attached(RecorderPad::new(true));
        assert_eq!(w.poll().unwrap(), "[on]");
        assert_eq!(w.poll().unwrap(), "[on]");
        assert!(w.backend().writes.lock().unwrap().is_empty());
    }

    #[test]
    fn poll_uses_format_template() {
        let cfg = WidgetConfig {
            format: Template::parse("TP {state}").unwrap(),
            ..on_off_config()
        };
        let w = TouchpadWidget::new(RecorderPad::new(false), cfg);
        w.configure(HostContext::default()).unwrap();
        assert_eq!(w.poll().unwrap(), "TP [off]");
    }

    #[test]
    fn poll_before_configure_fails() {
        let w = TouchpadWidget::new(RecorderPad::new(true), on_off_config());
        assert!(matches!(w.poll(), Err(WidgetError::NotConfigured)));
        assert!(matches!(w.toggle(), Err(WidgetError::NotConfigured)));
    }

    #[test]
    fn poll_read_failure_propagates() {
        let mut pad = RecorderPad::new(true);
        pad.fail_read = true;
        let (w, _rx) = attached(pad);
        match w.poll() {
            Err(WidgetError::StateRead(msg)) => assert!(msg.contains("Foo Touchpad")),
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn toggle_writes_negation_once_and_refreshes_once() {
        let (w, rx) = attached(RecorderPad::new(false));
        assert_eq!(w.poll().unwrap(), "[off]");

        w.toggle().unwrap();
        assert_eq!(
            w.backend().writes.lock().unwrap().as_slice(),
            &[("Foo Touchpad".to_string(), true)]
        );
        assert_eq!(rx.try_iter().count(), 1);
        assert_eq!(w.poll().unwrap(), "[on]");
    }

    #[test]
    fn toggle_twice_restores_state() {
        let (w, rx) = attached(RecorderPad::new(true));
        w.toggle().unwrap();
        w.toggle().unwrap();
        assert_eq!(
            w.backend().writes.lock().unwrap().as_slice(),
            &[
                ("Foo Touchpad".to_string(), false),
                ("Foo Touchpad".to_string(), true)
            ]
        );
        assert_eq!(rx.try_iter().count(), 2);
        assert_eq!(w.poll().unwrap(), "[on]");
    }

    #[test]
    fn failed_write_still_refreshes() {
        let mut pad = RecorderPad::new(false);
        pad.fail_write = true;
        let (w, rx) = attached(pad);
        assert!(matches!(w.toggle(), Err(WidgetError::StateWrite(_))));
        assert_eq!(rx.try_iter().count(), 1);
        // The refresh shows the unchanged state.
        assert_eq!(w.poll().unwrap(), "[off]");
    }

    #[test]
    fn failed_read_skips_write_and_refresh() {
        let mut pad = RecorderPad::new(false);
        pad.fail_read = true;
        let (w, rx) = attached(pad);
        assert!(matches!(w.toggle(), Err(WidgetError::StateRead(_))));
        assert!(w.backend().writes.lock().unwrap().is_empty());
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn toggle_without_host_still_writes() {
        let w = TouchpadWidget::new(RecorderPad::new(true), on_off_config());
        w.configure(HostContext::default()).unwrap();
        w.toggle().unwrap();
        assert_eq!(w.poll().unwrap(), "[off]");
    }

    #[test]
    fn click_routes_through_callbacks() {
        let (w, rx) = attached(RecorderPad::new(true));
        w.handle(Command::Click(MouseButton::Button1)).unwrap();
        assert_eq!(w.backend().writes.lock().unwrap().len(), 1);
        assert_eq!(rx.try_iter().count(), 1);

        // Button3 is unbound by default.
        w.handle(Command::Click(MouseButton::Button3)).unwrap();
        assert_eq!(w.backend().writes.lock().unwrap().len(), 1);
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn custom_callbacks_table() {
        let (tx, rx) = mpsc::channel();
        let cfg = WidgetConfig {
            callbacks: Callbacks::new([(MouseButton::Button3, Command::Refresh)]),
            ..on_off_config()
        };
        let w = TouchpadWidget::new(RecorderPad::new(true), cfg);
        w.configure(HostContext::new(Refresher::new(tx))).unwrap();

        w.handle(Command::Click(MouseButton::Button1)).unwrap();
        assert_eq!(rx.try_iter().count(), 0);
        w.handle(Command::Click(MouseButton::Button3)).unwrap();
        assert_eq!(rx.try_iter().count(), 1);
        assert!(w.backend().writes.lock().unwrap().is_empty());
    }

    #[test]
    fn refresh_command_does_not_touch_backend() {
        let (w, rx) = attached(RecorderPad::new(true));
        w.handle(Command::Refresh).unwrap();
        assert_eq!(rx.try_iter().count(), 1);
        assert!(w.backend().reads.lock().unwrap().is_empty());
    }

    #[test]
    fn poll_and_toggle_from_different_threads() {
        let (w, rx) = attached(RecorderPad::new(false));
        let w = Arc::new(w);

        let poller = {
            let w = Arc::clone(&w);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let text = w.poll().unwrap();
                    assert!(text == "[on]" || text == "[off]");
                }
            })
        };
        for _ in 0..10 {
            w.toggle().unwrap();
        }
        poller.join().unwrap();

        assert_eq!(rx.try_iter().count(), 10);
        // Ten toggles from off lands back on off.
        assert_eq!(w.poll().unwrap(), "[off]");
    }
}
