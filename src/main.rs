//! Entry point for the **padstat** daemon.
//!
//! Runs the touchpad widget for a bar: polls it on the main thread and
//! prints one line per refresh to stdout, while commands from the Unix
//! socket (key bindings, click handlers, `padstat-ctl`) are dispatched on a
//! background thread.
//!
//! ```text
//! padstat [--json] [--config <path>]
//! ```

use clap::Parser;
use log::{error, info};
use padstat::command::Command;
use padstat::config::{default_config_path, Config};
use padstat::ipc::listener::UnixSocketListener;
use padstat::output::{LineRenderer, OutputMode};
use padstat::poller::PollLoop;
use padstat::traits::{CommandSource, DeviceBackend};
use padstat::widget::TouchpadWidget;
use padstat::xinput::backend::XinputBackend;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};

#[derive(Parser, Debug)]
#[command(
    name = "padstat",
    version,
    about = "Touchpad status widget for tiling window manager bars"
)]
struct Cli {
    /// Print waybar-style JSON lines instead of plain text
    #[arg(long)]
    json: bool,

    /// Config file (default: $XDG_CONFIG_HOME/padstat/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

//  Main

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config.unwrap_or_else(default_config_path));
    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Plain
    };

    let backend = XinputBackend::from_config(&config.xinput);
    let widget = Arc::new(TouchpadWidget::new(backend, config.touchpad.clone()));

    let poll_loop = PollLoop::new(widget.update_interval());
    if let Err(e) = widget.configure(poll_loop.context()) {
        error!("{}", e);
        std::process::exit(1);
    }
    info!("refreshing every {}s", poll_loop.interval().as_secs());

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx, config.socket_path());
    spawn_dispatcher(Arc::clone(&widget), cmd_rx);

    let stdout = std::io::stdout().lock();
    let mut renderer = LineRenderer::new(stdout, mode);
    if let Err(e) = poll_loop.run(&*widget, &mut renderer) {
        info!("output closed ({}), exiting", e);
    }
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Command>, socket: PathBuf) {
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&socket);
        if let Err(e) = source.run(tx) {
            error!("socket listener on {} failed: {}", source.path().display(), e);
        }
    });
}

/// Handle commands off the poll thread.  Failures are reported here; the
/// widget has already requested a refresh where one is due.
fn spawn_dispatcher<B>(widget: Arc<TouchpadWidget<B>>, rx: mpsc::Receiver<Command>)
where
    B: DeviceBackend + Send + Sync + 'static,
{
    std::thread::spawn(move || {
        for cmd in rx {
            if let Err(e) = widget.handle(cmd) {
                error!("{} failed: {}", cmd, e);
            }
        }
        info!("all command sources closed");
    });
}
