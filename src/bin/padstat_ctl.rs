//! Send one command to a running padstat daemon.
//!
//! Meant to be bound to keys and bar click handlers, e.g. in a window
//! manager config:
//!
//! ```text
//! bindsym XF86TouchpadToggle exec padstat-ctl toggle
//! ```

use clap::{Parser, Subcommand};
use log::{debug, error};
use padstat::command::{parse_button, Command, MouseButton};
use padstat::config::{default_config_path, Config};
use padstat::ipc::client::send_command;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "padstat-ctl",
    version,
    about = "Send a command to the running padstat daemon"
)]
struct Cli {
    /// Daemon socket (default: from the config file, else $XDG_RUNTIME_DIR/padstat.sock)
    #[arg(long, global = true, value_name = "PATH")]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: Verb,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Verb {
    /// Flip the touchpad on/off
    Toggle,
    /// Re-read the touchpad state now
    Refresh,
    /// Simulate a click on the widget
    Click {
        /// Button1..Button5, 1..5, left, middle, right, scroll-up, scroll-down
        #[arg(value_parser = button_arg)]
        button: MouseButton,
    },
}

fn button_arg(s: &str) -> Result<MouseButton, String> {
    parse_button(s).ok_or_else(|| format!("invalid button: {}", s))
}

impl From<Verb> for Command {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Toggle => Command::Toggle,
            Verb::Refresh => Command::Refresh,
            Verb::Click { button } => Command::Click(button),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let socket = cli.socket.unwrap_or_else(|| {
        Config::load(&default_config_path())
            .map(|c| c.socket_path())
            .unwrap_or_else(|e| {
                debug!("{}, using default socket", e);
                Config::default().socket_path()
            })
    });

    if let Err(e) = send_command(&socket, cli.command.into()) {
        error!("{}", e);
        eprintln!("padstat-ctl: {}", e);
        std::process::exit(1);
    }
}
