use anyhow::Context;
use argh::FromArgs;
use crossterm::terminal;
use serial_console::{EditorConfig, Interpreter, LineEvent, Registry, Session, StdioStream};
use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// Interactive console on the local terminal, polled the way a device polls its UART.
struct Args {
    #[argh(option, default = "String::from(\"> \")")]
    /// text printed before each line of input
    prompt: String,

    #[argh(option, default = "10")]
    /// milliseconds to sleep between polls
    poll_interval_ms: u64,

    #[argh(option, default = "10")]
    /// milliseconds to wait for the rest of an arrow-key sequence
    escape_timeout_ms: u64,

    #[argh(switch)]
    /// echo unrecognised control bytes as {0xHH}
    show_unknown_codes: bool,
}

/// Leaves raw mode when dropped, including on early return.
struct RawMode;

impl RawMode {
    fn enable() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("can't switch terminal to raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = EditorConfig::default()
        .with_prompt(args.prompt)
        .with_escape_timeout(Duration::from_millis(args.escape_timeout_ms))
        .with_unknown_codes_shown(args.show_unknown_codes);

    let exit = Rc::new(Cell::new(false));
    let mut registry = Registry::with_builtins();
    registry.install_with_description("echo", "echo\t: print the parameters back", |params, out| {
        write!(out, "{}\r\n", params)?;
        Ok(true)
    });
    let exit_flag = exit.clone();
    registry.install_with_description("exit", "exit\t: leave the console", move |params, _out| {
        if !params.is_empty() {
            return Ok(false);
        }
        exit_flag.set(true);
        Ok(true)
    });
    let interpreter = Interpreter::new(registry, config);

    let _raw = RawMode::enable()?;
    let mut stream = StdioStream::spawn();
    let mut session = Session::new();
    let interval = Duration::from_millis(args.poll_interval_ms);

    while !exit.get() && !stream.is_closed() {
        if let LineEvent::Dispatched(outcome) = session.poll(&interpreter, &mut stream)? {
            tracing::debug!(?outcome, "line dispatched");
        }
        thread::sleep(interval);
    }
    Ok(())
}
