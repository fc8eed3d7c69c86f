//! # Pantry POS Terminal
//!
//! Library behind the `pantry` binary: configuration, login, command
//! dispatch and the interactive shell.
//!
//! ## Module Organization
//! ```text
//! pantry_cli/
//! ├── lib.rs          ◄─── You are here (startup, login, dispatch)
//! ├── cli.rs          ◄─── clap definitions and shell line parsing
//! ├── config.rs       ◄─── pantry.toml + PANTRY_* overrides
//! ├── error.rs        ◄─── CliError with ErrorCode and exit codes
//! ├── render.rs       ◄─── Text tables, receipts, dashboard
//! ├── state/
//! │   ├── mod.rs      ◄─── AppContext (config + store)
//! │   ├── session.rs  ◄─── Login, roles, inactivity timeout
//! │   └── cart.rs     ◄─── Shell cart
//! └── commands/       ◄─── One module per command group
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()      stderr, RUST_LOG or "warn,pantry=info"          │
//! │  2. AppConfig::load()   defaults → file → env → validate                │
//! │  3. AppContext          Store over the configured endpoint              │
//! │  4. Session::login()    --user / PANTRY_USER, PANTRY_PASSWORD or prompt │
//! │  5. dispatch            one command, or the shell loop                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod state;

use std::io::{self, BufRead, Write};

use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use commands::shell::Shell;
use config::AppConfig;
use error::{CliError, CliResult};
use state::{Action, AppContext, Session};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn,pantry=info";

/// Installs the tracing subscriber on stderr so command output stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - everything
/// - `RUST_LOG=pantry_store=debug` - every table read and write
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Loads the config, logs in and runs the parsed command.
pub async fn run(cli: Cli) -> CliResult<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let ctx = AppContext::from_config(config)?;

    let user = match cli.user.or_else(|| env_var("PANTRY_USER")) {
        Some(user) => user,
        None => prompt("User: ")?,
    };
    let password = match env_var("PANTRY_PASSWORD") {
        Some(password) => password,
        None => prompt("Password: ")?,
    };
    let session = Session::login(&ctx.config.users, &user, &password, ctx.config.session_timeout())?;

    match cli.command {
        Command::Shell => {
            session.authorize(Action::Sell)?;
            info!("Starting interactive shell");
            let stdin = io::stdin();
            Shell::new(&ctx, session).run(stdin.lock(), io::stdout()).await
        }
        command => {
            let out = commands::run(&ctx, &session, command).await?;
            let mut stdout = io::stdout();
            stdout.write_all(out.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Asks for one line on stderr and reads it from stdin.
fn prompt(label: &str) -> CliResult<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{label}")?;
    stderr.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(CliError::auth_failed());
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
