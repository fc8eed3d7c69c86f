//! # Interactive Shell
//!
//! Keeps the session and a cart between commands.
//!
//! ```text
//! pantry> cart add "Carrot Cake" -q 2 -m Candles
//! Added line 1
//! pantry> cart show
//! pantry> checkout
//! pantry> exit
//! ```
//!
//! Every line first checks the inactivity timeout. An expired session ends
//! the shell; any other error is printed and the loop goes on.

use std::io::{BufRead, Write};

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{info, warn};

use pantry_core::validation::{validate_discount_percent, validate_quantity};
use pantry_core::Rate;

use super::sale::{cart_line, checkout, load_for_sale};
use crate::cli::{split_words, CartCommand, Command, ItemSpec, ShellCommand, ShellLine};
use crate::error::{CliError, CliResult, ErrorCode};
use crate::render;
use crate::state::{Action, AppContext, CartState, Session};

pub const PROMPT: &str = "pantry> ";

/// What the loop does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell<'a> {
    ctx: &'a AppContext,
    session: Session,
    cart: CartState,
}

impl<'a> Shell<'a> {
    pub fn new(ctx: &'a AppContext, session: Session) -> Self {
        Shell {
            ctx,
            session,
            cart: CartState::new(),
        }
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    /// Reads lines until `exit`, end of input or session expiry.
    pub async fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> CliResult<()> {
        info!(user = %self.session.user(), "Shell started");
        write!(out, "{PROMPT}")?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            match self.execute(&line).await {
                Ok((flow, text)) => {
                    out.write_all(text.as_bytes())?;
                    if flow == Flow::Exit {
                        break;
                    }
                }
                Err(err) if err.code == ErrorCode::SessionExpired => {
                    writeln!(out, "warning: {err}")?;
                    return Err(err);
                }
                Err(err) => writeln!(out, "warning: {err}")?,
            }
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }

        if !self.cart.is_empty() {
            warn!(
                lines = self.cart.lines().len(),
                opened = %self.cart.opened_at().format("%H:%M"),
                "Shell closed with an open cart"
            );
        }
        info!(user = %self.session.user(), "Shell ended");
        Ok(())
    }

    /// Runs one line and returns the text to print.
    pub async fn execute(&mut self, line: &str) -> CliResult<(Flow, String)> {
        let words = split_words(line)?;
        if words.is_empty() {
            return Ok((Flow::Continue, String::new()));
        }
        self.session.check()?;

        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(err) => {
                let text = err.render().to_string();
                return match err.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                        Ok((Flow::Continue, text))
                    }
                    _ => Err(CliError::validation(text.trim_end().to_string())),
                };
            }
        };

        let text = match parsed.command {
            ShellCommand::Exit => return Ok((Flow::Exit, String::new())),
            ShellCommand::Whoami => format!(
                "{} ({}), {} line(s) in the cart\n",
                self.session.user(),
                self.session.role(),
                self.cart.lines().len()
            ),
            ShellCommand::Cart(cmd) => {
                self.session.authorize(Action::Sell)?;
                self.cart_command(cmd).await?
            }
            ShellCommand::Checkout => {
                self.session.authorize(Action::Sell)?;
                self.checkout().await?
            }
            ShellCommand::Run(Command::Shell) => return Err(CliError::validation("Already in the shell")),
            ShellCommand::Run(cmd) => super::run(self.ctx, &self.session, cmd).await?,
        };
        Ok((Flow::Continue, text))
    }

    async fn cart_command(&mut self, cmd: CartCommand) -> CliResult<String> {
        match cmd {
            CartCommand::Add {
                product,
                quantity,
                discount,
                modifiers,
                card,
            } => {
                validate_quantity(quantity)?;
                let discount = match discount {
                    Some(pct) => {
                        validate_discount_percent(pct)?;
                        Rate::from_percentage(pct)
                    }
                    None => Rate::zero(),
                };
                let item = ItemSpec {
                    product,
                    quantity,
                    discount,
                };

                let (catalog, prices) = load_for_sale(self.ctx).await?;
                let number = self
                    .cart
                    .add(cart_line(&catalog, &item, &modifiers, card), &prices, &catalog)?;
                Ok(format!("Added line {number}\n"))
            }
            CartCommand::Remove { line } => {
                let removed = self.cart.remove(line)?;
                Ok(format!("Removed line {line} ({} x{})\n", removed.product, removed.quantity))
            }
            CartCommand::Clear => {
                self.cart.clear();
                Ok("Cart cleared\n".to_string())
            }
            CartCommand::Show => {
                if self.cart.is_empty() {
                    return Ok("Cart is empty.\n".to_string());
                }
                let (catalog, prices) = load_for_sale(self.ctx).await?;
                Ok(render::cart(&self.cart.view(&prices, &catalog)?))
            }
        }
    }

    /// Sells the cart. The cart is emptied once the ledger holds the sale.
    async fn checkout(&mut self) -> CliResult<String> {
        if self.cart.is_empty() {
            return Err(CliError::new(ErrorCode::CartError, "Cart is empty"));
        }
        let (catalog, prices) = load_for_sale(self.ctx).await?;
        let result = checkout(self.ctx, self.cart.lines(), &catalog, &prices).await;
        match &result {
            Ok(_) => self.cart.clear(),
            Err(err) if err.code == ErrorCode::PartialCheckout => self.cart.clear(),
            Err(_) => {}
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, Role, UserEntry};
    use crate::state::hash_password;
    use std::io::Cursor;
    use std::time::Duration;

    fn context() -> AppContext {
        let mut config = AppConfig::default();
        config.store.endpoint = "http://127.0.0.1:9".to_string();
        config.users.insert(
            "luis".to_string(),
            UserEntry {
                password_hash: hash_password("caja"),
                role: Role::Seller,
            },
        );
        AppContext::from_config(config).unwrap()
    }

    fn login(ctx: &AppContext, timeout: Duration) -> Session {
        Session::login(&ctx.config.users, "luis", "caja", timeout).unwrap()
    }

    #[tokio::test]
    async fn test_local_commands() {
        let ctx = context();
        let mut shell = Shell::new(&ctx, login(&ctx, Duration::from_secs(300)));

        let (flow, text) = shell.execute("whoami").await.unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(text, "luis (seller), 0 line(s) in the cart\n");

        assert_eq!(shell.execute("   ").await.unwrap(), (Flow::Continue, String::new()));
        assert_eq!(shell.execute("cart show").await.unwrap().1, "Cart is empty.\n");
        assert_eq!(
            shell.execute("checkout").await.unwrap_err().code,
            ErrorCode::CartError
        );
        assert!(shell.cart().is_empty());
        assert_eq!(shell.execute("quit").await.unwrap().0, Flow::Exit);
    }

    #[tokio::test]
    async fn test_seller_is_limited() {
        let ctx = context();
        let mut shell = Shell::new(&ctx, login(&ctx, Duration::from_secs(300)));

        let err = shell.execute("recipe list").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        let err = shell.execute("dashboard").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        let err = shell.execute("shell").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_bad_lines_keep_the_shell_running() {
        let ctx = context();
        let mut shell = Shell::new(&ctx, login(&ctx, Duration::from_secs(300)));

        let input = Cursor::new("frobnicate\ncart add \"Cake\nwhoami\nexit\nwhoami\n");
        let mut out = Vec::new();
        shell.run(input, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("warning: ").count(), 2);
        assert!(text.contains("Unclosed quote"));
        assert_eq!(text.matches("luis (seller)").count(), 1);
    }

    #[tokio::test]
    async fn test_expired_session_ends_the_shell() {
        let ctx = context();
        let mut shell = Shell::new(&ctx, login(&ctx, Duration::ZERO));

        let input = Cursor::new("whoami\nwhoami\n");
        let mut out = Vec::new();
        let err = shell.run(input, &mut out).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionExpired);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[SESSION_EXPIRED]"));
        assert!(!text.contains("luis (seller)"));
    }
}
