//! # Command Line
//!
//! clap definitions shared by one-shot runs and the interactive shell.
//!
//! ```text
//! pantry [--config FILE] [--user NAME] <COMMAND>
//!
//!   ingredient  list | set | remove
//!   recipe      list | show | create | add | remove-component | delete
//!   modifier    list | set | add | remove-component | delete
//!   price       list | set
//!   inventory   list | restock | thresholds | count
//!   sell        --item PRODUCT[:QTY[:DISCOUNT%]]... [--modifier M]... [--card]
//!   history     [--from DATE] [--to DATE]
//!   dashboard   [--from DATE] [--to DATE] [--json]
//!   restock-plan [--from DATE] [--to DATE] [--json]
//!   shell
//! ```
//!
//! Inside the shell the same commands are typed without the `pantry`
//! prefix, plus `cart ...`, `checkout`, `whoami` and `exit`.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use pantry_core::text::try_parse_decimal;
use pantry_core::validation::{validate_discount_percent, validate_quantity};
use pantry_core::{Money, Rate, LEDGER_DATE_FORMAT};
use pantry_store::repository::sale::parse_date;

use crate::error::{CliError, CliResult};

#[derive(Debug, Parser)]
#[command(name = "pantry", version, about = "Point of sale and costing for a small food business")]
pub struct Cli {
    /// Config file (default: platform config folder, or PANTRY_CONFIG)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// User to log in as (default: PANTRY_USER)
    #[arg(long, short = 'u', global = true, value_name = "NAME")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Base ingredients and their purchase data
    #[command(subcommand)]
    Ingredient(IngredientCommand),

    /// Recipes and their components
    #[command(subcommand)]
    Recipe(RecipeCommand),

    /// Sale modifiers (extras)
    #[command(subcommand)]
    Modifier(ModifierCommand),

    /// Sale prices and margins
    #[command(subcommand)]
    Price(PriceCommand),

    /// Stock levels
    #[command(subcommand)]
    Inventory(InventoryCommand),

    /// Sell the given items in one ticket
    Sell(SellArgs),

    /// Sales ledger for a date range
    History(RangeArgs),

    /// Sales dashboard for a date range
    Dashboard(ReportArgs),

    /// Ingredients to buy back after a date range of sales
    RestockPlan(ReportArgs),

    /// Interactive session with a cart
    Shell,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Subcommand)]
pub enum IngredientCommand {
    List,

    /// Create or update an ingredient
    ///
    /// New ingredients need --cost, --quantity, --purchase-unit and
    /// --recipe-unit. Omitted fields keep their current value on update.
    Set(IngredientSetArgs),

    Remove { name: String },
}

#[derive(Debug, Clone, Args)]
pub struct IngredientSetArgs {
    pub name: String,

    /// Cost of one purchase unit
    #[arg(long, value_parser = parse_money)]
    pub cost: Option<Money>,

    /// Recipe units in one purchase unit
    #[arg(long, value_parser = parse_amount)]
    pub quantity: Option<Decimal>,

    #[arg(long)]
    pub purchase_unit: Option<String>,

    #[arg(long)]
    pub recipe_unit: Option<String>,

    #[arg(long)]
    pub supplier: Option<String>,

    /// Override the derived cost per recipe unit
    #[arg(long, value_parser = parse_amount)]
    pub unit_cost: Option<Decimal>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum RecipeCommand {
    List,

    /// Cost breakdown of one recipe
    Show { name: String },

    Create { name: String },

    /// Set how much of a component the recipe uses
    Add {
        recipe: String,
        component: String,
        #[arg(value_parser = parse_amount)]
        quantity: Decimal,
    },

    RemoveComponent { recipe: String, component: String },

    Delete { name: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ModifierCommand {
    List,

    /// Create a modifier or change its extra charge
    Set {
        name: String,
        #[arg(long, value_parser = parse_money, default_value = "0")]
        charge: Money,
    },

    /// Set how much of a component one application consumes
    Add {
        modifier: String,
        component: String,
        #[arg(value_parser = parse_amount)]
        quantity: Decimal,
    },

    RemoveComponent { modifier: String, component: String },

    Delete { name: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum PriceCommand {
    /// Cost, price and margin of every recipe
    List {
        /// Only the N best margins
        #[arg(long)]
        top: Option<usize>,
    },

    Set {
        product: String,
        #[arg(value_parser = parse_money)]
        price: Money,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum InventoryCommand {
    List {
        /// Only low and urgent items
        #[arg(long)]
        alerts: bool,
    },

    /// Add stock
    Restock {
        ingredient: String,
        #[arg(value_parser = parse_amount)]
        quantity: Decimal,
    },

    /// Set the minimum and maximum stock
    Thresholds {
        ingredient: String,
        #[arg(value_parser = parse_amount)]
        min: Decimal,
        #[arg(value_parser = parse_amount)]
        max: Decimal,
    },

    /// Replace the stock with a physical count
    Count {
        ingredient: String,
        #[arg(value_parser = parse_amount)]
        quantity: Decimal,
    },
}

// =============================================================================
// Sales and reports
// =============================================================================

#[derive(Debug, Clone, Args)]
pub struct SellArgs {
    /// PRODUCT[:QTY[:DISCOUNT%]], repeatable
    #[arg(long = "item", short = 'i', required = true, value_parser = parse_item)]
    pub items: Vec<ItemSpec>,

    /// Modifier applied to every item, repeatable
    #[arg(long = "modifier", short = 'm')]
    pub modifiers: Vec<String>,

    /// Paid by card
    #[arg(long)]
    pub card: bool,
}

/// One `--item` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub product: String,
    pub quantity: i64,
    pub discount: Rate,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RangeArgs {
    /// First day (YYYY-MM-DD or DD/MM/YYYY); default: first of the month
    #[arg(long, value_parser = parse_day)]
    pub from: Option<NaiveDate>,

    /// Last day, inclusive; default: today
    #[arg(long, value_parser = parse_day)]
    pub to: Option<NaiveDate>,
}

impl RangeArgs {
    /// Fills the defaults relative to `today`.
    pub fn resolve(&self, today: NaiveDate) -> CliResult<(NaiveDate, NaiveDate)> {
        let to = self.to.unwrap_or(today);
        let from = self.from.unwrap_or_else(|| first_of_month(to));
        if from > to {
            return Err(CliError::validation(format!(
                "Range start {from} is after its end {to}"
            )));
        }
        Ok((from, to))
    }
}

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// Rows in the top lists
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

// =============================================================================
// Shell
// =============================================================================

/// One line typed in the shell.
#[derive(Debug, Parser)]
#[command(name = "pantry", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ShellCommand {
    #[command(flatten)]
    Run(Command),

    /// Edit the open cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Sell everything in the cart
    Checkout,

    /// Show the logged-in user
    Whoami,

    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CartCommand {
    Add {
        product: String,

        #[arg(long, short = 'q', default_value_t = 1)]
        quantity: i64,

        /// Discount percent for this line
        #[arg(long, short = 'd', value_parser = parse_amount)]
        discount: Option<Decimal>,

        #[arg(long = "modifier", short = 'm')]
        modifiers: Vec<String>,

        #[arg(long)]
        card: bool,
    },

    /// Remove line N (as numbered by `cart show`)
    Remove { line: usize },

    Clear,

    Show,
}

/// Splits a shell line into words, honoring single and double quotes.
pub fn split_words(line: &str) -> CliResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(CliError::validation("Unclosed quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

// =============================================================================
// Value parsers
// =============================================================================

fn parse_amount(raw: &str) -> Result<Decimal, String> {
    try_parse_decimal(raw).ok_or_else(|| format!("'{raw}' is not a number"))
}

fn parse_money(raw: &str) -> Result<Money, String> {
    parse_amount(raw).map(Money::from_decimal)
}

fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw.trim(), LEDGER_DATE_FORMAT)
        .ok_or_else(|| format!("'{raw}' is not a date (YYYY-MM-DD or DD/MM/YYYY)"))
}

/// Parses `PRODUCT[:QTY[:DISCOUNT%]]`.
pub fn parse_item(raw: &str) -> Result<ItemSpec, String> {
    let mut parts = raw.splitn(3, ':');
    let product = parts.next().unwrap_or_default().trim().to_string();
    if product.is_empty() {
        return Err("item needs a product name".to_string());
    }

    let quantity = match parts.next().map(str::trim) {
        None | Some("") => 1,
        Some(q) => q
            .parse::<i64>()
            .map_err(|_| format!("'{q}' is not a whole quantity"))?,
    };
    validate_quantity(quantity).map_err(|e| e.to_string())?;

    let discount = match parts.next().map(str::trim) {
        None | Some("") => Rate::zero(),
        Some(d) => {
            let pct = parse_amount(d)?;
            validate_discount_percent(pct).map_err(|e| e.to_string())?;
            Rate::from_percentage(pct)
        }
    };

    Ok(ItemSpec {
        product,
        quantity,
        discount,
    })
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
