//! # Sale Commands
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart lines (prices frozen at add time)                                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  GET Inventario ──► finalize_sale(...) ──► SaleOutcome                  │
//! │                                              │                          │
//! │        ┌─────────────────────────────────────┘                          │
//! │        ▼                                                                │
//! │  1. append VentasDiarias  ── fails? ──► nothing written, cart kept      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  2. PUT Inventario        ── fails? ──► PARTIAL_CHECKOUT (sale stands)  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  receipt + stock warnings                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;
use std::fmt::Write as _;

use tracing::{error, info};

use pantry_core::sale::{finalize_sale, CartLine, SaleOutcome};
use pantry_core::{Catalog, PaymentMethod, PriceList};

use crate::cli::{ItemSpec, RangeArgs, SellArgs};
use crate::error::{CliError, CliResult, ErrorCode};
use crate::render::{self, qty, status_word};
use crate::state::{AppContext, CartState, Session};

/// Catalog and price list, loaded in that order.
pub async fn load_for_sale(ctx: &AppContext) -> CliResult<(Catalog, PriceList)> {
    let catalog = ctx.store.load_catalog().await?;
    let prices = ctx.store.prices().load().await?;
    Ok((catalog, prices))
}

/// Builds a cart line, matching names to the catalog's spelling when possible.
pub fn cart_line(catalog: &Catalog, item: &ItemSpec, modifiers: &[String], card: bool) -> CartLine {
    let product = catalog
        .find_recipe(&item.product)
        .map(|r| r.name.clone())
        .or_else(|| catalog.find_ingredient(&item.product).map(|i| i.name.clone()))
        .unwrap_or_else(|| item.product.trim().to_string());
    let payment = if card { PaymentMethod::Card } else { PaymentMethod::Cash };

    modifiers.iter().fold(
        CartLine::new(product, item.quantity)
            .with_discount(item.discount)
            .with_payment(payment),
        |line, m| {
            let name = catalog
                .find_modifier(m)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| m.trim().to_string());
            line.with_modifier(name)
        },
    )
}

/// One-shot sale of the `--item` arguments.
pub async fn sell(ctx: &AppContext, args: SellArgs) -> CliResult<String> {
    let (catalog, prices) = load_for_sale(ctx).await?;

    let mut cart = CartState::new();
    for item in &args.items {
        cart.add(cart_line(&catalog, item, &args.modifiers, args.card), &prices, &catalog)?;
    }

    checkout(ctx, cart.lines(), &catalog, &prices).await
}

/// Finalizes `lines`, writes the ledger and then the inventory.
pub async fn checkout(
    ctx: &AppContext,
    lines: &[CartLine],
    catalog: &Catalog,
    prices: &PriceList,
) -> CliResult<String> {
    let inventory = ctx.store.inventory().load().await?;
    let outcome = finalize_sale(lines, prices, catalog, &inventory, &ctx.sale_settings(), ctx.today())?;

    ctx.store.sales().append(&outcome.lines).await?;
    info!(
        ticket = %outcome.ticket,
        lines = outcome.lines.len(),
        total = %outcome.total_charged(),
        "Sale recorded"
    );

    if let Err(err) = ctx.store.inventory().save(&outcome.inventory).await {
        error!(ticket = %outcome.ticket, error = %err, "Inventory not updated after sale");
        return Err(partial_checkout(&outcome, &err.to_string()));
    }

    Ok(sale_summary(&outcome))
}

fn partial_checkout(outcome: &SaleOutcome, reason: &str) -> CliError {
    let touched: BTreeSet<&str> = outcome
        .movements
        .iter()
        .filter(|m| m.tracked)
        .map(|m| m.ingredient.as_str())
        .collect();
    let touched: Vec<&str> = touched.into_iter().collect();
    CliError::new(
        ErrorCode::PartialCheckout,
        format!(
            "Sale {} for {} was recorded but the inventory was not updated ({reason}). Recount: {}",
            outcome.ticket,
            outcome.total_charged(),
            touched.join(", ")
        ),
    )
}

/// Receipt plus low-stock warnings for the ingredients this sale used.
pub fn sale_summary(outcome: &SaleOutcome) -> String {
    let mut out = render::receipt(outcome);

    let touched: BTreeSet<&str> = outcome.movements.iter().map(|m| m.ingredient.as_str()).collect();
    let alerts: Vec<_> = outcome
        .inventory
        .alerts()
        .into_iter()
        .filter(|(entry, _)| touched.contains(entry.ingredient.as_str()))
        .collect();
    if !alerts.is_empty() {
        out.push_str("\nStock alerts:\n");
        for (entry, status) in alerts {
            let _ = writeln!(
                out,
                "  {} is {} ({} left, minimum {})",
                entry.ingredient,
                status_word(status),
                qty(entry.stock),
                qty(entry.min)
            );
        }
    }
    out
}

pub async fn history(ctx: &AppContext, session: &Session, range: &RangeArgs) -> CliResult<String> {
    let (from, to) = range.resolve(ctx.today())?;
    let lines = ctx.store.sales().load_range(from, to).await?;
    Ok(render::history(&lines, session.role().sees_money()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pantry_core::sale::SaleSettings;
    use pantry_core::{Ingredient, Inventory, InventoryEntry, Modifier, Money, PriceEntry, Rate, Recipe};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cart_line_from_item() {
        let item = ItemSpec {
            product: "Cake".into(),
            quantity: 2,
            discount: Rate::from_bps(500),
        };
        let mut catalog = Catalog::default();
        catalog
            .upsert_modifier(Modifier::new("Candles", Money::from_cents(300)))
            .unwrap();

        let line = cart_line(&catalog, &item, &["candles".to_string(), " Bow ".to_string()], true);
        assert_eq!(line.product, "Cake");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.discount, Rate::from_bps(500));
        assert_eq!(line.payment, PaymentMethod::Card);
        assert_eq!(line.modifiers, vec!["Candles".to_string(), "Bow".to_string()]);
    }

    #[test]
    fn test_summary_warns_about_used_stock() {
        let mut catalog = Catalog::default();
        catalog.upsert_ingredient(Ingredient::new("Flour", Money::from_cents(2000), dec!(1000), "bag", "g"));
        catalog.upsert_ingredient(Ingredient::new("Salt", Money::from_cents(500), dec!(1000), "bag", "g"));
        catalog
            .upsert_recipe(Recipe::new("Bread").with_component("Flour", dec!(500)))
            .unwrap();

        let mut prices = PriceList::new();
        prices.insert(
            "Bread".into(),
            PriceEntry {
                product: "Bread".into(),
                sale_price: Money::from_cents(3000),
                gross_margin: Money::from_cents(2000),
                gross_margin_pct: Decimal::ZERO,
            },
        );

        let mut flour = InventoryEntry::new("Flour");
        flour.stock = dec!(600);
        flour.min = dec!(200);
        flour.max = dec!(2000);
        let mut salt = InventoryEntry::new("Salt");
        salt.min = dec!(100);
        salt.max = dec!(1000);
        let inventory = Inventory::from_entries([flour, salt]);

        let outcome = finalize_sale(
            &[CartLine::new("Bread", 1).with_unit_price(Money::from_cents(3000))],
            &prices,
            &catalog,
            &inventory,
            &SaleSettings::default(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        )
        .unwrap();

        let text = sale_summary(&outcome);
        assert!(text.contains("Total charged: $30.00"));
        assert!(text.contains("Flour is urgent (100 left, minimum 200)"));
        assert!(!text.contains("Salt"));

        let err = partial_checkout(&outcome, "HTTP 500");
        assert_eq!(err.code, ErrorCode::PartialCheckout);
        assert!(err.message.contains("Recount: Flour"));
    }
}
