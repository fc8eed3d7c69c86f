//! # Terminal Output
//!
//! Plain-text tables and the report layouts built from them.
//!
//! ```text
//! Product   Qty      Total
//! ───────   ───   ────────
//! Cake        2     $96.00
//! Brownie    10    $150.00
//! ```
//!
//! Column widths are counted in chars so accented names line up.

use std::fmt::Write as _;

use pantry_core::costing::CostBreakdown;
use pantry_core::pricing::MarginRow;
use pantry_core::report::{week_label, Dashboard};
use pantry_core::restock::RestockPlan;
use pantry_core::sale::SaleOutcome;
use pantry_core::{Inventory, Money, SaleLine, StockMovement, StockStatus};
use rust_decimal::Decimal;

use crate::state::CartView;

// =============================================================================
// Table
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    align: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let align = vec![Align::Left; headers.len()];
        Table {
            headers,
            align,
            rows: Vec::new(),
        }
    }

    /// Right-aligns the given columns.
    pub fn right(mut self, columns: &[usize]) -> Self {
        for &c in columns {
            if let Some(a) = self.align.get_mut(c) {
                *a = Align::Right;
            }
        }
        self
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|c| {
                self.rows
                    .iter()
                    .map(|r| width(&r[c]))
                    .chain(std::iter::once(width(&self.headers[c])))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        self.push_line(&mut out, &self.headers, &widths);
        let rule: Vec<String> = self.headers.iter().map(|h| "─".repeat(width(h))).collect();
        self.push_line(&mut out, &rule, &widths);
        for row in &self.rows {
            self.push_line(&mut out, row, &widths);
        }
        out
    }

    fn push_line(&self, out: &mut String, cells: &[String], widths: &[usize]) {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .zip(&self.align)
            .map(|((cell, &w), align)| pad(cell, w, *align))
            .collect();
        out.push_str(line.join("   ").trim_end());
        out.push('\n');
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, w: usize, align: Align) -> String {
    let fill = " ".repeat(w.saturating_sub(width(s)));
    match align {
        Align::Left => format!("{s}{fill}"),
        Align::Right => format!("{fill}{s}"),
    }
}

/// Quantity without trailing zeros.
pub fn qty(value: Decimal) -> String {
    value.normalize().to_string()
}

pub fn pct(value: Decimal) -> String {
    format!("{}%", value.round_dp(2).normalize())
}

// =============================================================================
// Catalog views
// =============================================================================

pub fn cost_breakdown(breakdown: &CostBreakdown) -> String {
    let mut table = Table::new(["Component", "Kind", "Quantity", "Unit cost", "Cost"]).right(&[2, 3, 4]);
    for line in &breakdown.lines {
        table.row([
            line.component.clone(),
            format!("{:?}", line.kind).to_lowercase(),
            qty(line.quantity),
            qty(line.unit_cost.round_dp(4)),
            Money::from_decimal(line.partial_cost).to_string(),
        ]);
    }

    let mut out = format!("{}\n\n", breakdown.recipe);
    out.push_str(&table.render());
    let _ = writeln!(out, "\nTotal cost: {}", breakdown.total_money());
    if !breakdown.unresolved.is_empty() {
        let _ = writeln!(out, "Unknown components (counted as $0.00): {}", breakdown.unresolved.join(", "));
    }
    out
}

pub fn margins(rows: &[&MarginRow]) -> String {
    let mut table = Table::new(["Product", "Cost", "Price", "Margin", "Margin %"]).right(&[1, 2, 3, 4]);
    for row in rows {
        table.row([
            row.product.clone(),
            row.cost.to_string(),
            row.price.to_string(),
            row.margin.to_string(),
            pct(row.margin_pct),
        ]);
    }
    table.render()
}

pub fn inventory(inventory: &Inventory, alerts_only: bool) -> String {
    let entries = if alerts_only {
        inventory.alerts()
    } else {
        inventory.status()
    };
    if entries.is_empty() {
        return if alerts_only {
            "All stock levels are fine.\n".to_string()
        } else {
            "Inventory is empty.\n".to_string()
        };
    }

    let mut table = Table::new(["Ingredient", "Stock", "Min", "Max", "Status"]).right(&[1, 2, 3]);
    for (entry, status) in entries {
        table.row([
            entry.ingredient.clone(),
            qty(entry.stock),
            qty(entry.min),
            qty(entry.max),
            status.to_string(),
        ]);
    }
    table.render()
}

// =============================================================================
// Sales
// =============================================================================

pub fn cart(view: &CartView) -> String {
    if view.rows.is_empty() {
        return "Cart is empty.\n".to_string();
    }
    let mut table = Table::new(["#", "Product", "Qty", "Unit", "Discount", "Subtotal", "Payment"])
        .right(&[0, 2, 3, 4, 5]);
    for row in &view.rows {
        let mut product = row.line.product.clone();
        if !row.line.modifiers.is_empty() {
            let _ = write!(product, " + {}", row.line.modifiers.join(", "));
        }
        table.row([
            row.number.to_string(),
            product,
            row.line.quantity.to_string(),
            row.quote.unit_price.to_string(),
            row.quote.discount.to_string(),
            row.quote.subtotal.to_string(),
            row.line.payment.to_string(),
        ]);
    }
    let mut out = table.render();
    let _ = writeln!(out, "\nTotal: {}", view.total);
    out
}

pub fn receipt(outcome: &SaleOutcome) -> String {
    let mut table = Table::new(["Product", "Qty", "Unit", "Discount", "Subtotal"]).right(&[1, 2, 3, 4]);
    for line in &outcome.lines {
        table.row([
            product_label(line),
            qty(line.quantity),
            line.unit_price.to_string(),
            line.discount_amount.to_string(),
            line.subtotal().to_string(),
        ]);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Ticket {}\n", outcome.ticket);
    out.push_str(&table.render());
    let _ = writeln!(out, "\nTotal charged: {}", outcome.total_charged());

    let shortfalls: Vec<&StockMovement> = outcome.shortfalls().collect();
    if !shortfalls.is_empty() {
        out.push_str("\nNot enough stock recorded for:\n");
        for m in shortfalls {
            let _ = writeln!(out, "  {} (short by {})", m.ingredient, qty(m.shortfall));
        }
    }
    out
}

/// Ledger lines. Sellers get the date, product, quantity and payment only.
pub fn history(lines: &[SaleLine], with_money: bool) -> String {
    if lines.is_empty() {
        return "No sales in this range.\n".to_string();
    }
    let mut table = if with_money {
        Table::new([
            "Date", "Ticket", "Product", "Qty", "Unit", "Discount", "Subtotal", "Cost", "Commission", "Net profit",
            "Payment",
        ])
        .right(&[3, 4, 5, 6, 7, 8, 9])
    } else {
        Table::new(["Date", "Product", "Qty", "Payment"]).right(&[2])
    };

    for line in lines {
        let date = line.date.format("%d/%m/%Y").to_string();
        if with_money {
            table.row([
                date,
                short_ticket(&line.ticket),
                product_label(line),
                qty(line.quantity),
                line.unit_price.to_string(),
                line.discount_amount.to_string(),
                line.subtotal().to_string(),
                line.cost.to_string(),
                line.commission.to_string(),
                line.net_profit.to_string(),
                line.payment.to_string(),
            ]);
        } else {
            table.row([date, product_label(line), qty(line.quantity), line.payment.to_string()]);
        }
    }
    table.render()
}

fn product_label(line: &SaleLine) -> String {
    if line.modifiers.is_empty() {
        line.product.clone()
    } else {
        format!("{} + {}", line.product, line.modifiers.join(", "))
    }
}

fn short_ticket(ticket: &str) -> String {
    ticket.chars().take(8).collect()
}

// =============================================================================
// Reports
// =============================================================================

pub fn dashboard(d: &Dashboard, top: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Sales from {} to {}\n",
        d.from.format("%d/%m/%Y"),
        d.to.format("%d/%m/%Y")
    );
    if d.is_empty() {
        out.push_str("No sales in this range.\n");
        return out;
    }

    let mut kpis = Table::new(["Gross sales", "Net profit", "Transactions", "Average ticket"]).right(&[0, 1, 2, 3]);
    kpis.row([
        d.kpis.gross_sales.to_string(),
        d.kpis.net_profit.to_string(),
        d.kpis.transactions.to_string(),
        d.kpis.average_ticket.to_string(),
    ]);
    out.push_str(&kpis.render());

    out.push_str("\nDaily\n");
    let mut daily = Table::new(["Date", "Gross", "Net profit"]).right(&[1, 2]);
    for p in &d.daily {
        daily.row([p.date.format("%d/%m/%Y").to_string(), p.gross.to_string(), p.net_profit.to_string()]);
    }
    out.push_str(&daily.render());

    let _ = writeln!(out, "\nTop {top} by quantity");
    let mut by_qty = Table::new(["Product", "Qty", "Gross"]).right(&[1, 2]);
    for p in d.top_by_quantity(top) {
        by_qty.row([p.product.clone(), qty(p.quantity), p.gross.to_string()]);
    }
    out.push_str(&by_qty.render());

    let _ = writeln!(out, "\nTop {top} by net profit");
    let mut by_profit = Table::new(["Product", "Net profit", "Gross"]).right(&[1, 2]);
    for p in d.top_by_profit(top) {
        by_profit.row([p.product.clone(), p.net_profit.to_string(), p.gross.to_string()]);
    }
    out.push_str(&by_profit.render());

    out.push_str("\nWeekly pattern\n");
    let mut pattern = Table::new(["Week", "Day", "Gross"]).right(&[2]);
    for p in &d.weekly_pattern {
        pattern.row([week_label(p.week_start), p.weekday.to_string(), p.gross.to_string()]);
    }
    out.push_str(&pattern.render());

    out.push_str("\nWeeks\n");
    let mut weeks = Table::new(["Week", "Gross", "Net profit", "Qty"]).right(&[1, 2, 3]);
    for w in &d.weekly {
        weeks.row([w.label.clone(), w.gross.to_string(), w.net_profit.to_string(), qty(w.quantity)]);
    }
    out.push_str(&weeks.render());

    out.push_str("\nPayments\n");
    let mut payments = Table::new(["Method", "Gross", "Share"]).right(&[1, 2]);
    for p in &d.payments {
        payments.row([
            p.method.to_string(),
            p.gross.to_string(),
            pct(p.gross.percent_of(d.kpis.gross_sales)),
        ]);
    }
    out.push_str(&payments.render());

    let _ = writeln!(
        out,
        "\nNet profit {} / costs, commission and discounts {}",
        d.split.net_profit, d.split.costs
    );
    out
}

pub fn restock_plan(plan: &RestockPlan, top: usize) -> String {
    if plan.rows.is_empty() {
        return "Nothing to restock for this range.\n".to_string();
    }
    let mut table = Table::new([
        "Ingredient", "Needed", "Unit", "Purchase cost", "Of purchase", "Restock cost", "Supplier",
    ])
    .right(&[1, 3, 4, 5]);
    for row in &plan.rows {
        table.row([
            row.ingredient.clone(),
            qty(row.needed.round_dp(4)),
            row.unit.clone(),
            row.purchase_cost.to_string(),
            pct(row.purchase_unit_pct),
            row.restock_cost.to_string(),
            row.supplier.clone(),
        ]);
    }

    let mut out = table.render();
    let _ = writeln!(out, "\nTotal restock cost: {}", plan.total_cost());

    let costly = plan.top_by_cost(top);
    if !costly.is_empty() {
        let _ = writeln!(out, "\nTop {top} by cost");
        for row in costly {
            let _ = writeln!(out, "  {}  {}", row.ingredient, row.restock_cost);
        }
    }
    if !plan.unresolved.is_empty() {
        let _ = writeln!(out, "\nSkipped unknown components: {}", plan.unresolved.join(", "));
    }
    out
}

/// One-word label for a stock status in alerts after a sale.
pub fn status_word(status: StockStatus) -> &'static str {
    match status {
        StockStatus::Ok => "ok",
        StockStatus::Low => "low",
        StockStatus::Urgent => "urgent",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pantry_core::{InventoryEntry, PaymentMethod, Rate};
    use rust_decimal_macros::dec;

    #[test]
    fn test_table_alignment() {
        let mut table = Table::new(["Product", "Total"]).right(&[1]);
        table.row(["Cake", "$96.00"]);
        table.row(["Crème brûlée", "$150.00"]);

        let text = table.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Product          Total");
        assert_eq!(lines[1], "───────          ─────");
        assert_eq!(lines[2], "Cake            $96.00");
        assert_eq!(lines[3], "Crème brûlée   $150.00");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(["A", "B", "C"]);
        table.row(["x"]);
        assert_eq!(table.render().lines().nth(2), Some("x"));
    }

    #[test]
    fn test_qty_and_pct() {
        assert_eq!(qty(dec!(2.5000)), "2.5");
        assert_eq!(qty(dec!(100)), "100");
        assert_eq!(pct(dec!(77.7777)), "77.78%");
    }

    #[test]
    fn test_history_hides_money_for_sellers() {
        let line = SaleLine {
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            ticket: "0c1f4b2e-aaaa-bbbb-cccc-000000000000".into(),
            product: "Cake".into(),
            modifiers: vec!["Candles".into()],
            quantity: dec!(2),
            unit_price: Money::from_cents(4800),
            gross_total: Money::from_cents(9600),
            discount_rate: Rate::zero(),
            discount_amount: Money::zero(),
            cost: Money::from_cents(2200),
            gross_profit: Money::from_cents(7400),
            commission: Money::zero(),
            net_profit: Money::from_cents(7400),
            payment: PaymentMethod::Cash,
        };

        let seller = history(std::slice::from_ref(&line), false);
        assert!(seller.contains("05/03/2024"));
        assert!(seller.contains("Cake + Candles"));
        assert!(!seller.contains('$'));

        let admin = history(&[line], true);
        assert!(admin.contains("$74.00"));
        assert!(admin.contains("0c1f4b2e"));
    }

    #[test]
    fn test_inventory_alerts_view() {
        let mut low = InventoryEntry::new("Flour");
        low.stock = dec!(100);
        low.min = dec!(200);
        low.max = dec!(1000);
        let inv = Inventory::from_entries([low, InventoryEntry::new("Salt")]);

        let alerts = inventory(&inv, true);
        assert!(alerts.contains("Flour"));
        assert!(alerts.contains("URGENT"));
        assert!(!alerts.contains("Salt"));

        assert!(inventory(&Inventory::new(), true).contains("fine"));
    }
}
