//! # Dashboard Reports
//!
//! Aggregations over the sales ledger for a date range.
//!
//! ## What the Dashboard Shows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  KPIs          gross sales │ net profit │ avg ticket │ transactions     │
//! │  Daily trend   date → gross, net profit                                 │
//! │  Products      gross, net profit, quantity (top-N by qty / by profit)   │
//! │  Week pattern  (week starting Monday, weekday) → gross                  │
//! │  Weekly table  "Mon 05/10 - Sun 11/10" newest first                     │
//! │  Payments      Cash / Card → gross                                      │
//! │  Split         net profit vs everything else                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Every ledger line counts as one transaction.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::money::Money;
use crate::types::{PaymentMethod, SaleLine};

// =============================================================================
// Report Types
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub gross_sales: Money,
    pub net_profit: Money,
    pub transactions: usize,
    /// Gross sales per transaction, zero when there are none.
    pub average_ticket: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub gross: Money,
    pub net_profit: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub product: String,
    pub gross: Money,
    pub net_profit: Money,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayPoint {
    pub week_start: NaiveDate,
    pub weekday: Weekday,
    pub gross: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSummary {
    pub week_start: NaiveDate,
    /// `Mon dd/mm - Sun dd/mm`.
    pub label: String,
    pub gross: Money,
    pub net_profit: Money,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentShare {
    pub method: PaymentMethod,
    pub gross: Money,
}

/// Gross sales split into net profit and everything else (cost,
/// commission, discounts).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProfitSplit {
    pub net_profit: Money,
    pub costs: Money,
}

/// Everything the dashboard shows for one range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub kpis: Kpis,
    pub daily: Vec<DailyPoint>,
    pub products: Vec<ProductSummary>,
    pub weekly_pattern: Vec<WeekdayPoint>,
    pub weekly: Vec<WeekSummary>,
    pub payments: Vec<PaymentShare>,
    pub split: ProfitSplit,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.kpis.transactions == 0
    }

    /// Best sellers by units.
    pub fn top_by_quantity(&self, n: usize) -> Vec<&ProductSummary> {
        top_n(&self.products, n, |a, b| b.quantity.cmp(&a.quantity))
    }

    /// Best sellers by net profit.
    pub fn top_by_profit(&self, n: usize) -> Vec<&ProductSummary> {
        top_n(&self.products, n, |a, b| b.net_profit.cmp(&a.net_profit))
    }
}

fn top_n<T>(
    items: &[T],
    n: usize,
    order: impl FnMut(&&T, &&T) -> std::cmp::Ordering,
) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(order);
    sorted.truncate(n);
    sorted
}

// =============================================================================
// Aggregation
// =============================================================================

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// `Mon 05/10 - Sun 11/10` for the week starting `monday`.
pub fn week_label(monday: NaiveDate) -> String {
    let sunday = monday + Duration::days(6);
    format!("Mon {} - Sun {}", monday.format("%d/%m"), sunday.format("%d/%m"))
}

/// Ledger lines dated within `from..=to`.
pub fn in_range(sales: &[SaleLine], from: NaiveDate, to: NaiveDate) -> Vec<&SaleLine> {
    sales
        .iter()
        .filter(|line| line.date >= from && line.date <= to)
        .collect()
}

/// Builds the dashboard for the lines dated within `from..=to`.
pub fn build_dashboard(sales: &[SaleLine], from: NaiveDate, to: NaiveDate) -> Dashboard {
    let lines = in_range(sales, from, to);

    let gross_sales: Money = lines.iter().map(|l| l.gross_total).sum();
    let net_profit: Money = lines.iter().map(|l| l.net_profit).sum();
    let transactions = lines.len();
    let average_ticket = if transactions == 0 {
        Money::zero()
    } else {
        Money::from_decimal(gross_sales.to_decimal() / Decimal::from(transactions))
    };

    let mut daily: BTreeMap<NaiveDate, (Money, Money)> = BTreeMap::new();
    let mut products: BTreeMap<&str, ProductSummary> = BTreeMap::new();
    let mut pattern: BTreeMap<(NaiveDate, u32), (Weekday, Money)> = BTreeMap::new();
    let mut weeks: BTreeMap<NaiveDate, (Money, Money, Decimal)> = BTreeMap::new();
    let mut payments: BTreeMap<PaymentMethod, Money> = BTreeMap::new();

    for line in &lines {
        let day = daily.entry(line.date).or_default();
        day.0 += line.gross_total;
        day.1 += line.net_profit;

        let product = products
            .entry(line.product.as_str())
            .or_insert_with(|| ProductSummary {
                product: line.product.clone(),
                gross: Money::zero(),
                net_profit: Money::zero(),
                quantity: Decimal::ZERO,
            });
        product.gross += line.gross_total;
        product.net_profit += line.net_profit;
        product.quantity = product.quantity.saturating_add(line.quantity);

        let monday = week_start(line.date);
        let weekday = line.date.weekday();
        let cell = pattern
            .entry((monday, weekday.num_days_from_monday()))
            .or_insert((weekday, Money::zero()));
        cell.1 += line.gross_total;

        let week = weeks.entry(monday).or_default();
        week.0 += line.gross_total;
        week.1 += line.net_profit;
        week.2 = week.2.saturating_add(line.quantity);

        *payments.entry(line.payment).or_default() += line.gross_total;
    }

    Dashboard {
        from,
        to,
        kpis: Kpis {
            gross_sales,
            net_profit,
            transactions,
            average_ticket,
        },
        daily: daily
            .into_iter()
            .map(|(date, (gross, net_profit))| DailyPoint {
                date,
                gross,
                net_profit,
            })
            .collect(),
        products: products.into_values().collect(),
        weekly_pattern: pattern
            .into_iter()
            .map(|((week_start, _), (weekday, gross))| WeekdayPoint {
                week_start,
                weekday,
                gross,
            })
            .collect(),
        weekly: weeks
            .into_iter()
            .rev()
            .map(|(week_start, (gross, net_profit, quantity))| WeekSummary {
                week_start,
                label: week_label(week_start),
                gross,
                net_profit,
                quantity,
            })
            .collect(),
        payments: payments
            .into_iter()
            .map(|(method, gross)| PaymentShare { method, gross })
            .collect(),
        split: ProfitSplit {
            net_profit,
            costs: gross_sales - net_profit,
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
