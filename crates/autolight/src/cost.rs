//! Cost aggregation over the current selections.

use rust_decimal::Decimal;

use crate::model::FixtureModel;

/// Anything that pairs a quantity with an optionally resolved model.
pub trait CostLine {
    fn quantity(&self) -> u32;
    fn unit_price(&self) -> Option<Decimal>;
}

impl CostLine for (u32, Option<&FixtureModel>) {
    fn quantity(&self) -> u32 {
        self.0
    }

    fn unit_price(&self) -> Option<Decimal> {
        self.1.map(|m| m.unit_price)
    }
}

/// `quantity × unit price`; zero when no model is resolved. Saturates at
/// the `Decimal` bounds instead of panicking.
pub fn line_total<L: CostLine + ?Sized>(line: &L) -> Decimal {
    line.unit_price()
        .map(|price| price.saturating_mul(Decimal::from(line.quantity())))
        .unwrap_or(Decimal::ZERO)
}

/// Σ line totals. An empty input totals zero.
pub fn total<'a, L, I>(lines: I) -> Decimal
where
    L: CostLine + 'a,
    I: IntoIterator<Item = &'a L>,
{
    lines
        .into_iter()
        .fold(Decimal::ZERO, |sum, line| sum.saturating_add(line_total(line)))
}
