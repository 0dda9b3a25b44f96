//! Fixed-point money helpers
//!
//! All monetary amounts are decimal with exactly two fractional digits
//! (spec §3). The teacher repo represents money as `i64` cents; this system
//! uses [`rust_decimal::Decimal`] instead because the spec's allocation
//! percentages (10%, 15%, 40%...) need decimal division that stays exact at
//! two fractional digits, which integer cents math would otherwise force
//! every call site to round manually.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Round a decimal to two fractional digits, banker's rounding disabled in
/// favor of half-up, matching how the Python prototype's `int(...)` /
/// `round(...)` calls behaved on currency amounts.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `amount * pct / 100`, rounded to two fractional digits. `pct` is a whole
/// percentage (e.g. `Decimal::from(40)` for 40%).
pub fn percent_of(amount: Decimal, pct: Decimal) -> Decimal {
    round_money(amount * pct / Decimal::from(100))
}

/// Clamp `amount` to `[Decimal::ZERO, cap]`. Used by the Allocation Engine's
/// per-goal clamping (spec §4.2) and by goal `saved` updates (spec §3).
pub fn clamp_nonneg(amount: Decimal, cap: Decimal) -> Decimal {
    if amount < Decimal::ZERO {
        Decimal::ZERO
    } else if amount > cap {
        cap
    } else {
        amount
    }
}
