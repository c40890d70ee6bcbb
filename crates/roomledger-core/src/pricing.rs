//! # Pricing
//!
//! One fixed nightly rate per room type: `total = base_price × nights`.
//! No rate plans, no per-night overrides.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::stay::StayRange;

/// Total price of `stay` at `base_price` per night.
///
/// ## Errors
/// `CoreError::PriceOverflow` if the product does not fit in i64 cents.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use roomledger_core::{money::Money, pricing::quote_stay, stay::StayRange};
///
/// let stay = StayRange::new(
///     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(quote_stay(Money::from_cents(2500), &stay).unwrap().cents(), 7500);
/// ```
pub fn quote_stay(base_price: Money, stay: &StayRange) -> CoreResult<Money> {
    let nights = stay.nights();

    base_price
        .checked_times(nights)
        .ok_or(CoreError::PriceOverflow {
            base_cents: base_price.cents(),
            nights,
        })
}
