use chrono::NaiveDate;

use crate::domain::models::booking::PriceBreakdown;

/// Share of the base charged immediately via card to secure the booking.
pub const CONFIRMATION_RATE: f64 = 0.12;
/// Government tax, applied to the base net of the confirmation fee.
pub const TAX_RATE: f64 = 0.125;
/// Flat temporary-permit fee for drivers without an international license.
pub const PERMIT_FEE_FLAT: f64 = 23.0;
/// Refundable deposit collected at delivery from underage drivers.
pub const UNDERAGE_DEPOSIT_FLAT: f64 = 1000.0;

pub struct PricingInputs {
    pub rental_days: i64,
    pub rate_per_day: f64,
    pub driver_age: i32,
    pub has_international_license: bool,
    pub min_driver_age: i32,
    pub damage_deposit_required: bool,
    pub damage_deposit_amount: f64,
}

/// Day count of a stay. Same-day pickup/dropoff still bills one day.
pub fn rental_days(pickup: NaiveDate, dropoff: NaiveDate) -> i64 {
    (dropoff - pickup).num_days().max(1)
}

/// Rounding happens only here, at the charge/display boundary; the
/// breakdown itself keeps full precision.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Deterministic cost breakdown for a rental.
///
/// The confirmation fee is subtracted from the base before tax but is
/// itself part of the total: `due_now` is captured via card at booking
/// time and `due_at_pickup` settles at delivery.
pub fn compute_breakdown(inputs: PricingInputs) -> PriceBreakdown {
    let days = inputs.rental_days.max(1);
    let base = days as f64 * inputs.rate_per_day;
    let confirmation_fee = base * CONFIRMATION_RATE;
    let taxable_amount = base - confirmation_fee;
    let government_tax = taxable_amount * TAX_RATE;
    let permit_fee = if inputs.has_international_license { 0.0 } else { PERMIT_FEE_FLAT };
    let underage_deposit = if inputs.driver_age < inputs.min_driver_age { UNDERAGE_DEPOSIT_FLAT } else { 0.0 };
    let damage_deposit = if inputs.damage_deposit_required { inputs.damage_deposit_amount } else { 0.0 };
    let total = base + government_tax + permit_fee + underage_deposit + damage_deposit;

    PriceBreakdown {
        rental_days: days,
        rate_per_day: inputs.rate_per_day,
        base,
        confirmation_fee,
        taxable_amount,
        government_tax,
        permit_fee,
        underage_deposit,
        damage_deposit,
        total,
        due_now: confirmation_fee,
        due_at_pickup: total - confirmation_fee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn inputs(days: i64) -> PricingInputs {
        PricingInputs {
            rental_days: days,
            rate_per_day: 100.0,
            driver_age: 30,
            has_international_license: true,
            min_driver_age: 25,
            damage_deposit_required: false,
            damage_deposit_amount: 0.0,
        }
    }

    #[test]
    fn test_rental_days_is_day_difference_with_floor_of_one() {
        assert_eq!(rental_days(date(2024, 1, 10), date(2024, 1, 13)), 3);
        assert_eq!(rental_days(date(2024, 1, 10), date(2024, 1, 11)), 1);
        assert_eq!(rental_days(date(2024, 1, 10), date(2024, 1, 10)), 1);
    }

    #[test]
    fn test_standard_three_day_rental() {
        let breakdown = compute_breakdown(inputs(3));

        assert_eq!(breakdown.base, 300.0);
        assert_eq!(breakdown.confirmation_fee, 36.0);
        assert_eq!(breakdown.taxable_amount, 264.0);
        assert_eq!(breakdown.government_tax, 33.0);
        assert_eq!(breakdown.permit_fee, 0.0);
        assert_eq!(breakdown.underage_deposit, 0.0);
        assert_eq!(breakdown.damage_deposit, 0.0);
        assert_eq!(breakdown.total, 333.0);
        assert_eq!(breakdown.due_now, 36.0);
        assert_eq!(breakdown.due_at_pickup, 297.0);
    }

    #[test]
    fn test_underage_driver_without_international_license() {
        let mut i = inputs(3);
        i.driver_age = 20;
        i.has_international_license = false;
        let breakdown = compute_breakdown(i);

        assert_eq!(breakdown.permit_fee, 23.0);
        assert_eq!(breakdown.underage_deposit, 1000.0);
        assert_eq!(breakdown.total, 1356.0);
    }

    #[test]
    fn test_damage_deposit_follows_policy() {
        let mut i = inputs(2);
        i.damage_deposit_required = true;
        i.damage_deposit_amount = 250.0;
        let breakdown = compute_breakdown(i);

        assert_eq!(breakdown.damage_deposit, 250.0);
        assert_eq!(breakdown.total, breakdown.base + breakdown.government_tax + 250.0);
        // Deposits settle at delivery, never via the card capture.
        assert_eq!(breakdown.due_now, breakdown.confirmation_fee);
    }

    #[test]
    fn test_total_identity_and_fee_bound_hold_for_all_durations() {
        for days in 1..=60i64 {
            let breakdown = compute_breakdown(inputs(days));
            let sum = breakdown.base
                + breakdown.government_tax
                + breakdown.permit_fee
                + breakdown.underage_deposit
                + breakdown.damage_deposit;
            assert!((breakdown.total - sum).abs() < 1e-9, "total identity broken at {} days", days);
            assert!(breakdown.confirmation_fee < breakdown.base);
            assert!((breakdown.due_now + breakdown.due_at_pickup - breakdown.total).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_day_input_is_clamped() {
        let breakdown = compute_breakdown(inputs(0));
        assert_eq!(breakdown.rental_days, 1);
        assert_eq!(breakdown.base, 100.0);
    }

    #[test]
    fn test_round_currency_only_touches_cents() {
        assert_eq!(round_currency(36.004), 36.0);
        assert_eq!(round_currency(36.006), 36.01);
        assert_eq!(round_currency(297.0), 297.0);
    }
}
