//! Cost and risk signals attached to each candidate pairing.
//!
//! All flags are informational: they annotate candidates, they never
//! filter them.

use jiff::civil::Date;
use rust_decimal::Decimal;

/// The ingress-protection marker that clears a drone to fly in rain.
/// A single hard-coded threshold, not a general resistance model.
const RAIN_RATING: &str = "IP43";

/// Mission cost: daily rate × duration in days.
///
/// `None` when either input is indeterminate. No coercion happens here;
/// the normalizer already produced these values.
pub fn mission_cost(daily_rate: Option<Decimal>, duration_days: Option<i32>) -> Option<Decimal> {
    Some(daily_rate? * Decimal::from(duration_days?))
}

/// True when the cost strictly exceeds the budget. An indeterminate cost
/// or budget is not comparable, so no warning.
pub fn budget_warning(cost: Option<Decimal>, budget: Option<Decimal>) -> bool {
    match (cost, budget) {
        (Some(cost), Some(budget)) => cost > budget,
        _ => false,
    }
}

/// True when the forecast is "rainy" (any case) and the drone's resistance
/// text lacks the IP43 marker. Any other forecast is risk-free regardless
/// of the rating.
pub fn weather_risk(forecast: &str, resistance: &str) -> bool {
    forecast.eq_ignore_ascii_case("rainy") && !resistance.contains(RAIN_RATING)
}

/// True when maintenance falls due on or before the mission start.
/// An unscheduled (`None`) due date is never a risk.
pub fn maintenance_risk(maintenance_due: Option<Date>, mission_start: Date) -> bool {
    maintenance_due.is_some_and(|due| due <= mission_start)
}
