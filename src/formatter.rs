// Display formatting for offer fields and promotional pricing

const MB_PER_GB: f64 = 1024.0;
const PROMO_RATE: f64 = 0.75;
pub const UNLIMITED_MINUTES: &str = "unlimited";

/// Data volume given in MB: `"1.5 Go"` from 1024 MB upwards, `"512 Mo"` below.
pub fn format_volume(mb: Option<f64>) -> Option<String> {
    let mb = mb.filter(|v| v.is_finite())?;
    if mb >= MB_PER_GB {
        let gb = mb / MB_PER_GB;
        if (gb - gb.round()).abs() < 1e-6 {
            return Some(format!("{} Go", gb.round() as i64));
        }
        let label = format!("{:.1}", gb);
        let label = label.strip_suffix(".0").unwrap_or(&label);
        return Some(format!("{} Go", label));
    }
    Some(format!("{} Mo", mb.trunc() as i64))
}

/// Minutes are truncated to an integer; a negative count means unlimited.
pub fn format_minutes(minutes: Option<f64>) -> Option<String> {
    let mins = minutes.filter(|v| v.is_finite())?.trunc() as i64;
    if mins < 0 {
        return Some(UNLIMITED_MINUTES.to_string());
    }
    Some(format!("{} min", mins))
}

pub fn format_validity(days: Option<f64>) -> Option<String> {
    let days = days.filter(|v| v.is_finite())?;
    Some(format!("{} jours", days.trunc() as i64))
}

pub fn format_sms(count: Option<f64>) -> Option<i64> {
    count.filter(|v| v.is_finite()).map(|v| v.trunc() as i64)
}

/// 75% of the base price, rounded half-to-even, never below 1.
pub fn promo_price(price: Option<f64>) -> Option<i64> {
    let price = price.filter(|v| v.is_finite())?;
    let promo = (price * PROMO_RATE).round_ties_even() as i64;
    Some(promo.max(1))
}
