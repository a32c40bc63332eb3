// Normalization of raw catalog cells and request selectors

/// Substring aliases, checked in order against the uppercased brand.
const BRAND_ALIASES: &[(&str, &str)] = &[
    ("IPHONE", "APPLE"),
    ("APPLE", "APPLE"),
    ("SAMSUNG", "SAMSUNG"),
    ("XIAOMI", "XIAOMI"),
    ("OPPO", "OPPO"),
    ("HONOR", "HONOR"),
    ("TECNO", "TECNO"),
];

/// Parses a numeric cell. Blank, malformed and non-finite values are absent.
/// A decimal comma (`12,5`) is accepted.
pub fn safe_cast(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = match trimmed.parse::<f64>() {
        Ok(v) => v,
        Err(_) => trimmed.replace(',', ".").parse::<f64>().ok()?,
    };
    parsed.is_finite().then_some(parsed)
}

/// Maps a free-form handset brand onto a canonical token; `""` means no filter.
pub fn normalize_brand(value: &str) -> String {
    let upper = value.to_uppercase();
    BRAND_ALIASES
        .iter()
        .find(|(alias, _)| upper.contains(alias))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_default()
}
