/// Parses a px length. A bare number counts as px, like the unit-less
/// values of the style tables.
pub fn parse_px(value: &str) -> Option<f32> {
    let v = value.trim();
    let number = v.strip_suffix("px").unwrap_or(v).trim();
    let num = number.parse::<f32>().ok()?;
    if num.is_finite() {
        Some(num)
    } else {
        None
    }
}

/// Removes a trailing unit suffix (`"14px"`, `"px"` -> `"14"`). Values
/// without the suffix are returned trimmed but otherwise untouched.
pub fn strip_unit(value: &str, unit: &str) -> String {
    let v = value.trim();
    if unit.is_empty() {
        return v.to_string();
    }
    v.strip_suffix(unit).unwrap_or(v).trim().to_string()
}
