/// True for text a field may hold while the user is still typing: empty, or
/// ASCII digits with at most one decimal point. Signs and exponents are not
/// numeric-in-progress.
pub fn is_numeric_in_progress(text: &str) -> bool {
    let mut dots = 0usize;
    for c in text.chars() {
        match c {
            '0'..='9' => {}
            '.' => {
                dots += 1;
                if dots > 1 {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}

/// Parse a numeric-in-progress string. `None` means "no value yet": a lone
/// `.`, or a digit run too long to be finite.
pub fn parse_value(text: &str) -> Option<f64> {
    let v: f64 = text.parse().ok()?;
    v.is_finite().then_some(v)
}
