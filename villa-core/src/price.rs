const CRORE_MARKER: &str = "Cr";
const LAKH_MARKER: &str = "L";
const LAKHS_PER_CRORE: f64 = 100.0;

/// Parses a display price into lakhs.
///
/// "₹ 75 L" is 75, "₹ 1.2 Cr" is 120. A string carrying neither unit, or no
/// digits at all, yields 0 and therefore passes every max-price filter and
/// sorts ahead of real prices.
pub fn parse_price(price: &str) -> f64 {
    if price.contains(CRORE_MARKER) {
        numeric_part(price) * LAKHS_PER_CRORE
    } else if price.contains(LAKH_MARKER) {
        numeric_part(price)
    } else {
        0.0
    }
}

/// Formats a lakh amount the way the listing slider labels it.
pub fn format_lakhs(lakhs: f64) -> String {
    if lakhs >= LAKHS_PER_CRORE {
        format!("₹ {} Cr", trim_float(lakhs / LAKHS_PER_CRORE))
    } else {
        format!("₹ {} L", trim_float(lakhs))
    }
}

fn trim_float(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

// Strips everything but digits and dots, then reads the longest decimal prefix.
fn numeric_part(price: &str) -> f64 {
    let digits: String = price
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut end = 0;
    let mut seen_dot = false;
    for (idx, ch) in digits.char_indices() {
        if ch == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
        }
        end = idx + ch.len_utf8();
    }

    digits[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lakhs() {
        assert_eq!(parse_price("₹ 75 L"), 75.0);
        assert_eq!(parse_price("₹ 9 L"), 9.0);
        assert_eq!(parse_price("₹25 L"), 25.0);
    }

    #[test]
    fn parses_crores_as_hundred_lakhs() {
        assert!((parse_price("₹ 1.2 Cr") - 120.0).abs() < 1e-9);
        assert_eq!(parse_price("₹ 2 Cr"), 200.0);
    }

    #[test]
    fn unrecognised_formats_are_zero() {
        assert_eq!(parse_price("Price on Request"), 0.0);
        assert_eq!(parse_price(""), 0.0);
        assert_eq!(parse_price("₹ 50,00,000"), 0.0);
    }

    #[test]
    fn unit_without_digits_is_zero() {
        assert_eq!(parse_price("Call for L"), 0.0);
        assert_eq!(parse_price(". Cr"), 0.0);
    }

    #[test]
    fn reads_leading_decimal_only() {
        assert!((parse_price("₹ 1.2.3 Cr") - 120.0).abs() < 1e-9);
    }

    #[test]
    fn formats_slider_labels() {
        assert_eq!(format_lakhs(5.0), "₹ 5 L");
        assert_eq!(format_lakhs(200.0), "₹ 2 Cr");
        assert_eq!(format_lakhs(120.0), "₹ 1.2 Cr");
    }
}
