//! Keystroke validation. Runs before any input reaches arithmetic.

/// True for valid partial or complete decimal numbers: the empty string, a
/// lone separator, or digits with at most one separator. Signs, exponents
/// and letters are rejected.
pub fn is_valid_input(text: &str) -> bool {
    let mut seen_separator = false;
    for ch in text.chars() {
        match ch {
            '0'..='9' => {}
            '.' if !seen_separator => seen_separator = true,
            _ => return false,
        }
    }
    true
}

/// Normalize pasted or IME-mangled text into a valid partial decimal:
/// commas become the separator, every other non-digit character is
/// dropped, only the first separator survives, and fractional digits are
/// capped at `max_entry_decimals`.
pub fn sanitize_decimal_amount(text: &str, max_entry_decimals: u32) -> String {
    let mut out = String::with_capacity(text.len());
    let mut seen_separator = false;
    let mut decimals = 0;
    for ch in text.chars() {
        match ch {
            '0'..='9' => {
                if seen_separator {
                    if decimals < max_entry_decimals {
                        out.push(ch);
                        decimals += 1;
                    }
                } else {
                    out.push(ch);
                }
            }
            '.' | ',' if !seen_separator => {
                out.push('.');
                seen_separator = true;
            }
            _ => {}
        }
    }
    out
}
