//! Brazilian-Portuguese currency formatting for amounts shown to the user.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Format an amount as Brazilian Real currency text, e.g. `R$ 1.234,56`.
///
/// Negative amounts are rendered with a leading minus sign (`-R$ 40,00`).
pub fn format_brl(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("R$ ")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-R$ ")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "R$ 0,00".to_owned();
    };

    // numfmt omits trailing zeros, so we must add them ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if !formatted_string.contains('.') {
        formatted_string.push_str(".00");
    } else if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string.push('0');
    }

    // numfmt only supports US-style separators, so swap them for pt-BR.
    formatted_string
        .chars()
        .map(|c| match c {
            ',' => '.',
            '.' => ',',
            c => c,
        })
        .collect()
}
