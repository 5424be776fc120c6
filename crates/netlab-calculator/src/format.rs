//! Display formatting shared by the calculators.

/// Fixed number of decimals, e.g. `fixed(2.456, 2) == "2.46"`.
pub fn fixed(value: f64, decimals: usize) -> String {
    let rendered = format!("{value:.decimals$}");
    // "-0.00" is not a useful reading
    if rendered.starts_with('-') && rendered[1..].chars().all(|c| c == '0' || c == '.') {
        rendered[1..].to_string()
    } else {
        rendered
    }
}

/// Up to `max_decimals` decimals with trailing zeros dropped: `compact(6.0, 2) == "6"`.
pub fn compact(value: f64, max_decimals: usize) -> String {
    let rendered = fixed(value, max_decimals);
    if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        rendered
    }
}

/// Thousands-grouped number with a fixed number of decimals: `65,534` or `1,536.50`.
pub fn grouped(value: f64, decimals: usize) -> String {
    let rendered = fixed(value, decimals);
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(rendered.len() + whole.len() / 3);
    out.push_str(sign);
    out.push_str(&group_digits(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Thousands-grouped integer.
pub fn grouped_integer(value: u64) -> String {
    group_digits(&value.to_string())
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
