//! Display formatting for USD amounts, prices, and percentages.

/// Format a USD amount with a B/M/K suffix, e.g. `$2.97B`.
pub fn format_usd(amount: f64, decimals: usize) -> String {
    if amount >= 1_000_000_000.0 {
        format!("${:.*}B", decimals, amount / 1_000_000_000.0)
    } else if amount >= 1_000_000.0 {
        format!("${:.*}M", decimals, amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("${:.*}K", decimals, amount / 1_000.0)
    } else {
        format!("${:.*}", decimals, amount)
    }
}

/// Format a fractional rate as a signed percentage, e.g. `+1.25%`.
pub fn format_percent(rate: f64) -> String {
    let sign = if rate >= 0.0 { "+" } else { "" };
    format!("{sign}{:.2}%", rate * 100.0)
}

/// Format a price with precision tiered by magnitude.
///
/// Large prices get two decimals with thousands separators, mid-range four,
/// sub-dollar six.
pub fn format_price(price: f64) -> String {
    if price >= 1000.0 {
        let formatted = format!("{price:.2}");
        group_thousands(&formatted)
    } else if price >= 1.0 {
        format!("{price:.4}")
    } else {
        format!("{price:.6}")
    }
}

/// Format a PnL figure with an explicit sign and M/K suffix, e.g. `+$1.20M`.
pub fn format_pnl(pnl: f64) -> String {
    let sign = if pnl >= 0.0 { "+" } else { "-" };
    let abs = pnl.abs();
    if abs >= 1_000_000.0 {
        format!("{sign}${:.2}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{sign}${:.2}K", abs / 1_000.0)
    } else {
        format!("{sign}${abs:.2}")
    }
}

/// Format an APY fraction as a signed percentage, e.g. `+12.00%`.
pub fn format_apy(apy: f64) -> String {
    format_percent(apy)
}

fn group_thousands(formatted: &str) -> String {
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}
