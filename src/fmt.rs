/// Amount followed by the currency symbol, no separators: 4500₸
pub fn money(amount: i64, currency: &str) -> String {
    format!("{amount}{currency}")
}

/// Amount with thousands separators for table output: 1,234,500 ₸
pub fn money_grouped(amount: i64, currency: &str) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();

    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{with_commas} {currency}")
    } else {
        format!("{with_commas} {currency}")
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
