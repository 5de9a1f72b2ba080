const EOK: i64 = 100_000_000;
const MAN: i64 = 10_000;

/// Render a won amount as "X억 Y만 원", e.g. `150_000_000` → "1억 5,000만 원".
///
/// Non-positive amounts render as "0 원". Amounts below one 만 have neither
/// unit, so they are shown as plain grouped won ("9,999 원").
pub fn format_korean_won(amount: i64) -> String {
    if amount <= 0 {
        return "0 원".to_string();
    }

    let eok = amount / EOK;
    let man = (amount % EOK) / MAN;

    if eok == 0 && man == 0 {
        return format!("{} 원", group_thousands(amount));
    }

    let mut rendered = String::new();
    if eok > 0 {
        rendered.push_str(&format!("{eok}억 "));
    }
    if man > 0 {
        rendered.push_str(&format!("{}만", group_thousands(man)));
    }
    format!("{} 원", rendered.trim_end())
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}
