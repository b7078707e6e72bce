/// Integer with thousands separators, e.g. `12,408`.
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

/// First space-separated word of a cluster name.
pub fn short_name(cluster: &str) -> &str {
    cluster.split(' ').next().unwrap_or(cluster)
}

/// Truncation toward zero, saturating; NaN becomes 0.
pub fn truncate_to_int(value: f64) -> i64 {
    value.trunc() as i64
}
