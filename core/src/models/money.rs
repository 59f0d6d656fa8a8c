// core/src/models/money.rs

/// Renders an amount held in minor units, e.g. `format_money(120_000, "KES") == "KES 1200.00"`.
pub fn format_money(amount_cents: i64, currency: &str) -> String {
  let sign = if amount_cents < 0 { "-" } else { "" };
  let abs = amount_cents.unsigned_abs();
  format!("{} {}{}.{:02}", currency, sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
  use super::format_money;

  #[test]
  fn formats_minor_units() {
    assert_eq!(format_money(120_000, "KES"), "KES 1200.00");
    assert_eq!(format_money(5, "USD"), "USD 0.05");
    assert_eq!(format_money(0, "KES"), "KES 0.00");
  }
}
