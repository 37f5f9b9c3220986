//! Rupiah display formatting.
//!
//! Traded values are scaled into the Indonesian financial-press bands:
//! triliun (`T`), miliar (`M`) and juta (`Jt`), two decimal places each.
//! Values under a million render as a plain grouped decimal. The function
//! is total for every `f64` input.

const TRILLION: f64 = 1_000_000_000_000.0;
const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;

/// Format a rupiah amount with the largest applicable scale suffix.
pub fn format_rupiah(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return String::from("Rp 0");
    }
    if value < 0.0 {
        return format!("-{}", format_rupiah(-value));
    }

    if value >= TRILLION {
        format!("Rp {:.2} T", value / TRILLION)
    } else if value >= BILLION {
        format!("Rp {:.2} M", value / BILLION)
    } else if value >= MILLION {
        format!("Rp {:.2} Jt", value / MILLION)
    } else {
        format!("Rp {}", group_thousands(value.round() as u64))
    }
}

/// Insert `,` separators every three digits.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
