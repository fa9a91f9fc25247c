/// How counters are printed on the stats card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum NumberFormat {
    /// `6600` -> `6.6k`
    #[default]
    Short,
    /// `6600` -> `6,600`
    Long,
}

/// Compacts values into thousands.
///
/// Without a precision, values under 1000 are printed as-is and larger ones
/// get one decimal with a trailing `.0` dropped. With a precision every
/// value is printed in thousands with exactly that many decimals.
pub fn k_format(num: u64, precision: Option<u8>) -> String {
    let thousands = num as f64 / 1000.0;
    match precision {
        Some(p) => format!("{thousands:.prec$}k", prec = p as usize),
        None if num < 1000 => num.to_string(),
        None => {
            let s = format!("{thousands:.1}");
            let s = s.strip_suffix(".0").unwrap_or(&s);
            format!("{s}k")
        }
    }
}

/// `1234567` -> `1,234,567`
pub fn group_digits(num: u64) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_count(num: u64, format: NumberFormat, precision: Option<u8>) -> String {
    match format {
        NumberFormat::Short => k_format(num, precision),
        NumberFormat::Long => group_digits(num),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_format_compacts_thousands() {
        assert_eq!(k_format(6600, None), "6.6k");
        assert_eq!(k_format(1000, None), "1k");
        assert_eq!(k_format(999, None), "999");
        assert_eq!(k_format(0, None), "0");
        assert_eq!(k_format(12_345, None), "12.3k");
    }

    #[test]
    fn short_format_honors_precision() {
        assert_eq!(k_format(6626, Some(2)), "6.63k");
        assert_eq!(k_format(6600, Some(0)), "7k");
        assert_eq!(k_format(500, Some(1)), "0.5k");
    }

    #[test]
    fn long_format_groups_digits() {
        assert_eq!(group_digits(6600), "6,600");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1_234_567), "1,234,567");
        assert_eq!(group_digits(100_000), "100,000");
        assert_eq!(format_count(6600, NumberFormat::Long, Some(2)), "6,600");
    }
}
