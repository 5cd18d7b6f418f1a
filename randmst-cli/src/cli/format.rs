//! Number formatting for the text report.

use std::fmt;

/// Significant digits printed for every floating-point value.
const SIGNIFICANT_DIGITS: usize = 6;

/// Shortest fixed or scientific rendering with six significant digits.
///
/// Fixed notation is used for decimal exponents in `-4..6`, scientific
/// notation with a signed, two-digit exponent otherwise. Trailing zeros and a
/// trailing decimal point are removed. Width and alignment flags apply to the
/// whole rendering.
#[derive(Clone, Copy, Debug)]
pub(crate) struct General(pub(crate) f64);

impl fmt::Display for General {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value == 0.0 {
            return f.pad("0");
        }
        if !value.is_finite() {
            return f.pad(&value.to_string());
        }

        let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);
        let Some((mantissa, exponent)) = scientific.split_once('e') else {
            return f.pad(&scientific);
        };
        let Ok(exponent) = exponent.parse::<i32>() else {
            return f.pad(&scientific);
        };

        match usize::try_from(5 - exponent) {
            Ok(decimals) if exponent >= -4 => {
                let fixed = format!("{value:.decimals$}");
                f.pad(trim_fraction(&fixed))
            }
            _ => {
                let sign = if exponent < 0 { '-' } else { '+' };
                let rendered = format!(
                    "{}e{sign}{:02}",
                    trim_fraction(mantissa),
                    exponent.unsigned_abs()
                );
                f.pad(&rendered)
            }
        }
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::zero(0.0, "0")]
    #[case::negative_zero(-0.0, "0")]
    #[case::integral(16.0, "16")]
    #[case::short_fraction(0.9, "0.9")]
    #[case::float_noise(0.1 + 0.2, "0.3")]
    #[case::rounded(28.975_126_680_789_03, "28.9751")]
    #[case::small_fixed(0.000_123_456_7, "0.000123457")]
    #[case::rounds_up_to_next_decade(9.999_999_7, "10")]
    #[case::large_fixed(123_456.4, "123456")]
    #[case::large_scientific(1_234_567.0, "1.23457e+06")]
    #[case::tiny_scientific(0.000_012_5, "1.25e-05")]
    #[case::negative(-2.5, "-2.5")]
    fn renders_six_significant_digits(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(General(value).to_string(), expected);
    }

    #[test]
    fn honours_width_and_alignment() {
        assert_eq!(format!("{:>10}", General(0.5)), "       0.5");
        assert_eq!(format!("{:>10}", General(1.414_213_56)), "   1.41421");
    }
}
