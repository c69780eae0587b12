//! Philippine peso formatting for display code.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views render prices, payments, and fees through these helpers so every
//! amount shows two fraction digits with en-PH digit grouping. Inputs arrive
//! as numbers or as raw strings from forms and API payloads; anything that is
//! not a number formats as zero instead of failing.

#[cfg(test)]
#[path = "currency_test.rs"]
mod currency_test;

/// The peso sign.
pub const PESO_SIGN: &str = "₱";

/// A value that can be coerced to a peso amount.
///
/// Coercion never fails: unparsable or missing input becomes `0`.
pub trait PesoAmount {
    /// Raw numeric value before zero-normalization (may be `NaN`).
    fn raw_amount(&self) -> f64;
}

macro_rules! impl_peso_amount_for_numbers {
    ($($ty:ty),*) => {
        $(
            impl PesoAmount for $ty {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless, clippy::unnecessary_cast)]
                fn raw_amount(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

impl_peso_amount_for_numbers!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl PesoAmount for str {
    fn raw_amount(&self) -> f64 {
        parse_float_prefix(self)
    }
}

impl PesoAmount for String {
    fn raw_amount(&self) -> f64 {
        parse_float_prefix(self)
    }
}

impl<T: PesoAmount> PesoAmount for Option<T> {
    fn raw_amount(&self) -> f64 {
        self.as_ref().map_or(f64::NAN, PesoAmount::raw_amount)
    }
}

impl<T: PesoAmount + ?Sized> PesoAmount for &T {
    fn raw_amount(&self) -> f64 {
        (**self).raw_amount()
    }
}

/// Format `amount` with en-PH grouping and exactly two fraction digits.
///
/// `format_peso(1234.5)` is `"1,234.50"`; `format_peso("abc")` is `"0.00"`.
pub fn format_peso(amount: impl PesoAmount) -> String {
    render(coerce(amount.raw_amount()))
}

/// Format `amount` prefixed with the peso sign, e.g. `"₱5.00"`.
pub fn format_with_symbol(amount: impl PesoAmount) -> String {
    format!("{PESO_SIGN}{}", format_peso(amount))
}

/// The fixed currency sign.
#[must_use]
pub fn currency_symbol() -> &'static str {
    PESO_SIGN
}

/// `NaN` and both zeroes collapse to positive zero.
fn coerce(raw: f64) -> f64 {
    if raw.is_nan() || raw == 0.0 { 0.0 } else { raw }
}

/// Parse the longest leading decimal literal of `raw`, ignoring leading
/// whitespace. Returns `NaN` when no literal is present.
fn parse_float_prefix(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn render(value: f64) -> String {
    if value.is_infinite() {
        return if value < 0.0 { "-∞".to_owned() } else { "∞".to_owned() };
    }

    let fixed = round_to_cents(value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut out = String::with_capacity(fixed.len() + whole.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    out.push('.');
    out.push_str(cents);
    out
}

/// Two-digit fixed rendering of a non-negative value.
///
/// Rounding works on the shortest decimal that round-trips to `abs`, half
/// away from zero, so `1.005` renders as `1.01` and digits past the
/// seventeenth significant one are zeros.
fn round_to_cents(abs: f64) -> String {
    let sci = format!("{abs:e}");
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i64 = exponent.parse().unwrap_or(0);
    let digits: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).map(|b| b - b'0').collect();

    // Digits left of the decimal point once the value is scaled to cents.
    let point = exponent + 3;
    let kept = usize::try_from(point).unwrap_or(0);
    let mut cents: Vec<u8> = (0..kept).map(|i| digits.get(i).copied().unwrap_or(0)).collect();
    let round_up = usize::try_from(point)
        .ok()
        .and_then(|p| digits.get(p))
        .is_some_and(|&d| d >= 5);
    if round_up {
        increment(&mut cents);
    }
    while cents.len() < 3 {
        cents.insert(0, 0);
    }

    let text: String = cents.iter().map(|&d| char::from(b'0' + d)).collect();
    let (whole, frac) = text.split_at(text.len() - 2);
    format!("{whole}.{frac}")
}

fn increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, 1);
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
