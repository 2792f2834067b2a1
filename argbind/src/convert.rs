//! Text-to-value conversion for bound variables.
//!
//! Conversion is total: malformed numbers become zero (or whatever prefix
//! parsed), matching the permissive behaviour of the C numeric scanners.

use std::borrow::Cow;
use std::cell::RefCell;
use std::ffi::OsString;
use std::path::PathBuf;

/// Non-owning handle to a caller variable, valid for one parse.
///
/// `Shared` lets several bindings write the same variable, e.g. a set of
/// mutually exclusive flags that each store a different constant.
pub enum Target<'a, T> {
    Exclusive(&'a mut T),
    Shared(&'a RefCell<T>),
}

impl<T> Target<'_, T> {
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        match self {
            Target::Exclusive(var) => f(&mut **var),
            Target::Shared(cell) => f(&mut *cell.borrow_mut()),
        }
    }

    pub fn set(&mut self, value: T) {
        self.update(|var| *var = value);
    }
}

impl<'a, T> From<&'a mut T> for Target<'a, T> {
    fn from(var: &'a mut T) -> Self {
        Target::Exclusive(var)
    }
}

impl<'a, T> From<&'a RefCell<T>> for Target<'a, T> {
    fn from(cell: &'a RefCell<T>) -> Self {
        Target::Shared(cell)
    }
}

/// A type that a command-line token can be written into.
pub trait FromArg: Sized {
    /// Whether values of this type can be collected by an accumulator.
    /// Fixed-size text buffers cannot: their logical length is not tracked.
    const ACCUMULABLE: bool = true;

    fn from_arg(text: &str) -> Self;
}

impl FromArg for String {
    fn from_arg(text: &str) -> Self {
        text.to_string()
    }
}

impl FromArg for PathBuf {
    fn from_arg(text: &str) -> Self {
        PathBuf::from(text)
    }
}

impl FromArg for OsString {
    fn from_arg(text: &str) -> Self {
        OsString::from(text)
    }
}

impl FromArg for char {
    fn from_arg(text: &str) -> Self {
        text.chars().next().unwrap_or('\0')
    }
}

impl FromArg for bool {
    fn from_arg(text: &str) -> Self {
        !matches!(text, "" | "0" | "false" | "no")
    }
}

/// Sign and saturated magnitude of the leading integer, `strtol` style.
fn scan_integer(text: &str) -> Option<(bool, u128)> {
    let s = text.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut seen = false;
    let mut magnitude: u128 = 0;
    for d in rest.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        magnitude = magnitude
            .saturating_mul(10)
            .saturating_add(u128::from(d - b'0'));
    }
    seen.then_some((negative, magnitude))
}

macro_rules! signed_from_arg {
    ($($t:ty),*) => {$(
        impl FromArg for $t {
            fn from_arg(text: &str) -> Self {
                let Some((negative, magnitude)) = scan_integer(text) else {
                    return 0;
                };
                let magnitude = i128::try_from(magnitude).unwrap_or(i128::MAX);
                let value = if negative { -magnitude } else { magnitude };
                <$t>::try_from(value).unwrap_or(if negative { <$t>::MIN } else { <$t>::MAX })
            }
        }
    )*};
}

// Negative input wraps, as strtoul does; overflow saturates.
macro_rules! unsigned_from_arg {
    ($($t:ty),*) => {$(
        impl FromArg for $t {
            fn from_arg(text: &str) -> Self {
                let Some((negative, magnitude)) = scan_integer(text) else {
                    return 0;
                };
                match <$t>::try_from(magnitude) {
                    Ok(v) if negative => v.wrapping_neg(),
                    Ok(v) => v,
                    Err(_) => <$t>::MAX,
                }
            }
        }
    )*};
}

signed_from_arg!(i8, i16, i32, i64, i128, isize);
unsigned_from_arg!(u8, u16, u32, u64, u128, usize);

/// Longest leading floating-point literal, `strtod` style.
fn scan_float(text: &str) -> f64 {
    let s = text.trim_start();
    let b = s.as_bytes();
    let signed = matches!(b.first(), Some(b'+' | b'-'));
    let start = usize::from(signed);
    let negative = b.first() == Some(&b'-');

    let rest = &s[start..];
    let starts_with_word = |word: &str| {
        rest.get(..word.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(word))
    };
    if starts_with_word("inf") {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }
    if starts_with_word("nan") {
        return f64::NAN;
    }

    let digits_from = |from: usize| {
        from + b.get(from..).map_or(0, |tail| {
            tail.iter().take_while(|c| c.is_ascii_digit()).count()
        })
    };
    let int_end = digits_from(start);
    let mut end = int_end;
    let mut mantissa = int_end > start;
    if b.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if mantissa || frac_end > end + 1 {
            mantissa = true;
            end = frac_end;
        }
    }
    if !mantissa {
        return 0.0;
    }
    if matches!(b.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(b.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse().unwrap_or(0.0)
}

impl FromArg for f64 {
    fn from_arg(text: &str) -> Self {
        scan_float(text)
    }
}

impl FromArg for f32 {
    fn from_arg(text: &str) -> Self {
        scan_float(text) as f32
    }
}

/// A NUL-terminated text buffer. At most `N - 1` bytes are copied.
impl<const N: usize> FromArg for [u8; N] {
    const ACCUMULABLE: bool = false;

    fn from_arg(text: &str) -> Self {
        let mut buf = [0u8; N];
        let n = text.len().min(N.saturating_sub(1));
        buf[..n].copy_from_slice(&text.as_bytes()[..n]);
        buf
    }
}

/// The text stored in a NUL-terminated buffer.
pub fn buffer_text(buf: &[u8]) -> Cow<'_, str> {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end])
}
