//! Materializing recognized options into a variable store.
//!
//! Conversions are permissive on purpose: malformed numeric text never fails
//! the parse. Integers follow `strtoll(.., 0)` (optional sign, `0x` hex, `0`
//! octal, longest valid prefix, saturation on overflow) and floats take the
//! longest decimal prefix independent of locale. Anything unparsable becomes
//! zero and a warning is logged.

use modopts_core::{Limit, ParamKind, ParameterDescriptor, Value, VarType, VariableSink};
use tracing::warn;

/// How the option was spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// `--name` or one of its negated spellings.
    Long { negated: bool },
    /// `-c`.
    Short,
    /// Verbosity counter; carries the counter's new value.
    Verbosity(i64),
}

/// Outcome of a permissive numeric conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion<T> {
    pub value: T,
    /// `false` when trailing text was ignored, nothing was parsed, or the
    /// value saturated.
    pub complete: bool,
}

/// Writes one option occurrence into `sink`.
///
/// `value` is the raw argument for value-taking options and ignored
/// otherwise.
///
/// # Examples
///
/// ```
/// use modopts_cmdline::{Binding, bind};
/// use modopts_core::{ParameterDescriptor, Value, VariableStore};
///
/// let mut store = VariableStore::new();
/// let rate = ParameterDescriptor::integer("rate").with_range(0, 100);
/// bind(&mut store, &rate, Binding::Long { negated: false }, Some("0x1f4"));
///
/// let var = store.get("rate").unwrap();
/// assert_eq!(var.value, Value::Integer(500));
/// assert_eq!(var.range.as_ref().unwrap().max, Value::Integer(100));
/// ```
pub fn bind<S>(sink: &mut S, param: &ParameterDescriptor, binding: Binding, value: Option<&str>)
where
    S: VariableSink + ?Sized,
{
    let name = param.name.as_str();

    if let Binding::Verbosity(count) = binding {
        sink.create(name, VarType::Integer);
        sink.set(name, Value::Integer(count));
        return;
    }

    let text = value.unwrap_or_default();
    match param.kind {
        ParamKind::String => {
            sink.create(name, VarType::String);
            sink.set(name, Value::String(text.to_string()));
        }
        ParamKind::Integer => {
            sink.create(name, VarType::Integer);
            if param.min.is_some() || param.max.is_some() {
                let min = param.min.map_or(i64::MIN, Limit::as_integer);
                let max = param.max.map_or(i64::MAX, Limit::as_integer);
                sink.set_range(name, Value::Integer(min), Value::Integer(max));
            }
            let parsed = parse_integer(text);
            if !parsed.complete {
                warn!(option = name, text, value = parsed.value, "Lossy integer conversion");
            }
            sink.set(name, Value::Integer(parsed.value));
        }
        ParamKind::Float => {
            sink.create(name, VarType::Float);
            if param.min.is_some() || param.max.is_some() {
                let min = param.min.map_or(f64::MIN, Limit::as_float);
                let max = param.max.map_or(f64::MAX, Limit::as_float);
                sink.set_range(name, Value::Float(min), Value::Float(max));
            }
            let parsed = parse_float(text);
            if !parsed.complete {
                warn!(option = name, text, value = parsed.value, "Lossy float conversion");
            }
            sink.set(name, Value::Float(parsed.value));
        }
        ParamKind::Bool => {
            let on = match binding {
                Binding::Long { negated } => !negated,
                _ => true,
            };
            sink.create(name, VarType::Bool);
            sink.set(name, Value::Bool(on));
        }
        ParamKind::Hint => {}
    }
}

/// Parses an integer the way `strtoll(text, NULL, 0)` does.
///
/// # Examples
///
/// ```
/// use modopts_cmdline::parse_integer;
///
/// assert_eq!(parse_integer("42").value, 42);
/// assert_eq!(parse_integer("0x10").value, 16);
/// assert_eq!(parse_integer("010").value, 8);
/// assert_eq!(parse_integer("-7kbps").value, -7);
/// assert!(!parse_integer("-7kbps").complete);
/// assert_eq!(parse_integer("abc").value, 0);
/// ```
pub fn parse_integer(text: &str) -> Conversion<i64> {
    let s = text.trim_start();
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let hex_body = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_hexdigit()));
    let (radix, digits) = match hex_body {
        Some(rest) => (16, rest),
        None if unsigned.starts_with('0') => (8, unsigned),
        None => (10, unsigned),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return Conversion {
            value: 0,
            complete: false,
        };
    }

    let mut magnitude: u128 = 0;
    let mut overflow = false;
    for c in digits[..end].chars() {
        let digit = u128::from(c.to_digit(radix).unwrap_or(0));
        magnitude = magnitude * u128::from(radix) + digit;
        if magnitude > u128::from(u64::MAX) {
            overflow = true;
            magnitude = u128::from(u64::MAX);
        }
    }

    let value = if negative {
        if magnitude > i64::MAX as u128 + 1 {
            overflow = true;
            i64::MIN
        } else {
            (magnitude as i128).wrapping_neg() as i64
        }
    } else if magnitude > i64::MAX as u128 {
        overflow = true;
        i64::MAX
    } else {
        magnitude as i64
    };

    Conversion {
        value,
        complete: end == digits.len() && !overflow,
    }
}

/// Parses the longest decimal floating point prefix of `text`.
///
/// Always uses `.` as the decimal separator. Accepts `inf`, `infinity` and
/// `nan` in any case.
///
/// # Examples
///
/// ```
/// use modopts_cmdline::parse_float;
///
/// assert_eq!(parse_float("1.5").value, 1.5);
/// assert_eq!(parse_float(" -2e3x").value, -2000.0);
/// assert_eq!(parse_float("1,5").value, 1.0);
/// assert_eq!(parse_float("").value, 0.0);
/// ```
pub fn parse_float(text: &str) -> Conversion<f64> {
    let s = text.trim_start();
    let end = float_prefix_len(s);
    match s[..end].parse::<f64>() {
        Ok(value) if end > 0 => Conversion {
            value,
            complete: end == s.len(),
        },
        _ => Conversion {
            value: 0.0,
            complete: false,
        },
    }
}

fn float_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let word = &s[i..];
    for special in ["infinity", "inf", "nan"] {
        if word
            .get(..special.len())
            .is_some_and(|w| w.eq_ignore_ascii_case(special))
        {
            return i + special.len();
        }
    }

    let mut digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return 0;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use modopts_core::VariableStore;

    use super::*;

    #[test]
    fn test_bind_string_verbatim() {
        let mut store = VariableStore::new();
        let bind_param = ParameterDescriptor::string("bind");
        bind(&mut store, &bind_param, Binding::Short, Some(" a\\b \"c\" "));
        assert_eq!(
            store.value("bind"),
            Some(&Value::String(" a\\b \"c\" ".to_string()))
        );
    }

    #[test]
    fn test_bind_bool_polarity() {
        let mut store = VariableStore::new();
        let param = ParameterDescriptor::boolean("audio");

        bind(&mut store, &param, Binding::Long { negated: true }, None);
        assert_eq!(store.value("audio"), Some(&Value::Bool(false)));
        bind(&mut store, &param, Binding::Long { negated: false }, Some("ignored"));
        assert_eq!(store.value("audio"), Some(&Value::Bool(true)));
        bind(&mut store, &param, Binding::Long { negated: true }, None);
        bind(&mut store, &param, Binding::Short, None);
        assert_eq!(store.value("audio"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_bind_verbosity_ignores_kind() {
        let mut store = VariableStore::new();
        let param = ParameterDescriptor::boolean("verbose");
        bind(&mut store, &param, Binding::Verbosity(2), None);
        assert_eq!(store.value("verbose"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_bind_integer_with_open_range() {
        let mut store = VariableStore::new();
        let mut param = ParameterDescriptor::integer("port");
        param.min = Some(Limit::Integer(1));
        bind(&mut store, &param, Binding::Short, Some("8080"));

        let range = store.get("port").unwrap().range.clone().unwrap();
        assert_eq!(range.min, Value::Integer(1));
        assert_eq!(range.max, Value::Integer(i64::MAX));
    }

    #[test]
    fn test_bind_integer_without_range() {
        let mut store = VariableStore::new();
        let param = ParameterDescriptor::integer("port");
        bind(&mut store, &param, Binding::Short, Some("nope"));

        let var = store.get("port").unwrap();
        assert_eq!(var.value, Value::Integer(0));
        assert!(var.range.is_none());
    }

    #[test]
    fn test_bind_float_range() {
        let mut store = VariableStore::new();
        let param = ParameterDescriptor::float("gain").with_range(0.0, 2.0);
        bind(&mut store, &param, Binding::Long { negated: false }, Some("3.25"));

        assert_eq!(store.value("gain"), Some(&Value::Float(3.25)));
        assert_eq!(store.clamped("gain"), Some(Value::Float(2.0)));
    }

    #[test]
    fn test_parse_integer_edge_cases() {
        assert_eq!(parse_integer("  +12").value, 12);
        assert_eq!(parse_integer("0").value, 0);
        assert!(parse_integer("0").complete);
        assert_eq!(parse_integer("08").value, 0);
        assert!(!parse_integer("08").complete);
        assert_eq!(parse_integer("0x").value, 0);
        assert_eq!(parse_integer("-0X1F").value, -31);
        assert_eq!(parse_integer("").value, 0);
        assert_eq!(parse_integer("-").value, 0);
    }

    #[test]
    fn test_parse_integer_saturates() {
        let big = parse_integer("99999999999999999999999");
        assert_eq!(big.value, i64::MAX);
        assert!(!big.complete);

        let small = parse_integer("-9223372036854775809");
        assert_eq!(small.value, i64::MIN);
        assert!(!small.complete);

        let min = parse_integer("-9223372036854775808");
        assert_eq!(min.value, i64::MIN);
        assert!(min.complete);
    }

    #[test]
    fn test_parse_float_forms() {
        assert_eq!(parse_float(".5").value, 0.5);
        assert_eq!(parse_float("5.").value, 5.0);
        assert_eq!(parse_float("1e").value, 1.0);
        assert!(!parse_float("1e").complete);
        assert_eq!(parse_float("-INF").value, f64::NEG_INFINITY);
        assert!(parse_float("nan").value.is_nan());
        assert_eq!(parse_float(".").value, 0.0);
        assert!(!parse_float("abc").complete);
    }
}
