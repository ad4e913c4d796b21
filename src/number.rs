use std::cmp::Ordering;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::errors::CoercionErrorKind;
use crate::types::TypeDescriptor;
use crate::value::Value;

/// Parses `text` at exactly the width of `target`.
pub(crate) fn parse_number(text: &str, target: &TypeDescriptor) -> Result<Value, CoercionErrorKind> {
    let malformed = |e: &dyn std::fmt::Display| CoercionErrorKind::MalformedNumber(e.to_string());
    match target {
        TypeDescriptor::Byte => text.parse::<i8>().map(Value::Byte).map_err(|e| malformed(&e)),
        TypeDescriptor::Short => text.parse::<i16>().map(Value::Short).map_err(|e| malformed(&e)),
        TypeDescriptor::Int => text.parse::<i32>().map(Value::Int).map_err(|e| malformed(&e)),
        TypeDescriptor::Long => text.parse::<i64>().map(Value::Long).map_err(|e| malformed(&e)),
        TypeDescriptor::BigInteger => {
            reject_separators(text)?;
            BigInt::from_str(text)
                .map(Value::BigInteger)
                .map_err(|e| malformed(&e))
        }
        TypeDescriptor::Float => {
            let v = text.parse::<f32>().map_err(|e| malformed(&e))?;
            finite_or_literal(text, v.is_infinite()).map(|_| Value::Float(v))
        }
        TypeDescriptor::Double => {
            let v = text.parse::<f64>().map_err(|e| malformed(&e))?;
            finite_or_literal(text, v.is_infinite()).map(|_| Value::Double(v))
        }
        TypeDescriptor::BigDecimal => {
            reject_separators(text)?;
            BigDecimal::from_str(text)
                .map(Value::BigDecimal)
                .map_err(|e| malformed(&e))
        }
        _ => Err(CoercionErrorKind::UnsupportedTargetType),
    }
}

/// Orders two numeric values of any width by exact decimal value. `None`
/// when either side is not a finite number.
pub fn compare_numbers(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    Some(exact(lhs)?.cmp(&exact(rhs)?))
}

fn exact(v: &Value) -> Option<BigDecimal> {
    match v {
        Value::Byte(n) => Some(BigDecimal::from(i64::from(*n))),
        Value::Short(n) => Some(BigDecimal::from(i64::from(*n))),
        Value::Int(n) => Some(BigDecimal::from(i64::from(*n))),
        Value::Long(n) => Some(BigDecimal::from(*n)),
        Value::BigInteger(n) => Some(BigDecimal::from(n.clone())),
        // shortest round-trip text, so 0.1f32 compares equal to 0.1
        Value::Float(f) => BigDecimal::from_str(&f.to_string()).ok(),
        Value::Double(f) => BigDecimal::from_str(&f.to_string()).ok(),
        Value::BigDecimal(d) => Some(d.clone()),
        _ => None,
    }
}

/// `num-bigint` accepts `_` between digits; plain decimal text does not.
fn reject_separators(text: &str) -> Result<(), CoercionErrorKind> {
    if text.contains('_') {
        Err(CoercionErrorKind::MalformedNumber("invalid digit found in string".into()))
    } else {
        Ok(())
    }
}

/// A finite literal that overflowed to infinity is out of range; an explicit
/// `inf`/`infinity` is not.
fn finite_or_literal(text: &str, infinite: bool) -> Result<(), CoercionErrorKind> {
    let unsigned = text.trim_start_matches(['+', '-']);
    let literal = unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity");
    if infinite && !literal {
        Err(CoercionErrorKind::MalformedNumber("number out of range".into()))
    } else {
        Ok(())
    }
}
