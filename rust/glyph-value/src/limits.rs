//! Resource limits: integer size and printed digit count.

use tracing::debug;

use glyph_core::{EvalError, Limit, Result};

use crate::context::Context;
use crate::value::Value;

/// Refuse to build an integer of `bits` bits when `max_bits` is set.
pub fn check_bits(ctx: &dyn Context, op: &str, bits: u64) -> Result<()> {
    let max = ctx.config().max_bits;
    if max != 0 && bits > max {
        debug!(op, bits, max, "integer size limit reached");
        return Err(EvalError::limit(
            op,
            Limit::Bits,
            format!("result needs about {} bits, limit is {}", bits, max),
        ));
    }
    Ok(())
}

/// Size in bits of the integer parts of a scalar result.
fn value_bits(v: &Value) -> u64 {
    match v {
        Value::BigInt(i) => i.bits(),
        Value::BigRat(r) => r.numer().bits().max(r.denom().bits()),
        Value::Complex(c) => value_bits(c.re()).max(value_bits(c.im())),
        _ => 0,
    }
}

/// Post-check a freshly computed scalar.
pub fn check_value(ctx: &dyn Context, op: &str, v: &Value) -> Result<()> {
    check_bits(ctx, op, value_bits(v))
}

/// Refuse to print an integer with more than `max_digits` decimal digits.
pub fn check_digits(ctx: &dyn Context, op: &str, v: &Value) -> Result<()> {
    let max = ctx.config().max_digits;
    if max == 0 {
        return Ok(());
    }
    let digits = (value_bits(v) as f64 * std::f64::consts::LOG10_2).ceil() as u64;
    if digits > max {
        debug!(op, digits, max, "digit limit reached");
        return Err(EvalError::limit(
            op,
            Limit::Digits,
            format!("about {} digits, limit is {}", digits, max),
        ));
    }
    match v {
        Value::Vector(vec) => vec.iter().try_for_each(|e| check_digits(ctx, op, e)),
        Value::Matrix(m) => m.data().iter().try_for_each(|e| check_digits(ctx, op, e)),
        _ => Ok(()),
    }
}
