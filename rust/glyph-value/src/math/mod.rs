//! Transcendental functions from first principles.
//!
//! Kernels work on `BigInt` fixed-point values scaled by `2^w`, where the
//! working width `w` carries guard bits beyond the session precision. The
//! value-level functions below them choose between the real kernel, a
//! complex continuation, and a domain error.

pub mod consts;
mod exp;
mod hyp;
mod log;
mod power;
mod trig;

use num_bigint::BigInt;
use num_traits::One;
use tracing::debug;

use glyph_core::{EvalError, Result};

use crate::bigfloat::BigFloat;
use crate::context::Context;
use crate::value::Value;

pub(crate) use exp::exp;
pub(crate) use hyp::{acosh, asinh, atanh, cosh, sinh, tanh};
pub(crate) use log::{log, log_base};
pub(crate) use power::{pow, sqrt};
pub(crate) use trig::{acos, asin, atan, cos, sin, tan};

pub(crate) fn fx_one(w: u32) -> BigInt {
    BigInt::one() << w
}

pub(crate) fn fx_mul(a: &BigInt, b: &BigInt, w: u32) -> BigInt {
    (a * b) >> w
}

pub(crate) fn fx_div(a: &BigInt, b: &BigInt, w: u32) -> BigInt {
    (a << w) / b
}

/// Real scalar as a float. A float operand keeps its own precision.
pub(crate) fn to_float(ctx: &dyn Context, op: &str, v: &Value) -> Result<BigFloat> {
    let prec = ctx.config().float_prec;
    match v {
        Value::Int(i) => Ok(BigFloat::from_i64(*i, prec)),
        Value::BigInt(i) => Ok(BigFloat::from_bigint(i, prec)),
        Value::BigRat(r) => Ok(BigFloat::from_ratio(r, prec)),
        Value::BigFloat(f) => Ok(f.clone()),
        other => Err(EvalError::internal(format!(
            "{}: expected a real number, got {}",
            op,
            other.kind()
        ))),
    }
}

/// Reject infinite arguments for functions with no limit there.
pub(crate) fn finite(op: &str, x: &BigFloat) -> Result<()> {
    if x.is_inf() {
        return Err(EvalError::domain(
            op,
            x.to_decimal_string(12),
            "argument is infinite",
        ));
    }
    Ok(())
}

/// Extra fractional bits needed to keep relative accuracy for small `x`.
pub(crate) fn small_guard(x: &BigFloat) -> u32 {
    if x.is_zero() || x.is_inf() {
        0
    } else {
        (-x.top()).clamp(0, u32::MAX as i64 / 2) as u32
    }
}

/// True when `x` is so small that `f(x) = x` to within the precision,
/// for the odd functions whose series start `x ± x³/k`.
pub(crate) fn below_cubic(x: &BigFloat, prec: u32) -> bool {
    !x.is_zero() && x.is_finite() && 2 * x.top() < -(prec as i64) - 2
}

fn continuation(op: &str, v: &Value) {
    debug!(op, operand = %v.describe(), "continuing into the complex plane");
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::bigfloat::BigFloat;
    use crate::value::Value;

    pub fn approx(v: &Value) -> f64 {
        match v {
            Value::Int(i) => *i as f64,
            Value::BigFloat(f) => f.to_f64(),
            Value::BigRat(r) => {
                use num_traits::ToPrimitive;
                r.to_f64().unwrap_or(f64::NAN)
            }
            other => panic!("not a real number: {:?}", other),
        }
    }

    pub fn close(v: &Value, want: f64) -> bool {
        let got = approx(v);
        (got - want).abs() <= 1e-12 * want.abs().max(1.0)
    }

    pub fn float(v: &Value) -> BigFloat {
        match v {
            Value::BigFloat(f) => f.clone(),
            other => panic!("not a float: {:?}", other),
        }
    }
}
