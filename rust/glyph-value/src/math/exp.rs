use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use glyph_core::{EvalError, Result};

use crate::bigfloat::BigFloat;
use crate::complex;
use crate::context::Context;
use crate::value::Value;

use super::consts::ln2_fixed;
use super::{finite, fx_mul, fx_one, to_float};

/// The reduced argument is halved this many times before the series.
const SQUARINGS: u32 = 8;

/// `e^x` at `prec` bits.
///
/// `x = k·ln2 + r` with `|r| ≤ ln2/2`, then `e^r = (e^(r/2^s))^(2^s)`.
pub(crate) fn exp_float(op: &str, x: &BigFloat, prec: u32) -> Result<BigFloat> {
    if x.is_inf() {
        return Ok(if x.is_negative() {
            BigFloat::zero(prec)
        } else {
            BigFloat::infinity(false, prec)
        });
    }
    if x.is_zero() {
        return Ok(BigFloat::one(prec));
    }
    if x.top() > 40 {
        if x.is_negative() {
            return Ok(BigFloat::zero(prec));
        }
        return Err(EvalError::domain(
            op,
            x.to_decimal_string(12),
            "result is too large",
        ));
    }
    let w = prec + 64 + SQUARINGS;
    let extra = x.top().max(0) as u32 + 8;
    let wx = w + extra;
    let xf = x.to_fixed(wx);
    let l = ln2_fixed(wx);
    let k = (&xf * 2u32 + &l).div_floor(&(&l * 2u32));
    let r = ((xf - &k * &l) >> extra) >> SQUARINGS;

    let one = fx_one(w);
    let mut sum = one.clone();
    let mut term = one;
    let mut i = 1u32;
    loop {
        term = fx_mul(&term, &r, w) / i;
        if term.is_zero() {
            break;
        }
        sum += &term;
        i += 1;
    }
    for _ in 0..SQUARINGS {
        sum = fx_mul(&sum, &sum, w);
    }
    let k = k
        .to_i64()
        .ok_or_else(|| EvalError::internal("exp: reduction multiple out of range"))?;
    Ok(BigFloat::from_fixed(&sum, w, prec).mul_pow2(k))
}

/// Unary `**`: `e^v`.
pub(crate) fn exp(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::exp(ctx, v);
    }
    let x = to_float(ctx, "**", v)?;
    Ok(Value::BigFloat(exp_float("**", &x, ctx.config().float_prec)?))
}

/// `e^x − 1` accurate near zero, for the hyperbolic functions.
pub(crate) fn expm1_float(op: &str, x: &BigFloat, prec: u32) -> Result<BigFloat> {
    finite(op, x)?;
    let guard = super::small_guard(x);
    let wp = prec + 32 + guard;
    let e = exp_float(op, x, wp)?;
    Ok(e.sub(&BigFloat::one(wp), prec))
}
