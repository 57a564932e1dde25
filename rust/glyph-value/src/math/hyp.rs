use glyph_core::{EvalError, Result};

use crate::bigfloat::BigFloat;
use crate::complex;
use crate::context::Context;
use crate::value::Value;

use super::exp::{exp_float, expm1_float};
use super::log::log_float;
use super::{below_cubic, continuation, finite, small_guard, to_float};

/// `sinh x = (e^x − e^−x)/2`, via `e^x − 1` so small arguments keep their bits.
pub(crate) fn sinh_float(x: &BigFloat, prec: u32) -> Result<BigFloat> {
    if x.is_inf() || x.is_zero() || below_cubic(x, prec) {
        return Ok(x.with_prec(prec));
    }
    let wp = prec + 32 + small_guard(x);
    let em1 = expm1_float("sinh", x, wp)?;
    let one = BigFloat::one(wp);
    // sinh x = (u + u/(u+1))/2 with u = e^x − 1
    let e = em1.add(&one, wp);
    let t = em1.add(&em1.quo(&e, wp), wp);
    Ok(t.mul_pow2(-1).with_prec(prec))
}

/// `cosh x = (e^x + e^−x)/2`.
pub(crate) fn cosh_float(x: &BigFloat, prec: u32) -> Result<BigFloat> {
    if x.is_inf() {
        return Ok(BigFloat::infinity(false, prec));
    }
    let wp = prec + 32;
    let e = exp_float("cosh", x, wp)?;
    let t = e.add(&BigFloat::one(wp).quo(&e, wp), wp);
    Ok(t.mul_pow2(-1).with_prec(prec))
}

/// `tanh x = (e^2x − 1)/(e^2x + 1)`.
pub(crate) fn tanh_float(x: &BigFloat, prec: u32) -> Result<BigFloat> {
    if x.is_zero() || below_cubic(x, prec) {
        return Ok(x.with_prec(prec));
    }
    // Past this point 1 − |tanh x| is below the precision.
    if x.is_inf() || x.abs() > BigFloat::from_i64(prec as i64 / 2 + 2, 64) {
        let one = BigFloat::one(prec);
        return Ok(if x.is_negative() { one.neg() } else { one });
    }
    let wp = prec + 32 + small_guard(x);
    let em1 = expm1_float("tanh", &x.mul_pow2(1), wp)?;
    let den = em1.add(&BigFloat::from_i64(2, wp), wp);
    Ok(em1.quo(&den, prec))
}

/// `asinh x = ±log(|x| + sqrt(x² + 1))`.
pub(crate) fn asinh_float(x: &BigFloat, prec: u32) -> BigFloat {
    if x.is_inf() || x.is_zero() || below_cubic(x, prec) {
        return x.with_prec(prec);
    }
    let wp = (x.mant_bits() as u32).max(prec) + 64 + small_guard(x);
    let a = x.abs();
    let one = BigFloat::one(wp);
    let root = a.mul(&a, wp).add(&one, wp).sqrt(wp).unwrap_or_else(|| one.clone());
    let r = log_float(&a.add(&root, wp), prec);
    if x.is_negative() {
        r.neg()
    } else {
        r
    }
}

/// `acosh x = log(x + sqrt((x − 1)(x + 1)))` for `x > 1`.
pub(crate) fn acosh_float(x: &BigFloat, prec: u32) -> BigFloat {
    if x.is_inf() {
        return x.with_prec(prec);
    }
    let wp = (x.mant_bits() as u32).max(prec) + 64;
    let one = BigFloat::one(wp);
    let d = x.sub(&one, wp).mul(&x.add(&one, wp), wp);
    let root = d.sqrt(wp).unwrap_or_else(|| BigFloat::zero(wp));
    log_float(&x.add(&root, wp), prec)
}

/// `atanh x = log((1 + x)/(1 − x))/2` for `|x| < 1`.
pub(crate) fn atanh_float(x: &BigFloat, prec: u32) -> BigFloat {
    if x.is_zero() || below_cubic(x, prec) {
        return x.with_prec(prec);
    }
    let wp = (x.mant_bits() as u32).max(prec) + 64 + small_guard(x);
    let one = BigFloat::one(wp);
    let q = one.add(x, wp).quo(&one.sub(x, wp), wp);
    log_float(&q, prec + 1).mul_pow2(-1).with_prec(prec)
}

pub(crate) fn sinh(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::sinh(ctx, v);
    }
    let x = to_float(ctx, "sinh", v)?;
    Ok(Value::BigFloat(sinh_float(&x, ctx.config().float_prec)?))
}

pub(crate) fn cosh(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::cosh(ctx, v);
    }
    let x = to_float(ctx, "cosh", v)?;
    Ok(Value::BigFloat(cosh_float(&x, ctx.config().float_prec)?))
}

pub(crate) fn tanh(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::tanh(ctx, v);
    }
    let x = to_float(ctx, "tanh", v)?;
    Ok(Value::BigFloat(tanh_float(&x, ctx.config().float_prec)?))
}

pub(crate) fn asinh(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::asinh(ctx, v);
    }
    let x = to_float(ctx, "asinh", v)?;
    Ok(Value::BigFloat(asinh_float(&x, ctx.config().float_prec)))
}

/// `acosh 1` is exactly zero; below 1 the result is complex, and on
/// `[-1, 1)` it is the pure imaginary `i·acos x`.
pub(crate) fn acosh(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::acosh(ctx, v);
    }
    let x = to_float(ctx, "acosh", v)?;
    let one = BigFloat::one(x.prec().max(1));
    if x == one {
        return Ok(Value::Int(0));
    }
    if x < one {
        if x.is_inf() {
            return Err(EvalError::domain("acosh", v.describe(), "argument is infinite"));
        }
        continuation("acosh", v);
        if x >= one.neg() {
            let angle = ctx.eval_unary("acos", v)?;
            return Ok(Value::Complex(complex::Complex::imag(angle)));
        }
        return complex::acosh(ctx, v);
    }
    Ok(Value::BigFloat(acosh_float(&x, ctx.config().float_prec)))
}

/// `atanh ±1` is a signed infinity; beyond them the result is complex.
pub(crate) fn atanh(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::atanh(ctx, v);
    }
    let prec = ctx.config().float_prec;
    let x = to_float(ctx, "atanh", v)?;
    finite("atanh", &x)?;
    let one = BigFloat::one(x.prec().max(1));
    let a = x.abs();
    if a == one {
        return Ok(Value::BigFloat(BigFloat::infinity(x.is_negative(), prec)));
    }
    if a > one {
        continuation("atanh", v);
        return complex::atanh(ctx, v);
    }
    Ok(Value::BigFloat(atanh_float(&x, prec)))
}
