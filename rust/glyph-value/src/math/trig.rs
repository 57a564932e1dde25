use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use glyph_core::{EvalError, Result};

use crate::bigfloat::BigFloat;
use crate::complex;
use crate::context::Context;
use crate::value::Value;

use super::consts::{pi_fixed, pi_float};
use super::{
    below_cubic, continuation, finite, fx_div, fx_mul, fx_one, small_guard, to_float,
};

/// Arguments this large would need π to millions of bits.
const MAX_REDUCTION_BITS: i64 = 1 << 20;

/// `x − n·π/2` at `w` fractional bits, and `n mod 4`.
fn reduce(x: &BigFloat, w: u32) -> (BigInt, u8) {
    let extra = x.top().max(0) as u32 + 8;
    let wx = w + extra;
    let xf = x.to_fixed(wx);
    let half_pi: BigInt = pi_fixed(wx) >> 1u32;
    let n = (&xf * 2u32 + &half_pi).div_floor(&(&half_pi * 2u32));
    let r = (xf - &n * &half_pi) >> extra;
    let q = n.mod_floor(&BigInt::from(4)).to_u8().unwrap_or(0);
    (r, q)
}

/// `(sin r, cos r)` for `|r| ≤ π/4` in fixed point.
fn sin_cos_fixed(r: &BigInt, w: u32) -> (BigInt, BigInt) {
    let r2 = fx_mul(r, r, w);
    let mut s = r.clone();
    let mut term = r.clone();
    let mut i = 1u32;
    loop {
        term = -fx_mul(&term, &r2, w) / ((2 * i) * (2 * i + 1));
        if term.is_zero() {
            break;
        }
        s += &term;
        i += 1;
    }
    let one = fx_one(w);
    let mut c = one.clone();
    let mut term = one;
    let mut i = 1u32;
    loop {
        term = -fx_mul(&term, &r2, w) / ((2 * i - 1) * (2 * i));
        if term.is_zero() {
            break;
        }
        c += &term;
        i += 1;
    }
    (s, c)
}

/// `(sin x, cos x)` of a finite `x`.
pub(crate) fn sin_cos_float(op: &str, x: &BigFloat, prec: u32) -> Result<(BigFloat, BigFloat)> {
    if x.top() > MAX_REDUCTION_BITS {
        return Err(EvalError::domain(
            op,
            x.to_decimal_string(12),
            "argument is too large",
        ));
    }
    if x.is_zero() {
        return Ok((BigFloat::zero(prec), BigFloat::one(prec)));
    }
    let mut w = prec + 64 + small_guard(x);
    let (mut r, mut q) = reduce(x, w);
    // Close to a multiple of π/2 the reduced argument loses leading bits.
    let lost = w as i64 - r.bits() as i64;
    if lost > 32 {
        w += lost as u32;
        let again = reduce(x, w);
        r = again.0;
        q = again.1;
    }
    let (s, c) = sin_cos_fixed(&r, w);
    let (s, c) = match q {
        0 => (s, c),
        1 => (c, -s),
        2 => (-s, -c),
        _ => (-c, s),
    };
    Ok((
        BigFloat::from_fixed(&s, w, prec),
        BigFloat::from_fixed(&c, w, prec),
    ))
}

/// `atan t` for `|t| ≤ 1` in fixed point: two argument halvings, then the series.
fn atan_fixed(t: &BigInt, w: u32) -> BigInt {
    let one = fx_one(w);
    let one2 = &one * &one;
    let mut t = t.clone();
    for _ in 0..2 {
        let root = (&one2 + &t * &t).sqrt();
        t = fx_div(&t, &(&one + root), w);
    }
    let t2 = fx_mul(&t, &t, w);
    let mut sum = t.clone();
    let mut term = t;
    let mut k = 1u32;
    loop {
        term = -fx_mul(&term, &t2, w);
        let d = &term / (2 * k + 1);
        if d.is_zero() {
            break;
        }
        sum += d;
        k += 1;
    }
    sum * 4
}

pub(crate) fn atan_float(x: &BigFloat, prec: u32) -> BigFloat {
    if x.is_zero() {
        return BigFloat::zero(prec);
    }
    if x.is_inf() {
        let h = pi_float(prec).mul_pow2(-1);
        return if x.is_negative() { h.neg() } else { h };
    }
    if below_cubic(x, prec) {
        return x.with_prec(prec);
    }
    let one = BigFloat::one(prec);
    if x.abs().cmp(&one) == Ordering::Greater {
        // atan x = ±π/2 − atan(1/x)
        let w = prec + 64;
        let inv = one.quo(&x.abs(), w + 8);
        let a = atan_fixed(&inv.to_fixed(w), w);
        let res = (pi_fixed(w) >> 1) - a;
        let res = BigFloat::from_fixed(&res, w, prec);
        return if x.is_negative() { res.neg() } else { res };
    }
    let w = prec + 64 + small_guard(x);
    BigFloat::from_fixed(&atan_fixed(&x.to_fixed(w), w), w, prec)
}

/// `asin x` for `|x| ≤ 1`: `atan(x / sqrt(1 − x²))`.
pub(crate) fn asin_float(x: &BigFloat, prec: u32) -> BigFloat {
    if below_cubic(x, prec) {
        return x.with_prec(prec);
    }
    let one = BigFloat::one(prec);
    if x.abs() == one {
        let h = pi_float(prec).mul_pow2(-1);
        return if x.is_negative() { h.neg() } else { h };
    }
    let wp = (x.mant_bits() as u32).max(prec) + 64 + small_guard(x);
    let one = BigFloat::one(wp);
    let d = one.sub(x, wp).mul(&one.add(x, wp), wp);
    let root = d.sqrt(wp).unwrap_or_else(|| BigFloat::zero(wp));
    atan_float(&x.quo(&root, wp), prec)
}

/// `acos x` for `|x| ≤ 1`: `2·atan(sqrt((1 − x)/(1 + x)))`.
pub(crate) fn acos_float(x: &BigFloat, prec: u32) -> BigFloat {
    let wp = (x.mant_bits() as u32).max(prec) + 64;
    let one = BigFloat::one(wp);
    let ratio = one.sub(x, wp).quo(&one.add(x, wp), wp);
    let root = ratio.sqrt(wp).unwrap_or_else(|| BigFloat::zero(wp));
    atan_float(&root, prec + 8).mul_pow2(1).with_prec(prec)
}

fn real_arg(ctx: &dyn Context, op: &str, v: &Value) -> Result<BigFloat> {
    let x = to_float(ctx, op, v)?;
    finite(op, &x)?;
    Ok(x)
}

pub(crate) fn sin(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::sin(ctx, v);
    }
    let x = real_arg(ctx, "sin", v)?;
    let prec = ctx.config().float_prec;
    if below_cubic(&x, prec) {
        return Ok(Value::BigFloat(x.with_prec(prec)));
    }
    Ok(Value::BigFloat(sin_cos_float("sin", &x, prec)?.0))
}

pub(crate) fn cos(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::cos(ctx, v);
    }
    let x = real_arg(ctx, "cos", v)?;
    Ok(Value::BigFloat(sin_cos_float("cos", &x, ctx.config().float_prec)?.1))
}

pub(crate) fn tan(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::tan(ctx, v);
    }
    let x = real_arg(ctx, "tan", v)?;
    let prec = ctx.config().float_prec;
    if below_cubic(&x, prec) {
        return Ok(Value::BigFloat(x.with_prec(prec)));
    }
    let (s, c) = sin_cos_float("tan", &x, prec + 32)?;
    if c.is_zero() {
        return Err(EvalError::domain("tan", v.describe(), "tangent is infinite"));
    }
    Ok(Value::BigFloat(s.quo(&c, prec)))
}

/// Outside `[−1, 1]` the inverse sine and cosine continue into the complex plane.
fn outside_unit(x: &BigFloat) -> bool {
    x.abs() > BigFloat::one(x.prec().max(1))
}

pub(crate) fn asin(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::asin(ctx, v);
    }
    let x = real_arg(ctx, "asin", v)?;
    if outside_unit(&x) {
        continuation("asin", v);
        return complex::asin(ctx, v);
    }
    Ok(Value::BigFloat(asin_float(&x, ctx.config().float_prec)))
}

pub(crate) fn acos(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::acos(ctx, v);
    }
    let x = real_arg(ctx, "acos", v)?;
    if outside_unit(&x) {
        continuation("acos", v);
        return complex::acos(ctx, v);
    }
    Ok(Value::BigFloat(acos_float(&x, ctx.config().float_prec)))
}

pub(crate) fn atan(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::atan(ctx, v);
    }
    let x = to_float(ctx, "atan", v)?;
    Ok(Value::BigFloat(atan_float(&x, ctx.config().float_prec)))
}
