use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use glyph_core::{EvalError, Result};

use crate::bigfloat::BigFloat;
use crate::complex::{self, Complex};
use crate::context::Context;
use crate::limits;
use crate::value::Value;

use super::exp::exp_float;
use super::log::log_float;
use super::{continuation, to_float};

fn exact_sqrt(n: &BigUint) -> Option<BigUint> {
    let r = n.sqrt();
    if &r * &r == *n {
        Some(r)
    } else {
        None
    }
}

fn exact_root(n: &BigUint, k: u32) -> Option<BigUint> {
    let r = n.nth_root(k);
    if r.pow(k) == *n {
        Some(r)
    } else {
        None
    }
}

/// Square root. Perfect squares stay exact; negative reals continue into
/// the complex plane as `i·sqrt(−x)`.
pub(crate) fn sqrt(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::sqrt(ctx, v);
    }
    if v.sign() == Some(-1) {
        continuation("sqrt", v);
        let pos = ctx.eval_unary("-", v)?;
        let root = sqrt(ctx, &pos)?;
        return Ok(Value::Complex(Complex::imag(root)));
    }
    match v {
        Value::Int(_) | Value::BigInt(_) => {
            if let Some(n) = v.to_bigint() {
                if let Some(r) = exact_sqrt(n.magnitude()) {
                    return Ok(Value::BigInt(BigInt::from(r)));
                }
            }
        }
        Value::BigRat(r) => {
            let num = exact_sqrt(r.numer().magnitude());
            let den = exact_sqrt(r.denom().magnitude());
            if let (Some(n), Some(d)) = (num, den) {
                return Ok(Value::BigRat(BigRational::new(n.into(), d.into())));
            }
        }
        _ => {}
    }
    let prec = ctx.config().float_prec;
    let x = to_float(ctx, "sqrt", v)?;
    x.sqrt(prec)
        .map(Value::BigFloat)
        .ok_or_else(|| EvalError::internal("sqrt: negative argument reached the real kernel"))
}

/// Exponent as an integer, when it is one.
fn int_exponent(v: &Value) -> Option<BigInt> {
    match v {
        Value::Int(_) | Value::BigInt(_) => v.to_bigint(),
        Value::BigRat(r) if r.is_integer() => Some(r.to_integer()),
        _ => None,
    }
}

fn bits_of(v: &Value) -> u64 {
    match v {
        Value::Int(i) => 64 - i.unsigned_abs().leading_zeros() as u64,
        Value::BigInt(i) => i.bits(),
        Value::BigRat(r) => r.numer().bits().max(r.denom().bits()),
        _ => 0,
    }
}

/// Exact power of an exact base.
fn exact_pow(ctx: &dyn Context, base: &BigRational, n: &BigInt) -> Result<Value> {
    if base.is_zero() {
        if n.is_negative() {
            return Err(EvalError::domain("**", "0", "division by zero"));
        }
        return Ok(Value::Int(if n.is_zero() { 1 } else { 0 }));
    }
    let unit = base.numer().magnitude().is_one() && base.denom().is_one();
    if unit {
        let odd = n.magnitude().bit(0);
        return Ok(Value::Int(if base.is_negative() && odd { -1 } else { 1 }));
    }
    let size = bits_of(&Value::BigRat(base.clone()));
    let k = n.magnitude().to_u64().filter(|k| *k <= u32::MAX as u64);
    let k = match k {
        Some(k) => k,
        None => {
            limits::check_bits(ctx, "**", u64::MAX)?;
            return Err(EvalError::domain("**", n.to_string(), "exponent is too large"));
        }
    };
    limits::check_bits(ctx, "**", size.saturating_mul(k))?;
    let k = k as u32;
    let num = base.numer().pow(k);
    let den = base.denom().pow(k);
    Ok(Value::BigRat(if n.is_negative() {
        BigRational::new(den, num)
    } else {
        BigRational::new(num, den)
    }))
}

fn as_ratio(v: &Value) -> Option<BigRational> {
    match v {
        Value::Int(i) => Some(BigRational::from_integer(BigInt::from(*i))),
        Value::BigInt(i) => Some(BigRational::from_integer(i.clone())),
        Value::BigRat(r) => Some(r.clone()),
        _ => None,
    }
}

/// Float raised to an integer power by repeated squaring.
fn float_int_pow(x: &BigFloat, n: &BigInt, prec: u32) -> Result<BigFloat> {
    let k = n
        .magnitude()
        .to_u64()
        .ok_or_else(|| EvalError::domain("**", n.to_string(), "exponent is too large"))?;
    let wp = prec + 64 + 64 - k.leading_zeros();
    let mut result = BigFloat::one(wp);
    let mut base = x.with_prec(wp);
    let mut k = k;
    while k > 0 {
        if k & 1 == 1 {
            result = result.mul(&base, wp);
        }
        k >>= 1;
        if k > 0 {
            base = base.mul(&base, wp);
        }
    }
    if n.is_negative() {
        if result.is_zero() {
            return Err(EvalError::domain("**", "0", "division by zero"));
        }
        result = BigFloat::one(wp).quo(&result, wp);
    }
    Ok(result.with_prec(prec))
}

/// Binary `**` on real operands.
///
/// Integer exponents are exact for exact bases. A rational exponent `p/q`
/// stays exact when the base is a perfect `q`th power. Everything else is
/// `e^(b·ln a)`, continuing into the complex plane for negative bases.
pub(crate) fn pow(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    if matches!(a, Value::Complex(_)) || matches!(b, Value::Complex(_)) {
        return complex::pow(ctx, a, b);
    }
    let prec = ctx.config().float_prec;
    if let Some(n) = int_exponent(b) {
        if let Some(base) = as_ratio(a) {
            return exact_pow(ctx, &base, &n);
        }
        let x = to_float(ctx, "**", a)?;
        return Ok(Value::BigFloat(float_int_pow(&x, &n, prec)?));
    }
    if let (Some(base), Value::BigRat(e)) = (as_ratio(a), b) {
        if !base.is_negative() {
            if let Some(q) = e.denom().to_u32() {
                let num = exact_root(base.numer().magnitude(), q);
                let den = exact_root(base.denom().magnitude(), q);
                if let (Some(n), Some(d)) = (num, den) {
                    let root = BigRational::new(n.into(), d.into());
                    return exact_pow(ctx, &root, e.numer());
                }
            }
        }
    }
    if a.is_zero() {
        if b.sign() == Some(1) {
            return Ok(Value::Int(0));
        }
        return Err(EvalError::domain(
            "**",
            b.describe(),
            "zero to a non-positive power",
        ));
    }
    if a.sign() == Some(-1) {
        continuation("**", a);
        return complex::pow(ctx, &Value::Complex(Complex::real(a.clone())), b);
    }
    let x = to_float(ctx, "**", a)?;
    let y = to_float(ctx, "**", b)?;
    if x.is_inf() || y.is_inf() {
        return Err(EvalError::domain("**", b.describe(), "infinite operand"));
    }
    let l = log_float(&x, prec + 64);
    let t = y.mul(&l, prec + 64);
    let wp = prec + 64 + t.top().clamp(0, 64) as u32;
    let t = y.mul(&log_float(&x, wp), wp);
    Ok(Value::BigFloat(exp_float("**", &t, prec)?))
}
