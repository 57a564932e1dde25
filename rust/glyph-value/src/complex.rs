//! Complex numbers over real scalar parts.
//!
//! Every operation goes back through the context's evaluation entry
//! points, so exact parts stay exact and float parts stay at the session
//! precision. Functions taking `&Value` accept any real or complex number.

use glyph_core::{EvalError, Result};

use crate::context::Context;
use crate::math::consts;
use crate::order;
use crate::promote::shrink;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Complex {
    re: Box<Value>,
    im: Box<Value>,
}

impl Complex {
    /// Both parts must be real scalars.
    pub fn new(re: Value, im: Value) -> Self {
        Complex {
            re: Box::new(re),
            im: Box::new(im),
        }
    }

    pub fn real(re: Value) -> Self {
        Complex::new(re, Value::Int(0))
    }

    pub fn imag(im: Value) -> Self {
        Complex::new(Value::Int(0), im)
    }

    pub fn re(&self) -> &Value {
        &self.re
    }

    pub fn im(&self) -> &Value {
        &self.im
    }

    pub fn into_parts(self) -> (Value, Value) {
        (*self.re, *self.im)
    }
}

fn make(re: Value, im: Value) -> Value {
    shrink(Value::Complex(Complex::new(re, im)))
}

fn unit_i() -> Value {
    Value::Complex(Complex::imag(Value::Int(1)))
}

/// Real and imaginary parts of any number.
fn parts(z: &Value) -> (Value, Value) {
    match z {
        Value::Complex(c) => (c.re().clone(), c.im().clone()),
        other => (other.clone(), Value::Int(0)),
    }
}

fn sign(v: &Value) -> i32 {
    v.sign().unwrap_or(0)
}

fn half_pi(ctx: &dyn Context) -> Value {
    Value::BigFloat(consts::pi_float(ctx.config().float_prec).mul_pow2(-1))
}

fn pi(ctx: &dyn Context) -> Value {
    Value::BigFloat(consts::pi_float(ctx.config().float_prec))
}

pub(crate) fn add(ctx: &dyn Context, a: &Complex, b: &Complex) -> Result<Value> {
    Ok(make(
        ctx.eval_binary(a.re(), "+", b.re())?,
        ctx.eval_binary(a.im(), "+", b.im())?,
    ))
}

pub(crate) fn sub(ctx: &dyn Context, a: &Complex, b: &Complex) -> Result<Value> {
    Ok(make(
        ctx.eval_binary(a.re(), "-", b.re())?,
        ctx.eval_binary(a.im(), "-", b.im())?,
    ))
}

pub(crate) fn mul(ctx: &dyn Context, a: &Complex, b: &Complex) -> Result<Value> {
    let ac = ctx.eval_binary(a.re(), "*", b.re())?;
    let bd = ctx.eval_binary(a.im(), "*", b.im())?;
    let ad = ctx.eval_binary(a.re(), "*", b.im())?;
    let bc = ctx.eval_binary(a.im(), "*", b.re())?;
    Ok(make(
        ctx.eval_binary(&ac, "-", &bd)?,
        ctx.eval_binary(&ad, "+", &bc)?,
    ))
}

pub(crate) fn quo(ctx: &dyn Context, a: &Complex, b: &Complex) -> Result<Value> {
    if b.re().is_zero() && b.im().is_zero() {
        return Err(EvalError::domain(
            "/",
            Value::Complex(a.clone()).describe(),
            "division by zero",
        ));
    }
    let ac = ctx.eval_binary(a.re(), "*", b.re())?;
    let bd = ctx.eval_binary(a.im(), "*", b.im())?;
    let ad = ctx.eval_binary(a.re(), "*", b.im())?;
    let bc = ctx.eval_binary(a.im(), "*", b.re())?;
    let re_num = ctx.eval_binary(&ac, "+", &bd)?;
    let im_num = ctx.eval_binary(&bc, "-", &ad)?;
    let c2 = ctx.eval_binary(b.re(), "*", b.re())?;
    let d2 = ctx.eval_binary(b.im(), "*", b.im())?;
    let denom = ctx.eval_binary(&c2, "+", &d2)?;
    Ok(make(
        ctx.eval_binary(&re_num, "/", &denom)?,
        ctx.eval_binary(&im_num, "/", &denom)?,
    ))
}

pub(crate) fn neg(ctx: &dyn Context, z: &Complex) -> Result<Value> {
    Ok(make(ctx.eval_unary("-", z.re())?, ctx.eval_unary("-", z.im())?))
}

pub(crate) fn equal(a: &Complex, b: &Complex) -> bool {
    order::values_equal(a.re(), b.re()) && order::values_equal(a.im(), b.im())
}

pub(crate) fn floor(ctx: &dyn Context, z: &Complex) -> Result<Value> {
    Ok(make(
        ctx.eval_unary("floor", z.re())?,
        ctx.eval_unary("floor", z.im())?,
    ))
}

pub(crate) fn ceil(ctx: &dyn Context, z: &Complex) -> Result<Value> {
    Ok(make(
        ctx.eval_unary("ceil", z.re())?,
        ctx.eval_unary("ceil", z.im())?,
    ))
}

/// `|z| = sqrt(re² + im²)`.
pub(crate) fn abs(ctx: &dyn Context, z: &Complex) -> Result<Value> {
    let a2 = ctx.eval_binary(z.re(), "*", z.re())?;
    let b2 = ctx.eval_binary(z.im(), "*", z.im())?;
    let sum = ctx.eval_binary(&a2, "+", &b2)?;
    ctx.eval_unary("sqrt", &sum)
}

/// `z / |z|`.
pub(crate) fn sgn(ctx: &dyn Context, z: &Complex) -> Result<Value> {
    let m = abs(ctx, z)?;
    ctx.eval_binary(&Value::Complex(z.clone()), "/", &m)
}

/// Argument of `z` in `(-π, π]`.
pub(crate) fn phase(ctx: &dyn Context, z: &Value) -> Result<Value> {
    let (re, im) = parts(z);
    if sign(&re) == 0 {
        return match sign(&im) {
            0 => Ok(Value::Int(0)),
            s if s > 0 => Ok(half_pi(ctx)),
            _ => ctx.eval_unary("-", &half_pi(ctx)),
        };
    }
    let slope = ctx.eval_binary(&im, "/", &re)?;
    let at = ctx.eval_unary("atan", &slope)?;
    if sign(&re) > 0 {
        Ok(at)
    } else if sign(&im) >= 0 {
        ctx.eval_binary(&at, "+", &pi(ctx))
    } else {
        ctx.eval_binary(&at, "-", &pi(ctx))
    }
}

/// Principal square root `sqrt(|z|)·(z+|z|)/|z+|z||`.
pub(crate) fn sqrt(ctx: &dyn Context, z: &Value) -> Result<Value> {
    let (re, im) = parts(z);
    if im.is_zero() {
        return ctx.eval_unary("sqrt", &re);
    }
    let c = Complex::new(re, im);
    let m = abs(ctx, &c)?;
    let root = ctx.eval_unary("sqrt", &m)?;
    let shifted = ctx.eval_binary(z, "+", &m)?;
    let denom = ctx.eval_unary("abs", &shifted)?;
    let num = ctx.eval_binary(&root, "*", &shifted)?;
    ctx.eval_binary(&num, "/", &denom)
}

/// `log|z| + i·phase(z)`.
pub(crate) fn log(ctx: &dyn Context, z: &Value) -> Result<Value> {
    let (re, im) = parts(z);
    if re.is_zero() && im.is_zero() {
        return Err(EvalError::domain("log", z.describe(), "logarithm of zero"));
    }
    let a2 = ctx.eval_binary(&re, "*", &re)?;
    let b2 = ctx.eval_binary(&im, "*", &im)?;
    let sum = ctx.eval_binary(&a2, "+", &b2)?;
    let log_sq = ctx.eval_unary("log", &sum)?;
    Ok(make(
        ctx.eval_binary(&log_sq, "/", &Value::Int(2))?,
        phase(ctx, z)?,
    ))
}

/// `e^re·(cos im + i·sin im)`.
pub(crate) fn exp(ctx: &dyn Context, z: &Value) -> Result<Value> {
    let (re, im) = parts(z);
    let scale = ctx.eval_unary("**", &re)?;
    let c = ctx.eval_unary("cos", &im)?;
    let s = ctx.eval_unary("sin", &im)?;
    Ok(make(
        ctx.eval_binary(&scale, "*", &c)?,
        ctx.eval_binary(&scale, "*", &s)?,
    ))
}

/// `z ** w`. Integer exponents multiply exactly; others use `exp(w·log z)`.
pub(crate) fn pow(ctx: &dyn Context, z: &Value, w: &Value) -> Result<Value> {
    let (wre, wim) = parts(w);
    if wim.is_zero() {
        if let Some(n) = wre.as_int() {
            if n.unsigned_abs() <= 1 << 16 {
                return int_pow(ctx, z, n);
            }
        }
    }
    let (zre, zim) = parts(z);
    if zre.is_zero() && zim.is_zero() {
        if sign(&wre) > 0 {
            return Ok(Value::Int(0));
        }
        return Err(EvalError::domain(
            "**",
            z.describe(),
            "zero to a non-positive power",
        ));
    }
    let l = ctx.eval_unary("log", z)?;
    let prod = ctx.eval_binary(w, "*", &l)?;
    ctx.eval_unary("**", &prod)
}

fn int_pow(ctx: &dyn Context, z: &Value, n: i64) -> Result<Value> {
    let mut result = Value::Int(1);
    let mut base = z.clone();
    let mut k = n.unsigned_abs();
    while k > 0 {
        if k & 1 == 1 {
            result = ctx.eval_binary(&result, "*", &base)?;
        }
        k >>= 1;
        if k > 0 {
            base = ctx.eval_binary(&base, "*", &base)?;
        }
    }
    if n < 0 {
        result = ctx.eval_binary(&Value::Int(1), "/", &result)?;
    }
    Ok(result)
}

/// Logarithm of `b` to base `a`.
pub(crate) fn log_base(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let la = ctx.eval_unary("log", a)?;
    let lb = ctx.eval_unary("log", b)?;
    ctx.eval_binary(&lb, "/", &la)
}

pub(crate) fn sin(ctx: &dyn Context, z: &Value) -> Result<Value> {
    let (a, b) = parts(z);
    let re = ctx.eval_binary(&ctx.eval_unary("sin", &a)?, "*", &ctx.eval_unary("cosh", &b)?)?;
    let im = ctx.eval_binary(&ctx.eval_unary("cos", &a)?, "*", &ctx.eval_unary("sinh", &b)?)?;
    Ok(make(re, im))
}

pub(crate) fn cos(ctx: &dyn Context, z: &Value) -> Result<Value> {
    let (a, b) = parts(z);
    let re = ctx.eval_binary(&ctx.eval_unary("cos", &a)?, "*", &ctx.eval_unary("cosh", &b)?)?;
    let im = ctx.eval_binary(&ctx.eval_unary("sin", &a)?, "*", &ctx.eval_unary("sinh", &b)?)?;
    Ok(make(re, ctx.eval_unary("-", &im)?))
}

pub(crate) fn tan(ctx: &dyn Context, z: &Value) -> Result<Value> {
    ctx.eval_binary(&sin(ctx, z)?, "/", &cos(ctx, z)?)
}

pub(crate) fn sinh(ctx: &dyn Context, z: &Value) -> Result<Value> {
    let (a, b) = parts(z);
    let re = ctx.eval_binary(&ctx.eval_unary("sinh", &a)?, "*", &ctx.eval_unary("cos", &b)?)?;
    let im = ctx.eval_binary(&ctx.eval_unary("cosh", &a)?, "*", &ctx.eval_unary("sin", &b)?)?;
    Ok(make(re, im))
}

pub(crate) fn cosh(ctx: &dyn Context, z: &Value) -> Result<Value> {
    let (a, b) = parts(z);
    let re = ctx.eval_binary(&ctx.eval_unary("cosh", &a)?, "*", &ctx.eval_unary("cos", &b)?)?;
    let im = ctx.eval_binary(&ctx.eval_unary("sinh", &a)?, "*", &ctx.eval_unary("sin", &b)?)?;
    Ok(make(re, im))
}

pub(crate) fn tanh(ctx: &dyn Context, z: &Value) -> Result<Value> {
    ctx.eval_binary(&sinh(ctx, z)?, "/", &cosh(ctx, z)?)
}

/// `asin z = −i·log(iz + sqrt(1 − z²))`.
pub(crate) fn asin(ctx: &dyn Context, z: &Value) -> Result<Value> {
    let i = unit_i();
    let z2 = ctx.eval_binary(z, "*", z)?;
    let root = ctx.eval_unary("sqrt", &ctx.eval_binary(&Value::Int(1), "-", &z2)?)?;
    let iz = ctx.eval_binary(&i, "*", z)?;
    let l = ctx.eval_unary("log", &ctx.eval_binary(&iz, "+", &root)?)?;
    let minus_i = Value::Complex(Complex::imag(Value::Int(-1)));
    ctx.eval_binary(&minus_i, "*", &l)
}

/// `acos z = π/2 − asin z`.
pub(crate) fn acos(ctx: &dyn Context, z: &Value) -> Result<Value> {
    ctx.eval_binary(&half_pi(ctx), "-", &asin(ctx, z)?)
}

/// `atan z = log((i − z)/(i + z)) / 2i`, undefined at `±i`.
pub(crate) fn atan(ctx: &dyn Context, z: &Value) -> Result<Value> {
    let (re, im) = parts(z);
    if re.is_zero() && order::values_equal(&ctx.eval_unary("abs", &im)?, &Value::Int(1)) {
        return Err(EvalError::domain("atan", z.describe(), "atan is undefined at ±i"));
    }
    let i = unit_i();
    let num = ctx.eval_binary(&i, "-", z)?;
    let den = ctx.eval_binary(&i, "+", z)?;
    let l = ctx.eval_unary("log", &ctx.eval_binary(&num, "/", &den)?)?;
    let two_i = Value::Complex(Complex::imag(Value::Int(2)));
    ctx.eval_binary(&l, "/", &two_i)
}

/// `asinh z = log(z + sqrt(z² + 1))`.
pub(crate) fn asinh(ctx: &dyn Context, z: &Value) -> Result<Value> {
    let z2 = ctx.eval_binary(z, "*", z)?;
    let root = ctx.eval_unary("sqrt", &ctx.eval_binary(&z2, "+", &Value::Int(1))?)?;
    ctx.eval_unary("log", &ctx.eval_binary(z, "+", &root)?)
}

/// `acosh z = log(z + sqrt(z + 1)·sqrt(z − 1))`.
pub(crate) fn acosh(ctx: &dyn Context, z: &Value) -> Result<Value> {
    let p = ctx.eval_unary("sqrt", &ctx.eval_binary(z, "+", &Value::Int(1))?)?;
    let m = ctx.eval_unary("sqrt", &ctx.eval_binary(z, "-", &Value::Int(1))?)?;
    let prod = ctx.eval_binary(&p, "*", &m)?;
    ctx.eval_unary("log", &ctx.eval_binary(z, "+", &prod)?)
}

/// `atanh z = log((1 + z)/(1 − z)) / 2`, undefined at `±1`.
pub(crate) fn atanh(ctx: &dyn Context, z: &Value) -> Result<Value> {
    let one = Value::Int(1);
    let (re, im) = parts(z);
    if im.is_zero() && order::values_equal(&ctx.eval_unary("abs", &re)?, &one) {
        return Err(EvalError::domain("atanh", z.describe(), "atanh is undefined at ±1"));
    }
    let num = ctx.eval_binary(&one, "+", z)?;
    let den = ctx.eval_binary(&one, "-", z)?;
    let l = ctx.eval_unary("log", &ctx.eval_binary(&num, "/", &den)?)?;
    ctx.eval_binary(&l, "/", &Value::Int(2))
}
