//! The unary operator table.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive};

use glyph_core::{EvalError, Result};

use crate::array::structural;
use crate::complex::{self, Complex};
use crate::context::Context;
use crate::eval::UnaryOp;
use crate::limits;
use crate::math;
use crate::promote::to_kind;
use crate::value::{Kind, Value, Vector};

pub(crate) fn ops() -> Vec<UnaryOp> {
    vec![
        UnaryOp::new("?", true).integers(roll),
        UnaryOp::new("+", false)
            .numbers(identity)
            .with(&[Kind::Vector, Kind::Matrix], identity),
        UnaryOp::new("-", true).numbers(negate),
        UnaryOp::new("/", true).numbers(reciprocal),
        UnaryOp::new("sgn", true).numbers(signum),
        UnaryOp::new("!", true).integers(factorial),
        UnaryOp::new("^", true).integers(bit_not),
        UnaryOp::new("not", true).numbers(not),
        UnaryOp::new("abs", true).numbers(abs),
        UnaryOp::new("floor", true).numbers(floor),
        UnaryOp::new("ceil", true).numbers(ceil),
        UnaryOp::new("j", true).reals(imaginary),
        UnaryOp::new("J", true).reals(imaginary),
        UnaryOp::new("real", true).numbers(real_part),
        UnaryOp::new("imag", true).numbers(imag_part),
        UnaryOp::new("phase", true).numbers(complex::phase),
        UnaryOp::new("iota", false).integers(iota),
        UnaryOp::new("rho", false).all(structural::shape_of),
        UnaryOp::new(",", false).all(structural::ravel),
        UnaryOp::new("up", false).all(structural::grade_up),
        UnaryOp::new("down", false).all(structural::grade_down),
        UnaryOp::new("rot", false).all(structural::reverse_last),
        UnaryOp::new("flip", false).all(structural::reverse_first),
        UnaryOp::new("transp", false).all(structural::transpose_reversed),
        UnaryOp::new("sin", true).numbers(math::sin),
        UnaryOp::new("cos", true).numbers(math::cos),
        UnaryOp::new("tan", true).numbers(math::tan),
        UnaryOp::new("asin", true).numbers(math::asin),
        UnaryOp::new("acos", true).numbers(math::acos),
        UnaryOp::new("atan", true).numbers(math::atan),
        UnaryOp::new("sinh", true).numbers(math::sinh),
        UnaryOp::new("cosh", true).numbers(math::cosh),
        UnaryOp::new("tanh", true).numbers(math::tanh),
        UnaryOp::new("asinh", true).numbers(math::asinh),
        UnaryOp::new("acosh", true).numbers(math::acosh),
        UnaryOp::new("atanh", true).numbers(math::atanh),
        UnaryOp::new("**", true).numbers(math::exp),
        UnaryOp::new("log", true).numbers(math::log),
        UnaryOp::new("sqrt", true).numbers(math::sqrt),
        UnaryOp::new("char", true).integers(to_char),
        UnaryOp::new("code", true).with(&[Kind::Char], code),
        UnaryOp::new("text", false).all(text),
        UnaryOp::new("float", true).numbers(float).keep_kind(),
    ]
}

fn unexpected(op: &str, v: &Value) -> EvalError {
    EvalError::internal(format!("{}: no case for {}", op, v.kind()))
}

fn roll(ctx: &dyn Context, v: &Value) -> Result<Value> {
    let n = v.to_bigint().ok_or_else(|| unexpected("?", v))?;
    if !n.is_positive() {
        return Err(EvalError::domain("?", v.describe(), "roll needs a positive bound"));
    }
    let origin = BigInt::from(ctx.config().origin);
    Ok(Value::BigInt(ctx.random_below(&n) + origin))
}

fn identity(_ctx: &dyn Context, v: &Value) -> Result<Value> {
    Ok(v.clone())
}

fn negate(ctx: &dyn Context, v: &Value) -> Result<Value> {
    Ok(match v {
        Value::Int(i) => match i.checked_neg() {
            Some(n) => Value::Int(n),
            None => Value::BigInt(-BigInt::from(*i)),
        },
        Value::BigInt(i) => Value::BigInt(-i.clone()),
        Value::BigRat(r) => Value::BigRat(-r.clone()),
        Value::BigFloat(f) => Value::BigFloat(f.neg()),
        Value::Complex(z) => return complex::neg(ctx, z),
        other => return Err(unexpected("-", other)),
    })
}

fn division_by_zero(op: &str, v: &Value) -> EvalError {
    EvalError::domain(op, v.describe(), "division by zero")
}

fn reciprocal(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if v.is_zero() {
        return Err(division_by_zero("/", v));
    }
    let exact = |r: BigRational| Ok(Value::BigRat(r.recip()));
    match v {
        Value::Int(i) => exact(BigRational::from_integer(BigInt::from(*i))),
        Value::BigInt(i) => exact(BigRational::from_integer(i.clone())),
        Value::BigRat(r) => exact(r.clone()),
        Value::BigFloat(f) => {
            let prec = ctx.config().float_prec;
            Ok(Value::BigFloat(crate::bigfloat::BigFloat::one(prec).quo(f, prec)))
        }
        Value::Complex(z) => complex::quo(ctx, &Complex::real(Value::Int(1)), z),
        other => Err(unexpected("/", other)),
    }
}

fn signum(ctx: &dyn Context, v: &Value) -> Result<Value> {
    match v {
        Value::Complex(z) => complex::sgn(ctx, z),
        other => other
            .sign()
            .map(|s| Value::Int(s as i64))
            .ok_or_else(|| unexpected("sgn", other)),
    }
}

/// Approximate bit length of `n!` by Stirling's formula.
pub(crate) fn factorial_bits(n: u64) -> u64 {
    if n < 2 {
        return 1;
    }
    let x = n as f64;
    let log2 = x * (x / std::f64::consts::E).log2() + 0.5 * (2.0 * std::f64::consts::PI * x).log2();
    log2.ceil() as u64 + 1
}

fn factorial(ctx: &dyn Context, v: &Value) -> Result<Value> {
    let n = v.to_bigint().ok_or_else(|| unexpected("!", v))?;
    if n.is_negative() {
        return Err(EvalError::domain("!", v.describe(), "factorial of a negative number"));
    }
    let n = match n.to_u64() {
        Some(n) => n,
        None => {
            limits::check_bits(ctx, "!", u64::MAX)?;
            return Err(EvalError::domain("!", v.describe(), "argument is too large"));
        }
    };
    limits::check_bits(ctx, "!", factorial_bits(n))?;
    let mut acc = BigInt::one();
    for k in 2..=n {
        acc *= k;
    }
    Ok(Value::BigInt(acc))
}

fn bit_not(_ctx: &dyn Context, v: &Value) -> Result<Value> {
    match v {
        Value::Int(i) => Ok(Value::Int(!i)),
        Value::BigInt(i) => Ok(Value::BigInt(-i - 1)),
        other => Err(unexpected("^", other)),
    }
}

fn not(_ctx: &dyn Context, v: &Value) -> Result<Value> {
    Ok(Value::from_bool(v.is_zero()))
}

fn abs(ctx: &dyn Context, v: &Value) -> Result<Value> {
    Ok(match v {
        Value::Int(i) => match i.checked_abs() {
            Some(a) => Value::Int(a),
            None => Value::BigInt(BigInt::from(*i).abs()),
        },
        Value::BigInt(i) => Value::BigInt(i.abs()),
        Value::BigRat(r) => Value::BigRat(r.abs()),
        Value::BigFloat(f) => Value::BigFloat(f.abs()),
        Value::Complex(z) => return complex::abs(ctx, z),
        other => return Err(unexpected("abs", other)),
    })
}

fn floor(ctx: &dyn Context, v: &Value) -> Result<Value> {
    match v {
        Value::Int(_) | Value::BigInt(_) => Ok(v.clone()),
        Value::BigRat(r) => Ok(Value::BigInt(r.floor().to_integer())),
        Value::BigFloat(f) => f
            .floor()
            .map(Value::BigInt)
            .ok_or_else(|| EvalError::domain("floor", v.describe(), "argument is infinite")),
        Value::Complex(z) => complex::floor(ctx, z),
        other => Err(unexpected("floor", other)),
    }
}

fn ceil(ctx: &dyn Context, v: &Value) -> Result<Value> {
    match v {
        Value::Int(_) | Value::BigInt(_) => Ok(v.clone()),
        Value::BigRat(r) => Ok(Value::BigInt(r.ceil().to_integer())),
        Value::BigFloat(f) => f
            .ceil()
            .map(Value::BigInt)
            .ok_or_else(|| EvalError::domain("ceil", v.describe(), "argument is infinite")),
        Value::Complex(z) => complex::ceil(ctx, z),
        other => Err(unexpected("ceil", other)),
    }
}

fn imaginary(_ctx: &dyn Context, v: &Value) -> Result<Value> {
    Ok(Value::Complex(Complex::imag(v.clone())))
}

fn real_part(_ctx: &dyn Context, v: &Value) -> Result<Value> {
    match v {
        Value::Complex(z) => Ok(z.re().clone()),
        other => Ok(other.clone()),
    }
}

fn imag_part(_ctx: &dyn Context, v: &Value) -> Result<Value> {
    match v {
        Value::Complex(z) => Ok(z.im().clone()),
        _ => Ok(Value::Int(0)),
    }
}

fn iota(ctx: &dyn Context, v: &Value) -> Result<Value> {
    let n = v
        .as_int()
        .filter(|n| *n >= 0)
        .ok_or_else(|| EvalError::domain("iota", v.describe(), "bad iota bound"))?;
    let origin = ctx.config().origin;
    let mut elems = structural::alloc("iota", v, usize::try_from(n).unwrap_or(usize::MAX))?;
    elems.extend((0..n).map(|k| Value::Int(k + origin)));
    Ok(Value::Vector(Vector::new(elems)))
}

fn to_char(_ctx: &dyn Context, v: &Value) -> Result<Value> {
    v.as_int()
        .and_then(|i| u32::try_from(i).ok())
        .and_then(char::from_u32)
        .map(Value::Char)
        .ok_or_else(|| EvalError::domain("char", v.describe(), "not a valid code point"))
}

fn code(_ctx: &dyn Context, v: &Value) -> Result<Value> {
    match v {
        Value::Char(c) => Ok(Value::Int(*c as i64)),
        other => Err(unexpected("code", other)),
    }
}

/// The printed form of a value as a vector of chars.
fn text(ctx: &dyn Context, v: &Value) -> Result<Value> {
    limits::check_digits(ctx, "text", v)?;
    let s = v.sprint(ctx.config());
    Ok(Value::Vector(Vector::new(s.chars().map(Value::Char).collect())))
}

fn float(ctx: &dyn Context, v: &Value) -> Result<Value> {
    let conf = ctx.config();
    match v {
        Value::Complex(z) => Ok(Value::Complex(Complex::new(
            to_kind("float", conf, z.re(), Kind::BigFloat)?,
            to_kind("float", conf, z.im(), Kind::BigFloat)?,
        ))),
        other => to_kind("float", conf, other, Kind::BigFloat),
    }
}
