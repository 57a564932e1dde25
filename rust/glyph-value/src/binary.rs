//! The binary operator table.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use glyph_core::{EvalError, Result};

use crate::array::structural;
use crate::complex::{self, Complex};
use crate::context::Context;
use crate::eval::BinaryOp;
use crate::format;
use crate::limits;
use crate::math;
use crate::order::{real_cmp, values_equal};
use crate::unary::factorial_bits;
use crate::value::{Kind, Value};

const SCALARS: [Kind; 6] = [
    Kind::Int,
    Kind::Char,
    Kind::BigInt,
    Kind::BigRat,
    Kind::BigFloat,
    Kind::Complex,
];

pub(crate) fn ops() -> Vec<BinaryOp> {
    vec![
        BinaryOp::pointwise("+").numbers(add),
        BinaryOp::pointwise("-").numbers(sub),
        BinaryOp::pointwise("*").numbers(mul),
        BinaryOp::pointwise("/").numbers(quo),
        BinaryOp::pointwise("div").reals(euclid_div),
        BinaryOp::pointwise("mod").reals(euclid_mod),
        BinaryOp::pointwise("idiv").integers(trunc_div),
        BinaryOp::pointwise("imod").integers(trunc_mod),
        BinaryOp::pointwise("**").mixed().numbers(math::pow),
        BinaryOp::pointwise("log").mixed().numbers(math::log_base),
        BinaryOp::pointwise("min").reals(min),
        BinaryOp::pointwise("max").reals(max),
        BinaryOp::pointwise("!").integers(binomial),
        BinaryOp::pointwise("j").mixed().reals(make_complex),
        BinaryOp::pointwise("==").mixed().with(&SCALARS, eq),
        BinaryOp::pointwise("!=").mixed().with(&SCALARS, ne),
        BinaryOp::pointwise("<").reals(lt).with(&[Kind::Char], lt),
        BinaryOp::pointwise("<=").reals(le).with(&[Kind::Char], le),
        BinaryOp::pointwise(">").reals(gt).with(&[Kind::Char], gt),
        BinaryOp::pointwise(">=").reals(ge).with(&[Kind::Char], ge),
        BinaryOp::pointwise("and").numbers(and),
        BinaryOp::pointwise("or").numbers(or),
        BinaryOp::pointwise("xor").numbers(xor),
        BinaryOp::pointwise("nand").numbers(nand),
        BinaryOp::pointwise("nor").numbers(nor),
        BinaryOp::pointwise("&").integers(bit_and),
        BinaryOp::pointwise("|").integers(bit_or),
        BinaryOp::pointwise("^").integers(bit_xor),
        BinaryOp::pointwise("<<").integers(shift_left),
        BinaryOp::pointwise(">>").integers(shift_right),
        BinaryOp::structural("rho", structural::reshape),
        BinaryOp::structural(",", structural::catenate),
        BinaryOp::structural("take", structural::take),
        BinaryOp::structural("drop", structural::drop),
        BinaryOp::structural("rot", structural::rotate_last),
        BinaryOp::structural("flip", structural::rotate_first),
        BinaryOp::structural("transp", structural::transpose),
        BinaryOp::structural("iota", structural::index_of),
        BinaryOp::structural("in", structural::member_of),
        BinaryOp::structural("?", structural::deal),
        BinaryOp::structural("sel", structural::select),
        BinaryOp::structural("fill", structural::fill),
        BinaryOp::structural("decode", structural::decode),
        BinaryOp::structural("encode", structural::encode),
        BinaryOp::structural("text", format::format_with),
    ]
}

fn unexpected(op: &str, a: &Value, b: &Value) -> EvalError {
    EvalError::internal(format!("{}: no case for {} and {}", op, a.kind(), b.kind()))
}

fn pair_desc(a: &Value, b: &Value) -> String {
    format!("{} and {}", a.describe(), b.describe())
}

fn prec(ctx: &dyn Context) -> u32 {
    ctx.config().float_prec
}

fn add(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(match (a, b) {
        (Value::Int(x), Value::Int(y)) => match x.checked_add(*y) {
            Some(s) => Value::Int(s),
            None => Value::BigInt(BigInt::from(*x) + *y),
        },
        (Value::BigInt(x), Value::BigInt(y)) => Value::BigInt(x + y),
        (Value::BigRat(x), Value::BigRat(y)) => Value::BigRat(x + y),
        (Value::BigFloat(x), Value::BigFloat(y)) => {
            if x.is_inf() && y.is_inf() && x.is_negative() != y.is_negative() {
                return Err(EvalError::domain("+", pair_desc(a, b), "infinities of opposite sign"));
            }
            Value::BigFloat(x.add(y, prec(ctx)))
        }
        (Value::Complex(x), Value::Complex(y)) => return complex::add(ctx, x, y),
        _ => return Err(unexpected("+", a, b)),
    })
}

fn sub(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(match (a, b) {
        (Value::Int(x), Value::Int(y)) => match x.checked_sub(*y) {
            Some(s) => Value::Int(s),
            None => Value::BigInt(BigInt::from(*x) - *y),
        },
        (Value::BigInt(x), Value::BigInt(y)) => Value::BigInt(x - y),
        (Value::BigRat(x), Value::BigRat(y)) => Value::BigRat(x - y),
        (Value::BigFloat(x), Value::BigFloat(y)) => {
            if x.is_inf() && y.is_inf() && x.is_negative() == y.is_negative() {
                return Err(EvalError::domain("-", pair_desc(a, b), "infinities of the same sign"));
            }
            Value::BigFloat(x.sub(y, prec(ctx)))
        }
        (Value::Complex(x), Value::Complex(y)) => return complex::sub(ctx, x, y),
        _ => return Err(unexpected("-", a, b)),
    })
}

fn mul(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(match (a, b) {
        (Value::Int(x), Value::Int(y)) => match x.checked_mul(*y) {
            Some(p) => Value::Int(p),
            None => Value::BigInt(BigInt::from(*x) * *y),
        },
        (Value::BigInt(x), Value::BigInt(y)) => {
            limits::check_bits(ctx, "*", x.bits() + y.bits())?;
            Value::BigInt(x * y)
        }
        (Value::BigRat(x), Value::BigRat(y)) => Value::BigRat(x * y),
        (Value::BigFloat(x), Value::BigFloat(y)) => {
            if (x.is_inf() && y.is_zero()) || (x.is_zero() && y.is_inf()) {
                return Err(EvalError::domain("*", pair_desc(a, b), "zero times infinity"));
            }
            Value::BigFloat(x.mul(y, prec(ctx)))
        }
        (Value::Complex(x), Value::Complex(y)) => return complex::mul(ctx, x, y),
        _ => return Err(unexpected("*", a, b)),
    })
}

fn as_ratio(v: &Value) -> Option<BigRational> {
    match v {
        Value::Int(i) => Some(BigRational::from_integer(BigInt::from(*i))),
        Value::BigInt(i) => Some(BigRational::from_integer(i.clone())),
        Value::BigRat(r) => Some(r.clone()),
        _ => None,
    }
}

/// Exact division: integers that do not divide evenly become rationals.
fn quo(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    if b.is_zero() {
        return Err(EvalError::domain("/", pair_desc(a, b), "division by zero"));
    }
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => {
            if let Some(q) = x.checked_div(*y).filter(|_| x % y == 0) {
                return Ok(Value::Int(q));
            }
            Ok(Value::BigRat(BigRational::new(BigInt::from(*x), BigInt::from(*y))))
        }
        (Value::BigFloat(x), Value::BigFloat(y)) => {
            if x.is_inf() && y.is_inf() {
                return Err(EvalError::domain("/", pair_desc(a, b), "infinity over infinity"));
            }
            Ok(Value::BigFloat(x.quo(y, prec(ctx))))
        }
        (Value::Complex(x), Value::Complex(y)) => complex::quo(ctx, x, y),
        _ => match (as_ratio(a), as_ratio(b)) {
            (Some(x), Some(y)) => Ok(Value::BigRat(x / y)),
            _ => Err(unexpected("/", a, b)),
        },
    }
}

/// Euclidean quotient `q` with `a = q·b + r`, `0 ≤ r < |b|`.
fn euclid_quotient(ctx: &dyn Context, op: &str, a: &Value, b: &Value) -> Result<BigInt> {
    if b.is_zero() {
        return Err(EvalError::domain(op, pair_desc(a, b), "division by zero"));
    }
    if let (Some(x), Some(y)) = (a.to_bigint(), b.to_bigint()) {
        let (q, r) = x.div_rem(&y);
        return Ok(if r.is_negative() {
            if y.is_positive() {
                q - 1
            } else {
                q + 1
            }
        } else {
            q
        });
    }
    let q = quotient_value(ctx, op, a, b)?;
    if b.sign() == Some(1) {
        floor_of(op, &q)
    } else {
        floor_of(op, &negate_value(&q)).map(|f| -f)
    }
}

fn negate_value(v: &Value) -> Value {
    match v {
        Value::BigRat(r) => Value::BigRat(-r.clone()),
        Value::BigFloat(f) => Value::BigFloat(f.neg()),
        other => other.clone(),
    }
}

fn quotient_value(ctx: &dyn Context, op: &str, a: &Value, b: &Value) -> Result<Value> {
    match (a, b) {
        (Value::BigFloat(x), Value::BigFloat(y)) => {
            if x.is_inf() {
                return Err(EvalError::domain(op, pair_desc(a, b), "argument is infinite"));
            }
            let q = x.quo(y, prec(ctx));
            limits::check_bits(ctx, op, q.top().max(0) as u64)?;
            Ok(Value::BigFloat(q))
        }
        _ => match (as_ratio(a), as_ratio(b)) {
            (Some(x), Some(y)) => Ok(Value::BigRat(x / y)),
            _ => Err(unexpected(op, a, b)),
        },
    }
}

fn floor_of(op: &str, v: &Value) -> Result<BigInt> {
    match v {
        Value::BigRat(r) => Ok(r.floor().to_integer()),
        Value::BigFloat(f) => f
            .floor()
            .ok_or_else(|| EvalError::domain(op, v.describe(), "argument is infinite")),
        other => other
            .to_bigint()
            .ok_or_else(|| EvalError::internal(format!("{}: cannot floor {}", op, other.kind()))),
    }
}

fn euclid_div(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(Value::BigInt(euclid_quotient(ctx, "div", a, b)?))
}

/// `a − b·(a div b)`, always non-negative.
fn euclid_mod(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    if let (Some(x), Some(y)) = (a.to_bigint(), b.to_bigint()) {
        if y.is_zero() {
            return Err(EvalError::domain("mod", pair_desc(a, b), "division by zero"));
        }
        // mod_floor takes the sign of the divisor.
        let r = x.mod_floor(&y);
        return Ok(Value::BigInt(if r.is_negative() { r - y } else { r }));
    }
    let q = Value::BigInt(euclid_quotient(ctx, "mod", a, b)?);
    let qb = ctx.eval_binary(&q, "*", b)?;
    ctx.eval_binary(a, "-", &qb)
}

fn trunc_div(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let (x, y) = integer_pair("idiv", a, b)?;
    if y.is_zero() {
        return Err(EvalError::domain("idiv", pair_desc(a, b), "division by zero"));
    }
    Ok(Value::BigInt(x / y))
}

fn trunc_mod(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let (x, y) = integer_pair("imod", a, b)?;
    if y.is_zero() {
        return Err(EvalError::domain("imod", pair_desc(a, b), "division by zero"));
    }
    Ok(Value::BigInt(x % y))
}

fn integer_pair(op: &str, a: &Value, b: &Value) -> Result<(BigInt, BigInt)> {
    match (a.to_bigint(), b.to_bigint()) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(unexpected(op, a, b)),
    }
}

fn ordering(op: &str, a: &Value, b: &Value) -> Result<Ordering> {
    match (a, b) {
        (Value::Char(x), Value::Char(y)) => Ok(x.cmp(y)),
        _ => real_cmp(a, b).ok_or_else(|| unexpected(op, a, b)),
    }
}

fn min(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(if ordering("min", a, b)? == Ordering::Greater { b.clone() } else { a.clone() })
}

fn max(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(if ordering("max", a, b)? == Ordering::Less { b.clone() } else { a.clone() })
}

/// `a ! b`: the number of ways to choose `a` items from `b`.
fn binomial(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let (k, n) = integer_pair("!", a, b)?;
    if k.is_negative() || n.is_negative() {
        return Err(EvalError::domain("!", pair_desc(a, b), "negative argument"));
    }
    if k > n {
        return Ok(Value::Int(0));
    }
    let k = std::cmp::min(k.clone(), &n - &k);
    let (k, n) = match (k.to_u64(), n.to_u64()) {
        (Some(k), Some(n)) => (k, n),
        _ => {
            limits::check_bits(ctx, "!", u64::MAX)?;
            return Err(EvalError::domain("!", pair_desc(a, b), "argument is too large"));
        }
    };
    let bits = factorial_bits(n).saturating_sub(factorial_bits(k) + factorial_bits(n - k));
    limits::check_bits(ctx, "!", bits)?;
    let mut acc = BigInt::one();
    for i in 0..k {
        acc = acc * (n - i) / (i + 1);
    }
    Ok(Value::BigInt(acc))
}

fn make_complex(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(Value::Complex(Complex::new(a.clone(), b.clone())))
}

fn eq(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(Value::from_bool(values_equal(a, b)))
}

fn ne(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(Value::from_bool(!values_equal(a, b)))
}

fn lt(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(Value::from_bool(ordering("<", a, b)?.is_lt()))
}

fn le(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(Value::from_bool(ordering("<=", a, b)?.is_le()))
}

fn gt(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(Value::from_bool(ordering(">", a, b)?.is_gt()))
}

fn ge(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(Value::from_bool(ordering(">=", a, b)?.is_ge()))
}

fn truth(v: &Value) -> bool {
    !v.is_zero()
}

fn and(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(Value::from_bool(truth(a) && truth(b)))
}

fn or(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(Value::from_bool(truth(a) || truth(b)))
}

fn xor(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(Value::from_bool(truth(a) != truth(b)))
}

fn nand(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(Value::from_bool(!(truth(a) && truth(b))))
}

fn nor(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    Ok(Value::from_bool(!(truth(a) || truth(b))))
}

fn bit_and(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x & y)),
        _ => {
            let (x, y) = integer_pair("&", a, b)?;
            Ok(Value::BigInt(x & y))
        }
    }
}

fn bit_or(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x | y)),
        _ => {
            let (x, y) = integer_pair("|", a, b)?;
            Ok(Value::BigInt(x | y))
        }
    }
}

fn bit_xor(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x ^ y)),
        _ => {
            let (x, y) = integer_pair("^", a, b)?;
            Ok(Value::BigInt(x ^ y))
        }
    }
}

fn shift_count(op: &str, a: &Value, b: &Value) -> Result<u64> {
    match b.to_bigint() {
        Some(n) if n.is_negative() => {
            Err(EvalError::domain(op, pair_desc(a, b), "negative shift count"))
        }
        Some(n) => Ok(n.to_u64().unwrap_or(u64::MAX)),
        None => Err(unexpected(op, a, b)),
    }
}

fn shift_left(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let n = shift_count("<<", a, b)?;
    let x = a.to_bigint().ok_or_else(|| unexpected("<<", a, b))?;
    if x.is_zero() {
        return Ok(Value::Int(0));
    }
    limits::check_bits(ctx, "<<", x.bits().saturating_add(n))?;
    let n = usize::try_from(n)
        .map_err(|_| EvalError::domain("<<", pair_desc(a, b), "shift count is too large"))?;
    Ok(Value::BigInt(x << n))
}

fn shift_right(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let n = shift_count(">>", a, b)?;
    let x = a.to_bigint().ok_or_else(|| unexpected(">>", a, b))?;
    if n >= x.bits() {
        return Ok(Value::Int(if x.is_negative() { -1 } else { 0 }));
    }
    Ok(Value::BigInt(x >> n as usize))
}
