use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use glyph_core::{EvalError, Result};

use crate::bigfloat::BigFloat;
use crate::complex;
use crate::context::Context;
use crate::value::Value;

use super::consts::{ln2_fixed, pi_float};
use super::{continuation, fx_div, fx_mul, fx_one, to_float};

/// Natural logarithm of a positive finite `x`.
///
/// `x = m·2^e` with `m` in `[1/√2, √2)`; `ln m = 2·atanh((m−1)/(m+1))`.
pub(crate) fn log_float(x: &BigFloat, prec: u32) -> BigFloat {
    let one_f = BigFloat::one(prec);
    if *x == one_f {
        return BigFloat::zero(prec);
    }
    // Near 1 the result is tiny, so keep as many extra bits as it has leading zeros.
    let exact = (x.mant_bits() as u32).max(prec) + 64;
    let d = x.sub(&one_f, exact);
    let guard = (-d.top()).clamp(0, 1 << 20) as u32;
    let w = prec + 64 + guard;

    let mut e = x.top();
    let mut m = x.mul_pow2(-e).to_fixed(w);
    let one = fx_one(w);
    if &m * &m * 2u32 < &one * &one {
        m <<= 1;
        e -= 1;
    }
    let z = fx_div(&(&m - &one), &(&m + &one), w);
    let z2 = fx_mul(&z, &z, w);
    let mut sum = z.clone();
    let mut term = z;
    let mut k = 1u32;
    loop {
        term = fx_mul(&term, &z2, w);
        let t = &term / (2 * k + 1);
        if t.is_zero() {
            break;
        }
        sum += t;
        k += 1;
    }
    let total = sum * 2u32 + ln2_fixed(w) * e;
    BigFloat::from_fixed(&total, w, prec)
}

/// Unary `log`. Zero is a domain error; negative reals continue into the
/// complex plane as `log|x| + iπ`.
pub(crate) fn log(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if let Value::Complex(_) = v {
        return complex::log(ctx, v);
    }
    let prec = ctx.config().float_prec;
    let x = to_float(ctx, "log", v)?;
    if x.is_zero() {
        return Err(EvalError::domain("log", v.describe(), "logarithm of zero"));
    }
    if x.is_negative() {
        continuation("log", v);
        if x.is_inf() {
            return Err(EvalError::domain("log", v.describe(), "argument is infinite"));
        }
        let re = log_float(&x.abs(), prec);
        return Ok(Value::Complex(complex::Complex::new(
            Value::BigFloat(re),
            Value::BigFloat(pi_float(prec)),
        )));
    }
    if x.is_inf() {
        return Ok(Value::BigFloat(x));
    }
    Ok(Value::BigFloat(log_float(&x, prec)))
}

/// Exact integer logarithm: `Some(k)` when `b = a^k` for integers `a > 1`, `b > 0`.
fn exact_int_log(a: &BigInt, b: &BigInt) -> Option<i64> {
    if a <= &BigInt::one() || !b.is_positive() {
        return None;
    }
    let mut b = b.clone();
    let mut k = 0i64;
    while !b.is_one() {
        let (q, r) = b.div_rem(a);
        if !r.is_zero() {
            return None;
        }
        b = q;
        k += 1;
    }
    Some(k)
}

/// Binary `log`: the logarithm of `b` to base `a`.
pub(crate) fn log_base(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    if let (Some(x), Some(y)) = (a.to_bigint(), b.to_bigint()) {
        if let Some(k) = exact_int_log(&x, &y) {
            return Ok(Value::Int(k));
        }
    }
    if a.is_zero() || b.is_zero() {
        return Err(EvalError::domain(
            "log",
            format!("{} and {}", a.describe(), b.describe()),
            "logarithm of zero",
        ));
    }
    complex::log_base(ctx, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Session;
    use crate::math::testutil::{approx, close};
    use num_rational::BigRational;

    #[test]
    fn test_log_values() {
        let s = Session::default();
        assert!(log(&s, &Value::Int(1)).unwrap().is_zero());
        assert!(close(&log(&s, &Value::Int(10)).unwrap(), 10f64.ln()));
        let r = Value::BigRat(BigRational::new(1.into(), 7.into()));
        assert!(close(&log(&s, &r).unwrap(), (1.0f64 / 7.0).ln()));
        assert!(close(&log(&s, &Value::Int(1 << 40)).unwrap(), 40.0 * 2f64.ln()));
    }

    #[test]
    fn test_log_near_one() {
        let prec = 256;
        let tiny = BigFloat::one(prec).mul_pow2(-200);
        let x = BigFloat::one(prec).add(&tiny, 512);
        let l = log_float(&x, prec);
        // ln(1 + t) = t − t²/2 + …
        let rel = l.sub(&tiny, prec).quo(&tiny, prec);
        assert!(rel.to_f64().abs() < 1e-50);
    }

    #[test]
    fn test_log_zero_and_negative() {
        let s = Session::default();
        assert!(log(&s, &Value::Int(0)).is_err());
        match log(&s, &Value::Int(-1)).unwrap() {
            Value::Complex(c) => {
                assert!(c.re().is_zero());
                assert!((approx(c.im()) - std::f64::consts::PI).abs() < 1e-12);
            }
            other => panic!("expected complex, got {:?}", other),
        }
    }

    #[test]
    fn test_log_base() {
        let s = Session::default();
        assert_eq!(log_base(&s, &Value::Int(2), &Value::Int(1024)).unwrap(), Value::Int(10));
        assert!(close(&log_base(&s, &Value::Int(10), &Value::Int(2)).unwrap(), 2f64.log10()));
        assert!(log_base(&s, &Value::Int(0), &Value::Int(2)).is_err());
    }
}
