//! The promotion ladder and its inverse, `shrink`.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive};

use glyph_core::{Config, EvalError, Result};

use crate::bigfloat::BigFloat;
use crate::complex::Complex;
use crate::value::{Kind, Matrix, Value, Vector};

/// Collapse a value to the least representation that reproduces it exactly.
///
/// Total and idempotent. Arrays are shrunk element by element.
pub fn shrink(v: Value) -> Value {
    match v {
        Value::BigInt(i) => shrink_bigint(i),
        Value::BigRat(r) => {
            if r.denom().is_one() {
                shrink_bigint(r.numer().clone())
            } else {
                Value::BigRat(r)
            }
        }
        Value::BigFloat(f) => shrink_float(f),
        Value::Complex(c) => {
            let (re, im) = c.into_parts();
            let (re, im) = (shrink(re), shrink(im));
            if im.is_zero() {
                re
            } else {
                Value::Complex(Complex::new(re, im))
            }
        }
        Value::Vector(v) => {
            Value::Vector(Vector::new(v.into_elems().into_iter().map(shrink).collect()))
        }
        Value::Matrix(m) => Value::Matrix(m.map(shrink)),
        other => other,
    }
}

fn shrink_bigint(i: BigInt) -> Value {
    match i.to_i64() {
        Some(n) => Value::Int(n),
        None => Value::BigInt(i),
    }
}

/// A float collapses to an integer only when it is integral and every bit
/// of that integer lies within its precision.
fn shrink_float(f: BigFloat) -> Value {
    if f.is_zero() {
        return Value::Int(0);
    }
    if f.is_integer() && f.top() <= f.prec() as i64 {
        if let Some(i) = f.floor() {
            return shrink_bigint(i);
        }
    }
    Value::BigFloat(f)
}

/// Least kind at or above both operands, or `None` when they cannot mix.
pub fn common_kind(a: Kind, b: Kind) -> Option<Kind> {
    if a == b {
        return Some(a);
    }
    match (a.rank(), b.rank()) {
        (Some(ra), Some(rb)) => Some(if ra >= rb { a } else { b }),
        // Chars sit beside the numeric ladder but inside arrays.
        (None, _) if b.is_array() => Some(b),
        (_, None) if a.is_array() => Some(a),
        _ => None,
    }
}

/// Widen `v` to kind `to`. Converting to BigFloat rounds at the configured
/// precision; every other step is exact. Narrowing is an internal error.
pub fn to_kind(op: &str, conf: &Config, v: &Value, to: Kind) -> Result<Value> {
    let from = v.kind();
    if from == to {
        return Ok(v.clone());
    }
    let prec = conf.float_prec;
    let out = match (v, to) {
        (_, Kind::Vector) if v.is_scalar() => Value::vector(vec![v.clone()]),
        (_, Kind::Matrix) if v.is_scalar() => Value::Matrix(Matrix::new(vec![1], vec![v.clone()])?),
        (Value::Vector(vec), Kind::Matrix) => {
            Value::Matrix(Matrix::new(vec![vec.len()], vec.elems().to_vec())?)
        }
        (Value::Char(_), _) | (_, Kind::Char) => {
            return Err(EvalError::type_error(
                op,
                v.describe(),
                format!("cannot mix {} and {}", from, to),
            ))
        }
        (Value::Int(i), Kind::BigInt) => Value::BigInt(BigInt::from(*i)),
        (Value::Int(i), Kind::BigRat) => Value::BigRat(BigRational::from_integer(BigInt::from(*i))),
        (Value::Int(i), Kind::BigFloat) => Value::BigFloat(BigFloat::from_i64(*i, prec)),
        (Value::BigInt(i), Kind::BigRat) => Value::BigRat(BigRational::from_integer(i.clone())),
        (Value::BigInt(i), Kind::BigFloat) => Value::BigFloat(BigFloat::from_bigint(i, prec)),
        (Value::BigRat(r), Kind::BigFloat) => Value::BigFloat(BigFloat::from_ratio(r, prec)),
        (_, Kind::Complex) if from.is_real() => Value::Complex(Complex::real(v.clone())),
        _ => {
            return Err(EvalError::internal(format!(
                "{}: cannot convert {} to {}",
                op, from, to
            )))
        }
    };
    Ok(out)
}

/// Bring two operands to their common kind.
pub fn promote(op: &str, conf: &Config, a: &Value, b: &Value) -> Result<(Value, Value)> {
    let kind = common_kind(a.kind(), b.kind()).ok_or_else(|| {
        EvalError::type_error(
            op,
            format!("{} and {}", a.describe(), b.describe()),
            format!("cannot mix {} and {}", a.kind(), b.kind()),
        )
    })?;
    Ok((to_kind(op, conf, a, kind)?, to_kind(op, conf, b, kind)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(n: i64, d: i64) -> Value {
        Value::BigRat(BigRational::new(n.into(), d.into()))
    }

    #[test]
    fn test_shrink_rational() {
        assert_eq!(shrink(rat(6, 3)), Value::Int(2));
        assert_eq!(shrink(rat(1, 3)), rat(1, 3));
    }

    #[test]
    fn test_shrink_bigint() {
        assert_eq!(shrink(Value::BigInt(BigInt::from(5))), Value::Int(5));
        let big: BigInt = BigInt::from(i64::MAX) + 1;
        assert_eq!(shrink(Value::BigInt(big.clone())), Value::BigInt(big));
    }

    #[test]
    fn test_shrink_float() {
        assert_eq!(shrink(Value::BigFloat(BigFloat::from_i64(-7, 64))), Value::Int(-7));
        let half = BigFloat::from_ratio(&BigRational::new(1.into(), 2.into()), 64);
        assert_eq!(shrink(Value::BigFloat(half.clone())), Value::BigFloat(half));
        let inf = BigFloat::infinity(false, 64);
        assert_eq!(shrink(Value::BigFloat(inf.clone())), Value::BigFloat(inf));
    }

    #[test]
    fn test_shrink_complex() {
        let z = Value::Complex(Complex::new(rat(4, 2), Value::BigFloat(BigFloat::zero(64))));
        assert_eq!(shrink(z), Value::Int(2));
        let w = Value::Complex(Complex::new(Value::Int(1), rat(2, 1)));
        assert_eq!(
            shrink(w),
            Value::Complex(Complex::new(Value::Int(1), Value::Int(2)))
        );
    }

    #[test]
    fn test_shrink_array() {
        let v = Value::vector(vec![rat(2, 2), Value::BigInt(BigInt::from(3))]);
        assert_eq!(shrink(v), Value::int_vector(&[1, 3]));
    }

    #[test]
    fn test_common_kind() {
        assert_eq!(common_kind(Kind::Int, Kind::BigFloat), Some(Kind::BigFloat));
        assert_eq!(common_kind(Kind::BigFloat, Kind::Int), Some(Kind::BigFloat));
        assert_eq!(common_kind(Kind::Complex, Kind::BigRat), Some(Kind::Complex));
        assert_eq!(common_kind(Kind::Char, Kind::Int), None);
        assert_eq!(common_kind(Kind::Char, Kind::Vector), Some(Kind::Vector));
        assert_eq!(common_kind(Kind::Char, Kind::Char), Some(Kind::Char));
    }

    #[test]
    fn test_to_kind() {
        let conf = Config::default();
        assert_eq!(
            to_kind("+", &conf, &Value::Int(3), Kind::BigRat).unwrap(),
            rat(3, 1)
        );
        assert_eq!(
            to_kind("+", &conf, &Value::Int(3), Kind::Vector).unwrap(),
            Value::int_vector(&[3])
        );
        assert!(to_kind("+", &conf, &Value::Char('a'), Kind::Int).is_err());
        let err = to_kind("+", &conf, &rat(1, 2), Kind::Int).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_promote_is_symmetric() {
        let conf = Config::default();
        let f = Value::BigFloat(BigFloat::from_i64(2, 256));
        let (a, b) = promote("+", &conf, &Value::Int(1), &f).unwrap();
        let (c, d) = promote("+", &conf, &f, &Value::Int(1)).unwrap();
        assert_eq!(a.kind(), Kind::BigFloat);
        assert_eq!(b.kind(), Kind::BigFloat);
        assert_eq!((a, b), (d, c));
    }
}
