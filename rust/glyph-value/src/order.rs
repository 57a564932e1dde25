//! Ordering and equality across representations.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::bigfloat::BigFloat;
use crate::value::Value;

fn exact_ratio(v: &Value) -> Option<BigRational> {
    match v {
        Value::Int(i) => Some(BigRational::from_integer(BigInt::from(*i))),
        Value::BigInt(i) => Some(BigRational::from_integer(i.clone())),
        Value::BigRat(r) => Some(r.clone()),
        _ => None,
    }
}

/// `top` of a nonzero rational is within one of `bits(num) − bits(den)`.
fn ratio_top(r: &BigRational) -> i64 {
    r.numer().bits() as i64 - r.denom().bits() as i64
}

fn cmp_float_ratio(f: &BigFloat, r: &BigRational) -> Ordering {
    let fs = f.sign();
    let rs = match r.numer().sign() {
        num_bigint::Sign::Minus => -1,
        num_bigint::Sign::NoSign => 0,
        num_bigint::Sign::Plus => 1,
    };
    if fs != rs || fs == 0 {
        return fs.cmp(&rs);
    }
    if f.is_inf() {
        return fs.cmp(&0);
    }
    let (ft, rt) = (f.top(), ratio_top(r));
    if (ft - rt).abs() > 2 {
        // Same sign, clearly different magnitudes.
        let by_mag = ft.cmp(&rt);
        return if fs > 0 { by_mag } else { by_mag.reverse() };
    }
    match f.to_ratio() {
        Some(fr) => fr.cmp(r),
        None => fs.cmp(&0),
    }
}

/// Exact comparison of two real scalars; `None` unless both are real.
pub fn real_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::BigFloat(x), Value::BigFloat(y)) => Some(x.cmp(y)),
        (Value::BigFloat(x), other) => exact_ratio(other).map(|r| cmp_float_ratio(x, &r)),
        (other, Value::BigFloat(y)) => {
            exact_ratio(other).map(|r| cmp_float_ratio(y, &r).reverse())
        }
        _ => Some(exact_ratio(a)?.cmp(&exact_ratio(b)?)),
    }
}

/// Value equality: numbers compare by value regardless of representation,
/// arrays by shape and elements.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Char(x), Value::Char(y)) => x == y,
        (Value::Complex(x), Value::Complex(y)) => {
            values_equal(x.re(), y.re()) && values_equal(x.im(), y.im())
        }
        (Value::Complex(z), r) | (r, Value::Complex(z)) if r.kind().is_real() => {
            z.im().is_zero() && values_equal(z.re(), r)
        }
        (Value::Vector(x), Value::Vector(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| values_equal(p, q))
        }
        (Value::Matrix(x), Value::Matrix(y)) => {
            x.dims() == y.dims()
                && x.data().iter().zip(y.data()).all(|(p, q)| values_equal(p, q))
        }
        _ => real_cmp(a, b) == Some(Ordering::Equal),
    }
}

fn class(v: &Value) -> u8 {
    match v {
        Value::Char(_) => 1,
        Value::Vector(_) | Value::Matrix(_) => 2,
        _ => 0,
    }
}

/// A total order used by grading: numbers before chars before arrays.
/// Complex numbers order by real part, then imaginary part.
pub fn total_cmp(a: &Value, b: &Value) -> Ordering {
    let (ca, cb) = (class(a), class(b));
    if ca != cb {
        return ca.cmp(&cb);
    }
    match (a, b) {
        (Value::Char(x), Value::Char(y)) => x.cmp(y),
        (Value::Vector(_) | Value::Matrix(_), _) => {
            let (xs, ys) = (a.elements(), b.elements());
            xs.iter()
                .zip(ys.iter())
                .map(|(x, y)| total_cmp(x, y))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| xs.len().cmp(&ys.len()))
        }
        _ => {
            let (ar, ai) = parts(a);
            let (br, bi) = parts(b);
            real_cmp(ar, br)
                .unwrap_or(Ordering::Equal)
                .then_with(|| real_cmp(ai, bi).unwrap_or(Ordering::Equal))
        }
    }
}

static ZERO: Value = Value::Int(0);

fn parts(v: &Value) -> (&Value, &Value) {
    match v {
        Value::Complex(z) => (z.re(), z.im()),
        other => (other, &ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::Complex;

    fn rat(n: i64, d: i64) -> Value {
        Value::BigRat(BigRational::new(n.into(), d.into()))
    }

    fn float(n: i64, d: i64) -> Value {
        Value::BigFloat(BigFloat::from_ratio(&BigRational::new(n.into(), d.into()), 256))
    }

    #[test]
    fn test_real_cmp_mixed() {
        assert_eq!(real_cmp(&Value::Int(1), &rat(1, 2)), Some(Ordering::Greater));
        assert_eq!(real_cmp(&rat(-1, 3), &Value::Int(0)), Some(Ordering::Less));
        assert_eq!(real_cmp(&float(1, 2), &rat(1, 2)), Some(Ordering::Equal));
        assert_ne!(real_cmp(&float(1, 3), &rat(1, 3)), Some(Ordering::Equal));
        assert_eq!(real_cmp(&Value::Int(1 << 40), &float(1, 1)), Some(Ordering::Greater));
        assert_eq!(real_cmp(&float(-7, 1), &Value::Int(-100)), Some(Ordering::Greater));
        assert_eq!(real_cmp(&Value::Char('a'), &Value::Int(1)), None);
    }

    #[test]
    fn test_real_cmp_infinity() {
        let inf = Value::BigFloat(BigFloat::infinity(false, 64));
        let big = Value::BigInt(BigInt::from(10).pow(100));
        assert_eq!(real_cmp(&inf, &big), Some(Ordering::Greater));
        assert_eq!(real_cmp(&big, &inf), Some(Ordering::Less));
    }

    #[test]
    fn test_values_equal() {
        assert!(values_equal(&Value::Int(2), &float(2, 1)));
        assert!(values_equal(&Value::int_vector(&[1, 2]), &Value::vector(vec![rat(2, 2), Value::Int(2)])));
        assert!(!values_equal(&Value::int_vector(&[1, 2]), &Value::int_vector(&[1])));
        let z = Value::Complex(Complex::new(Value::Int(1), Value::Int(2)));
        assert!(values_equal(&z, &z.clone()));
        assert!(!values_equal(&z, &Value::Int(1)));
        assert!(!values_equal(&Value::Char('1'), &Value::Int(1)));
    }

    #[test]
    fn test_total_order() {
        let mut xs = vec![
            Value::Char('b'),
            Value::Int(3),
            Value::int_vector(&[1]),
            rat(1, 2),
            Value::Char('a'),
        ];
        xs.sort_by(total_cmp);
        assert_eq!(
            xs,
            vec![
                rat(1, 2),
                Value::Int(3),
                Value::Char('a'),
                Value::Char('b'),
                Value::int_vector(&[1]),
            ]
        );
    }
}
