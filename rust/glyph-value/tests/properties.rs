//! Properties of the representation lattice and the array operators.
//!
//! `shrink` is total, idempotent and minimal; `promote` does not depend on
//! operand order; exact division round-trips; the reversing operators are
//! involutions.

use num_bigint::BigInt;
use num_rational::BigRational;
use proptest::prelude::*;

use glyph_value::{eval_binary, eval_unary, promote, shrink, BigFloat, Complex, Config, Kind, Matrix, Session, Value};

fn arb_real() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<i128>().prop_map(|i| Value::BigInt(BigInt::from(i))),
        (any::<i64>(), 1i64..1_000_000)
            .prop_map(|(n, d)| Value::BigRat(BigRational::new(n.into(), d.into()))),
        (-1_000_000i64..1_000_000, 1i64..1_000)
            .prop_map(|(n, d)| Value::BigFloat(BigFloat::from_ratio(&BigRational::new(n.into(), d.into()), 128))),
    ]
}

fn arb_number() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => arb_real(),
        1 => (arb_real(), arb_real()).prop_map(|(re, im)| Value::Complex(Complex::new(re, im))),
    ]
}

fn arb_matrix() -> impl Strategy<Value = Value> {
    (1usize..5, 1usize..5).prop_flat_map(|(r, c)| {
        prop::collection::vec(-100i64..100, r * c).prop_map(move |xs| {
            let data = xs.into_iter().map(Value::Int).collect();
            Value::Matrix(Matrix::new(vec![r, c], data).unwrap())
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn shrink_is_idempotent(v in arb_number()) {
        let once = shrink(v);
        let twice = shrink(once.clone());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn shrink_is_minimal(i in any::<i64>()) {
        let big = shrink(Value::BigInt(BigInt::from(i)));
        prop_assert_eq!(big, Value::Int(i));
        let rat = shrink(Value::BigRat(BigRational::from_integer(BigInt::from(i))));
        prop_assert_eq!(rat, Value::Int(i));
    }

    #[test]
    fn shrink_drops_zero_imaginary(x in arb_real()) {
        let z = shrink(Value::Complex(Complex::new(x.clone(), Value::Int(0))));
        let real = shrink(x);
        prop_assert_eq!(z, real);
    }

    #[test]
    fn promote_is_order_independent(a in arb_number(), b in arb_number()) {
        let conf = Config::default();
        let (x, y) = promote("+", &conf, &a, &b).unwrap();
        let (p, q) = promote("+", &conf, &b, &a).unwrap();
        prop_assert_eq!(x.kind(), y.kind());
        prop_assert_eq!(x.kind(), p.kind());
        prop_assert_eq!(y.kind(), q.kind());
        prop_assert!(x.kind().rank() >= a.kind().rank().min(b.kind().rank()));
    }

    #[test]
    fn int_division_round_trips(a in any::<i64>(), b in any::<i64>().prop_filter("nonzero", |b| *b != 0)) {
        let s = Session::default();
        let q = eval_binary(&s, &Value::Int(a), "/", &Value::Int(b)).unwrap();
        let kind = q.kind();
        prop_assert!(matches!(kind, Kind::Int | Kind::BigInt | Kind::BigRat));
        let inexact = a.checked_rem(b).unwrap_or(0) != 0;
        prop_assert_eq!(kind == Kind::BigRat, inexact);
        let back = eval_binary(&s, &q, "*", &Value::Int(b)).unwrap();
        prop_assert_eq!(back, Value::Int(a));
    }

    #[test]
    fn reversals_are_involutions(m in arb_matrix()) {
        let s = Session::default();
        for op in ["rot", "flip", "transp"] {
            let once = eval_unary(&s, op, &m).unwrap();
            let twice = eval_unary(&s, op, &once).unwrap();
            prop_assert_eq!(twice, m.clone());
        }
    }

    #[test]
    fn grades_reverse_for_distinct_values(mut xs in prop::collection::vec(-1000i64..1000, 0..20)) {
        xs.sort_unstable();
        xs.dedup();
        xs.reverse();
        let mid = xs.len() / 3;
        xs.rotate_left(mid);
        let s = Session::default();
        let v = Value::int_vector(&xs);
        let up = eval_unary(&s, "up", &v).unwrap();
        let down = eval_unary(&s, "down", &v).unwrap();
        let reversed = eval_unary(&s, "rot", &up).unwrap();
        prop_assert_eq!(reversed, down);
    }
}
