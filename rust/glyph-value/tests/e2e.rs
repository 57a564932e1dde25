//! End-to-end tests: evaluate operators through the public entry points of a session.

use glyph_value::{
    eval_binary, eval_unary, inner_product, promote, reduce, Complex, Config, ErrorKind, EvalError, Kind, Limit,
    Matrix, Session, Value,
};
use num_bigint::BigInt;
use num_rational::BigRational;

fn session() -> Session {
    Session::default()
}

fn unary(s: &Session, op: &str, v: Value) -> Value {
    eval_unary(s, op, &v).expect("unary operator should evaluate")
}

fn binary(s: &Session, l: Value, op: &str, r: Value) -> Value {
    eval_binary(s, &l, op, &r).expect("binary operator should evaluate")
}

fn rat(n: i64, d: i64) -> Value {
    Value::BigRat(BigRational::new(n.into(), d.into()))
}

fn matrix(dims: &[usize], xs: &[i64]) -> Value {
    Value::Matrix(Matrix::new(dims.to_vec(), xs.iter().map(|&x| Value::Int(x)).collect()).unwrap())
}

// ─── Exact arithmetic ───

#[test]
fn e2e_division_is_exact() {
    let s = session();
    assert_eq!(binary(&s, Value::Int(1), "/", Value::Int(3)), rat(1, 3));
    assert_eq!(binary(&s, Value::Int(6), "/", Value::Int(3)), Value::Int(2));
    assert_eq!(binary(&s, Value::Int(4), "/", Value::Int(-6)), rat(-2, 3));
    let recip = unary(&s, "/", Value::Int(3));
    assert_eq!(binary(&s, Value::Int(1), "*", recip), rat(1, 3));
}

#[test]
fn e2e_division_by_zero_is_domain_error() {
    let s = session();
    let err = eval_binary(&s, &Value::Int(1), "/", &Value::Int(0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert_eq!(err.op(), Some("/"));
}

#[test]
fn e2e_rational_sum_shrinks_to_int() {
    let s = session();
    assert_eq!(binary(&s, rat(1, 2), "+", rat(1, 2)), Value::Int(1));
}

#[test]
fn e2e_promote_is_order_independent() {
    let conf = Config::default();
    let f = Value::BigFloat(glyph_value::BigFloat::from_i64(3, conf.float_prec));
    let (a, b) = promote("+", &conf, &Value::Int(2), &f).unwrap();
    let (c, d) = promote("+", &conf, &f, &Value::Int(2)).unwrap();
    assert_eq!(a.kind(), Kind::BigFloat);
    assert_eq!(b.kind(), Kind::BigFloat);
    assert_eq!((a, b), (d, c));
}

// ─── Scenarios ───

#[test]
fn e2e_scalar_plus_iota() {
    let s = session();
    let v = unary(&s, "iota", Value::Int(2));
    assert_eq!(v, Value::int_vector(&[1, 2]));
    assert_eq!(binary(&s, Value::Int(3), "+", v), Value::int_vector(&[4, 5]));
}

#[test]
fn e2e_iota_follows_origin() {
    let s = Session::new(Config::default().with_origin(0));
    assert_eq!(unary(&s, "iota", Value::Int(3)), Value::int_vector(&[0, 1, 2]));
}

#[test]
fn e2e_sqrt_of_negative_one() {
    let s = session();
    let z = unary(&s, "sqrt", Value::Int(-1));
    assert_eq!(z, Value::Complex(Complex::new(Value::Int(0), Value::Int(1))));
}

#[test]
fn e2e_factorial_respects_max_bits() {
    let s = Session::new(Config::default().with_max_bits(8));
    let err = eval_unary(&s, "!", &Value::Int(50)).unwrap_err();
    assert!(matches!(err, EvalError::Limit { limit: Limit::Bits, .. }));
    assert_eq!(unary(&s, "!", Value::Int(4)), Value::Int(24));
}

#[test]
fn e2e_rot_matrix() {
    let s = session();
    let m = matrix(&[2, 3], &[1, 2, 3, 4, 5, 6]);
    assert_eq!(unary(&s, "rot", m), matrix(&[2, 3], &[3, 2, 1, 6, 5, 4]));
}

#[test]
fn e2e_rot_and_flip_are_involutions() {
    let s = session();
    let m = binary(&s, Value::int_vector(&[3, 4]), "rho", unary(&s, "iota", Value::Int(12)));
    for op in ["rot", "flip", "transp"] {
        let twice = unary(&s, op, unary(&s, op, m.clone()));
        assert_eq!(twice, m, "{} twice", op);
    }
}

#[test]
fn e2e_up_and_down_reverse_each_other() {
    let s = session();
    let v = Value::vector(vec![Value::Int(5), rat(1, 2), Value::Int(-3), Value::Int(9)]);
    let up = unary(&s, "up", v.clone());
    let down = unary(&s, "down", v);
    assert_eq!(unary(&s, "rot", up), down);
}

// ─── Transcendentals ───

#[test]
fn e2e_acosh_and_atanh_edges() {
    let s = session();
    assert_eq!(unary(&s, "acosh", Value::Int(1)), Value::Int(0));
    assert_eq!(unary(&s, "acosh", rat(1, 2)).kind(), Kind::Complex);
    assert_eq!(unary(&s, "atanh", Value::Int(1)).to_string(), "+Inf");
    assert_eq!(unary(&s, "atanh", Value::Int(-1)).to_string(), "-Inf");
    assert_eq!(unary(&s, "atanh", Value::Int(2)).kind(), Kind::Complex);
}

#[test]
fn e2e_exp_log_round_trip() {
    let s = session();
    let x = unary(&s, "log", unary(&s, "**", Value::Int(2)));
    assert_eq!(x.to_string(), "2");
}

#[test]
fn e2e_pi_prints() {
    let s = session();
    let pi = glyph_value::constants::pi(&s);
    assert_eq!(pi.to_string(), "3.14159265359");
    assert_eq!(unary(&s, "cos", Value::Int(0)).to_string(), "1");
}

// ─── Errors ───

#[test]
fn e2e_char_arithmetic_is_type_error() {
    let s = session();
    let err = eval_binary(&s, &Value::Char('a'), "+", &Value::Int(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(binary(&s, Value::Char('a'), "<", Value::Char('b')), Value::Int(1));
}

#[test]
fn e2e_shape_mismatch_is_type_error() {
    let s = session();
    let err = eval_binary(&s, &Value::int_vector(&[1, 2]), "+", &Value::int_vector(&[1, 2, 3])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert!(!err.is_internal());
}

#[test]
fn e2e_unknown_operator() {
    let s = session();
    let err = eval_unary(&s, "frobnicate", &Value::Int(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
}

#[test]
fn e2e_stack_limit() {
    let s = Session::new(Config::default().with_max_stack(3));
    let deep = Value::vector(vec![Value::vector(vec![Value::vector(vec![Value::vector(vec![
        Value::Int(1),
    ])])])]);
    let err = glyph_value::Context::eval_unary(&s, "-", &deep).unwrap_err();
    assert!(matches!(err, EvalError::Limit { limit: Limit::Stack, .. }));
    assert_eq!(s.depth(), 0);
}

// ─── Arrays ───

#[test]
fn e2e_matrix_product() {
    let s = session();
    let a = matrix(&[2, 2], &[1, 2, 3, 4]);
    let id = matrix(&[2, 2], &[1, 0, 0, 1]);
    assert_eq!(inner_product(&s, &a, "+", "*", &id).unwrap(), a);
}

#[test]
fn e2e_sum_of_iota() {
    let s = session();
    let v = unary(&s, "iota", Value::Int(100));
    assert_eq!(reduce(&s, "+", &v).unwrap(), Value::Int(5050));
}

#[test]
fn e2e_text_of_value() {
    let s = session();
    let t = unary(&s, "text", rat(-3, 4));
    assert_eq!(t.to_string(), "-3/4");
    let big = Value::BigInt(BigInt::from(10).pow(40));
    let limited = Session::new(Config::default().with_max_digits(20));
    let err = eval_unary(&limited, "text", &big).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limit);
    assert!(matches!(err, EvalError::Limit { limit: Limit::Digits, .. }));
}

#[test]
fn e2e_dyadic_text_sets_precision() {
    let s = session();
    assert_eq!(binary(&s, Value::Int(2), "text", Value::Int(3)).to_string(), "3.00");
    let third = binary(&s, Value::Int(1), "/", Value::Int(3));
    assert_eq!(binary(&s, Value::Int(3), "text", third.clone()).to_string(), "0.333");
    assert_eq!(binary(&s, Value::int_vector(&[7, 2]), "text", third).to_string(), "   0.33");
    let hex = Value::vector("%x".chars().map(Value::Char).collect());
    assert_eq!(binary(&s, hex, "text", Value::Int(255)).to_string(), "ff");
}

#[test]
fn e2e_select_with_negative_counts() {
    let s = session();
    let v = binary(&s, Value::int_vector(&[1, -2, 1]), "sel", Value::int_vector(&[7, 8, 9]));
    assert_eq!(v, Value::int_vector(&[7, 0, 0, 9]));
}

#[test]
fn e2e_select_and_fill_refuse_huge_results() {
    let s = session();
    let err = eval_binary(&s, &Value::Int(1_000_000_000_000), "sel", &Value::Int(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    let err = eval_binary(&s, &Value::int_vector(&[-1_000_000_000_000, 1]), "fill", &Value::Int(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
}

#[test]
fn e2e_roll_is_seeded() {
    let a = Session::new(Config::default().with_seed(7));
    let b = Session::new(Config::default().with_seed(7));
    let n = Value::int_vector(&[6, 6, 6, 6, 6]);
    let xa = unary(&a, "?", n.clone());
    assert_eq!(xa, unary(&b, "?", n));
    for x in xa.elements() {
        let i = x.as_int().unwrap();
        assert!((1..=6).contains(&i));
    }
}
