//! π, ln 2 and e in fixed point, cached at the widest precision seen so far.

use std::cell::RefCell;
use std::thread::LocalKey;

use num_bigint::BigInt;
use num_traits::Zero;

use crate::bigfloat::BigFloat;
use crate::context::Context;
use crate::value::Value;

use super::fx_one;

type Cache = RefCell<Option<(u32, BigInt)>>;

thread_local! {
    static PI: Cache = const { RefCell::new(None) };
    static LN2: Cache = const { RefCell::new(None) };
    static E: Cache = const { RefCell::new(None) };
}

const GUARD: u32 = 16;

fn cached(cell: &'static LocalKey<Cache>, w: u32, compute: fn(u32) -> BigInt) -> BigInt {
    cell.with(|c| {
        let mut c = c.borrow_mut();
        if let Some((bits, v)) = c.as_ref() {
            if *bits >= w {
                return v >> (*bits - w);
            }
        }
        let v = compute(w);
        *c = Some((w, v.clone()));
        v
    })
}

/// `atan(1/n)` scaled by `2^w`.
fn atan_inv(n: u32, w: u32) -> BigInt {
    let n2 = BigInt::from(n) * n;
    let mut term = fx_one(w) / n;
    let mut sum = BigInt::zero();
    let mut k = 0u32;
    while !term.is_zero() {
        let t = &term / (2 * k + 1);
        if k % 2 == 0 {
            sum += t;
        } else {
            sum -= t;
        }
        term /= &n2;
        k += 1;
    }
    sum
}

/// `atanh(1/n)` scaled by `2^w`.
fn atanh_inv(n: u32, w: u32) -> BigInt {
    let n2 = BigInt::from(n) * n;
    let mut term = fx_one(w) / n;
    let mut sum = BigInt::zero();
    let mut k = 0u32;
    while !term.is_zero() {
        sum += &term / (2 * k + 1);
        term /= &n2;
        k += 1;
    }
    sum
}

fn compute_pi(w: u32) -> BigInt {
    let g = w + GUARD;
    // Machin: π = 16·atan(1/5) − 4·atan(1/239)
    (atan_inv(5, g) * 16u32 - atan_inv(239, g) * 4u32) >> GUARD
}

fn compute_ln2(w: u32) -> BigInt {
    let g = w + GUARD;
    (atanh_inv(3, g) * 2u32) >> GUARD
}

fn compute_e(w: u32) -> BigInt {
    let g = w + GUARD;
    let mut term = fx_one(g);
    let mut sum = BigInt::zero();
    let mut k = 1u32;
    while !term.is_zero() {
        sum += &term;
        term /= k;
        k += 1;
    }
    sum >> GUARD
}

pub(crate) fn pi_fixed(w: u32) -> BigInt {
    cached(&PI, w, compute_pi)
}

pub(crate) fn ln2_fixed(w: u32) -> BigInt {
    cached(&LN2, w, compute_ln2)
}

pub(crate) fn pi_float(prec: u32) -> BigFloat {
    let w = prec + GUARD;
    BigFloat::from_fixed(&pi_fixed(w), w, prec)
}

pub(crate) fn e_float(prec: u32) -> BigFloat {
    let w = prec + GUARD;
    BigFloat::from_fixed(&cached(&E, w, compute_e), w, prec)
}

/// π at the session precision.
pub fn pi(ctx: &dyn Context) -> Value {
    Value::BigFloat(pi_float(ctx.config().float_prec))
}

/// e at the session precision.
pub fn e(ctx: &dyn Context) -> Value {
    Value::BigFloat(e_float(ctx.config().float_prec))
}
