//! Operator registries and the two evaluation entry points.
//!
//! Each operator is a descriptor holding one implementation slot per
//! representation. Dispatch handles broadcasting, promotion and the final
//! `shrink` once, so the per-kind functions only see scalars of the kind
//! they were registered for.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::trace;

use glyph_core::{EvalError, Result};

use crate::context::Context;
use crate::limits;
use crate::promote::{common_kind, shrink, to_kind};
use crate::value::{Kind, Matrix, Value, Vector, KIND_COUNT};
use crate::{binary, unary};

pub type UnaryFn = fn(&dyn Context, &Value) -> Result<Value>;
pub type BinaryFn = fn(&dyn Context, &Value, &Value) -> Result<Value>;

const REALS: [Kind; 4] = [Kind::Int, Kind::BigInt, Kind::BigRat, Kind::BigFloat];
const INTEGERS: [Kind; 2] = [Kind::Int, Kind::BigInt];

const ALL: [Kind; KIND_COUNT] = [
    Kind::Int,
    Kind::Char,
    Kind::BigInt,
    Kind::BigRat,
    Kind::BigFloat,
    Kind::Complex,
    Kind::Vector,
    Kind::Matrix,
];

pub struct UnaryOp {
    pub name: &'static str,
    /// Applied independently to each element of an array operand.
    pub elementwise: bool,
    /// Result is returned in the representation the function built,
    /// without `shrink`.
    pub keeps_kind: bool,
    fns: [Option<UnaryFn>; KIND_COUNT],
}

impl UnaryOp {
    pub(crate) fn new(name: &'static str, elementwise: bool) -> Self {
        UnaryOp {
            name,
            elementwise,
            keeps_kind: false,
            fns: [None; KIND_COUNT],
        }
    }

    pub(crate) fn keep_kind(mut self) -> Self {
        self.keeps_kind = true;
        self
    }

    pub(crate) fn with(mut self, kinds: &[Kind], f: UnaryFn) -> Self {
        for k in kinds {
            self.fns[k.index()] = Some(f);
        }
        self
    }

    pub(crate) fn integers(self, f: UnaryFn) -> Self {
        self.with(&INTEGERS, f)
    }

    pub(crate) fn reals(self, f: UnaryFn) -> Self {
        self.with(&REALS, f)
    }

    pub(crate) fn numbers(self, f: UnaryFn) -> Self {
        self.reals(f).with(&[Kind::Complex], f)
    }

    pub(crate) fn all(self, f: UnaryFn) -> Self {
        self.with(&ALL, f)
    }

    pub fn get(&self, kind: Kind) -> Option<UnaryFn> {
        self.fns[kind.index()]
    }
}

pub struct BinaryOp {
    pub name: &'static str,
    /// Pointwise over arrays, with scalar broadcasting.
    pub elementwise: bool,
    /// Bring scalar operands to their common kind before the call.
    /// Without it the slot is picked by the wider operand and both are
    /// passed through unchanged.
    pub promote: bool,
    fns: [Option<BinaryFn>; KIND_COUNT],
}

impl BinaryOp {
    pub(crate) fn pointwise(name: &'static str) -> Self {
        BinaryOp {
            name,
            elementwise: true,
            promote: true,
            fns: [None; KIND_COUNT],
        }
    }

    /// An operator with its own shape semantics, called once with the
    /// operands as given.
    pub(crate) fn structural(name: &'static str, f: BinaryFn) -> Self {
        BinaryOp {
            name,
            elementwise: false,
            promote: false,
            fns: [Some(f); KIND_COUNT],
        }
    }

    pub(crate) fn mixed(mut self) -> Self {
        self.promote = false;
        self
    }

    pub(crate) fn with(mut self, kinds: &[Kind], f: BinaryFn) -> Self {
        for k in kinds {
            self.fns[k.index()] = Some(f);
        }
        self
    }

    pub(crate) fn integers(self, f: BinaryFn) -> Self {
        self.with(&INTEGERS, f)
    }

    pub(crate) fn reals(self, f: BinaryFn) -> Self {
        self.with(&REALS, f)
    }

    pub(crate) fn numbers(self, f: BinaryFn) -> Self {
        self.reals(f).with(&[Kind::Complex], f)
    }

    pub fn get(&self, kind: Kind) -> Option<BinaryFn> {
        self.fns[kind.index()]
    }
}

static UNARY_OPS: Lazy<HashMap<&'static str, UnaryOp>> = Lazy::new(|| {
    unary::ops()
        .into_iter()
        .map(|op| (op.name, op))
        .collect()
});

static BINARY_OPS: Lazy<HashMap<&'static str, BinaryOp>> = Lazy::new(|| {
    binary::ops()
        .into_iter()
        .map(|op| (op.name, op))
        .collect()
});

pub fn unary_op(name: &str) -> Option<&'static UnaryOp> {
    UNARY_OPS.get(name)
}

pub fn binary_op(name: &str) -> Option<&'static BinaryOp> {
    BINARY_OPS.get(name)
}

/// Names of every registered unary operator.
pub fn unary_names() -> impl Iterator<Item = &'static str> {
    UNARY_OPS.keys().copied()
}

/// Names of every registered binary operator.
pub fn binary_names() -> impl Iterator<Item = &'static str> {
    BINARY_OPS.keys().copied()
}

fn finish(ctx: &dyn Context, op: &str, raw: Value) -> Result<Value> {
    let v = shrink(raw);
    limits::check_value(ctx, op, &v)?;
    Ok(v)
}

/// Apply the unary operator `op` to `v`.
pub fn eval_unary(ctx: &dyn Context, op: &str, v: &Value) -> Result<Value> {
    let desc = unary_op(op)
        .ok_or_else(|| EvalError::type_error(op, v.describe(), "unknown unary operator"))?;
    trace!(op, kind = %v.kind(), "unary");
    if desc.elementwise {
        match v {
            Value::Vector(vec) => {
                let elems = vec
                    .iter()
                    .map(|e| ctx.eval_unary(op, e))
                    .collect::<Result<Vec<_>>>()?;
                return Ok(Value::Vector(Vector::new(elems)));
            }
            Value::Matrix(m) => {
                return Ok(Value::Matrix(m.try_map(|e| ctx.eval_unary(op, e))?));
            }
            _ => {}
        }
    }
    let f = desc.get(v.kind()).ok_or_else(|| {
        EvalError::type_error(op, v.describe(), format!("not implemented for {}", v.kind()))
    })?;
    let raw = f(ctx, v)?;
    if desc.keeps_kind {
        limits::check_value(ctx, op, &raw)?;
        return Ok(raw);
    }
    finish(ctx, op, raw)
}

/// Apply the binary operator `op` to `left` and `right`.
pub fn eval_binary(ctx: &dyn Context, left: &Value, op: &str, right: &Value) -> Result<Value> {
    let desc = binary_op(op).ok_or_else(|| {
        EvalError::type_error(op, left.describe(), "unknown binary operator")
    })?;
    trace!(op, left = %left.kind(), right = %right.kind(), "binary");
    if desc.elementwise && (left.is_array() || right.is_array()) {
        return broadcast(ctx, op, left, right);
    }
    let (kind, l, r) = if desc.promote {
        let kind = common_kind(left.kind(), right.kind()).ok_or_else(|| mismatch(op, left, right))?;
        let conf = ctx.config();
        (kind, to_kind(op, conf, left, kind)?, to_kind(op, conf, right, kind)?)
    } else {
        // Both kinds must be accepted; the wider one picks the slot.
        let (lk, rk) = (left.kind(), right.kind());
        if desc.get(lk).is_none() || desc.get(rk).is_none() {
            return Err(mismatch(op, left, right));
        }
        let kind = if lk.index() >= rk.index() { lk } else { rk };
        (kind, left.clone(), right.clone())
    };
    let f = desc.get(kind).ok_or_else(|| {
        EvalError::type_error(
            op,
            format!("{} and {}", left.describe(), right.describe()),
            format!("not implemented for {}", kind),
        )
    })?;
    let raw = f(ctx, &l, &r)?;
    finish(ctx, op, raw)
}

fn mismatch(op: &str, left: &Value, right: &Value) -> EvalError {
    EvalError::type_error(
        op,
        format!("{} and {}", left.describe(), right.describe()),
        format!("cannot mix {} and {}", left.kind(), right.kind()),
    )
}

/// Pointwise application over arrays. A scalar pairs with every element;
/// two arrays must have the same shape.
fn broadcast(ctx: &dyn Context, op: &str, left: &Value, right: &Value) -> Result<Value> {
    let pair = |a: &Value, b: &Value| ctx.eval_binary(a, op, b);
    match (left, right) {
        (Value::Vector(a), b) if b.is_scalar() => {
            let elems = a.iter().map(|x| pair(x, b)).collect::<Result<Vec<_>>>()?;
            Ok(Value::Vector(Vector::new(elems)))
        }
        (a, Value::Vector(b)) if a.is_scalar() => {
            let elems = b.iter().map(|y| pair(a, y)).collect::<Result<Vec<_>>>()?;
            Ok(Value::Vector(Vector::new(elems)))
        }
        (Value::Matrix(a), b) if b.is_scalar() => Ok(Value::Matrix(a.try_map(|x| pair(x, b))?)),
        (a, Value::Matrix(b)) if a.is_scalar() => Ok(Value::Matrix(b.try_map(|y| pair(a, y))?)),
        _ => {
            if left.dims() != right.dims() {
                return Err(EvalError::type_error(
                    op,
                    format!("{} and {}", left.describe(), right.describe()),
                    "shapes do not conform",
                ));
            }
            let data = left
                .elements()
                .iter()
                .zip(right.elements().iter())
                .map(|(x, y)| pair(x, y))
                .collect::<Result<Vec<_>>>()?;
            match (left, right) {
                (Value::Vector(_), Value::Vector(_)) => Ok(Value::Vector(Vector::new(data))),
                _ => Ok(Value::Matrix(Matrix::new(left.dims(), data)?)),
            }
        }
    }
}
