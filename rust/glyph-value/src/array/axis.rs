//! Operators that apply a binary operator along an axis: reduction, scan,
//! inner and outer products, and indexing.

use tracing::trace;

use glyph_core::{EvalError, Result};

use crate::context::Context;
use crate::eval;
use crate::value::Value;

use super::structural::{alloc, build, int_list};
use super::Shape;

/// Operators whose left fold equals their right fold.
const ASSOCIATIVE: [&str; 9] = ["+", "*", "min", "max", "and", "or", "&", "|", "xor"];

fn identity(op: &str) -> Option<Value> {
    match op {
        "+" | "-" | "or" | "xor" | "|" => Some(Value::Int(0)),
        "*" | "/" | "and" => Some(Value::Int(1)),
        _ => None,
    }
}

fn known(op: &str) -> Result<()> {
    match eval::binary_op(op) {
        Some(_) => Ok(()),
        None => Err(EvalError::type_error(op, "", "no such binary operator")),
    }
}

/// Right-to-left fold: `a op (b op (c op d))`.
fn fold(ctx: &dyn Context, op: &str, items: &[Value]) -> Result<Value> {
    let Some((last, rest)) = items.split_last() else {
        return identity(op)
            .ok_or_else(|| EvalError::domain(op, "empty vector", "reduction has no identity"));
    };
    let mut acc = last.clone();
    for x in rest.iter().rev() {
        acc = ctx.eval_binary(x, op, &acc)?;
    }
    Ok(acc)
}

/// `op/v`: reduce along the last axis.
pub fn reduce(ctx: &dyn Context, op: &str, v: &Value) -> Result<Value> {
    known(op)?;
    trace!(op, "reduce");
    match v {
        Value::Vector(vec) => fold(ctx, op, vec.elems()),
        Value::Matrix(m) => {
            let n = m.shape().last();
            let prefix = m.dims()[..m.rank() - 1].to_vec();
            let rows: usize = prefix.iter().product();
            let data = (0..rows)
                .map(|r| fold(ctx, op, &m.data()[r * n..(r + 1) * n]))
                .collect::<Result<Vec<_>>>()?;
            build(prefix, data)
        }
        scalar => Ok(scalar.clone()),
    }
}

/// `op/%v`: reduce along the first axis.
pub fn reduce_first(ctx: &dyn Context, op: &str, v: &Value) -> Result<Value> {
    known(op)?;
    trace!(op, "reduce first");
    match v {
        Value::Matrix(m) => {
            let n = m.dims()[0];
            let size = m.item_size();
            let data = (0..size)
                .map(|j| {
                    let column: Vec<Value> = (0..n).map(|i| m.data()[i * size + j].clone()).collect();
                    fold(ctx, op, &column)
                })
                .collect::<Result<Vec<_>>>()?;
            build(m.dims()[1..].to_vec(), data)
        }
        other => reduce(ctx, op, other),
    }
}

fn scan_row(ctx: &dyn Context, op: &str, row: &[Value]) -> Result<Vec<Value>> {
    if ASSOCIATIVE.contains(&op) {
        let mut out: Vec<Value> = Vec::with_capacity(row.len());
        for x in row {
            let next = match out.last() {
                Some(acc) => ctx.eval_binary(acc, op, x)?,
                None => x.clone(),
            };
            out.push(next);
        }
        return Ok(out);
    }
    (1..=row.len()).map(|k| fold(ctx, op, &row[..k])).collect()
}

/// `op\v`: running reductions along the last axis. Element `k` is the
/// reduction of the first `k + 1` elements.
pub fn scan(ctx: &dyn Context, op: &str, v: &Value) -> Result<Value> {
    known(op)?;
    trace!(op, "scan");
    match v {
        Value::Vector(vec) => Ok(Value::vector(scan_row(ctx, op, vec.elems())?)),
        Value::Matrix(m) => {
            let n = m.shape().last();
            let mut data = Vec::with_capacity(m.len());
            if n > 0 {
                for row in m.data().chunks(n) {
                    data.extend(scan_row(ctx, op, row)?);
                }
            }
            Ok(Value::Matrix(m.with_data(data)?))
        }
        scalar => Ok(scalar.clone()),
    }
}

/// `l lop.rop r`: for each row of `l` and column of `r`, reduce with `lop`
/// the pairwise `rop` of their elements. A scalar side is extended to fit.
pub fn inner_product(ctx: &dyn Context, l: &Value, lop: &str, rop: &str, r: &Value) -> Result<Value> {
    known(lop)?;
    known(rop)?;
    trace!(lop, rop, "inner product");
    let (mut ld, mut ldata) = (l.dims(), l.elements());
    let (mut rd, mut rdata) = (r.dims(), r.elements());
    match (ld.is_empty(), rd.is_empty()) {
        (true, true) => {
            ld = vec![1];
            rd = vec![1];
        }
        (true, false) => {
            ld = vec![rd[0]];
            ldata = vec![l.clone(); rd[0]];
        }
        (false, true) => {
            let n = ld[ld.len() - 1];
            rd = vec![n];
            rdata = vec![r.clone(); n];
        }
        (false, false) => {}
    }
    let n = ld[ld.len() - 1];
    if n != rd[0] {
        return Err(EvalError::type_error(
            &format!("{}.{}", lop, rop),
            format!("{} and {}", l.describe(), r.describe()),
            "shapes do not conform",
        ));
    }
    let rows: usize = ld[..ld.len() - 1].iter().product();
    let cols: usize = rd[1..].iter().product();
    let mut data = alloc(lop, l, rows.saturating_mul(cols))?;
    for i in 0..rows {
        for j in 0..cols {
            let terms = (0..n)
                .map(|k| ctx.eval_binary(&ldata[i * n + k], rop, &rdata[k * cols + j]))
                .collect::<Result<Vec<_>>>()?;
            data.push(fold(ctx, lop, &terms)?);
        }
    }
    let mut dims = ld[..ld.len() - 1].to_vec();
    dims.extend_from_slice(&rd[1..]);
    build(dims, data)
}

/// `l o.op r`: `op` applied to every pair of elements. The result shape
/// is the shape of `l` followed by the shape of `r`.
pub fn outer_product(ctx: &dyn Context, l: &Value, op: &str, r: &Value) -> Result<Value> {
    known(op)?;
    trace!(op, "outer product");
    let (xs, ys) = (l.elements(), r.elements());
    let mut data = alloc(op, l, xs.len().saturating_mul(ys.len()))?;
    for x in &xs {
        for y in &ys {
            data.push(ctx.eval_binary(x, op, y)?);
        }
    }
    let mut dims = l.dims();
    dims.extend(r.dims());
    build(dims, data)
}

/// `v[i; j; ...]`: one origin-based index per axis. A scalar index drops
/// its axis from the result; a vector index keeps it.
pub fn index(ctx: &dyn Context, v: &Value, indices: &[Value]) -> Result<Value> {
    let dims = v.dims();
    if dims.is_empty() {
        return Err(EvalError::type_error("[]", v.describe(), "cannot index a scalar"));
    }
    if indices.len() != dims.len() {
        return Err(EvalError::domain(
            "[]",
            v.describe(),
            format!("needs {} indices but got {}", dims.len(), indices.len()),
        ));
    }
    let base = ctx.config().origin;
    let mut positions = Vec::with_capacity(dims.len());
    let mut out_dims = Vec::new();
    for (idx, &len) in indices.iter().zip(&dims) {
        let axis = int_list("[]", idx)?
            .into_iter()
            .map(|i| {
                i.checked_sub(base)
                    .and_then(|p| usize::try_from(p).ok())
                    .filter(|&p| p < len)
                    .ok_or_else(|| EvalError::domain("[]", idx.describe(), format!("index {} out of range", i)))
            })
            .collect::<Result<Vec<_>>>()?;
        if !idx.is_scalar() {
            out_dims.push(axis.len());
        }
        positions.push(axis);
    }
    let src = Shape::new(dims);
    let walk = Shape::new(positions.iter().map(Vec::len).collect());
    let total = walk.numel();
    let data = v.elements();
    let mut out = alloc("[]", v, total)?;
    for flat in 0..total {
        let at: Vec<usize> = walk
            .unravel(flat)
            .iter()
            .enumerate()
            .map(|(axis, &k)| positions[axis][k])
            .collect();
        out.push(data[src.ravel(&at)].clone());
    }
    build(out_dims, out)
}
