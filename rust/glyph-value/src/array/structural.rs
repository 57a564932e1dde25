//! Structural operators: the ones that rearrange, resize or search arrays
//! rather than act on elements one at a time.

use std::collections::HashMap;

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use glyph_core::{EvalError, Result};

use crate::context::Context;
use crate::order::{total_cmp, values_equal};
use crate::value::{Matrix, Value, Vector};

use super::Shape;

/// Dimensions and ravel-order data. A scalar has no dimensions.
pub(crate) fn parts(v: &Value) -> (Vec<usize>, Vec<Value>) {
    (v.dims(), v.elements())
}

/// The least value holding `data` in shape `dims`: a scalar for the empty
/// shape, a Vector for rank one, a Matrix otherwise.
pub(crate) fn build(dims: Vec<usize>, data: Vec<Value>) -> Result<Value> {
    match dims.len() {
        0 => data
            .into_iter()
            .next()
            .ok_or_else(|| EvalError::internal("scalar result without an element")),
        1 => Ok(Value::Vector(Vector::new(data))),
        _ => Ok(Value::Matrix(Matrix::new(dims, data)?)),
    }
}

/// Integer operand as a list: a scalar is a list of one.
pub(crate) fn int_list(op: &str, v: &Value) -> Result<Vec<i64>> {
    v.elements().iter().map(|e| e.expect_int(op)).collect()
}

/// Most elements a single array result may hold.
pub(crate) const MAX_ELEMENTS: usize = 1 << 31;

/// Room for `n` values, or a domain error when that cannot be allocated.
pub(crate) fn alloc(op: &str, v: &Value, n: usize) -> Result<Vec<Value>> {
    let too_large = || EvalError::domain(op, v.describe(), "result is too large");
    if n > MAX_ELEMENTS {
        return Err(too_large());
    }
    let mut data = Vec::new();
    data.try_reserve(n).map_err(|_| too_large())?;
    Ok(data)
}

fn conform(op: &str, a: &Value, b: &Value) -> EvalError {
    EvalError::type_error(
        op,
        format!("{} and {}", a.describe(), b.describe()),
        "shapes do not conform",
    )
}

fn origin(ctx: &dyn Context) -> i64 {
    ctx.config().origin
}

/// Unary `rho`: 0 for a scalar, the length of a vector, the shape of a matrix.
pub(crate) fn shape_of(_ctx: &dyn Context, v: &Value) -> Result<Value> {
    Ok(match v {
        Value::Vector(vec) => Value::Int(vec.len() as i64),
        Value::Matrix(m) => Value::vector(m.dims().iter().map(|&d| Value::Int(d as i64)).collect()),
        _ => Value::Int(0),
    })
}

/// Unary `,`: the elements as a vector.
pub(crate) fn ravel(_ctx: &dyn Context, v: &Value) -> Result<Value> {
    Ok(Value::Vector(Vector::new(v.elements())))
}

/// Items along the first axis.
fn items(v: &Value) -> Result<Vec<Value>> {
    match v {
        Value::Vector(vec) => Ok(vec.elems().to_vec()),
        Value::Matrix(m) => {
            let size = m.item_size();
            let inner = m.dims()[1..].to_vec();
            if size == 0 {
                return (0..m.dims()[0])
                    .map(|_| build(inner.clone(), vec![]))
                    .collect();
            }
            m.data()
                .chunks(size)
                .map(|chunk| build(inner.clone(), chunk.to_vec()))
                .collect()
        }
        other => Ok(vec![other.clone()]),
    }
}

/// Stable ascending sort permutation of the items, origin based.
fn grade(ctx: &dyn Context, v: &Value) -> Result<Vec<Value>> {
    let items = items(v)?;
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&i, &j| total_cmp(&items[i], &items[j]));
    let base = origin(ctx);
    Ok(order.into_iter().map(|i| Value::Int(i as i64 + base)).collect())
}

pub(crate) fn grade_up(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if v.is_scalar() {
        return Ok(v.clone());
    }
    Ok(Value::Vector(Vector::new(grade(ctx, v)?)))
}

/// The reverse of `up`, so equal items come out in reverse order too.
pub(crate) fn grade_down(ctx: &dyn Context, v: &Value) -> Result<Value> {
    if v.is_scalar() {
        return Ok(v.clone());
    }
    let mut g = grade(ctx, v)?;
    g.reverse();
    Ok(Value::Vector(Vector::new(g)))
}

/// Unary `rot`: reverse along the last axis.
pub(crate) fn reverse_last(_ctx: &dyn Context, v: &Value) -> Result<Value> {
    match v {
        Value::Vector(vec) => Ok(Value::Vector(vec.reversed())),
        Value::Matrix(m) => {
            let n = m.shape().last();
            let mut data = m.data().to_vec();
            if n > 0 {
                data.chunks_mut(n).for_each(|row| row.reverse());
            }
            Ok(Value::Matrix(m.with_data(data)?))
        }
        other => Ok(other.clone()),
    }
}

/// Unary `flip`: reverse along the first axis.
pub(crate) fn reverse_first(_ctx: &dyn Context, v: &Value) -> Result<Value> {
    match v {
        Value::Vector(vec) => Ok(Value::Vector(vec.reversed())),
        Value::Matrix(m) => {
            let size = m.item_size();
            let data = if size == 0 {
                vec![]
            } else {
                m.data().chunks(size).rev().flatten().cloned().collect()
            };
            Ok(Value::Matrix(m.with_data(data)?))
        }
        other => Ok(other.clone()),
    }
}

/// Result axis `i` is source axis `perm[i]`.
fn permute(m: &Matrix, perm: &[usize]) -> Result<Value> {
    let shape = m.shape().permuted(perm)?;
    let strides = m.shape().strides();
    let data = (0..shape.numel())
        .map(|flat| {
            let at: usize = shape
                .unravel(flat)
                .iter()
                .enumerate()
                .map(|(i, &k)| k * strides[perm[i]])
                .sum();
            m.data()[at].clone()
        })
        .collect();
    build(shape.into_dims(), data)
}

/// Unary `transp`: reverse the order of the axes.
pub(crate) fn transpose_reversed(_ctx: &dyn Context, v: &Value) -> Result<Value> {
    match v {
        Value::Matrix(m) => {
            let perm: Vec<usize> = (0..m.rank()).rev().collect();
            permute(m, &perm)
        }
        other => Ok(other.clone()),
    }
}

/// Binary `transp`: permute the axes of `b` by the origin-based list `a`.
pub(crate) fn transpose(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let base = origin(ctx);
    let perm = int_list("transp", a)?
        .into_iter()
        .map(|p| usize::try_from(p - base))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| EvalError::domain("transp", a.describe(), "axis out of range"))?;
    match b {
        Value::Matrix(m) => permute(m, &perm),
        other => {
            // Scalars and vectors only admit the identity permutation.
            Shape::new(other.dims()).permuted(&perm)?;
            Ok(other.clone())
        }
    }
}

/// Binary `rho`: reshape `b` to the shape `a`, cycling through its
/// elements. Empty data fills with zeros.
pub(crate) fn reshape(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let dims = int_list("rho", a)?
        .into_iter()
        .map(usize::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| EvalError::domain("rho", a.describe(), "negative dimension"))?;
    let total = Shape::new(dims.clone())
        .checked_numel()
        .ok_or_else(|| EvalError::domain("rho", a.describe(), "shape is too large"))?;
    let mut source = b.elements();
    if source.is_empty() {
        source.push(Value::Int(0));
    }
    let mut data = alloc("rho", a, total)?;
    data.extend(source.iter().cycle().take(total).cloned());
    build(dims, data)
}

/// Split an operand for catenation against `rows` rows: the length of
/// its last axis and its data. Scalars and vectors become columns.
fn as_columns(v: &Value, prefix: &[usize], rows: usize) -> Option<(usize, Vec<Value>)> {
    match v {
        Value::Matrix(m) => {
            let (head, last) = m.dims().split_at(m.rank() - 1);
            (head == prefix).then(|| (last[0], m.data().to_vec()))
        }
        Value::Vector(vec) => (vec.len() == rows).then(|| (1, vec.elems().to_vec())),
        other => Some((1, vec![other.clone(); rows])),
    }
}

/// Binary `,`: join along the last axis.
pub(crate) fn catenate(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let outer = match (a, b) {
        (Value::Matrix(m), _) | (_, Value::Matrix(m)) => m,
        _ => {
            let mut data = a.elements();
            data.extend(b.elements());
            return Ok(Value::Vector(Vector::new(data)));
        }
    };
    let prefix = outer.dims()[..outer.rank() - 1].to_vec();
    let rows: usize = prefix.iter().product();
    let (la, da) = as_columns(a, &prefix, rows).ok_or_else(|| conform(",", a, b))?;
    let (lb, db) = as_columns(b, &prefix, rows).ok_or_else(|| conform(",", a, b))?;
    let mut data = Vec::with_capacity(da.len() + db.len());
    for r in 0..rows {
        data.extend_from_slice(&da[r * la..(r + 1) * la]);
        data.extend_from_slice(&db[r * lb..(r + 1) * lb]);
    }
    let mut dims = prefix;
    dims.push(la + lb);
    build(dims, data)
}

/// Copy the window of `b` starting at `offsets` with extent `out_dims`;
/// positions outside `b` are zero.
fn window(op: &str, a: &Value, b: &Value, out_dims: Vec<usize>, offsets: &[i64]) -> Result<Value> {
    let (dims, data) = parts(b);
    let (dims, data) = if dims.is_empty() { (vec![1], data) } else { (dims, data) };
    let src = Shape::new(dims);
    let out = Shape::new(out_dims);
    let total = out
        .checked_numel()
        .ok_or_else(|| EvalError::domain(op, a.describe(), "result is too large"))?;
    let mut result = alloc(op, a, total)?;
    for flat in 0..total {
        let idx = out.unravel(flat);
        let mut at = Vec::with_capacity(idx.len());
        for (axis, &k) in idx.iter().enumerate() {
            let s = k as i64 + offsets[axis];
            if s < 0 || s >= src.dims()[axis] as i64 {
                break;
            }
            at.push(s as usize);
        }
        result.push(if at.len() == idx.len() {
            data[src.ravel(&at)].clone()
        } else {
            Value::Int(0)
        });
    }
    build(out.into_dims(), result)
}

fn counts_for(op: &str, a: &Value, b: &Value) -> Result<(Vec<i64>, Vec<usize>)> {
    let counts = int_list(op, a)?;
    let dims = if b.is_scalar() { vec![1] } else { b.dims() };
    if counts.len() != dims.len() {
        return Err(EvalError::domain(
            op,
            a.describe(),
            format!("needs {} counts, one per axis", dims.len()),
        ));
    }
    Ok((counts, dims))
}

/// Binary `take`: the first `n` (or last `−n`) items along each axis,
/// padding with zeros past the end.
pub(crate) fn take(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let (counts, dims) = counts_for("take", a, b)?;
    let out: Vec<usize> = counts.iter().map(|n| n.unsigned_abs() as usize).collect();
    let offsets: Vec<i64> = counts
        .iter()
        .zip(&dims)
        .map(|(&n, &len)| if n >= 0 { 0 } else { len as i64 + n })
        .collect();
    window("take", a, b, out, &offsets)
}

/// Binary `drop`: remove the first `n` (or last `−n`) items along each axis.
pub(crate) fn drop(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let (counts, dims) = counts_for("drop", a, b)?;
    let mut out = Vec::with_capacity(dims.len());
    let mut offsets = Vec::with_capacity(dims.len());
    for (&n, &len) in counts.iter().zip(&dims) {
        let k = (n.unsigned_abs() as usize).min(len);
        out.push(len - k);
        offsets.push(if n >= 0 { k as i64 } else { 0 });
    }
    window("drop", a, b, out, &offsets)
}

fn rotation(op: &str, a: &Value, len: usize) -> Result<usize> {
    let n = a.expect_int(op)?;
    Ok(if len == 0 { 0 } else { n.rem_euclid(len as i64) as usize })
}

/// Binary `rot`: rotate left by `a` along the last axis.
pub(crate) fn rotate_last(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    match b {
        Value::Vector(vec) => {
            let k = rotation("rot", a, vec.len())?;
            let mut data = vec.elems().to_vec();
            data.rotate_left(k);
            Ok(Value::Vector(Vector::new(data)))
        }
        Value::Matrix(m) => {
            let n = m.shape().last();
            let k = rotation("rot", a, n)?;
            let mut data = m.data().to_vec();
            if n > 0 {
                data.chunks_mut(n).for_each(|row| row.rotate_left(k));
            }
            Ok(Value::Matrix(m.with_data(data)?))
        }
        other => {
            a.expect_int("rot")?;
            Ok(other.clone())
        }
    }
}

/// Binary `flip`: rotate by `a` along the first axis.
pub(crate) fn rotate_first(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    match b {
        Value::Matrix(m) => {
            let k = rotation("flip", a, m.dims()[0])?;
            let mut data = m.data().to_vec();
            data.rotate_left(k * m.item_size());
            Ok(Value::Matrix(m.with_data(data)?))
        }
        other => rotate_last(ctx, a, other),
    }
}

/// Apply `f` to every element of `v`, keeping its shape.
fn map_elements(v: &Value, f: impl FnMut(&Value) -> Value) -> Result<Value> {
    let (dims, data) = parts(v);
    build(dims, data.iter().map(f).collect())
}

/// Binary `iota`: the origin-based position of each element of `b` in `a`,
/// or `origin − 1` when it is absent.
pub(crate) fn index_of(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    if let Value::Matrix(_) = a {
        return Err(EvalError::type_error("iota", a.describe(), "left operand must be a vector"));
    }
    let base = origin(ctx);
    let hay = a.elements();
    map_elements(b, |e| {
        let pos = hay.iter().position(|x| values_equal(x, e));
        Value::Int(pos.map_or(base - 1, |p| p as i64 + base))
    })
}

/// Binary `in`: 1 for each element of `a` that occurs in `b`.
pub(crate) fn member_of(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let hay = b.elements();
    map_elements(a, |e| Value::from_bool(hay.iter().any(|x| values_equal(x, e))))
}

/// Binary `?`: `a` distinct values drawn from `[origin, origin + b)`.
pub(crate) fn deal(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let count = a.expect_int("?")?;
    let n = b.expect_int("?")?;
    if count < 0 || n < 0 || count > n {
        return Err(EvalError::domain(
            "?",
            format!("{} and {}", a.describe(), b.describe()),
            "deal needs 0 ≤ count ≤ bound",
        ));
    }
    // Partial Fisher-Yates over a sparse permutation of 0..n.
    let mut swapped: HashMap<i64, i64> = HashMap::new();
    let mut out = alloc("?", a, count as usize)?;
    let base = origin(ctx);
    for i in 0..count {
        let r = ctx
            .random_below(&BigInt::from(n - i))
            .to_i64()
            .ok_or_else(|| EvalError::internal("deal: random draw out of range"))?;
        let j = i + r;
        let vi = *swapped.get(&i).unwrap_or(&i);
        let vj = *swapped.get(&j).unwrap_or(&j);
        swapped.insert(j, vi);
        out.push(Value::Int(vj + base));
    }
    Ok(Value::Vector(Vector::new(out)))
}

/// Run `f` over each row (last axis) of `b`, where every row expands to
/// exactly `width` values.
fn along_last(
    op: &str,
    a: &Value,
    b: &Value,
    width: usize,
    mut f: impl FnMut(&[Value], &mut Vec<Value>) -> Result<()>,
) -> Result<Value> {
    let (dims, data) = parts(b);
    let dims = if dims.is_empty() { vec![1] } else { dims };
    let n = dims[dims.len() - 1];
    let rows: usize = dims[..dims.len() - 1].iter().product();
    let total = rows
        .checked_mul(width)
        .ok_or_else(|| EvalError::domain(op, a.describe(), "result is too large"))?;
    let mut out = alloc(op, a, total)?;
    for r in 0..rows {
        let before = out.len();
        f(&data[r * n..(r + 1) * n], &mut out)?;
        if out.len() - before != width {
            return Err(EvalError::internal(format!("{}: ragged rows", op)));
        }
    }
    let mut out_dims = dims[..dims.len() - 1].to_vec();
    out_dims.push(width);
    build(out_dims, out)
}

fn row_counts(op: &str, a: &Value, b: &Value) -> Result<Vec<i64>> {
    let mut counts = int_list(op, a)?;
    let n = if b.is_scalar() { 1 } else { b.dims().last().copied().unwrap_or(0) };
    if counts.len() == 1 && n != 1 {
        counts = vec![counts[0]; n];
    }
    Ok(counts)
}

/// Length of one expanded row: the sum of `len(c)` over the counts.
fn expanded_width(op: &str, a: &Value, counts: &[i64], len: impl Fn(i64) -> u64) -> Result<usize> {
    counts
        .iter()
        .try_fold(0u64, |acc, &c| acc.checked_add(len(c)))
        .and_then(|w| usize::try_from(w).ok())
        .ok_or_else(|| EvalError::domain(op, a.describe(), "result is too large"))
}

/// Blank for a row of characters, zero otherwise.
fn fill_element(row: &[Value]) -> Value {
    if !row.is_empty() && row.iter().all(|v| matches!(v, Value::Char(_))) {
        Value::Char(' ')
    } else {
        Value::Int(0)
    }
}

/// Binary `sel`: along the last axis, repeat element `i` `a[i]` times when
/// the count is positive, or replace it with `|a[i]|` fill elements when
/// it is negative.
pub(crate) fn select(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let counts = row_counts("sel", a, b)?;
    let width = expanded_width("sel", a, &counts, i64::unsigned_abs)?;
    along_last("sel", a, b, width, |row, out| {
        if row.len() != counts.len() {
            return Err(conform("sel", a, b));
        }
        let blank = fill_element(row);
        for (v, &c) in row.iter().zip(&counts) {
            let v = if c < 0 { &blank } else { v };
            out.extend(std::iter::repeat(v).take(c.unsigned_abs() as usize).cloned());
        }
        Ok(())
    })
}

/// Binary `fill`: expand along the last axis. A positive count repeats
/// the next element; zero inserts one fill element and `−k` inserts `k`.
pub(crate) fn fill(_ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let counts = int_list("fill", a)?;
    let width = expanded_width("fill", a, &counts, |c| c.unsigned_abs().max(1))?;
    along_last("fill", a, b, width, |row, out| {
        let used = counts.iter().filter(|&&c| c > 0).count();
        if used != row.len() {
            return Err(conform("fill", a, b));
        }
        let blank = fill_element(row);
        let mut next = row.iter();
        for &c in &counts {
            let v = if c > 0 {
                next.next().ok_or_else(|| conform("fill", a, b))?
            } else {
                &blank
            };
            out.extend(std::iter::repeat(v).take(c.unsigned_abs().max(1) as usize).cloned());
        }
        Ok(())
    })
}

/// Pair up radices and values, extending a scalar on either side.
fn radix_pairs(op: &str, a: &Value, b: &Value) -> Result<(Vec<Value>, Vec<Value>)> {
    let (mut radices, mut digits) = (a.elements(), b.elements());
    if a.is_scalar() && digits.len() != 1 {
        radices = vec![a.clone(); digits.len()];
    }
    if b.is_scalar() && radices.len() != 1 {
        digits = vec![b.clone(); radices.len()];
    }
    if radices.len() != digits.len() {
        return Err(conform(op, a, b));
    }
    Ok((radices, digits))
}

/// Binary `decode`: the value of the digits `b` in the mixed radix `a`.
pub(crate) fn decode(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let (radices, digits) = radix_pairs("decode", a, b)?;
    let mut acc = Value::Int(0);
    for (r, d) in radices.iter().zip(&digits) {
        let scaled = ctx.eval_binary(&acc, "*", r)?;
        acc = ctx.eval_binary(&scaled, "+", d)?;
    }
    Ok(acc)
}

/// Binary `encode`: the digits of each element of `b` in the mixed radix
/// `a`. A zero radix takes whatever remains.
pub(crate) fn encode(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let radices = a.elements();
    let values = b.elements();
    let cols = values.len();
    let mut data = vec![Value::Int(0); radices.len() * cols];
    for (j, v) in values.iter().enumerate() {
        let mut rest = v.clone();
        for (i, r) in radices.iter().enumerate().rev() {
            let digit = if r.is_zero() {
                std::mem::replace(&mut rest, Value::Int(0))
            } else {
                let d = ctx.eval_binary(&rest, "mod", r)?;
                rest = ctx.eval_binary(&rest, "div", r)?;
                d
            };
            data[i * cols + j] = digit;
        }
    }
    let mut dims = a.dims();
    dims.extend(b.dims());
    build(dims, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Session;
    use glyph_core::{Config, ErrorKind};

    fn ints(xs: &[i64]) -> Value {
        Value::int_vector(xs)
    }

    fn matrix(dims: &[usize], xs: &[i64]) -> Value {
        Value::Matrix(Matrix::new(dims.to_vec(), xs.iter().map(|&x| Value::Int(x)).collect()).unwrap())
    }

    #[test]
    fn test_reshape_cycles() {
        let s = Session::default();
        let m = reshape(&s, &ints(&[2, 3]), &ints(&[1, 2])).unwrap();
        assert_eq!(m, matrix(&[2, 3], &[1, 2, 1, 2, 1, 2]));
        let z = reshape(&s, &Value::Int(3), &Value::vector(vec![])).unwrap();
        assert_eq!(z, ints(&[0, 0, 0]));
        assert!(reshape(&s, &Value::Int(-1), &Value::Int(1)).is_err());
    }

    #[test]
    fn test_shape_of() {
        let s = Session::default();
        assert_eq!(shape_of(&s, &Value::Int(5)).unwrap(), Value::Int(0));
        assert_eq!(shape_of(&s, &ints(&[1, 2, 3])).unwrap(), Value::Int(3));
        assert_eq!(shape_of(&s, &matrix(&[2, 3], &[0; 6])).unwrap(), ints(&[2, 3]));
    }

    #[test]
    fn test_rot_and_flip_matrix() {
        let s = Session::default();
        let m = matrix(&[2, 3], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(reverse_last(&s, &m).unwrap(), matrix(&[2, 3], &[3, 2, 1, 6, 5, 4]));
        assert_eq!(reverse_first(&s, &m).unwrap(), matrix(&[2, 3], &[4, 5, 6, 1, 2, 3]));
    }

    #[test]
    fn test_transpose() {
        let s = Session::default();
        let m = matrix(&[2, 3], &[1, 2, 3, 4, 5, 6]);
        let t = transpose_reversed(&s, &m).unwrap();
        assert_eq!(t, matrix(&[3, 2], &[1, 4, 2, 5, 3, 6]));
        assert_eq!(transpose(&s, &ints(&[1, 2]), &m).unwrap(), m);
        assert_eq!(transpose(&s, &ints(&[2, 1]), &m).unwrap(), t);
        assert!(transpose(&s, &ints(&[1, 1]), &m).is_err());
    }

    #[test]
    fn test_grade_is_stable() {
        let s = Session::default();
        let v = ints(&[3, 1, 2, 1]);
        assert_eq!(grade_up(&s, &v).unwrap(), ints(&[2, 4, 3, 1]));
        assert_eq!(grade_down(&s, &v).unwrap(), ints(&[1, 3, 4, 2]));
        let rows = matrix(&[3, 2], &[2, 1, 1, 9, 1, 2]);
        assert_eq!(grade_up(&s, &rows).unwrap(), ints(&[3, 2, 1]));
    }

    #[test]
    fn test_catenate() {
        let s = Session::default();
        assert_eq!(catenate(&s, &ints(&[1, 2]), &Value::Int(3)).unwrap(), ints(&[1, 2, 3]));
        let m = matrix(&[2, 2], &[1, 2, 3, 4]);
        let c = catenate(&s, &m, &ints(&[8, 9])).unwrap();
        assert_eq!(c, matrix(&[2, 3], &[1, 2, 8, 3, 4, 9]));
        let c = catenate(&s, &Value::Int(0), &m).unwrap();
        assert_eq!(c, matrix(&[2, 3], &[0, 1, 2, 0, 3, 4]));
        let err = catenate(&s, &m, &ints(&[1, 2, 3])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_take_and_drop() {
        let s = Session::default();
        let v = ints(&[1, 2, 3, 4]);
        assert_eq!(take(&s, &Value::Int(2), &v).unwrap(), ints(&[1, 2]));
        assert_eq!(take(&s, &Value::Int(-2), &v).unwrap(), ints(&[3, 4]));
        assert_eq!(take(&s, &Value::Int(6), &v).unwrap(), ints(&[1, 2, 3, 4, 0, 0]));
        assert_eq!(take(&s, &Value::Int(-5), &v).unwrap(), ints(&[0, 1, 2, 3, 4]));
        assert_eq!(drop(&s, &Value::Int(1), &v).unwrap(), ints(&[2, 3, 4]));
        assert_eq!(drop(&s, &Value::Int(-3), &v).unwrap(), ints(&[1]));
        assert_eq!(drop(&s, &Value::Int(9), &v).unwrap(), ints(&[]));
        let m = matrix(&[2, 3], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(take(&s, &ints(&[1, -2]), &m).unwrap(), matrix(&[1, 2], &[2, 3]));
        assert_eq!(drop(&s, &ints(&[1, 1]), &m).unwrap(), matrix(&[1, 2], &[5, 6]));
        assert!(take(&s, &Value::Int(1), &m).is_err());
    }

    #[test]
    fn test_rotate() {
        let s = Session::default();
        assert_eq!(rotate_last(&s, &Value::Int(1), &ints(&[1, 2, 3])).unwrap(), ints(&[2, 3, 1]));
        assert_eq!(rotate_last(&s, &Value::Int(-1), &ints(&[1, 2, 3])).unwrap(), ints(&[3, 1, 2]));
        let m = matrix(&[2, 2], &[1, 2, 3, 4]);
        assert_eq!(rotate_first(&s, &Value::Int(1), &m).unwrap(), matrix(&[2, 2], &[3, 4, 1, 2]));
        assert_eq!(rotate_last(&s, &Value::Int(1), &m).unwrap(), matrix(&[2, 2], &[2, 1, 4, 3]));
    }

    #[test]
    fn test_index_of_and_member() {
        let s = Session::default();
        let hay = ints(&[5, 6, 7]);
        assert_eq!(index_of(&s, &hay, &ints(&[7, 9])).unwrap(), ints(&[3, 0]));
        assert_eq!(index_of(&s, &hay, &Value::Int(6)).unwrap(), Value::Int(2));
        let zero = Session::new(Config::default().with_origin(0));
        assert_eq!(index_of(&zero, &hay, &Value::Int(9)).unwrap(), Value::Int(-1));
        assert_eq!(member_of(&s, &ints(&[1, 6]), &hay).unwrap(), ints(&[0, 1]));
    }

    #[test]
    fn test_deal() {
        let s = Session::new(Config::default().with_seed(11));
        let v = deal(&s, &Value::Int(5), &Value::Int(5)).unwrap();
        let mut got: Vec<i64> = v.elements().iter().map(|e| e.as_int().unwrap()).collect();
        got.sort_unstable();
        assert_eq!(got, vec![1, 2, 3, 4, 5]);
        let v = deal(&s, &Value::Int(3), &Value::Int(1_000_000_000)).unwrap();
        let xs: Vec<i64> = v.elements().iter().map(|e| e.as_int().unwrap()).collect();
        assert!(xs[0] != xs[1] && xs[1] != xs[2] && xs[0] != xs[2]);
        assert!(deal(&s, &Value::Int(4), &Value::Int(3)).is_err());
    }

    #[test]
    fn test_select_and_fill() {
        let s = Session::default();
        let v = ints(&[1, 2, 3]);
        assert_eq!(select(&s, &ints(&[1, 0, 2]), &v).unwrap(), ints(&[1, 3, 3]));
        assert_eq!(select(&s, &Value::Int(2), &v).unwrap(), ints(&[1, 1, 2, 2, 3, 3]));
        assert_eq!(fill(&s, &ints(&[1, 0, 1, -2, 1]), &v).unwrap(), ints(&[1, 0, 2, 0, 0, 3]));
        assert!(fill(&s, &ints(&[1, 1]), &v).is_err());
    }

    #[test]
    fn test_select_negative_counts_insert_fill() {
        let s = Session::default();
        assert_eq!(select(&s, &ints(&[1, -2, 1]), &ints(&[7, 8, 9])).unwrap(), ints(&[7, 0, 0, 9]));
        let text = Value::vector("ab".chars().map(Value::Char).collect());
        let spaced = Value::vector("a  b".chars().map(Value::Char).collect());
        assert_eq!(select(&s, &ints(&[1, -2, 1]), &text).unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(select(&s, &ints(&[1, -2]), &text).unwrap(), Value::vector("a  ".chars().map(Value::Char).collect()));
        assert_eq!(fill(&s, &ints(&[1, -2, 1]), &text).unwrap(), spaced);
    }

    #[test]
    fn test_select_and_fill_reject_huge_results() {
        let s = Session::default();
        let v = ints(&[1, 2]);
        let huge = ints(&[1_000_000_000_000, 1_000_000_000_000]);
        assert_eq!(select(&s, &huge, &v).unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!(fill(&s, &ints(&[i64::MIN, i64::MIN, 1, 1]), &v).unwrap_err().kind(), ErrorKind::Domain);
        let m = matrix(&[2, 2], &[1, 2, 3, 4]);
        assert_eq!(select(&s, &Value::Int(i64::MAX), &m).unwrap_err().kind(), ErrorKind::Domain);
    }

    #[test]
    fn test_decode_and_encode() {
        let s = Session::default();
        assert_eq!(decode(&s, &ints(&[24, 60, 60]), &ints(&[1, 2, 3])).unwrap(), Value::Int(3723));
        assert_eq!(decode(&s, &Value::Int(2), &ints(&[1, 0, 1])).unwrap(), Value::Int(5));
        assert_eq!(encode(&s, &ints(&[24, 60, 60]), &Value::Int(3723)).unwrap(), ints(&[1, 2, 3]));
        assert_eq!(encode(&s, &ints(&[0, 10]), &Value::Int(123)).unwrap(), ints(&[12, 3]));
        let m = encode(&s, &ints(&[2, 2]), &ints(&[1, 2, 3])).unwrap();
        assert_eq!(m, matrix(&[2, 3], &[0, 1, 1, 1, 0, 1]));
    }
}
