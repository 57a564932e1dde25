//! Printing values under a session configuration.

use std::iter::Peekable;
use std::str::Chars;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use glyph_core::{Config, EvalError, Limit, Result};

use crate::array::structural;
use crate::bigfloat::BigFloat;
use crate::context::Context;
use crate::limits;
use crate::value::{Matrix, Value, Vector};

fn int_text(i: &BigInt, conf: &Config) -> String {
    if conf.max_digits > 0 {
        let digits = (i.bits() as f64 * std::f64::consts::LOG10_2).ceil() as u64;
        if digits > conf.max_digits {
            return BigFloat::from_bigint(i, conf.float_prec).to_decimal_string(conf.float_digits);
        }
    }
    i.to_str_radix(conf.output_radix())
}

fn rat_text(r: &BigRational, conf: &Config) -> String {
    format!("{}/{}", int_text(r.numer(), conf), int_text(r.denom(), conf))
}

/// An element inside an array: nested arrays are parenthesized.
fn elem_text(v: &Value, conf: &Config) -> String {
    if v.is_array() {
        format!("({})", v.sprint(conf))
    } else {
        v.sprint(conf)
    }
}

fn matrix_text(m: &Matrix, conf: &Config) -> String {
    let (rows, cols) = match m.dims() {
        [.., r, c] => (*r, *c),
        _ => (1, m.len()),
    };
    let plane = rows * cols;
    if plane == 0 {
        return String::new();
    }
    let chars = m.data().iter().all(|v| matches!(v, Value::Char(_)));
    let cells: Vec<String> = m.data().iter().map(|v| elem_text(v, conf)).collect();
    let mut widths = vec![0usize; cols];
    for (i, cell) in cells.iter().enumerate() {
        let w = &mut widths[i % cols];
        *w = (*w).max(cell.chars().count());
    }
    let blocks: Vec<String> = cells
        .chunks(plane)
        .map(|block| {
            block
                .chunks(cols)
                .map(|row| {
                    if chars {
                        return row.concat();
                    }
                    row.iter()
                        .zip(&widths)
                        .map(|(cell, &w)| format!("{:>w$}", cell, w = w))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect();
    blocks.join("\n\n")
}

impl Value {
    /// Text form of the value under `conf`.
    ///
    /// Integers print in the output base, rationals as `n/d`, floats with
    /// `float_digits` significant digits and complex numbers as `rejim`.
    /// A vector of chars prints as a string; other vectors separate their
    /// elements with spaces. Matrices print one row per line with
    /// right-aligned columns.
    pub fn sprint(&self, conf: &Config) -> String {
        match self {
            Value::Int(i) if conf.output_radix() == 10 && conf.max_digits == 0 => i.to_string(),
            Value::Int(i) => int_text(&BigInt::from(*i), conf),
            Value::Char(c) => c.to_string(),
            Value::BigInt(i) => int_text(i, conf),
            Value::BigRat(r) => rat_text(r, conf),
            Value::BigFloat(f) => f.to_decimal_string(conf.float_digits),
            Value::Complex(z) => format!("{}j{}", z.re().sprint(conf), z.im().sprint(conf)),
            Value::Vector(v) if !v.is_empty() && v.all_chars() => {
                v.iter().map(|e| e.sprint(conf)).collect()
            }
            Value::Vector(v) => v
                .iter()
                .map(|e| elem_text(e, conf))
                .collect::<Vec<_>>()
                .join(" "),
            Value::Matrix(m) => matrix_text(m, conf),
        }
    }
}

/// Widest field, and most fraction digits, dyadic `text` will produce.
const MAX_FIELD: usize = 1 << 20;

const VERBS: &str = "bcdoxXeEfFgGsv";

/// How dyadic `text` lays out each element, taken from its left operand.
#[derive(Debug, Clone, PartialEq)]
struct Layout {
    prefix: String,
    suffix: String,
    width: usize,
    left: bool,
    zeros: bool,
    plus: bool,
    prec: Option<usize>,
    verb: char,
}

/// A real scalar reduced to something the numeric verbs can format.
enum Real {
    Exact(BigRational),
    Inf(bool),
}

fn bad_layout(a: &Value, why: &str) -> EvalError {
    EvalError::domain("text", a.describe(), why.to_string())
}

/// A run of decimal digits, saturating on overflow.
fn read_count(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut n: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        n = Some(n.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
        chars.next();
    }
    n
}

impl Layout {
    fn numeric(width: usize, prec: usize, verb: char) -> Self {
        Layout {
            prefix: String::new(),
            suffix: String::new(),
            width,
            left: false,
            zeros: false,
            plus: false,
            prec: Some(prec),
            verb,
        }
    }

    /// Either a format string such as `%8.3f`, or counts: a precision,
    /// a width and precision, or a width, precision and style char.
    fn from_operand(a: &Value) -> Result<Self> {
        let elems = a.elements();
        let layout = if !elems.is_empty() && elems.iter().all(|e| matches!(e, Value::Char(_))) {
            let text: String = elems
                .iter()
                .filter_map(|e| match e {
                    Value::Char(c) => Some(*c),
                    _ => None,
                })
                .collect();
            Self::parse(a, &text)?
        } else {
            let count = |v: &Value| {
                v.as_int()
                    .and_then(|i| usize::try_from(i).ok())
                    .ok_or_else(|| bad_layout(a, "width and precision must be non-negative integers"))
            };
            match elems.as_slice() {
                [p] => Layout::numeric(0, count(p)?, 'f'),
                [w, p] => Layout::numeric(count(w)?, count(p)?, 'f'),
                [w, p, Value::Char(style)] if VERBS.contains(*style) => {
                    Layout::numeric(count(w)?, count(p)?, *style)
                }
                _ => return Err(bad_layout(a, "expected a format string or 1 to 3 counts")),
            }
        };
        if layout.width > MAX_FIELD || layout.prec.map_or(false, |p| p > MAX_FIELD) {
            return Err(bad_layout(a, "format field is too wide"));
        }
        Ok(layout)
    }

    fn parse(a: &Value, text: &str) -> Result<Self> {
        let mut chars = text.chars().peekable();
        let mut prefix = String::new();
        loop {
            match chars.next() {
                None => return Err(bad_layout(a, "format has no verb")),
                Some('%') if chars.peek() == Some(&'%') => {
                    chars.next();
                    prefix.push('%');
                }
                Some('%') => break,
                Some(c) => prefix.push(c),
            }
        }
        let mut layout = Layout {
            prefix,
            prec: None,
            ..Layout::numeric(0, 0, 'v')
        };
        while let Some(&c) = chars.peek() {
            match c {
                '-' => layout.left = true,
                '0' => layout.zeros = true,
                '+' => layout.plus = true,
                _ => break,
            }
            chars.next();
        }
        layout.width = read_count(&mut chars).unwrap_or(0);
        if chars.peek() == Some(&'.') {
            chars.next();
            layout.prec = Some(read_count(&mut chars).unwrap_or(0));
        }
        layout.verb = chars
            .next()
            .filter(|v| VERBS.contains(*v))
            .ok_or_else(|| bad_layout(a, "unknown format verb"))?;
        let rest: String = chars.collect();
        if rest.replace("%%", "").contains('%') {
            return Err(bad_layout(a, "format has more than one verb"));
        }
        layout.suffix = rest.replace("%%", "%");
        Ok(layout)
    }

    /// One element, padded to the field width.
    fn cell(&self, ctx: &dyn Context, v: &Value) -> Result<String> {
        let body = match v {
            Value::Complex(z) => format!("{}j{}", self.body(ctx, z.re())?, self.body(ctx, z.im())?),
            other => self.body(ctx, other)?,
        };
        Ok(format!("{}{}{}", self.prefix, self.pad(body), self.suffix))
    }

    fn body(&self, ctx: &dyn Context, v: &Value) -> Result<String> {
        let conf = ctx.config();
        let text = match self.verb {
            'v' | 's' => {
                let conf = match self.prec {
                    Some(p) => conf.clone().with_float_digits(p),
                    None => conf.clone(),
                };
                match v {
                    Value::Vector(_) | Value::Matrix(_) => format!("({})", v.sprint(&conf)),
                    other => other.sprint(&conf),
                }
            }
            'c' => match v {
                Value::Char(c) => c.to_string(),
                other => other
                    .as_int()
                    .and_then(|i| u32::try_from(i).ok())
                    .and_then(char::from_u32)
                    .map(String::from)
                    .ok_or_else(|| EvalError::domain("text", other.describe(), "not a valid code point"))?,
            },
            'b' | 'o' | 'd' | 'x' | 'X' => {
                let i = match v {
                    Value::Char(c) => BigInt::from(*c as u32),
                    other => integer_of(other).ok_or_else(|| {
                        EvalError::type_error("text", other.describe(), "format needs an integer")
                    })?,
                };
                let radix = match self.verb {
                    'b' => 2,
                    'o' => 8,
                    'x' | 'X' => 16,
                    _ => 10,
                };
                let digits = i.to_str_radix(radix);
                if self.verb == 'X' {
                    digits.to_uppercase()
                } else {
                    digits
                }
            }
            verb => {
                let p = self.prec;
                let text = match (verb.to_ascii_lowercase(), real_of(v)?) {
                    (_, Real::Inf(neg)) => BigFloat::infinity(neg, conf.float_prec).to_decimal_string(1),
                    ('f', Real::Exact(r)) => fixed_text(ctx, &r, p.unwrap_or(6))?,
                    ('e', Real::Exact(r)) => exp_text(&r, p.unwrap_or(6)),
                    (_, Real::Exact(r)) => BigFloat::from_ratio(&r, conf.float_prec)
                        .to_decimal_string(p.unwrap_or(conf.float_digits).max(1)),
                };
                if verb.is_ascii_uppercase() {
                    text.replace('e', "E")
                } else {
                    text
                }
            }
        };
        if self.plus && !text.starts_with(['-', '+']) && !matches!(self.verb, 'c' | 's') {
            return Ok(format!("+{}", text));
        }
        Ok(text)
    }

    fn pad(&self, body: String) -> String {
        let len = body.chars().count();
        if len >= self.width {
            return body;
        }
        let fill = self.width - len;
        if self.left {
            format!("{}{}", body, " ".repeat(fill))
        } else if self.zeros && !matches!(self.verb, 'c' | 's' | 'v') {
            let split = if body.starts_with(['-', '+']) { 1 } else { 0 };
            let (sign, rest) = body.split_at(split);
            format!("{}{}{}", sign, "0".repeat(fill), rest)
        } else {
            format!("{}{}", " ".repeat(fill), body)
        }
    }
}

fn integer_of(v: &Value) -> Option<BigInt> {
    match v {
        Value::Int(_) | Value::BigInt(_) => v.to_bigint(),
        Value::BigRat(r) if r.is_integer() => Some(r.to_integer()),
        Value::BigFloat(f) if f.is_finite() && f.is_integer() => f.floor(),
        _ => None,
    }
}

fn real_of(v: &Value) -> Result<Real> {
    match v {
        Value::Int(i) => Ok(Real::Exact(BigRational::from_integer(BigInt::from(*i)))),
        Value::BigInt(i) => Ok(Real::Exact(BigRational::from_integer(i.clone()))),
        Value::BigRat(r) => Ok(Real::Exact(r.clone())),
        Value::BigFloat(f) => {
            let bits = f.top().unsigned_abs();
            if bits > (4 * MAX_FIELD) as u64 {
                return Err(EvalError::limit(
                    "text",
                    Limit::Digits,
                    format!("about {} digits, limit is {}", bits / 3, MAX_FIELD),
                ));
            }
            Ok(f.to_ratio().map_or(Real::Inf(f.is_negative()), Real::Exact))
        }
        other => Err(EvalError::type_error("text", other.describe(), "format needs a number")),
    }
}

fn ten_pow(k: i64) -> BigRational {
    let p = BigRational::from_integer(num_traits::pow(BigInt::from(10u32), k.unsigned_abs() as usize));
    if k < 0 {
        p.recip()
    } else {
        p
    }
}

/// `r` with exactly `prec` digits after the point, rounding half away from zero.
fn fixed_text(ctx: &dyn Context, r: &BigRational, prec: usize) -> Result<String> {
    let max = ctx.config().max_digits;
    let int_digits = ((r.numer().bits() as f64 - r.denom().bits() as f64).max(0.0) * std::f64::consts::LOG10_2) as u64;
    if max != 0 && int_digits + prec as u64 > max {
        return Err(EvalError::limit(
            "text",
            Limit::Digits,
            format!("about {} digits, limit is {}", int_digits + prec as u64, max),
        ));
    }
    let scaled = (r * ten_pow(prec as i64)).round().to_integer();
    let mut digits = scaled.magnitude().to_str_radix(10);
    if digits.len() <= prec {
        digits = format!("{}{}", "0".repeat(prec + 1 - digits.len()), digits);
    }
    let (int, frac) = digits.split_at(digits.len() - prec);
    let sign = if r.is_negative() { "-" } else { "" };
    Ok(if prec == 0 {
        format!("{}{}", sign, int)
    } else {
        format!("{}{}.{}", sign, int, frac)
    })
}

/// `r` as `d.ddde±xx` with `prec` digits after the point.
fn exp_text(r: &BigRational, prec: usize) -> String {
    let sign = if r.is_negative() { "-" } else { "" };
    let x = r.abs();
    let (k, mantissa) = if x.is_zero() {
        (0, "0".repeat(prec + 1))
    } else {
        let mut k = x.numer().to_str_radix(10).len() as i64 - x.denom().to_str_radix(10).len() as i64;
        while x >= ten_pow(k + 1) {
            k += 1;
        }
        while x < ten_pow(k) {
            k -= 1;
        }
        let limit = num_traits::pow(BigInt::from(10u32), prec + 1);
        let mut m = (&x * ten_pow(prec as i64 - k)).round().to_integer();
        if m >= limit {
            k += 1;
            m = (&x * ten_pow(prec as i64 - k)).round().to_integer();
        }
        (k, m.to_str_radix(10))
    };
    let (head, tail) = mantissa.split_at(1);
    let point = if prec == 0 { "" } else { "." };
    let esign = if k < 0 { '-' } else { '+' };
    format!("{}{}{}{}e{}{:02}", sign, head, point, tail, esign, k.abs())
}

/// Binary `text`: format each element of `b` under the layout `a` gives.
/// A vector becomes one line of text; a matrix becomes a char matrix
/// with one line per row.
pub(crate) fn format_with(ctx: &dyn Context, a: &Value, b: &Value) -> Result<Value> {
    let layout = Layout::from_operand(a)?;
    limits::check_digits(ctx, "text", b)?;
    let line = |elems: &[Value]| -> Result<String> {
        let chars = !elems.is_empty() && elems.iter().all(|e| matches!(e, Value::Char(_)));
        if chars && matches!(layout.verb, 's' | 'v') {
            let text: String = elems.iter().map(|e| e.sprint(ctx.config())).collect();
            return Ok(format!("{}{}{}", layout.prefix, layout.pad(text), layout.suffix));
        }
        let cells = elems.iter().map(|e| layout.cell(ctx, e)).collect::<Result<Vec<_>>>()?;
        Ok(cells.join(if chars { "" } else { " " }))
    };
    match b {
        Value::Matrix(m) => {
            let dims = m.dims();
            let cols = dims[dims.len() - 1];
            let lead = &dims[..dims.len() - 1];
            let rows: usize = lead.iter().product();
            let lines = (0..rows)
                .map(|r| line(&m.data()[r * cols..(r + 1) * cols]))
                .collect::<Result<Vec<_>>>()?;
            let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            let total = rows
                .checked_mul(width)
                .ok_or_else(|| EvalError::domain("text", b.describe(), "result is too large"))?;
            let mut data = structural::alloc("text", b, total)?;
            for l in &lines {
                let len = l.chars().count();
                data.extend(l.chars().map(Value::Char));
                data.extend(std::iter::repeat(Value::Char(' ')).take(width - len));
            }
            let mut out_dims = lead.to_vec();
            out_dims.push(width);
            structural::build(out_dims, data)
        }
        Value::Vector(v) => Ok(text_vector(&line(v.elems())?)),
        scalar => Ok(text_vector(&line(std::slice::from_ref(scalar))?)),
    }
}

fn text_vector(s: &str) -> Value {
    Value::Vector(Vector::new(s.chars().map(Value::Char).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::Complex;
    use crate::context::Session;
    use glyph_core::ErrorKind;

    fn chars(s: &str) -> Value {
        Value::vector(s.chars().map(Value::Char).collect())
    }

    fn rat(n: i64, d: i64) -> Value {
        Value::BigRat(BigRational::new(n.into(), d.into()))
    }

    fn formatted(a: Value, b: Value) -> String {
        format_with(&Session::default(), &a, &b).unwrap().sprint(&Config::default())
    }

    fn conf() -> Config {
        Config::default()
    }

    #[test]
    fn test_scalars() {
        let c = conf();
        assert_eq!(Value::Int(-42).sprint(&c), "-42");
        assert_eq!(Value::BigRat(BigRational::new(1.into(), 3.into())).sprint(&c), "1/3");
        assert_eq!(Value::Char('x').sprint(&c), "x");
        let z = Value::Complex(Complex::new(Value::Int(1), Value::Int(-2)));
        assert_eq!(z.sprint(&c), "1j-2");
        let half = BigFloat::from_ratio(&BigRational::new(1.into(), 2.into()), 256);
        assert_eq!(Value::BigFloat(half).sprint(&c), "0.5");
    }

    #[test]
    fn test_output_base() {
        let c = conf().with_output_base(16);
        assert_eq!(Value::Int(255).sprint(&c), "ff");
        assert_eq!(Value::BigRat(BigRational::new(1.into(), 16.into())).sprint(&c), "1/10");
    }

    #[test]
    fn test_max_digits_switches_to_float() {
        let c = conf().with_max_digits(5);
        assert_eq!(Value::Int(12345).sprint(&c), "12345");
        let big = Value::BigInt(BigInt::from(10).pow(30));
        assert_eq!(big.sprint(&c), "1e+30");
    }

    #[test]
    fn test_vectors() {
        let c = conf();
        assert_eq!(Value::int_vector(&[1, 2, 3]).sprint(&c), "1 2 3");
        let s = Value::vector("hi".chars().map(Value::Char).collect());
        assert_eq!(s.sprint(&c), "hi");
        let nested = Value::vector(vec![Value::Int(1), Value::int_vector(&[2, 3])]);
        assert_eq!(nested.sprint(&c), "1 (2 3)");
        assert_eq!(Value::vector(vec![]).sprint(&c), "");
    }

    #[test]
    fn test_matrix_layout() {
        let c = conf();
        let data = [1, 20, 3, 400].iter().map(|&x| Value::Int(x)).collect();
        let m = Value::Matrix(Matrix::new(vec![2, 2], data).unwrap());
        assert_eq!(m.sprint(&c), "1  20\n3 400");
        let data = (1..=8).map(Value::Int).collect();
        let cube = Value::Matrix(Matrix::new(vec![2, 2, 2], data).unwrap());
        assert_eq!(cube.sprint(&c), "1 2\n3 4\n\n5 6\n7 8");
    }

    #[test]
    fn test_format_counts() {
        assert_eq!(formatted(Value::Int(2), Value::Int(3)), "3.00");
        assert_eq!(formatted(Value::Int(3), rat(1, 3)), "0.333");
        assert_eq!(formatted(Value::Int(2), rat(-1, 3)), "-0.33");
        assert_eq!(formatted(Value::int_vector(&[8, 3]), rat(-1, 3)), "  -0.333");
        assert_eq!(formatted(Value::Int(0), rat(5, 2)), "3");
        let style = Value::vector(vec![Value::Int(0), Value::Int(2), Value::Char('e')]);
        assert_eq!(formatted(style, rat(99999, 10000)), "1.00e+01");
    }

    #[test]
    fn test_format_strings() {
        assert_eq!(formatted(chars("%x"), Value::Int(255)), "ff");
        assert_eq!(formatted(chars("%X"), Value::Int(255)), "FF");
        assert_eq!(formatted(chars("%b"), Value::Int(5)), "101");
        assert_eq!(formatted(chars("%08.3f"), rat(2, 3)), "0000.667");
        assert_eq!(formatted(chars("%e"), rat(2469, 2)), "1.234500e+03");
        assert_eq!(formatted(chars("%.2e"), Value::Int(0)), "0.00e+00");
        assert_eq!(formatted(chars("%5d|"), Value::Int(42)), "   42|");
        assert_eq!(formatted(chars("%-4d"), Value::Int(7)), "7   ");
        assert_eq!(formatted(chars("%+d"), Value::Int(5)), "+5");
        assert_eq!(formatted(chars("%g"), rat(1, 3)), "0.333333333333");
        assert_eq!(formatted(chars("%.3g"), rat(1, 3)), "0.333");
        assert_eq!(formatted(chars("100%%: %d"), Value::Int(1)), "100%: 1");
        assert_eq!(formatted(chars("%c"), Value::Int(65)), "A");
        assert_eq!(formatted(chars("%5s"), chars("ab")), "   ab");
    }

    #[test]
    fn test_format_arrays() {
        assert_eq!(formatted(chars("%.1f"), Value::int_vector(&[1, 2])), "1.0 2.0");
        let z = Value::Complex(Complex::new(Value::Int(1), rat(-1, 2)));
        assert_eq!(formatted(Value::Int(1), z), "1.0j-0.5");
        let data = [1, 20, 3, 400].iter().map(|&x| Value::Int(x)).collect();
        let m = Value::Matrix(Matrix::new(vec![2, 2], data).unwrap());
        let out = format_with(&Session::default(), &Value::int_vector(&[4, 0]), &m).unwrap();
        assert_eq!(out.dims(), vec![2, 9]);
        assert_eq!(out.sprint(&conf()), "   1   20\n   3  400");
    }

    #[test]
    fn test_format_errors() {
        let s = Session::default();
        let kind = |a: Value, b: Value| format_with(&s, &a, &b).unwrap_err().kind();
        assert_eq!(kind(chars("%q"), Value::Int(1)), ErrorKind::Domain);
        assert_eq!(kind(chars("%d %d"), Value::Int(1)), ErrorKind::Domain);
        assert_eq!(kind(chars("%d"), rat(1, 2)), ErrorKind::Type);
        assert_eq!(kind(Value::int_vector(&[1, 2, 3, 4]), Value::Int(1)), ErrorKind::Domain);
        assert_eq!(kind(Value::Int(-1), Value::Int(1)), ErrorKind::Domain);
        assert_eq!(kind(Value::Int(i64::MAX), Value::Int(1)), ErrorKind::Domain);
        assert_eq!(kind(Value::Int(2), Value::Char('a')), ErrorKind::Type);
    }
}
