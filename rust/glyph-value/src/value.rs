//! The value model: a closed set of scalar and array representations.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;

use glyph_core::{Config, EvalError, Result};

use crate::array::Shape;
use crate::bigfloat::BigFloat;
use crate::complex::Complex;

/// Representation tag. The discriminant indexes operator tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Int = 0,
    Char = 1,
    BigInt = 2,
    BigRat = 3,
    BigFloat = 4,
    Complex = 5,
    Vector = 6,
    Matrix = 7,
}

pub const KIND_COUNT: usize = 8;

impl Kind {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Position on the promotion ladder. `Char` is off the ladder.
    pub fn rank(self) -> Option<u8> {
        match self {
            Kind::Int => Some(0),
            Kind::BigInt => Some(1),
            Kind::BigRat => Some(2),
            Kind::BigFloat => Some(3),
            Kind::Complex => Some(4),
            Kind::Vector => Some(5),
            Kind::Matrix => Some(6),
            Kind::Char => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Kind::Int | Kind::BigInt | Kind::BigRat | Kind::BigFloat | Kind::Complex
        )
    }

    /// Real scalars: the representations allowed as Complex parts.
    pub fn is_real(self) -> bool {
        matches!(self, Kind::Int | Kind::BigInt | Kind::BigRat | Kind::BigFloat)
    }

    pub fn is_array(self) -> bool {
        matches!(self, Kind::Vector | Kind::Matrix)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Int => "int",
            Kind::Char => "char",
            Kind::BigInt => "big int",
            Kind::BigRat => "rational",
            Kind::BigFloat => "float",
            Kind::Complex => "complex",
            Kind::Vector => "vector",
            Kind::Matrix => "matrix",
        };
        write!(f, "{}", name)
    }
}

/// A glyph value. Values are never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Char(char),
    BigInt(BigInt),
    BigRat(BigRational),
    BigFloat(BigFloat),
    Complex(Complex),
    Vector(Vector),
    Matrix(Matrix),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::Char(_) => Kind::Char,
            Value::BigInt(_) => Kind::BigInt,
            Value::BigRat(_) => Kind::BigRat,
            Value::BigFloat(_) => Kind::BigFloat,
            Value::Complex(_) => Kind::Complex,
            Value::Vector(_) => Kind::Vector,
            Value::Matrix(_) => Kind::Matrix,
        }
    }

    pub fn is_array(&self) -> bool {
        self.kind().is_array()
    }

    pub fn is_scalar(&self) -> bool {
        !self.is_array()
    }

    pub fn from_bool(b: bool) -> Value {
        Value::Int(b as i64)
    }

    pub fn vector(elems: Vec<Value>) -> Value {
        Value::Vector(Vector::new(elems))
    }

    pub fn int_vector(elems: &[i64]) -> Value {
        Value::Vector(Vector::new(elems.iter().map(|&i| Value::Int(i)).collect()))
    }

    /// Numeric zero test across real representations; `false` for non-numbers.
    pub fn is_zero(&self) -> bool {
        use num_traits::Zero;
        match self {
            Value::Int(i) => *i == 0,
            Value::BigInt(i) => i.is_zero(),
            Value::BigRat(r) => r.is_zero(),
            Value::BigFloat(f) => f.is_zero(),
            Value::Complex(c) => c.re().is_zero() && c.im().is_zero(),
            _ => false,
        }
    }

    /// Sign of a real scalar, `None` for anything else.
    pub fn sign(&self) -> Option<i32> {
        use num_traits::Signed;
        let s = match self {
            Value::Int(i) => i.signum() as i32,
            Value::BigInt(i) => {
                if i.is_positive() {
                    1
                } else if i.is_negative() {
                    -1
                } else {
                    0
                }
            }
            Value::BigRat(r) => {
                if r.is_positive() {
                    1
                } else if r.is_negative() {
                    -1
                } else {
                    0
                }
            }
            Value::BigFloat(f) => f.sign(),
            _ => return None,
        };
        Some(s)
    }

    /// Integer payload as a `BigInt`, for Int and BigInt only.
    pub fn to_bigint(&self) -> Option<BigInt> {
        match self {
            Value::Int(i) => Some(BigInt::from(*i)),
            Value::BigInt(i) => Some(i.clone()),
            _ => None,
        }
    }

    /// Small integer payload, used for counts, axes, and indices.
    pub fn as_int(&self) -> Option<i64> {
        use num_traits::ToPrimitive;
        match self {
            Value::Int(i) => Some(*i),
            Value::BigInt(i) => i.to_i64(),
            _ => None,
        }
    }

    /// Require a small integer, reporting `op` on failure.
    pub fn expect_int(&self, op: &str) -> Result<i64> {
        self.as_int()
            .ok_or_else(|| EvalError::type_error(op, self.describe(), "expected an integer"))
    }

    /// Elements in ravel order: a scalar is its own single element.
    pub fn elements(&self) -> Vec<Value> {
        match self {
            Value::Vector(v) => v.elems().to_vec(),
            Value::Matrix(m) => m.data().to_vec(),
            other => vec![other.clone()],
        }
    }

    /// Shape as dimension sizes: empty for scalars.
    pub fn dims(&self) -> Vec<usize> {
        match self {
            Value::Vector(v) => vec![v.len()],
            Value::Matrix(m) => m.dims().to_vec(),
            _ => vec![],
        }
    }

    /// Short, bounded description used in error messages.
    pub fn describe(&self) -> String {
        let conf = Config::default();
        match self {
            Value::Vector(v) => format!("vector of length {}", v.len()),
            Value::Matrix(m) => format!("matrix of shape {}", m.shape()),
            Value::Char(c) => format!("char {:?}", c),
            other => {
                let mut text = other.sprint(&conf);
                if text.len() > 40 {
                    text.truncate(37);
                    text.push_str("...");
                }
                format!("{} {}", other.kind(), text)
            }
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<BigInt> for Value {
    fn from(i: BigInt) -> Self {
        Value::BigInt(i)
    }
}

impl From<BigRational> for Value {
    fn from(r: BigRational) -> Self {
        Value::BigRat(r)
    }
}

impl From<BigFloat> for Value {
    fn from(f: BigFloat) -> Self {
        Value::BigFloat(f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sprint(&Config::default()))
    }
}

/// Rank-1 array.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector(Vec<Value>);

impl Vector {
    pub fn new(elems: Vec<Value>) -> Self {
        Vector(elems)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn elems(&self) -> &[Value] {
        &self.0
    }

    pub fn into_elems(self) -> Vec<Value> {
        self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn all_chars(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|v| matches!(v, Value::Char(_)))
    }

    /// A copy with the elements in reverse order.
    pub fn reversed(&self) -> Vector {
        Vector(self.0.iter().rev().cloned().collect())
    }
}

/// N-dimensional array stored flat in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    shape: Shape,
    data: Vec<Value>,
}

impl Matrix {
    /// Build a matrix, enforcing rank at least one and
    /// `data.len() == product(shape)`.
    pub fn new(dims: Vec<usize>, data: Vec<Value>) -> Result<Self> {
        if dims.is_empty() {
            return Err(EvalError::internal("matrix needs at least one dimension"));
        }
        let shape = Shape::new(dims);
        match shape.checked_numel() {
            Some(n) if n == data.len() => Ok(Matrix { shape, data }),
            Some(n) => Err(EvalError::internal(format!(
                "matrix of shape {} needs {} elements, got {}",
                shape,
                n,
                data.len()
            ))),
            None => Err(EvalError::domain(
                "rho",
                format!("shape {}", shape),
                "shape is too large",
            )),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn rank(&self) -> usize {
        self.shape.ndim()
    }

    pub fn data(&self) -> &[Value] {
        &self.data
    }

    pub fn into_parts(self) -> (Shape, Vec<Value>) {
        (self.shape, self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of one item along the first axis.
    pub fn item_size(&self) -> usize {
        self.shape.item_size()
    }

    /// Same shape, each element replaced by `f(elem)`.
    pub fn map(self, f: impl FnMut(Value) -> Value) -> Matrix {
        Matrix {
            shape: self.shape,
            data: self.data.into_iter().map(f).collect(),
        }
    }

    pub fn try_map(&self, f: impl FnMut(&Value) -> Result<Value>) -> Result<Matrix> {
        let data = self.data.iter().map(f).collect::<Result<Vec<_>>>()?;
        Ok(Matrix {
            shape: self.shape.clone(),
            data,
        })
    }

    /// A matrix of the same shape holding `data`, which must be as long.
    pub fn with_data(&self, data: Vec<Value>) -> Result<Matrix> {
        Matrix::new(self.dims().to_vec(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ladder() {
        assert!(Kind::Int.rank() < Kind::BigInt.rank());
        assert!(Kind::BigRat.rank() < Kind::BigFloat.rank());
        assert!(Kind::BigFloat.rank() < Kind::Complex.rank());
        assert_eq!(Kind::Char.rank(), None);
        assert_eq!(Kind::Matrix.index(), KIND_COUNT - 1);
    }

    #[test]
    fn test_matrix_invariant() {
        assert!(Matrix::new(vec![2, 3], (0..6).map(Value::Int).collect()).is_ok());
        let err = Matrix::new(vec![2, 3], vec![Value::Int(1)]).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_matrix_rejects_rank_zero() {
        let err = Matrix::new(vec![], vec![Value::Int(1)]).unwrap_err();
        assert!(err.is_internal());
        assert!(Matrix::new(vec![], vec![]).is_err());
        assert_eq!(Matrix::new(vec![1], vec![Value::Int(1)]).unwrap().rank(), 1);
    }

    #[test]
    fn test_describe() {
        assert_eq!(Value::Int(3).describe(), "int 3");
        assert_eq!(Value::int_vector(&[1, 2]).describe(), "vector of length 2");
        assert_eq!(Value::Char('a').describe(), "char 'a'");
    }

    #[test]
    fn test_helpers() {
        assert!(Value::Int(0).is_zero());
        assert_eq!(Value::Int(-4).sign(), Some(-1));
        assert_eq!(Value::Char('x').sign(), None);
        assert_eq!(Value::BigInt(BigInt::from(7)).as_int(), Some(7));
        assert_eq!(Value::int_vector(&[1, 2, 3]).dims(), vec![3]);
        assert!(Value::vector(vec![Value::Char('a'), Value::Char('b')])
            .elements()
            .iter()
            .all(|v| v.kind() == Kind::Char));
    }
}
