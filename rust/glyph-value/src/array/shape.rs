use std::fmt;

use glyph_core::{EvalError, Result};

/// Dimension sizes of a matrix, outermost axis first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Shape { dims }
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements. The empty shape holds one element.
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Same as [`Shape::numel`] but refuses shapes whose product overflows.
    pub fn checked_numel(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn into_dims(self) -> Vec<usize> {
        self.dims
    }

    /// Size of one item along the first axis (product of the trailing dims).
    pub fn item_size(&self) -> usize {
        self.dims.iter().skip(1).product()
    }

    /// Length of the last axis.
    pub fn last(&self) -> usize {
        self.dims.last().copied().unwrap_or(1)
    }

    /// Compute C-contiguous (row-major) strides.
    pub fn strides(&self) -> Vec<usize> {
        if self.dims.is_empty() {
            return vec![];
        }
        let mut strides = vec![1usize; self.dims.len()];
        for i in (0..self.dims.len() - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// Convert a flat row-major offset into per-axis indices.
    pub fn unravel(&self, mut flat: usize) -> Vec<usize> {
        let mut idx = vec![0usize; self.dims.len()];
        for d in (0..self.dims.len()).rev() {
            if self.dims[d] > 0 {
                idx[d] = flat % self.dims[d];
                flat /= self.dims[d];
            }
        }
        idx
    }

    /// Convert per-axis indices into a flat row-major offset.
    pub fn ravel(&self, idx: &[usize]) -> usize {
        idx.iter()
            .zip(self.strides().iter())
            .map(|(&i, &s)| i * s)
            .sum()
    }

    /// The shape obtained by moving axis `perm[i]` of `self` to position `i`.
    pub fn permuted(&self, perm: &[usize]) -> Result<Shape> {
        if perm.len() != self.dims.len() {
            return Err(EvalError::domain(
                "transp",
                format!("shape {}", self),
                format!("expected {} axes but got {}", self.dims.len(), perm.len()),
            ));
        }
        let mut seen = vec![false; perm.len()];
        for &p in perm {
            if p >= perm.len() || seen[p] {
                return Err(EvalError::domain(
                    "transp",
                    format!("shape {}", self),
                    format!("{:?} is not a permutation of the axes", perm),
                ));
            }
            seen[p] = true;
        }
        Ok(Shape::new(perm.iter().map(|&p| self.dims[p]).collect()))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_basics() {
        let s = Shape::new(vec![2, 3, 4]);
        assert_eq!(s.ndim(), 3);
        assert_eq!(s.numel(), 24);
        assert_eq!(s.item_size(), 12);
        assert_eq!(s.last(), 4);
        assert_eq!(s.to_string(), "[2 3 4]");
    }

    #[test]
    fn shape_strides() {
        assert_eq!(Shape::new(vec![2, 3, 4]).strides(), vec![12, 4, 1]);
        assert_eq!(Shape::new(vec![3, 4]).strides(), vec![4, 1]);
    }

    #[test]
    fn shape_ravel_unravel() {
        let s = Shape::new(vec![2, 3, 4]);
        for flat in 0..s.numel() {
            assert_eq!(s.ravel(&s.unravel(flat)), flat);
        }
        assert_eq!(s.unravel(23), vec![1, 2, 3]);
    }

    #[test]
    fn shape_zero_dim() {
        let s = Shape::new(vec![0, 3]);
        assert_eq!(s.numel(), 0);
        assert_eq!(s.checked_numel(), Some(0));
    }

    #[test]
    fn shape_permuted() {
        let s = Shape::new(vec![2, 3, 4]);
        assert_eq!(s.permuted(&[2, 0, 1]).unwrap(), Shape::new(vec![4, 2, 3]));
        assert!(s.permuted(&[0, 0, 1]).is_err());
        assert!(s.permuted(&[0, 1]).is_err());
    }
}
