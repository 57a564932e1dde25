//! Glyph Value
//!
//! The numeric type lattice (int, char, big int, rational, float, complex,
//! vector, matrix), promotion and shrinking between representations, the
//! unary and binary operator registries, first-principles transcendental
//! functions, and the array operators built on top of them.

pub mod array;
pub mod bigfloat;
mod binary;
pub mod complex;
pub mod context;
pub mod eval;
pub mod format;
pub mod limits;
pub mod math;
pub mod order;
pub mod promote;
mod unary;
pub mod value;

pub use array::{index, inner_product, outer_product, reduce, reduce_first, scan, Shape};
pub use bigfloat::BigFloat;
pub use complex::Complex;
pub use context::{Context, Session};
pub use eval::{binary_names, eval_binary, eval_unary, unary_names};
pub use glyph_core::{Config, ConfigError, ErrorKind, EvalError, Limit, Result};
pub use math::consts as constants;
pub use order::{real_cmp, total_cmp, values_equal};
pub use promote::{promote, shrink};
pub use value::{Kind, Matrix, Value, Vector};
