//! Array shape algebra: shapes, structural operators and the operators
//! that work along an axis.

mod axis;
mod shape;
pub(crate) mod structural;

pub use axis::{index, inner_product, outer_product, reduce, reduce_first, scan};
pub use shape::Shape;
