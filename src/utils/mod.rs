//! Miscellaneous utilities.

mod cross_product;
mod fixed_point;
mod scalar_type;

pub use cross_product::CrossProduct;
pub use fixed_point::Fix64;
pub use scalar_type::ScalarType;

/// Returns the inverse of `val` if it is strictly positive, and zero otherwise.
///
/// This is the inversion used for effective masses: a non-positive effective mass
/// means the constrained direction is immovable.
#[inline]
pub fn inv_positive<N: ScalarType>(val: N) -> N {
    if val > N::zero() {
        N::one() / val
    } else {
        N::zero()
    }
}
