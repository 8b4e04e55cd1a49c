mod array;
pub(crate) mod array_ops;
mod bitset;
mod bitset_ops;
mod run;

use crate::Result;

pub use self::array::ArrayContainer;
pub use self::bitset::{BitsetContainer, BITSET_SIZE_IN_WORDS};
pub use self::run::{Rle16, RunContainer};

/// Maximum cardinality of an array container. Results with a larger cardinality are stored as bitsets
pub const DEFAULT_MAX_SIZE: usize = 4096;

/// The set intersection operation writing into a caller supplied container
pub trait Intersection<T> {
    type Output;

    /// Intersect `self` with `other` and overwrite `out` with the result.
    /// `out` is grown if its capacity is smaller than the cardinality of `self`
    fn intersect_with(&self, other: &T, out: &mut Self::Output) -> Result<()>;
}

/// The set intersection operation where the representation of the result is chosen
/// from its cardinality
pub trait SetAnd<T> {
    /// Intersect `self` with `other` into a newly allocated container
    fn and(&self, other: &T) -> Result<Container>;

    /// Compute the cardinality of the intersection without materializing it
    fn and_cardinality(&self, other: &T) -> usize;

    /// Check if `self` and `other` have at least one value in common
    fn intersects(&self, other: &T) -> bool;

    /// Intersect `self` with `other`, reusing the storage of `self` where the result allows it.
    /// `self` is consumed; its storage is either returned inside the result or freed
    fn inplace_and(self, other: &T) -> Result<Container>;
}

/// The result of an operation whose representation depends on its cardinality
#[derive(Clone, Debug, PartialEq)]
pub enum Container {
    /// Array container
    Array(ArrayContainer),

    /// Bitset container
    Bitset(BitsetContainer)
}

impl Container {
    /// Check if the result is stored as a bitset
    #[inline]
    pub fn is_bitset(&self) -> bool {
        match self {
            Container::Array(_) => false,
            Container::Bitset(_) => true
        }
    }

    /// Get the cardinality of the container
    pub fn cardinality(&self) -> usize {
        match self {
            Container::Array(c) => c.cardinality(),
            Container::Bitset(c) => c.cardinality()
        }
    }

    /// Get an iterator over the values of the container in ascending order
    pub fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = u16> + 'a> {
        match self {
            Container::Array(c) => Box::new(c.iter().copied()),
            Container::Bitset(c) => Box::new(c.iter())
        }
    }
}
