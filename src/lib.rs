#![deny(bare_trait_objects)]

//! Intersection kernels for roaring containers whose operands use different representations
//!
//! - Array ∩ Bitset and Array ∩ Run always produce arrays
//! - Run ∩ Bitset and Bitset ∩ Bitset pick the result representation from the computed cardinality
//! - `inplace_*` variants consume their receiver and reuse its storage when the result fits
//! - Allocation failure is reported as an `Error` instead of aborting

mod container;
mod error;

#[cfg(test)]
mod test;

pub use container::{
    ArrayContainer,
    BitsetContainer,
    Container,
    Intersection,
    Rle16,
    RunContainer,
    SetAnd,
    BITSET_SIZE_IN_WORDS,
    DEFAULT_MAX_SIZE
};
pub use container::array_ops::advance_until;
pub use error::{Error, Result};
