//! Query engine: side-effect-free filtering and ordering.

pub mod filter_sort;
