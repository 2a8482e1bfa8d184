//! Generic items, with no dependence on the rest of the library.

pub mod minimal_pcg;

pub use minimal_pcg::MinimalPCG32;
