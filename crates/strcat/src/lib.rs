//! Micro-benchmarks comparing ways to concatenate a sequence of strings.
//!
//! [`strategy`] holds the four concatenation strategies, [`input`] builds their
//! input, and [`runner`] times them with allocation counts from [`alloc`].

pub mod alloc;
pub mod error;
pub mod input;
pub mod runner;
pub mod strategy;

pub use error::{Error, Result};
pub use strategy::Strategy;
