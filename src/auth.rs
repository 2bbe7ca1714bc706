//! Bearer credential handling.

pub mod token;

pub use token::*;
