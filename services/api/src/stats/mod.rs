//! Derived statistics: standings computation and xG estimation

pub mod standings;
pub mod xg;
