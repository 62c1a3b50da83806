//! Helpers shared by the derive implementations.

pub mod rename;
