//! Audio I/O modules
//!
//! The edges of the crate: file decoding with Symphonia and track
//! concatenation. The analysis core itself never touches these.

pub mod combine;
pub mod decoder;
