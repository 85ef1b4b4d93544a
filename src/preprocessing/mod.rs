//! Audio preprocessing modules
//!
//! Utilities for preparing decoded PCM for analysis:
//! - Channel mixdown (multi-channel to mono)

pub mod channel_mixer;
