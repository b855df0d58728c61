//! Utility helpers shared across tracker modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Small pure helpers live here so the encoders and the shell format values
//! the same way.

pub mod timestamp;
