//! Client-side session state.
//!
//! DESIGN
//! ======
//! `admin` owns the unlock state machine; `session` is the tab-scoped storage
//! it persists into. Nothing else writes the session flag.

pub mod admin;
pub mod session;
