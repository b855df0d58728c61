//! Backend access for visitor records.
//!
//! SYSTEM CONTEXT
//! ==============
//! `backend` defines the injected collaborator, `records` mediates calls to
//! it with caching, `memory` is a process-local implementation, and `types`
//! defines the shared record schema.

pub mod backend;
pub mod memory;
pub mod records;
pub mod types;

#[cfg(test)]
pub mod test_helpers;
