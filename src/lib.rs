//! Visitor-logging front-end core: admin session gate, record client, and
//! CSV/XLSX export.
//!
//! This crate owns every piece of client logic with a real contract. The UI
//! shell renders forms and tables and calls into [`tracker::VisitorTracker`];
//! storage and authorization belong to an injected
//! [`net::backend::VisitorBackend`].
//!
//! Build with `--features hydrate` for the browser (session storage and file
//! downloads via `web-sys`); native builds use in-memory session storage and
//! write exports to a directory.

pub mod config;
pub mod error;
pub mod export;
pub mod net;
pub mod state;
pub mod tracker;
pub mod util;

pub use config::{RecordListAccess, TrackerConfig};
pub use error::{BackendError, ConfigError, ErrorCode, ValidationError};
pub use export::{ExportError, ExportFormat};
pub use net::backend::VisitorBackend;
pub use net::types::{EntryIdVisitorRecord, RecordId, VisitorFields, VisitorRecord};
pub use state::admin::{AdminGate, GateState};
pub use tracker::{Notice, NoticeLevel, VisitorTracker};
