//! Scriptable backend double shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use super::backend::VisitorBackend;
use super::types::{EntryIdVisitorRecord, RecordId, VisitorFields};
use crate::error::BackendError;

/// One observed backend call, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Add(VisitorFields),
    Update(RecordId, VisitorFields),
    List,
    Export,
    Login(String),
    IsAdmin,
    ChangePassword(String, String),
}

/// One queued `admin_login` answer, released when `hold` is notified.
pub struct HeldLogin {
    pub answer: Result<bool, BackendError>,
    pub hold: Arc<Notify>,
}

/// Backend whose answers are set per test and whose calls are recorded.
pub struct ScriptedBackend {
    pub records: Mutex<Vec<EntryIdVisitorRecord>>,
    pub calls: Mutex<Vec<Call>>,
    pub login_answer: Mutex<Result<bool, BackendError>>,
    pub admin_answer: Mutex<Result<bool, BackendError>>,
    pub change_answer: Mutex<Result<bool, BackendError>>,
    pub read_error: Mutex<Option<BackendError>>,
    pub write_error: Mutex<Option<BackendError>>,
    /// When set, `admin_login` parks until notified.
    pub login_hold: Option<Arc<Notify>>,
    /// Consumed one per `admin_login` call before `login_answer` applies.
    pub login_queue: Mutex<VecDeque<HeldLogin>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            login_answer: Mutex::new(Ok(true)),
            admin_answer: Mutex::new(Ok(true)),
            change_answer: Mutex::new(Ok(true)),
            read_error: Mutex::new(None),
            write_error: Mutex::new(None),
            login_hold: None,
            login_queue: Mutex::new(VecDeque::new()),
        }
    }
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login(answer: Result<bool, BackendError>) -> Self {
        let backend = Self::new();
        *backend.login_answer.lock().unwrap() = answer;
        backend
    }

    pub fn with_admin_status(answer: Result<bool, BackendError>) -> Self {
        let backend = Self::new();
        *backend.admin_answer.lock().unwrap() = answer;
        backend
    }

    pub fn with_records(records: Vec<EntryIdVisitorRecord>) -> Self {
        let backend = Self::new();
        *backend.records.lock().unwrap() = records;
        backend
    }

    pub fn queue_login(&self, answer: Result<bool, BackendError>, hold: Arc<Notify>) {
        self.login_queue.lock().unwrap().push_back(HeldLogin { answer, hold });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn read_result(&self) -> Result<Vec<EntryIdVisitorRecord>, BackendError> {
        if let Some(err) = self.read_error.lock().unwrap().clone() {
            return Err(err);
        }
        let mut rows = self.records.lock().unwrap().clone();
        rows.reverse();
        Ok(rows)
    }

    fn write_check(&self) -> Result<(), BackendError> {
        match self.write_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl VisitorBackend for ScriptedBackend {
    async fn add_visitor_record(&self, fields: &VisitorFields) -> Result<(), BackendError> {
        self.record(Call::Add(fields.clone()));
        self.write_check()?;
        let mut records = self.records.lock().unwrap();
        let id = records.len() as RecordId;
        records.push(EntryIdVisitorRecord { id, record: fields.clone().into_record((id + 1) * 1_000_000_000) });
        Ok(())
    }

    async fn update_visitor_record(&self, id: RecordId, fields: &VisitorFields) -> Result<(), BackendError> {
        self.record(Call::Update(id, fields.clone()));
        self.write_check()?;
        let mut records = self.records.lock().unwrap();
        if let Some(entry) = records.iter_mut().find(|e| e.id == id) {
            let ts = entry.record.timestamp;
            entry.record = fields.clone().into_record(ts);
        }
        Ok(())
    }

    async fn get_sorted_visitor_records(&self) -> Result<Vec<EntryIdVisitorRecord>, BackendError> {
        self.record(Call::List);
        self.read_result()
    }

    async fn export_visitor_records(&self) -> Result<Vec<EntryIdVisitorRecord>, BackendError> {
        self.record(Call::Export);
        self.read_result()
    }

    async fn admin_login(&self, password: &str) -> Result<bool, BackendError> {
        self.record(Call::Login(password.to_owned()));
        let queued = self.login_queue.lock().unwrap().pop_front();
        if let Some(HeldLogin { answer, hold }) = queued {
            hold.notified().await;
            return answer;
        }
        if let Some(hold) = &self.login_hold {
            hold.notified().await;
        }
        self.login_answer.lock().unwrap().clone()
    }

    async fn is_caller_admin(&self) -> Result<bool, BackendError> {
        self.record(Call::IsAdmin);
        self.admin_answer.lock().unwrap().clone()
    }

    async fn change_admin_password(&self, old_password: &str, new_password: &str) -> Result<bool, BackendError> {
        self.record(Call::ChangePassword(old_password.to_owned(), new_password.to_owned()));
        self.change_answer.lock().unwrap().clone()
    }
}

/// A fully populated form.
pub fn sample_fields(name: &str) -> VisitorFields {
    VisitorFields {
        full_name: name.to_owned(),
        email: "visitor@example.com".to_owned(),
        address: "7 Station Road".to_owned(),
        job_info: "State Bank".to_owned(),
        income_level: "Medium".to_owned(),
        reason_for_visit: "Loan enquiry".to_owned(),
        visit_type: "New Inquiry".to_owned(),
    }
}

/// A stored record with the given id and timestamp.
pub fn sample_entry(id: RecordId, name: &str, timestamp: u64) -> EntryIdVisitorRecord {
    EntryIdVisitorRecord { id, record: sample_fields(name).into_record(timestamp) }
}
