//! Shared types for the journal service and its HTTP clients.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =====================================================
// Resources
// =====================================================

/// The four collections the journal persists.
///
/// Each variant carries the configuration that differs between resources:
/// the URL segment under `/api/`, the file holding the durable document,
/// and the label used in not-found messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Entries,
    Tasks,
    Meetings,
    StickyNotes,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Entries,
        ResourceKind::Tasks,
        ResourceKind::Meetings,
        ResourceKind::StickyNotes,
    ];

    /// Path segment under `/api/`.
    pub fn segment(&self) -> &'static str {
        match self {
            ResourceKind::Entries => "entries",
            ResourceKind::Tasks => "tasks",
            ResourceKind::Meetings => "meetings",
            ResourceKind::StickyNotes => "stickynotes",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ResourceKind::Entries => "entries.json",
            ResourceKind::Tasks => "tasks.json",
            ResourceKind::Meetings => "meetings.json",
            ResourceKind::StickyNotes => "stickynotes.json",
        }
    }

    /// Singular, capitalized name used in error bodies ("Task not found").
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Entries => "Entry",
            ResourceKind::Tasks => "Task",
            ResourceKind::Meetings => "Meeting",
            ResourceKind::StickyNotes => "Note",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.segment())
    }
}

/// A persisted item keyed by a client-assigned id.
///
/// Records wrap the JSON value exactly as the client sent it. The store only
/// ever looks at the string `id`; every other field, whatever its type
/// (including explicit `null`s), is carried through untouched.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn as_value(&self) -> &Value;

    /// The string `id` field, if the value is an object that carries one.
    fn id(&self) -> Option<&str> {
        self.as_value().get("id").and_then(Value::as_str)
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

// =====================================================
// Domain Types
// =====================================================

/// A dated diary entry: `title`, `content`, `date`, `mood`, `prompt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JournalEntry(pub Value);

impl JournalEntry {
    pub fn title(&self) -> Option<&str> {
        str_field(&self.0, "title")
    }

    pub fn content(&self) -> Option<&str> {
        str_field(&self.0, "content")
    }

    pub fn date(&self) -> Option<&str> {
        str_field(&self.0, "date")
    }

    /// 1 (worst) to 5 (best) as the UI writes it; older clients may differ
    pub fn mood(&self) -> Option<f64> {
        self.0.get("mood").and_then(Value::as_f64)
    }

    /// Daily prompt shown while the entry was written
    pub fn prompt(&self) -> Option<&str> {
        str_field(&self.0, "prompt")
    }
}

impl Record for JournalEntry {
    const KIND: ResourceKind = ResourceKind::Entries;

    fn as_value(&self) -> &Value {
        &self.0
    }
}

/// A to-do item: `taskName`, `description`, `date`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task(pub Value);

impl Task {
    pub fn task_name(&self) -> Option<&str> {
        str_field(&self.0, "taskName")
    }

    pub fn description(&self) -> Option<&str> {
        str_field(&self.0, "description")
    }

    pub fn date(&self) -> Option<&str> {
        str_field(&self.0, "date")
    }
}

impl Record for Task {
    const KIND: ResourceKind = ResourceKind::Tasks;

    fn as_value(&self) -> &Value {
        &self.0
    }
}

/// A scheduled meeting: `meetingId`, `date`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meeting(pub Value);

impl Meeting {
    /// Conferencing room / meeting code, not the record id
    pub fn meeting_id(&self) -> Option<&str> {
        str_field(&self.0, "meetingId")
    }

    pub fn date(&self) -> Option<&str> {
        str_field(&self.0, "date")
    }
}

impl Record for Meeting {
    const KIND: ResourceKind = ResourceKind::Meetings;

    fn as_value(&self) -> &Value {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StickyNote(pub Value);

impl StickyNote {
    pub fn content(&self) -> Option<&str> {
        str_field(&self.0, "content")
    }

    pub fn color(&self) -> Option<&str> {
        str_field(&self.0, "color")
    }
}

impl Record for StickyNote {
    const KIND: ResourceKind = ResourceKind::StickyNotes;

    fn as_value(&self) -> &Value {
        &self.0
    }
}

// =====================================================
// Request / Response Types
// =====================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Per-collection line of the status report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStatus {
    pub resource: ResourceKind,
    pub file: String,
    pub records: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub started_at: String,
    pub uptime_secs: u64,
    pub data_dir: String,
    pub collections: Vec<CollectionStatus>,
}

/// Read-only snapshot of every collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalBackup {
    pub exported_at: String,
    pub entries: Vec<JournalEntry>,
    pub tasks: Vec<Task>,
    pub meetings: Vec<Meeting>,
    pub stickynotes: Vec<StickyNote>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_accessors_read_camel_case_fields() {
        let task: Task = serde_json::from_value(json!({
            "id": "1",
            "taskName": "Buy milk",
            "description": "",
            "date": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(task.id(), Some("1"));
        assert_eq!(task.task_name(), Some("Buy milk"));
        assert_eq!(task.description(), Some(""));
    }

    #[test]
    fn test_payload_round_trips_verbatim() {
        let value = json!({
            "id": "42",
            "content": "call mom",
            "color": null,
            "pinned": true,
            "position": { "x": 10, "y": 20 }
        });
        let note: StickyNote = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(note.color(), None);
        assert_eq!(serde_json::to_value(&note).unwrap(), value);
    }

    #[test]
    fn test_off_type_fields_are_not_rejected() {
        let value = json!({ "id": "7", "title": 12, "mood": "3", "prompt": null });
        let entry: JournalEntry = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(entry.title(), None);
        assert_eq!(entry.mood(), None);
        assert_eq!(serde_json::to_value(&entry).unwrap(), value);

        let fractional: JournalEntry =
            serde_json::from_value(json!({ "id": "8", "mood": 4.5 })).unwrap();
        assert_eq!(fractional.mood(), Some(4.5));
    }

    #[test]
    fn test_id_must_be_a_string() {
        let missing: Meeting = serde_json::from_value(json!({ "meetingId": "abc-defg-hij" })).unwrap();
        assert_eq!(missing.id(), None);
        let numeric: Meeting = serde_json::from_value(json!({ "id": 5 })).unwrap();
        assert_eq!(numeric.id(), None);
        let array: Meeting = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(array.id(), None);
    }

    #[test]
    fn test_resource_kind_configuration() {
        assert_eq!(ResourceKind::StickyNotes.segment(), "stickynotes");
        assert_eq!(ResourceKind::StickyNotes.label(), "Note");
        assert_eq!(ResourceKind::Entries.file_name(), "entries.json");
        assert_eq!(
            serde_json::to_value(ResourceKind::StickyNotes).unwrap(),
            json!("stickynotes")
        );
        assert_eq!(<Task as Record>::KIND, ResourceKind::Tasks);
    }
}
