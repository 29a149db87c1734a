//! Wire types for the FlowDesk REST API.
//!
//! Records come from a Mongo-backed backend: ids are `_id` strings,
//! timestamps are camelCase ISO strings, and several references arrive in
//! more than one shape depending on whether the server populated them.
//! Everything optional on the wire is optional here; deserialization must
//! never fail on a record the dashboard would have rendered.

use serde::{Deserialize, Serialize};

/// Standard response envelope: `{success, message?, data}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// Pagination block nested inside paginated `data` payloads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub customer_type: Option<String>,
    #[serde(default)]
    pub admin_manager: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

/// A customer reference that the server sends either as a bare id string or
/// as a populated object. Both shapes must normalize to the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerRef {
    Id(String),
    Embedded(CustomerStub),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerStub {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl CustomerRef {
    pub fn id(&self) -> &str {
        match self {
            CustomerRef::Id(id) => id,
            CustomerRef::Embedded(stub) => &stub.id,
        }
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_id: CustomerRef,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub project_description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_phase: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    InProgress,
    Completed,
    OnHold,
    #[serde(other)]
    Unknown,
}

impl Default for PhaseStatus {
    fn default() -> Self {
        PhaseStatus::Pending
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    #[serde(rename = "_id")]
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub type_of_phase: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub status: PhaseStatus,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Phase {
    /// Human-readable label: explicit name, else the canonical label for the
    /// phase type, else "Phase {order}".
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match self.type_of_phase.as_deref() {
            Some("onboarding") => "Onboarding".to_string(),
            Some("planning_and_design") => "Planning & Design".to_string(),
            Some("travel") => "Travel".to_string(),
            Some("shopping") => "Shopping".to_string(),
            Some("ordering") => "Ordering".to_string(),
            Some("production") => "Production".to_string(),
            Some("delivery") => "Delivery".to_string(),
            Some("installation") => "Installation".to_string(),
            _ => format!("Phase {}", self.order),
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl TaskStatus {
    /// A task counts as ongoing unless it reached a terminal state.
    pub fn is_ongoing(self) -> bool {
        !matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub phase_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub task_type: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub estimated_start_date: Option<String>,
    #[serde(default)]
    pub estimated_complete_date: Option<String>,
    #[serde(default)]
    pub actual_start_date: Option<String>,
    #[serde(default)]
    pub actual_complete_date: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Free-form per-task payload; shape varies by task type.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// A phase reference on a document: populated object or bare id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhaseRef {
    Id(String),
    Embedded(PhaseStub),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseStub {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl PhaseRef {
    pub fn id(&self) -> &str {
        match self {
            PhaseRef::Id(id) => id,
            PhaseRef::Embedded(stub) => &stub.id,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub phase_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub phase_id: Option<PhaseRef>,
    #[serde(default)]
    pub metadata: Option<DocumentMetadata>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub document_name: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "uploadedAt", alias = "createdAt")]
    pub uploaded_at: Option<String>,
}

impl Document {
    /// Resolve the effective phase, checking in order: the phase reference
    /// (populated or bare), then `metadata.phase_id`. Older uploads carry the
    /// phase only inside metadata; skipping that step drops them from the
    /// grouped view.
    pub fn effective_phase_id(&self) -> Option<&str> {
        if let Some(phase_ref) = &self.phase_id {
            let id = phase_ref.id();
            if !id.is_empty() {
                return Some(id);
            }
        }
        self.metadata
            .as_ref()
            .and_then(|m| m.phase_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Meetings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub phase_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub meeting_date: Option<String>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    InApp,
    Email,
    Wati,
    #[serde(other)]
    Unknown,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        NotificationChannel::InApp
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub customer_id: Option<CustomerRef>,
    #[serde(default)]
    pub channel: NotificationChannel,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub phase_id: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Crew (phase contacts)
// ---------------------------------------------------------------------------

/// Crew roles arrive as a single string on older records and a list on newer
/// ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CrewRoles {
    One(String),
    Many(Vec<String>),
}

impl Default for CrewRoles {
    fn default() -> Self {
        CrewRoles::Many(Vec::new())
    }
}

impl CrewRoles {
    pub fn as_list(&self) -> Vec<&str> {
        match self {
            CrewRoles::One(role) => vec![role.as_str()],
            CrewRoles::Many(roles) => roles.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub phase_id: Option<PhaseRef>,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_role: CrewRoles,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_ref_bare_string() {
        let r: CustomerRef = serde_json::from_str(r#""cust-1""#).unwrap();
        assert_eq!(r.id(), "cust-1");
    }

    #[test]
    fn test_customer_ref_embedded_object() {
        let r: CustomerRef =
            serde_json::from_str(r#"{"_id": "cust-1", "name": "Asha Rao", "email": "a@x.io"}"#)
                .unwrap();
        assert_eq!(r.id(), "cust-1");
    }

    #[test]
    fn test_document_phase_from_populated_ref() {
        let doc: Document = serde_json::from_str(
            r#"{"_id": "d1", "phase_id": {"_id": "ph-9", "name": "Delivery"}, "file_name": "bol.pdf"}"#,
        )
        .unwrap();
        assert_eq!(doc.effective_phase_id(), Some("ph-9"));
    }

    #[test]
    fn test_document_phase_from_bare_id() {
        let doc: Document =
            serde_json::from_str(r#"{"_id": "d1", "phase_id": "ph-3"}"#).unwrap();
        assert_eq!(doc.effective_phase_id(), Some("ph-3"));
    }

    #[test]
    fn test_document_phase_metadata_fallback() {
        let doc: Document = serde_json::from_str(
            r#"{"_id": "d1", "metadata": {"phase_id": "ph-7"}, "file_name": "quote.pdf"}"#,
        )
        .unwrap();
        assert_eq!(doc.effective_phase_id(), Some("ph-7"));
    }

    #[test]
    fn test_document_phase_unassigned() {
        let doc: Document =
            serde_json::from_str(r#"{"_id": "d1", "file_name": "loose.pdf"}"#).unwrap();
        assert_eq!(doc.effective_phase_id(), None);
    }

    #[test]
    fn test_crew_roles_both_shapes() {
        let one: CrewRoles = serde_json::from_str(r#""carpenter""#).unwrap();
        assert_eq!(one.as_list(), vec!["carpenter"]);

        let many: CrewRoles = serde_json::from_str(r#"["carpenter", "foreman"]"#).unwrap();
        assert_eq!(many.as_list(), vec!["carpenter", "foreman"]);
    }

    #[test]
    fn test_phase_status_unknown_tolerated() {
        let phase: Phase = serde_json::from_str(
            r#"{"_id": "p1", "project_id": "pr1", "order": 2, "status": "archived"}"#,
        )
        .unwrap();
        assert_eq!(phase.status, PhaseStatus::Unknown);
    }

    #[test]
    fn test_phase_display_name_fallbacks() {
        let named: Phase = serde_json::from_str(
            r#"{"_id": "p1", "project_id": "pr", "name": "Site Visit", "order": 1}"#,
        )
        .unwrap();
        assert_eq!(named.display_name(), "Site Visit");

        let typed: Phase = serde_json::from_str(
            r#"{"_id": "p2", "project_id": "pr", "type_of_phase": "planning_and_design", "order": 2}"#,
        )
        .unwrap();
        assert_eq!(typed.display_name(), "Planning & Design");

        let bare: Phase =
            serde_json::from_str(r#"{"_id": "p3", "project_id": "pr", "order": 4}"#).unwrap();
        assert_eq!(bare.display_name(), "Phase 4");
    }

    #[test]
    fn test_task_ongoing_classification() {
        assert!(TaskStatus::Pending.is_ongoing());
        assert!(TaskStatus::InProgress.is_ongoing());
        assert!(TaskStatus::Blocked.is_ongoing());
        assert!(!TaskStatus::Completed.is_ongoing());
        assert!(!TaskStatus::Cancelled.is_ongoing());
    }

    #[test]
    fn test_envelope_with_pagination() {
        #[derive(Debug, Deserialize)]
        struct Payload {
            #[serde(default)]
            projects: Vec<Project>,
            #[serde(default)]
            pagination: Option<Pagination>,
        }

        let raw = r#"{
            "success": true,
            "data": {
                "projects": [
                    {"_id": "pr1", "customer_id": "c1", "project_type": "villa", "status": "active"}
                ],
                "pagination": {"total": 42, "page": 1, "limit": 10}
            }
        }"#;
        let envelope: Envelope<Payload> = serde_json::from_str(raw).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.projects.len(), 1);
        assert_eq!(envelope.data.projects[0].customer_id.id(), "c1");
        assert_eq!(envelope.data.pagination.unwrap().total, 42);
    }
}
