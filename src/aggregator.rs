//! Cross-entity aggregation.
//!
//! The backend exposes flat, parent-scoped list endpoints with no joins, and
//! its `customer_id` filter on `/projects` does not work. Every scoped view
//! is therefore rebuilt client-side: fetch a broad page of projects,
//! re-filter by normalized customer id, then fan out per project for phases,
//! tasks, documents, and meetings. A failed branch contributes nothing and is
//! logged; partial results always beat a blank view.
//!
//! This whole module is a compensation layer. Once the server filters
//! reliably, [`Aggregator::customer_projects`] collapses to a single call and
//! the rest of the fan-out shrinks with it; callers only see the view
//! structs, so nothing above this seam changes.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::api::meetings::MeetingPage;
use crate::api::projects::ProjectPage;
use crate::api::{ApiClient, ApiError};
use crate::types::{Document, Meeting, Phase, PhaseStatus, Project, Task};

/// Bucket key for documents whose phase cannot be resolved.
pub const UNASSIGNED_PHASE: &str = "unassigned";

/// Practical "all projects" page size; no customer has anywhere near this.
const PROJECT_SCAN_LIMIT: u32 = 100;

/// Fixed page size for the combined meeting view.
pub const MEETING_PAGE_SIZE: u32 = 20;

/// Everything the aggregator needs from the backend. [`ApiClient`] is the
/// production source; tests substitute fixtures.
#[async_trait]
pub trait ProjectData: Send + Sync {
    async fn fetch_projects(
        &self,
        page: u32,
        limit: u32,
        customer_id: Option<&str>,
    ) -> Result<ProjectPage, ApiError>;
    async fn fetch_phases(&self, project_id: &str) -> Result<Vec<Phase>, ApiError>;
    async fn fetch_tasks(&self, phase_id: &str) -> Result<Vec<Task>, ApiError>;
    async fn fetch_documents(&self, project_id: &str) -> Result<Vec<Document>, ApiError>;
    async fn fetch_meetings(
        &self,
        project_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<MeetingPage, ApiError>;
}

#[async_trait]
impl ProjectData for ApiClient {
    async fn fetch_projects(
        &self,
        page: u32,
        limit: u32,
        customer_id: Option<&str>,
    ) -> Result<ProjectPage, ApiError> {
        self.list_projects(page, limit, customer_id, None).await
    }

    async fn fetch_phases(&self, project_id: &str) -> Result<Vec<Phase>, ApiError> {
        self.list_phases(project_id).await
    }

    async fn fetch_tasks(&self, phase_id: &str) -> Result<Vec<Task>, ApiError> {
        self.list_tasks(phase_id, None, None).await
    }

    async fn fetch_documents(&self, project_id: &str) -> Result<Vec<Document>, ApiError> {
        self.list_documents(project_id).await
    }

    async fn fetch_meetings(
        &self,
        project_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<MeetingPage, ApiError> {
        self.list_meetings(project_id, page, limit).await
    }
}

// ---------------------------------------------------------------------------
// View structs
// ---------------------------------------------------------------------------

/// A phase tagged with the project it was fetched through, for grouping
/// after the fan-out flattens project boundaries.
#[derive(Debug, Clone)]
pub struct TaggedPhase {
    pub phase: Phase,
    pub project_id: String,
    pub project_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TaggedDocument {
    pub document: Document,
    pub project_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TaggedMeeting {
    pub meeting: Meeting,
    pub project_type: Option<String>,
}

/// Documents for one customer, grouped by effective phase.
#[derive(Debug, Default)]
pub struct DocumentLibrary {
    pub projects: Vec<Project>,
    /// Deduplicated by phase id; ordered by first sighting, tagged by the
    /// last.
    pub phases: Vec<TaggedPhase>,
    /// Keyed by effective phase id or [`UNASSIGNED_PHASE`].
    pub by_phase: HashMap<String, Vec<TaggedDocument>>,
}

impl DocumentLibrary {
    pub fn total_documents(&self) -> usize {
        self.by_phase.values().map(Vec::len).sum()
    }
}

/// One combined meeting page across all of a customer's projects.
///
/// The combined page count is `ceil(sum(per-project totals) / page_size)`.
/// This is an approximation: page boundaries do not align across projects,
/// so a given combined page can hold more or fewer than `page_size` items.
/// True cross-project pagination needs a server-side join that does not
/// exist.
#[derive(Debug, Default)]
pub struct MeetingBoard {
    pub meetings: Vec<TaggedMeeting>,
    pub phases: Vec<TaggedPhase>,
    pub page: u32,
    pub combined_total: u64,
    pub total_pages: u64,
}

/// Keyword search hits across the customer's projects, documents, and
/// meetings. A linear scan per invocation; nothing is indexed.
#[derive(Debug, Default)]
pub struct SearchResults {
    pub projects: Vec<Project>,
    pub documents: Vec<Document>,
    pub meetings: Vec<Meeting>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.projects.len() + self.documents.len() + self.meetings.len()
    }
}

/// Dashboard summary for one project.
#[derive(Debug)]
pub struct ProjectOverview {
    pub project: Project,
    pub phases: Vec<Phase>,
    pub ongoing_phases: Vec<Phase>,
    pub ongoing_tasks: Vec<Task>,
    pub meetings: Vec<Meeting>,
    /// First in-progress phase, else the last phase.
    pub current_phase: Option<Phase>,
    /// `round(100 * completed phases / phases)`; 0 when there are no phases.
    pub completion_percentage: u8,
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

pub struct Aggregator<'a, S: ProjectData + ?Sized> {
    source: &'a S,
}

impl<'a, S: ProjectData + ?Sized> Aggregator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// All projects belonging to `customer_id`.
    ///
    /// The `customer_id` query parameter is sent but not trusted: the result
    /// is re-filtered on the normalized customer reference, which arrives
    /// either as a bare id or an embedded object depending on whether the
    /// server populated it.
    pub async fn customer_projects(&self, customer_id: &str) -> Result<Vec<Project>, ApiError> {
        let page = self
            .source
            .fetch_projects(1, PROJECT_SCAN_LIMIT, Some(customer_id))
            .await?;
        Ok(page
            .projects
            .into_iter()
            .filter(|p| p.customer_id.id() == customer_id)
            .collect())
    }

    /// Phases for every project, tagged with their owner. A project whose
    /// phase fetch fails is skipped, not fatal.
    pub async fn phase_fan_out(&self, projects: &[Project]) -> Vec<TaggedPhase> {
        let mut tagged = Vec::new();
        for project in projects {
            match self.source.fetch_phases(&project.id).await {
                Ok(phases) => tagged.extend(phases.into_iter().map(|phase| TaggedPhase {
                    phase,
                    project_id: project.id.clone(),
                    project_type: project.project_type.clone(),
                })),
                Err(err) => {
                    log::warn!("skipping phases for project {}: {}", project.id, err);
                }
            }
        }
        tagged
    }

    /// The customer's documents grouped by effective phase.
    pub async fn document_library(&self, customer_id: &str) -> Result<DocumentLibrary, ApiError> {
        let projects = self.customer_projects(customer_id).await?;

        let mut phases: Vec<TaggedPhase> = Vec::new();
        let mut by_phase: HashMap<String, Vec<TaggedDocument>> = HashMap::new();

        for project in &projects {
            match self.source.fetch_phases(&project.id).await {
                Ok(project_phases) => {
                    phases.extend(project_phases.into_iter().map(|phase| TaggedPhase {
                        phase,
                        project_id: project.id.clone(),
                        project_type: project.project_type.clone(),
                    }));
                }
                Err(err) => {
                    log::warn!("skipping phases for project {}: {}", project.id, err);
                }
            }

            match self.source.fetch_documents(&project.id).await {
                Ok(documents) => {
                    for document in documents {
                        let bucket = document
                            .effective_phase_id()
                            .unwrap_or(UNASSIGNED_PHASE)
                            .to_string();
                        by_phase.entry(bucket).or_default().push(TaggedDocument {
                            document,
                            project_type: project.project_type.clone(),
                        });
                    }
                }
                Err(err) => {
                    log::warn!("skipping documents for project {}: {}", project.id, err);
                }
            }
        }

        Ok(DocumentLibrary {
            projects,
            phases: dedup_phases(phases),
            by_phase,
        })
    }

    /// One combined meeting page across the customer's projects; see
    /// [`MeetingBoard`] for the pagination caveat.
    pub async fn meeting_board(&self, customer_id: &str, page: u32) -> Result<MeetingBoard, ApiError> {
        let projects = self.customer_projects(customer_id).await?;

        let mut phases: Vec<TaggedPhase> = Vec::new();
        let mut meetings: Vec<TaggedMeeting> = Vec::new();
        let mut combined_total: u64 = 0;

        for project in &projects {
            match self.source.fetch_phases(&project.id).await {
                Ok(project_phases) => {
                    phases.extend(project_phases.into_iter().map(|phase| TaggedPhase {
                        phase,
                        project_id: project.id.clone(),
                        project_type: project.project_type.clone(),
                    }));
                }
                Err(err) => {
                    log::warn!("skipping phases for project {}: {}", project.id, err);
                }
            }

            match self
                .source
                .fetch_meetings(&project.id, page, MEETING_PAGE_SIZE)
                .await
            {
                Ok(meeting_page) => {
                    if let Some(pagination) = &meeting_page.pagination {
                        combined_total += pagination.total;
                    }
                    meetings.extend(meeting_page.meetings.into_iter().map(|meeting| {
                        TaggedMeeting {
                            meeting,
                            project_type: project.project_type.clone(),
                        }
                    }));
                }
                Err(err) => {
                    log::warn!("skipping meetings for project {}: {}", project.id, err);
                }
            }
        }

        let total_pages = combined_total.div_ceil(u64::from(MEETING_PAGE_SIZE));
        Ok(MeetingBoard {
            meetings,
            phases: dedup_phases(phases),
            page,
            combined_total,
            total_pages,
        })
    }

    /// Case-insensitive substring search over a fixed field set per entity:
    /// project type/description/status, document name/type/status, meeting
    /// title/description/summary.
    pub async fn search(&self, customer_id: &str, query: &str) -> Result<SearchResults, ApiError> {
        let keyword = query.to_lowercase();
        let projects = self.customer_projects(customer_id).await?;

        let matching_projects: Vec<Project> = projects
            .iter()
            .filter(|p| {
                contains_ci(p.project_type.as_deref(), &keyword)
                    || contains_ci(p.project_description.as_deref(), &keyword)
                    || contains_ci(p.status.as_deref(), &keyword)
            })
            .cloned()
            .collect();

        let mut documents = Vec::new();
        for project in &projects {
            match self.source.fetch_documents(&project.id).await {
                Ok(project_documents) => documents.extend(project_documents),
                Err(err) => {
                    log::warn!("search: skipping documents for project {}: {}", project.id, err);
                }
            }
        }
        let matching_documents: Vec<Document> = documents
            .into_iter()
            .filter(|d| {
                contains_ci(d.document_name.as_deref(), &keyword)
                    || contains_ci(d.document_type.as_deref(), &keyword)
                    || contains_ci(d.status.as_deref(), &keyword)
            })
            .collect();

        let mut meetings = Vec::new();
        for project in &projects {
            match self
                .source
                .fetch_meetings(&project.id, 1, MEETING_PAGE_SIZE)
                .await
            {
                Ok(meeting_page) => meetings.extend(meeting_page.meetings),
                Err(err) => {
                    log::warn!("search: skipping meetings for project {}: {}", project.id, err);
                }
            }
        }
        let matching_meetings: Vec<Meeting> = meetings
            .into_iter()
            .filter(|m| {
                contains_ci(m.title.as_deref(), &keyword)
                    || contains_ci(m.description.as_deref(), &keyword)
                    || contains_ci(m.summary.as_deref(), &keyword)
            })
            .collect();

        Ok(SearchResults {
            projects: matching_projects,
            documents: matching_documents,
            meetings: matching_meetings,
        })
    }

    /// Dashboard: one summary per project. A project whose children cannot
    /// be fetched gets an empty summary instead of poisoning the page.
    pub async fn overview(&self, customer_id: &str) -> Result<Vec<ProjectOverview>, ApiError> {
        let projects = self.customer_projects(customer_id).await?;
        let mut overviews = Vec::with_capacity(projects.len());

        for project in projects {
            overviews.push(self.project_overview(project).await);
        }
        Ok(overviews)
    }

    async fn project_overview(&self, project: Project) -> ProjectOverview {
        let phases = match self.source.fetch_phases(&project.id).await {
            Ok(phases) => phases,
            Err(err) => {
                log::warn!("overview: no data for project {}: {}", project.id, err);
                return ProjectOverview {
                    project,
                    phases: Vec::new(),
                    ongoing_phases: Vec::new(),
                    ongoing_tasks: Vec::new(),
                    meetings: Vec::new(),
                    current_phase: None,
                    completion_percentage: 0,
                };
            }
        };

        let mut tasks = Vec::new();
        for phase in &phases {
            match self.source.fetch_tasks(&phase.id).await {
                Ok(phase_tasks) => tasks.extend(phase_tasks),
                Err(err) => {
                    log::warn!("overview: skipping tasks for phase {}: {}", phase.id, err);
                }
            }
        }

        let meetings = match self
            .source
            .fetch_meetings(&project.id, 1, MEETING_PAGE_SIZE)
            .await
        {
            Ok(page) => page.meetings,
            Err(err) => {
                log::warn!("overview: skipping meetings for project {}: {}", project.id, err);
                Vec::new()
            }
        };

        let ongoing_phases: Vec<Phase> = phases
            .iter()
            .filter(|p| p.status == PhaseStatus::InProgress)
            .cloned()
            .collect();
        let ongoing_tasks: Vec<Task> = tasks
            .into_iter()
            .filter(|t| t.status.is_ongoing())
            .collect();

        let completed = phases
            .iter()
            .filter(|p| p.status == PhaseStatus::Completed)
            .count();
        let completion_percentage = if phases.is_empty() {
            0
        } else {
            ((completed as f64 / phases.len() as f64) * 100.0).round() as u8
        };

        let current_phase = ongoing_phases
            .first()
            .cloned()
            .or_else(|| phases.last().cloned());

        ProjectOverview {
            project,
            phases,
            ongoing_phases,
            ongoing_tasks,
            meetings,
            current_phase,
            completion_percentage,
        }
    }
}

/// Drop repeated phase ids. The same phase can arrive twice when fan-out
/// paths overlap; the grouped view must list it once. Position follows the
/// first occurrence, the tags follow the last one.
fn dedup_phases(phases: Vec<TaggedPhase>) -> Vec<TaggedPhase> {
    let mut order: Vec<String> = Vec::new();
    let mut by_id: HashMap<String, TaggedPhase> = HashMap::new();
    for tagged in phases {
        if !by_id.contains_key(&tagged.phase.id) {
            order.push(tagged.phase.id.clone());
        }
        by_id.insert(tagged.phase.id.clone(), tagged);
    }
    order.into_iter().filter_map(|id| by_id.remove(&id)).collect()
}

fn contains_ci(haystack: Option<&str>, needle_lower: &str) -> bool {
    match haystack {
        Some(text) => text.to_lowercase().contains(needle_lower),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pagination;
    use serde_json::json;
    use std::collections::HashSet;

    #[derive(Default)]
    struct StubSource {
        projects: Vec<Project>,
        phases: HashMap<String, Vec<Phase>>,
        tasks: HashMap<String, Vec<Task>>,
        documents: HashMap<String, Vec<Document>>,
        /// (page of meetings, total across all pages)
        meetings: HashMap<String, (Vec<Meeting>, u64)>,
        fail_phases_for: HashSet<String>,
        fail_documents_for: HashSet<String>,
    }

    #[async_trait]
    impl ProjectData for StubSource {
        async fn fetch_projects(
            &self,
            _page: u32,
            _limit: u32,
            _customer_id: Option<&str>,
        ) -> Result<ProjectPage, ApiError> {
            // Models the broken backend: the customer filter is ignored.
            Ok(ProjectPage {
                projects: self.projects.clone(),
                pagination: None,
            })
        }

        async fn fetch_phases(&self, project_id: &str) -> Result<Vec<Phase>, ApiError> {
            if self.fail_phases_for.contains(project_id) {
                return Err(ApiError::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(self.phases.get(project_id).cloned().unwrap_or_default())
        }

        async fn fetch_tasks(&self, phase_id: &str) -> Result<Vec<Task>, ApiError> {
            Ok(self.tasks.get(phase_id).cloned().unwrap_or_default())
        }

        async fn fetch_documents(&self, project_id: &str) -> Result<Vec<Document>, ApiError> {
            if self.fail_documents_for.contains(project_id) {
                return Err(ApiError::Connectivity);
            }
            Ok(self.documents.get(project_id).cloned().unwrap_or_default())
        }

        async fn fetch_meetings(
            &self,
            project_id: &str,
            _page: u32,
            limit: u32,
        ) -> Result<MeetingPage, ApiError> {
            let (meetings, total) = self
                .meetings
                .get(project_id)
                .cloned()
                .unwrap_or((Vec::new(), 0));
            Ok(MeetingPage {
                meetings,
                pagination: Some(Pagination {
                    total,
                    page: 1,
                    limit,
                }),
            })
        }
    }

    fn project(id: &str, customer: serde_json::Value) -> Project {
        serde_json::from_value(json!({
            "_id": id,
            "customer_id": customer,
            "project_type": format!("type-{id}"),
            "status": "active"
        }))
        .unwrap()
    }

    fn phase(id: &str, project_id: &str, status: &str) -> Phase {
        serde_json::from_value(json!({
            "_id": id,
            "project_id": project_id,
            "order": 1,
            "status": status
        }))
        .unwrap()
    }

    fn task(id: &str, phase_id: &str, status: &str) -> Task {
        serde_json::from_value(json!({
            "_id": id,
            "phase_id": phase_id,
            "name": format!("task {id}"),
            "status": status
        }))
        .unwrap()
    }

    fn meeting(id: &str, title: &str) -> Meeting {
        serde_json::from_value(json!({"_id": id, "title": title})).unwrap()
    }

    #[tokio::test]
    async fn test_customer_filter_normalizes_both_reference_shapes() {
        let source = StubSource {
            projects: vec![
                project("p-bare", json!("cust-1")),
                project("p-embedded", json!({"_id": "cust-1", "name": "Asha"})),
                project("p-other", json!("cust-2")),
                project("p-other-embedded", json!({"_id": "cust-2"})),
            ],
            ..StubSource::default()
        };

        let agg = Aggregator::new(&source);
        let projects = agg.customer_projects("cust-1").await.unwrap();
        let ids: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p-bare", "p-embedded"]);
    }

    #[tokio::test]
    async fn test_phase_fan_out_skips_failing_project() {
        let mut source = StubSource {
            projects: vec![project("p1", json!("c1")), project("p2", json!("c1"))],
            ..StubSource::default()
        };
        source
            .phases
            .insert("p1".to_string(), vec![phase("ph1", "p1", "pending")]);
        source
            .phases
            .insert("p2".to_string(), vec![phase("ph2", "p2", "pending")]);
        source.fail_phases_for.insert("p1".to_string());

        let agg = Aggregator::new(&source);
        let projects = agg.customer_projects("c1").await.unwrap();
        let tagged = agg.phase_fan_out(&projects).await;

        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].phase.id, "ph2");
        assert_eq!(tagged[0].project_id, "p2");
        assert_eq!(tagged[0].project_type.as_deref(), Some("type-p2"));
    }

    #[tokio::test]
    async fn test_document_bucketing_fallback_chain() {
        let mut source = StubSource {
            projects: vec![project("p1", json!("c1"))],
            ..StubSource::default()
        };
        source
            .phases
            .insert("p1".to_string(), vec![phase("ph1", "p1", "pending")]);
        source.documents.insert(
            "p1".to_string(),
            vec![
                serde_json::from_value(json!({
                    "_id": "d-populated",
                    "phase_id": {"_id": "ph1", "name": "Onboarding"}
                }))
                .unwrap(),
                serde_json::from_value(json!({"_id": "d-bare", "phase_id": "ph1"})).unwrap(),
                serde_json::from_value(json!({
                    "_id": "d-metadata",
                    "metadata": {"phase_id": "ph-legacy"}
                }))
                .unwrap(),
                serde_json::from_value(json!({"_id": "d-loose", "file_name": "loose.pdf"}))
                    .unwrap(),
            ],
        );

        let agg = Aggregator::new(&source);
        let library = agg.document_library("c1").await.unwrap();

        assert_eq!(library.by_phase["ph1"].len(), 2);
        assert_eq!(library.by_phase["ph-legacy"].len(), 1);
        assert_eq!(library.by_phase["ph-legacy"][0].document.id, "d-metadata");
        assert_eq!(library.by_phase[UNASSIGNED_PHASE].len(), 1);
        assert_eq!(library.total_documents(), 4);
    }

    #[tokio::test]
    async fn test_phases_deduplicated_across_projects() {
        // Two projects report the same phase id; the grouped view must list
        // it once, and distinct ids must all survive.
        let mut source = StubSource {
            projects: vec![project("p1", json!("c1")), project("p2", json!("c1"))],
            ..StubSource::default()
        };
        source.phases.insert(
            "p1".to_string(),
            vec![phase("ph-shared", "p1", "pending"), phase("ph-a", "p1", "pending")],
        );
        source.phases.insert(
            "p2".to_string(),
            vec![phase("ph-shared", "p2", "pending"), phase("ph-b", "p2", "pending")],
        );

        let agg = Aggregator::new(&source);
        let library = agg.document_library("c1").await.unwrap();

        let ids: Vec<&str> = library.phases.iter().map(|t| t.phase.id.as_str()).collect();
        assert_eq!(ids, vec!["ph-shared", "ph-a", "ph-b"]);
        // The shared phase keeps its spot but carries the tags of the last
        // project that reported it.
        assert_eq!(library.phases[0].project_id, "p2");
    }

    #[tokio::test]
    async fn test_document_failure_keeps_other_projects() {
        let mut source = StubSource {
            projects: vec![project("p1", json!("c1")), project("p2", json!("c1"))],
            ..StubSource::default()
        };
        source.documents.insert(
            "p2".to_string(),
            vec![serde_json::from_value(json!({"_id": "d1", "phase_id": "ph2"})).unwrap()],
        );
        source.fail_documents_for.insert("p1".to_string());

        let agg = Aggregator::new(&source);
        let library = agg.document_library("c1").await.unwrap();
        assert_eq!(library.total_documents(), 1);
    }

    #[tokio::test]
    async fn test_combined_meeting_page_count() {
        // Totals 25 and 10 at page size 20 combine to ceil(35/20) = 2 pages.
        let mut source = StubSource {
            projects: vec![project("p1", json!("c1")), project("p2", json!("c1"))],
            ..StubSource::default()
        };
        source.meetings.insert(
            "p1".to_string(),
            (vec![meeting("m1", "Kickoff")], 25),
        );
        source.meetings.insert(
            "p2".to_string(),
            (vec![meeting("m2", "Delivery sync")], 10),
        );

        let agg = Aggregator::new(&source);
        let board = agg.meeting_board("c1", 1).await.unwrap();

        assert_eq!(board.combined_total, 35);
        assert_eq!(board.total_pages, 2);
        assert_eq!(board.meetings.len(), 2);
    }

    #[tokio::test]
    async fn test_search_matches_fixed_fields_case_insensitively() {
        let mut source = StubSource {
            projects: vec![
                serde_json::from_value::<Project>(json!({
                    "_id": "p1",
                    "customer_id": "c1",
                    "project_type": "Villa Renovation",
                    "project_description": "full refit",
                    "status": "active"
                }))
                .unwrap(),
                project("p2", json!("c1")),
            ],
            ..StubSource::default()
        };
        source.documents.insert(
            "p2".to_string(),
            vec![serde_json::from_value(json!({
                "_id": "d1",
                "document_name": "VILLA floor plan",
                "document_type": "drawing",
                "status": "approved"
            }))
            .unwrap()],
        );
        source.meetings.insert(
            "p1".to_string(),
            (vec![meeting("m1", "villa walkthrough")], 1),
        );

        let agg = Aggregator::new(&source);
        let results = agg.search("c1", "ViLLa").await.unwrap();

        assert_eq!(results.projects.len(), 1);
        assert_eq!(results.documents.len(), 1);
        assert_eq!(results.meetings.len(), 1);
        assert_eq!(results.total(), 3);

        // Summary field is searched too.
        let mut with_summary = StubSource {
            projects: vec![project("p1", json!("c1"))],
            ..StubSource::default()
        };
        with_summary.meetings.insert(
            "p1".to_string(),
            (
                vec![serde_json::from_value(json!({
                    "_id": "m2",
                    "title": "weekly",
                    "summary": "Discussed teak sourcing"
                }))
                .unwrap()],
                1,
            ),
        );
        let agg = Aggregator::new(&with_summary);
        let results = agg.search("c1", "teak").await.unwrap();
        assert_eq!(results.meetings.len(), 1);
        assert!(results.projects.is_empty());
    }

    #[tokio::test]
    async fn test_overview_statistics() {
        let mut source = StubSource {
            projects: vec![project("p1", json!("c1"))],
            ..StubSource::default()
        };
        source.phases.insert(
            "p1".to_string(),
            vec![
                phase("ph1", "p1", "completed"),
                phase("ph2", "p1", "in_progress"),
                phase("ph3", "p1", "pending"),
            ],
        );
        source.tasks.insert(
            "ph2".to_string(),
            vec![
                task("t1", "ph2", "pending"),
                task("t2", "ph2", "completed"),
                task("t3", "ph2", "cancelled"),
                task("t4", "ph2", "blocked"),
            ],
        );
        source
            .meetings
            .insert("p1".to_string(), (vec![meeting("m1", "Kickoff")], 1));

        let agg = Aggregator::new(&source);
        let overviews = agg.overview("c1").await.unwrap();
        assert_eq!(overviews.len(), 1);

        let project_view = &overviews[0];
        assert_eq!(project_view.phases.len(), 3);
        assert_eq!(project_view.ongoing_phases.len(), 1);
        assert_eq!(project_view.ongoing_tasks.len(), 2);
        assert_eq!(project_view.meetings.len(), 1);
        // 1 of 3 phases completed.
        assert_eq!(project_view.completion_percentage, 33);
        assert_eq!(
            project_view.current_phase.as_ref().map(|p| p.id.as_str()),
            Some("ph2")
        );
    }

    #[tokio::test]
    async fn test_overview_failed_project_yields_empty_summary() {
        let mut source = StubSource {
            projects: vec![project("p1", json!("c1"))],
            ..StubSource::default()
        };
        source.fail_phases_for.insert("p1".to_string());

        let agg = Aggregator::new(&source);
        let overviews = agg.overview("c1").await.unwrap();
        assert_eq!(overviews.len(), 1);
        assert!(overviews[0].phases.is_empty());
        assert!(overviews[0].current_phase.is_none());
        assert_eq!(overviews[0].completion_percentage, 0);
    }

    #[tokio::test]
    async fn test_current_phase_falls_back_to_last() {
        let mut source = StubSource {
            projects: vec![project("p1", json!("c1"))],
            ..StubSource::default()
        };
        source.phases.insert(
            "p1".to_string(),
            vec![phase("ph1", "p1", "completed"), phase("ph2", "p1", "completed")],
        );

        let agg = Aggregator::new(&source);
        let overviews = agg.overview("c1").await.unwrap();
        assert_eq!(
            overviews[0].current_phase.as_ref().map(|p| p.id.as_str()),
            Some("ph2")
        );
        assert_eq!(overviews[0].completion_percentage, 100);
    }
}
