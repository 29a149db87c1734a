//! Meeting endpoints. Listing is paginated per project; the aggregator
//! combines pages across a customer's projects.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};
use crate::types::{ActionItem, Attendee, Meeting, Pagination};

#[derive(Debug, Clone, Deserialize)]
pub struct MeetingPage {
    #[serde(default)]
    pub meetings: Vec<Meeting>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MeetingInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attendees: Vec<Attendee>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub action_items: Vec<ActionItem>,
}

impl ApiClient {
    pub async fn list_meetings(
        &self,
        project_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<MeetingPage, ApiError> {
        let envelope = self
            .request_empty::<MeetingPage>(
                Method::GET,
                &format!("/projects/{project_id}/meetings?page={page}&limit={limit}"),
            )
            .await?;
        Ok(envelope.data)
    }

    pub async fn get_meeting(&self, id: &str) -> Result<Meeting, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            meeting: Meeting,
        }

        let envelope = self
            .request_empty::<Data>(Method::GET, &format!("/meetings/{id}"))
            .await?;
        Ok(envelope.data.meeting)
    }

    pub async fn create_meeting(&self, input: &MeetingInput) -> Result<Meeting, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            meeting: Meeting,
        }

        let envelope = self
            .request::<Data>(Method::POST, "/meetings", Some(input))
            .await?;
        Ok(envelope.data.meeting)
    }

    pub async fn update_meeting(&self, id: &str, input: &MeetingInput) -> Result<(), ApiError> {
        self.request_ack(Method::PUT, &format!("/meetings/{id}"), Some(input))
            .await
    }

    pub async fn delete_meeting(&self, id: &str) -> Result<(), ApiError> {
        self.request_ack_empty(Method::DELETE, &format!("/meetings/{id}"))
            .await
    }

    pub async fn link_meeting_document(
        &self,
        meeting_id: &str,
        document_id: &str,
    ) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            document_id: &'a str,
        }

        self.request_ack(
            Method::POST,
            &format!("/meetings/{meeting_id}/documents"),
            Some(&Body { document_id }),
        )
        .await
    }

    pub async fn unlink_meeting_document(
        &self,
        meeting_id: &str,
        document_id: &str,
    ) -> Result<(), ApiError> {
        self.request_ack_empty(
            Method::DELETE,
            &format!("/meetings/{meeting_id}/documents/{document_id}"),
        )
        .await
    }
}
