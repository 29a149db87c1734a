//! Crew (phase contact) endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};
use crate::types::CrewMember;

#[derive(Debug, Clone, Deserialize)]
struct CrewListData {
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CrewInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub contact_role: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

impl CrewInput {
    /// Client-side pre-submission check mirroring the form validation: a
    /// contact without a role is meaningless to the crew view.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.contact_role.iter().all(|r| r.trim().is_empty()) {
            return Err(ApiError::Validation(
                "Please enter at least one role".to_string(),
            ));
        }
        Ok(())
    }
}

impl ApiClient {
    pub async fn list_project_crew(&self, project_id: &str) -> Result<Vec<CrewMember>, ApiError> {
        let envelope = self
            .request_empty::<CrewListData>(Method::GET, &format!("/projects/{project_id}/crew"))
            .await?;
        Ok(envelope.data.crew)
    }

    pub async fn list_phase_crew(&self, phase_id: &str) -> Result<Vec<CrewMember>, ApiError> {
        let envelope = self
            .request_empty::<CrewListData>(Method::GET, &format!("/phases/{phase_id}/crew"))
            .await?;
        Ok(envelope.data.crew)
    }

    pub async fn add_crew_member(
        &self,
        phase_id: &str,
        input: &CrewInput,
    ) -> Result<CrewMember, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            crew: CrewMember,
        }

        input.validate()?;
        let envelope = self
            .request::<Data>(Method::POST, &format!("/phases/{phase_id}/crew"), Some(input))
            .await?;
        Ok(envelope.data.crew)
    }

    pub async fn update_crew_member(&self, id: &str, input: &CrewInput) -> Result<(), ApiError> {
        input.validate()?;
        self.request_ack(Method::PUT, &format!("/crew/{id}"), Some(input))
            .await
    }

    pub async fn delete_crew_member(&self, id: &str) -> Result<(), ApiError> {
        self.request_ack_empty(Method::DELETE, &format!("/crew/{id}"))
            .await
    }
}
