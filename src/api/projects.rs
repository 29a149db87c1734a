//! Project endpoints.
//!
//! The list endpoint accepts a `customer_id` filter but does not apply it
//! reliably; the aggregator re-filters client-side. The parameter is still
//! sent so the seam disappears cleanly once the backend is fixed.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};
use crate::types::{Pagination, Project};

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectPage {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ApiClient {
    pub async fn list_projects(
        &self,
        page: u32,
        limit: u32,
        customer_id: Option<&str>,
        status: Option<&str>,
    ) -> Result<ProjectPage, ApiError> {
        let mut path = format!("/projects?page={page}&limit={limit}");
        if let Some(customer_id) = customer_id {
            path.push_str(&format!("&customer_id={customer_id}"));
        }
        if let Some(status) = status {
            path.push_str(&format!("&status={status}"));
        }
        let envelope = self.request_empty::<ProjectPage>(Method::GET, &path).await?;
        Ok(envelope.data)
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            project: Project,
        }

        let envelope = self
            .request_empty::<Data>(Method::GET, &format!("/projects/{id}"))
            .await?;
        Ok(envelope.data.project)
    }

    pub async fn create_project(&self, input: &ProjectInput) -> Result<Project, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            project: Project,
        }

        let envelope = self
            .request::<Data>(Method::POST, "/projects", Some(input))
            .await?;
        Ok(envelope.data.project)
    }

    pub async fn update_project(&self, id: &str, input: &ProjectInput) -> Result<(), ApiError> {
        self.request_ack(Method::PUT, &format!("/projects/{id}"), Some(input))
            .await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), ApiError> {
        self.request_ack_empty(Method::DELETE, &format!("/projects/{id}"))
            .await
    }
}
