//! Task endpoints, scoped under a phase for listing and creation.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};
use crate::types::Task;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl ApiClient {
    pub async fn list_tasks(
        &self,
        phase_id: &str,
        status: Option<&str>,
        task_type: Option<&str>,
    ) -> Result<Vec<Task>, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            #[serde(default)]
            tasks: Vec<Task>,
        }

        let mut path = format!("/phases/{phase_id}/tasks");
        let mut params = Vec::new();
        if let Some(status) = status {
            params.push(format!("status={status}"));
        }
        if let Some(task_type) = task_type {
            params.push(format!("type={task_type}"));
        }
        if !params.is_empty() {
            path.push('?');
            path.push_str(&params.join("&"));
        }

        let envelope = self.request_empty::<Data>(Method::GET, &path).await?;
        Ok(envelope.data.tasks)
    }

    pub async fn create_task(&self, phase_id: &str, input: &TaskInput) -> Result<Task, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            task: Task,
        }

        let envelope = self
            .request::<Data>(Method::POST, &format!("/phases/{phase_id}/tasks"), Some(input))
            .await?;
        Ok(envelope.data.task)
    }

    pub async fn update_task(&self, id: &str, input: &TaskInput) -> Result<(), ApiError> {
        self.request_ack(Method::PUT, &format!("/tasks/{id}"), Some(input))
            .await
    }

    /// Dedicated status transition endpoint; the backend runs phase rollup
    /// logic on this path that a plain update skips.
    pub async fn update_task_status(&self, id: &str, status: &str) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            status: &'a str,
        }

        self.request_ack(
            Method::PUT,
            &format!("/tasks/{id}/status"),
            Some(&Body { status }),
        )
        .await
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        self.request_ack_empty(Method::DELETE, &format!("/tasks/{id}"))
            .await
    }
}
