//! Phase endpoints. Phases are only listed per project; no batch endpoint
//! exists, hence the aggregator's fan-out.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};
use crate::types::Phase;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PhaseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl ApiClient {
    pub async fn list_phases(&self, project_id: &str) -> Result<Vec<Phase>, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            #[serde(default)]
            phases: Vec<Phase>,
        }

        let envelope = self
            .request_empty::<Data>(Method::GET, &format!("/projects/{project_id}/phases"))
            .await?;
        Ok(envelope.data.phases)
    }

    pub async fn get_phase(&self, id: &str) -> Result<Phase, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            phase: Phase,
        }

        let envelope = self
            .request_empty::<Data>(Method::GET, &format!("/phases/{id}"))
            .await?;
        Ok(envelope.data.phase)
    }

    pub async fn update_phase(&self, id: &str, update: &PhaseUpdate) -> Result<(), ApiError> {
        self.request_ack(Method::PUT, &format!("/phases/{id}"), Some(update))
            .await
    }
}
