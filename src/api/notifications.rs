//! Notification endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};
use crate::types::{Notification, Pagination};

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationPage {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<String>,
}

impl ApiClient {
    pub async fn list_notifications(
        &self,
        customer_id: Option<&str>,
        page: u32,
        limit: u32,
        read: Option<bool>,
    ) -> Result<NotificationPage, ApiError> {
        let mut path = format!("/notifications?page={page}&limit={limit}");
        if let Some(customer_id) = customer_id {
            path.push_str(&format!("&customer_id={customer_id}"));
        }
        if let Some(read) = read {
            path.push_str(&format!("&read={read}"));
        }
        let envelope = self
            .request_empty::<NotificationPage>(Method::GET, &path)
            .await?;
        Ok(envelope.data)
    }

    pub async fn create_notification(
        &self,
        input: &NotificationInput,
    ) -> Result<Notification, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            notification: Notification,
        }

        let envelope = self
            .request::<Data>(Method::POST, "/notifications", Some(input))
            .await?;
        Ok(envelope.data.notification)
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<(), ApiError> {
        self.request_ack_empty(Method::PUT, &format!("/notifications/{id}/read"))
            .await
    }

    pub async fn mark_all_notifications_read(
        &self,
        customer_id: Option<&str>,
    ) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            customer_id: &'a str,
        }

        match customer_id {
            Some(customer_id) => {
                self.request_ack(
                    Method::PUT,
                    "/notifications/read-all",
                    Some(&Body { customer_id }),
                )
                .await
            }
            None => {
                self.request_ack_empty(Method::PUT, "/notifications/read-all")
                    .await
            }
        }
    }

    pub async fn delete_notification(&self, id: &str) -> Result<(), ApiError> {
        self.request_ack_empty(Method::DELETE, &format!("/notifications/{id}"))
            .await
    }

    /// Purge every notification belonging to a customer.
    pub async fn delete_customer_notifications(&self, customer_id: &str) -> Result<(), ApiError> {
        self.request_ack_empty(Method::DELETE, &format!("/notifications/customer/{customer_id}"))
            .await
    }
}
