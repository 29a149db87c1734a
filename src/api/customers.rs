//! Customer admin endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};
use crate::types::{Customer, Pagination};

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerPage {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Fields for creating or updating a customer. `None` fields are omitted so
/// partial updates leave the rest of the record untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ApiClient {
    pub async fn list_customers(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<CustomerPage, ApiError> {
        let search: String = url::form_urlencoded::byte_serialize(search.as_bytes()).collect();
        let path = format!("/admin/customers?page={page}&limit={limit}&search={search}");
        let envelope = self.request_empty::<CustomerPage>(Method::GET, &path).await?;
        Ok(envelope.data)
    }

    pub async fn get_customer(&self, id: &str) -> Result<Customer, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            customer: Customer,
        }

        let envelope = self
            .request_empty::<Data>(Method::GET, &format!("/admin/customers/{id}"))
            .await?;
        Ok(envelope.data.customer)
    }

    pub async fn create_customer(&self, input: &CustomerInput) -> Result<Customer, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            customer: Customer,
        }

        let envelope = self
            .request::<Data>(Method::POST, "/admin/customers", Some(input))
            .await?;
        Ok(envelope.data.customer)
    }

    pub async fn update_customer(&self, id: &str, input: &CustomerInput) -> Result<(), ApiError> {
        self.request_ack(Method::PUT, &format!("/admin/customers/{id}"), Some(input))
            .await
    }

    pub async fn delete_customer(&self, id: &str) -> Result<(), ApiError> {
        self.request_ack_empty(Method::DELETE, &format!("/admin/customers/{id}"))
            .await
    }

    pub async fn set_customer_password(&self, id: &str, password: &str) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            password: &'a str,
        }

        self.request_ack(
            Method::PUT,
            &format!("/admin/customers/{id}/set-password"),
            Some(&Body { password }),
        )
        .await
    }
}
