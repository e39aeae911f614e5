//! Tessera API Client

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API Client for Tessera
pub struct TesseraClient {
    client: Client,
    base_url: String,
}

// ============================================
// API Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UserListResponse {
    pub items: Vec<UserResponse>,
    pub offset: u64,
    pub limit: u32,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct CreateUserRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateUserRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
}

impl TesseraClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    /// List Users
    pub async fn list_users(&self, offset: u64, limit: u32) -> Result<UserListResponse> {
        let resp = self
            .client
            .get(self.url("/tessera/users"))
            .query(&[("offset", offset.to_string()), ("limit", limit.to_string())])
            .send()
            .await
            .context("Failed to connect to Tessera API")?;

        Self::parse(resp).await
    }

    /// Get a specific User
    pub async fn get_user(&self, id: Uuid) -> Result<UserResponse> {
        let resp = self
            .client
            .get(self.url(&format!("/tessera/users/{id}")))
            .send()
            .await
            .context("Failed to connect to Tessera API")?;

        Self::parse(resp).await
    }

    /// Create a User
    pub async fn create_user(&self, name: &str, email: &str) -> Result<UserResponse> {
        let resp = self
            .client
            .post(self.url("/tessera/users"))
            .json(&CreateUserRequest { name, email })
            .send()
            .await
            .context("Failed to connect to Tessera API")?;

        Self::parse(resp).await
    }

    /// Update a User's name and/or email
    pub async fn update_user(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<UserResponse> {
        let resp = self
            .client
            .put(self.url(&format!("/tessera/users/{id}")))
            .json(&UpdateUserRequest { name, email })
            .send()
            .await
            .context("Failed to connect to Tessera API")?;

        Self::parse(resp).await
    }

    /// Deactivate or activate a User
    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<UserResponse> {
        let action = if active { "activate" } else { "deactivate" };
        let resp = self
            .client
            .post(self.url(&format!("/tessera/users/{id}/{action}")))
            .send()
            .await
            .context("Failed to connect to Tessera API")?;

        Self::parse(resp).await
    }

    /// Delete a User
    pub async fn delete_user(&self, id: Uuid) -> Result<()> {
        let resp = self
            .client
            .delete(self.url(&format!("/tessera/users/{id}")))
            .send()
            .await
            .context("Failed to connect to Tessera API")?;

        let _: serde_json::Value = Self::parse(resp).await?;
        Ok(())
    }
}
