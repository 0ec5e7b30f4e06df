use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::datetime::format_vips_date;
use super::schedule::ScheduleData;
use super::status::{StatusData, VipsResponse};
use super::VipsError;
use crate::config::VipsConfig;
use crate::review::PresentationType;

/// Joins path segments onto the VIPS root URL.
pub fn build_endpoint(root: &str, segments: &[&str]) -> String {
    let mut endpoint = root.trim_end_matches('/').to_string();
    for segment in segments {
        endpoint.push('/');
        endpoint.push_str(segment);
    }
    endpoint
}

/// Read-only client for the VIPS case-management API.
#[derive(Debug, Clone)]
pub struct VipsClient {
    http: reqwest::Client,
    config: VipsConfig,
}

impl VipsClient {
    pub fn new(config: VipsConfig) -> Result<Self, VipsError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub async fn health(&self) -> Result<Value, VipsError> {
        let endpoint = self.endpoint(&["api", "utility", "ping"]);
        self.get(endpoint, None).await
    }

    pub async fn status(
        &self,
        prohibition_number: &str,
        correlation_id: &str,
    ) -> Result<VipsResponse<StatusData>, VipsError> {
        let endpoint = self.endpoint(&[prohibition_number, "status", correlation_id]);
        self.get(endpoint, Some(correlation_id)).await
    }

    pub async fn disclosure(
        &self,
        document_id: &str,
        correlation_id: &str,
    ) -> Result<VipsResponse<Value>, VipsError> {
        let endpoint = self.endpoint(&[document_id, "disclosure", correlation_id]);
        self.get(endpoint, Some(correlation_id)).await
    }

    pub async fn payment_status(
        &self,
        prohibition_number: &str,
        correlation_id: &str,
    ) -> Result<VipsResponse<Value>, VipsError> {
        let endpoint = self.endpoint(&[prohibition_number, "payment", "status", correlation_id]);
        self.get(endpoint, Some(correlation_id)).await
    }

    /// Review slots VIPS can offer on one day.
    pub async fn schedule(
        &self,
        notice_type: &str,
        presentation: PresentationType,
        review_date: NaiveDate,
        correlation_id: &str,
    ) -> Result<VipsResponse<ScheduleData>, VipsError> {
        let date = format_vips_date(review_date);
        let endpoint = self.endpoint(&[
            notice_type,
            presentation.code(),
            date.as_str(),
            "review",
            "availableTimeSlot",
            correlation_id,
        ]);
        self.get(endpoint, Some(correlation_id)).await
    }

    fn endpoint(&self, segments: &[&str]) -> String {
        build_endpoint(&self.config.api_root_url, segments)
    }

    // VIPS answers "not found" with a 404 that still carries the `fail` envelope.
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: String,
        correlation_id: Option<&str>,
    ) -> Result<T, VipsError> {
        debug!(%endpoint, correlation_id, "querying VIPS");

        let response = self
            .http
            .get(&endpoint)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            warn!(%endpoint, status = status.as_u16(), correlation_id, "VIPS request unsuccessful");
            return Err(VipsError::Unsuccessful {
                endpoint,
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_endpoint_joins_segments() {
        let root = "https://someserver.gov.bc.ca/endpoint";
        assert_eq!(
            build_endpoint(root, &["1234", "status"]),
            "https://someserver.gov.bc.ca/endpoint/1234/status"
        );
        assert_eq!(
            build_endpoint("https://someserver.gov.bc.ca/endpoint/", &["api", "utility", "ping"]),
            "https://someserver.gov.bc.ca/endpoint/api/utility/ping"
        );
        assert_eq!(build_endpoint(root, &[]), root);
    }
}
