use crate::error::{MpsApiError, Result};
use crate::types::{ErrorResponse, Model};
use reqwest::{Client, RequestBuilder, Response, Url};

const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP client for interacting with the MPS conversion REST API
#[derive(Debug, Clone)]
pub struct MpsClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl MpsClient {
    /// Create a new MPS API client
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the API (e.g., "http://localhost:9000")
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mps_api_sdk::MpsClient;
    ///
    /// let client = MpsClient::new("http://localhost:9000").unwrap();
    /// ```
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new MPS API client with custom reqwest client
    ///
    /// This allows you to configure timeouts, proxies, etc.
    pub fn with_client(base_url: impl AsRef<str>, client: Client) -> Result<Self> {
        let base_url =
            Url::parse(base_url.as_ref()).map_err(|e| MpsApiError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: None,
        })
    }

    /// Set the API key for authentication
    ///
    /// Use this when the API is running in protected mode (PROTECT=true)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mps_api_sdk::MpsClient;
    ///
    /// let client = MpsClient::new("http://localhost:9000")
    ///     .unwrap()
    ///     .with_api_key("your-api-key");
    /// ```
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Check the health of the API server
    pub async fn health_check(&self) -> Result<bool> {
        let response = self.client.get(self.endpoint("/health")?).send().await?;
        Ok(response.status().is_success())
    }

    /// Parse MPS text into a model
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use mps_api_sdk::MpsClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = MpsClient::new("http://localhost:9000")?;
    /// let model = client
    ///     .mps_to_model("NAME demo\nROWS\n N obj\nCOLUMNS\n x obj 1\nENDATA\n")
    ///     .await?;
    /// println!("{} variables", model.variables.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn mps_to_model(&self, mps: impl Into<String>) -> Result<Model> {
        let request = self
            .client
            .post(self.endpoint("/mps-to-model")?)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(mps.into());

        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|e| MpsApiError::ParseError(e.to_string()))
    }

    /// Serialize a model to MPS text
    ///
    /// Models the server cannot express as MPS come back as
    /// [`MpsApiError::ApiError`] with status 422.
    pub async fn model_to_mps(&self, model: &Model) -> Result<String> {
        let request = self.client.post(self.endpoint("/model-to-mps")?).json(model);

        let response = self.send(request).await?;
        response
            .text()
            .await
            .map_err(|e| MpsApiError::ParseError(e.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| MpsApiError::InvalidUrl(e.to_string()))
    }

    async fn send(&self, mut request: RequestBuilder) -> Result<Response> {
        if let Some(ref api_key) = self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(MpsApiError::AuthenticationFailed);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(api_error(status.as_u16(), &error_text))
    }
}

fn api_error(status: u16, body: &str) -> MpsApiError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => MpsApiError::ApiError {
            status,
            code: parsed.code,
            message: parsed.error,
            line: parsed.line,
        },
        Err(_) => MpsApiError::ApiError {
            status,
            code: "UNKNOWN".to_string(),
            message: body.to_string(),
            line: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = MpsClient::new("http://localhost:9000");
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_with_api_key() {
        let client = MpsClient::new("http://localhost:9000")
            .unwrap()
            .with_api_key("test-key");
        assert_eq!(client.api_key, Some("test-key".to_string()));
    }

    #[test]
    fn test_invalid_url() {
        let client = MpsClient::new("not a valid url");
        assert!(client.is_err());
    }

    #[test]
    fn test_api_error_reads_error_body() {
        let err = api_error(
            400,
            r#"{"error": "unknown row `r9`", "code": "MPS_REFERENTIAL", "line": 7}"#,
        );
        assert_eq!(err.code(), Some("MPS_REFERENTIAL"));
        assert!(matches!(err, MpsApiError::ApiError { status: 400, line: Some(7), .. }));
    }

    #[test]
    fn test_api_error_keeps_plain_body() {
        let err = api_error(413, "payload too large");
        match err {
            MpsApiError::ApiError { code, message, .. } => {
                assert_eq!(code, "UNKNOWN");
                assert_eq!(message, "payload too large");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
