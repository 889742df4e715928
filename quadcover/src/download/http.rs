//! HTTP client abstraction for testability

use std::time::Duration;

use super::DownloadError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for HTTP client operations.
///
/// The downloader only ever issues GETs, so this is the whole seam
/// between it and the network.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the body.
    ///
    /// Any non-success status is an error.
    fn get(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    fn get(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        (**self).get(url)
    }
}

/// Blocking reqwest client.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, DownloadError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, DownloadError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("quadcover/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DownloadError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| DownloadError::Http(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| DownloadError::Http(format!("Failed to read response: {}", e)))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock HTTP client serving canned bodies by URL.
    ///
    /// Unknown URLs answer 404. Every request is recorded.
    #[derive(Default)]
    pub struct MockHttpClient {
        responses: HashMap<String, Result<Vec<u8>, u16>>,
        requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_body(mut self, url: &str, body: &str) -> Self {
            self.responses
                .insert(url.to_string(), Ok(body.as_bytes().to_vec()));
            self
        }

        pub fn with_status(mut self, url: &str, status: u16) -> Self {
            self.responses.insert(url.to_string(), Err(status));
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.responses.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(DownloadError::Status {
                    status: *status,
                    url: url.to_string(),
                }),
                None => Err(DownloadError::Status {
                    status: 404,
                    url: url.to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_mock_client_success() {
        let mock = MockHttpClient::new().with_body("http://example.com/a", "abc");

        let result = mock.get("http://example.com/a");
        assert_eq!(result.unwrap(), b"abc".to_vec());
        assert_eq!(mock.requests(), vec!["http://example.com/a"]);
    }

    #[test]
    fn test_mock_client_error() {
        let mock = MockHttpClient::new().with_status("http://example.com/b", 503);

        let result = mock.get("http://example.com/b");
        assert!(matches!(
            result,
            Err(DownloadError::Status { status: 503, .. })
        ));
        assert!(mock.get("http://example.com/missing").is_err());
    }

    #[test]
    fn test_reference_forwards() {
        fn fetch<C: HttpClient>(client: C) -> Vec<u8> {
            client.get("u").unwrap()
        }

        let mock = MockHttpClient::new().with_body("u", "x");
        assert_eq!(fetch(&mock), b"x".to_vec());
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::with_timeout(5).is_ok());
    }
}
