//! `reqwest` implementation of the session transport.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::time::Duration;

use session::{ApiConfig, HttpRequest, HttpResponse, Method, Transport, TransportError};

pub struct ReqwestTransport {
    client: reqwest::Client,
    config: ApiConfig,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns the builder error when the TLS backend cannot be initialized.
    pub fn new(config: ApiConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn url(&self, request: &HttpRequest) -> String {
        self.config.url(&request.path)
    }
}

fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.url(&request);
        let mut builder = self.client.request(method(request.method), &url);
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| TransportError(e.to_string()))?;
        let mut response = HttpResponse::new(resp.status().as_u16());
        for (name, value) in resp.headers() {
            match value.to_str() {
                Ok(value) => response = response.with_header(name.as_str(), value),
                Err(_) => tracing::debug!(header = %name, "skipping non-ASCII header"),
            }
        }
        let text = resp.text().await.map_err(|e| TransportError(e.to_string()))?;
        Ok(response.with_raw_body(&text))
    }
}
