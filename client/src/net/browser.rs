//! Browser implementations of the session collaborators.
//!
//! Client-side (csr): `localStorage` via `web-sys`, HTTP via `gloo-net`.
//! Native builds (tests, tooling): storage reports `Unavailable` and the
//! transport fails every request, so the session core sees a logged-out
//! visitor instead of a panic.
//!
//! ERROR HANDLING
//! ==============
//! Every web API failure is mapped into the session crate's error types;
//! nothing here panics.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;

use session::{ApiConfig, HttpRequest, HttpResponse, KeyValueStorage, StorageError, Transport, TransportError};

/// `window.localStorage`, looked up on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "csr")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

#[cfg(feature = "csr")]
fn js_message(value: &wasm_bindgen::JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?
                .get_item(key)
                .map_err(|e| StorageError::Read(js_message(&e)))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?
                .set_item(key, value)
                .map_err(|e| StorageError::Write { key: key.to_owned(), message: js_message(&e) })
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| StorageError::Write { key: key.to_owned(), message: js_message(&e) })
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }
}

/// `fetch`-backed transport resolving request paths against the API base URL.
#[derive(Clone, Debug)]
pub struct FetchTransport {
    config: ApiConfig,
}

impl FetchTransport {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn url(&self, request: &HttpRequest) -> String {
        self.config.url(&request.path)
    }
}

impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::Request;
            use session::Method;

            let url = self.url(&request);
            let mut builder = match request.method {
                Method::Get => Request::get(&url),
                Method::Post => Request::post(&url),
                Method::Put => Request::put(&url),
                Method::Patch => Request::patch(&url),
                Method::Delete => Request::delete(&url),
            };
            for (name, value) in request.headers() {
                builder = builder.header(name, value);
            }
            let outgoing = match &request.body {
                Some(body) => builder.json(body),
                None => builder.build(),
            }
            .map_err(|e| TransportError(e.to_string()))?;

            let resp = outgoing.send().await.map_err(|e| TransportError(e.to_string()))?;
            let mut response = HttpResponse::new(resp.status());
            for (name, value) in resp.headers().entries() {
                response = response.with_header(&name, value);
            }
            let text = resp.text().await.map_err(|e| TransportError(e.to_string()))?;
            Ok(response.with_raw_body(&text))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(TransportError(format!("fetch unavailable for {}", self.url(&request))))
        }
    }
}

/// `window.location.origin`, or an empty string outside the browser.
pub fn current_origin() -> String {
    #[cfg(feature = "csr")]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }
    #[cfg(not(feature = "csr"))]
    {
        String::new()
    }
}
