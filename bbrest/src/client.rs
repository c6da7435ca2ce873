//! HTTP client for the BlueBubbles server REST API.
//!
//! Every call runs the same pipeline: expand the path, append the query
//! string behind the password, encode the body, execute the request on the
//! blocking transport, and decode the response envelope. The async variants
//! run that exact pipeline on tokio's blocking pool.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use bbrest_core::config::{AppConfig, ServerConfig};
use bbrest_core::error::{BbError, BbResult};

use crate::body::Body;
use crate::query::{authenticated_url, QueryParams};
use crate::response::{decode_envelope, PaginationMetadata, ServerResponse};
use crate::transport::HttpTransport;

/// HTTP client for communicating with the BlueBubbles server.
///
/// Cheap to clone; clones share the server address, the password and the
/// underlying connection pool. None of these change after construction.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    /// Server origin; request paths replace its path component.
    server_url: Url,
    /// Sent as the first query parameter of every request.
    password: String,
    transport: HttpTransport,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("server_url", &self.inner.server_url.as_str())
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ApiClient {
    /// Create a new ApiClient from server configuration.
    ///
    /// Both the address and the password must be non-empty; an empty one is
    /// reported as [`BbError::MissingConfig`].
    pub fn new(config: &ServerConfig) -> BbResult<Self> {
        let address = AppConfig::sanitize_server_address(&config.address);
        if address.is_empty() {
            return Err(BbError::MissingConfig("server address".into()));
        }
        if config.password.is_empty() {
            return Err(BbError::MissingConfig("server password".into()));
        }

        let server_url = Url::parse(&address)
            .map_err(|e| BbError::Config(format!("invalid server address {address:?}: {e}")))?;
        if server_url.cannot_be_a_base() {
            return Err(BbError::Config(format!(
                "server address {address:?} cannot carry a path"
            )));
        }

        debug!("api client created for {}", server_url.origin().ascii_serialization());
        Ok(Self {
            inner: Arc::new(ClientInner {
                server_url,
                password: config.password.clone(),
                transport: HttpTransport::new(),
            }),
        })
    }

    /// Shorthand for [`ApiClient::new`] with a bare address and password.
    pub fn from_url(address: &str, password: &str) -> BbResult<Self> {
        Self::new(&ServerConfig::new(address, password))
    }

    /// The sanitized server URL requests are sent to.
    pub fn server_url(&self) -> &Url {
        &self.inner.server_url
    }

    /// Build the full URL for an already-expanded path, including the password.
    pub fn request_url(&self, path: &str, query: &QueryParams) -> Url {
        authenticated_url(&self.inner.server_url, &self.inner.password, path, query)
    }

    /// Run one request synchronously and decode its envelope.
    ///
    /// A non-2xx status with an envelope body is returned as `Ok` with
    /// `error` set. `Err` means no response was read, the body could not be
    /// encoded, or the response could not be decoded.
    ///
    /// # Panics
    ///
    /// Panics when called from inside a tokio runtime, because the blocking
    /// HTTP client cannot run there. Use [`ApiClient::dispatch_async`] or
    /// wrap the call in `tokio::task::spawn_blocking` instead.
    pub fn dispatch<D, M>(&self, request: ApiRequest<'_>) -> BbResult<ServerResponse<D, M>>
    where
        D: DeserializeOwned,
        M: DeserializeOwned,
    {
        let ApiRequest {
            method,
            path,
            query,
            body,
        } = request;
        debug!("{method} {path}");

        let url = self.request_url(&path, &query);
        let body = body.map(Body::encode).transpose()?;
        let raw = self.inner.transport.execute(method, url, body)?;
        decode_envelope(raw)
    }

    /// Run [`ApiClient::dispatch`] on the blocking pool.
    ///
    /// Must be called from within a tokio runtime; otherwise the returned
    /// future resolves to [`BbError::Internal`].
    pub fn dispatch_async<D, M>(&self, request: ApiRequest<'static>) -> ResponseFuture<ServerResponse<D, M>>
    where
        D: DeserializeOwned + Send + 'static,
        M: DeserializeOwned + Send + 'static,
    {
        let client = self.clone();
        spawn_request(move || client.dispatch(request))
    }

    /// Start a call whose payload decodes as `D`.
    pub fn call<'b, D>(&self, method: Method, path: impl Into<String>) -> Call<'_, 'b, D> {
        Call {
            client: self,
            request: ApiRequest::new(method, path),
            _types: PhantomData,
        }
    }

    pub fn get<'b, D>(&self, path: impl Into<String>) -> Call<'_, 'b, D> {
        self.call(Method::GET, path)
    }

    pub fn post<'b, D>(&self, path: impl Into<String>) -> Call<'_, 'b, D> {
        self.call(Method::POST, path)
    }

    pub fn put<'b, D>(&self, path: impl Into<String>) -> Call<'_, 'b, D> {
        self.call(Method::PUT, path)
    }

    pub fn delete<'b, D>(&self, path: impl Into<String>) -> Call<'_, 'b, D> {
        self.call(Method::DELETE, path)
    }

    /// Start a raw GET whose body is returned as bytes instead of an envelope.
    pub fn download(&self, path: impl Into<String>, query: QueryParams) -> Download<'_> {
        Download {
            client: self,
            path: path.into(),
            query,
        }
    }
}

/// One request, independent of the client that sends it.
#[derive(Debug)]
pub struct ApiRequest<'b> {
    pub method: Method,
    /// Path with placeholders already expanded.
    pub path: String,
    pub query: QueryParams,
    pub body: Option<Body<'b>>,
}

impl<'b> ApiRequest<'b> {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Body<'b>) -> Self {
        self.body = Some(body);
        self
    }
}

/// A request bound to a client and to the envelope shape it decodes into.
///
/// `D` is the payload type and `M` the metadata type.
#[must_use = "a call does nothing until it is sent"]
pub struct Call<'c, 'b, D, M = Value> {
    client: &'c ApiClient,
    request: ApiRequest<'b>,
    _types: PhantomData<fn() -> (D, M)>,
}

impl<D, M> fmt::Debug for Call<'_, '_, D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call").field("request", &self.request).finish()
    }
}

impl<'c, 'b, D, M> Call<'c, 'b, D, M> {
    /// Replace the query parameters.
    pub fn query(mut self, query: QueryParams) -> Self {
        self.request.query = query;
        self
    }

    pub fn body(mut self, body: Body<'b>) -> Self {
        self.request.body = Some(body);
        self
    }

    /// Decode `metadata` as pagination info.
    pub fn paged(self) -> Call<'c, 'b, D, PaginationMetadata> {
        Call {
            client: self.client,
            request: self.request,
            _types: PhantomData,
        }
    }

    pub fn request(&self) -> &ApiRequest<'b> {
        &self.request
    }

    pub fn into_request(self) -> ApiRequest<'b> {
        self.request
    }

    /// Send the request on the current thread.
    ///
    /// # Panics
    ///
    /// Panics when called from inside a tokio runtime, because the blocking
    /// HTTP client cannot run there. Use `send_async` or wrap the call in
    /// `tokio::task::spawn_blocking` instead.
    pub fn send(self) -> BbResult<ServerResponse<D, M>>
    where
        D: DeserializeOwned,
        M: DeserializeOwned,
    {
        self.client.dispatch(self.request)
    }
}

impl<D, M> Call<'_, 'static, D, M>
where
    D: DeserializeOwned + Send + 'static,
    M: DeserializeOwned + Send + 'static,
{
    /// Send the request without blocking the caller.
    pub fn send_async(self) -> ResponseFuture<ServerResponse<D, M>> {
        self.client.dispatch_async(self.request)
    }
}

/// A raw GET download.
#[derive(Debug)]
#[must_use = "a download does nothing until it is sent"]
pub struct Download<'c> {
    client: &'c ApiClient,
    path: String,
    query: QueryParams,
}

impl Download<'_> {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Fetch the bytes on the current thread.
    ///
    /// # Panics
    ///
    /// Panics when called from inside a tokio runtime, because the blocking
    /// HTTP client cannot run there. Use `send_async` or wrap the call in
    /// `tokio::task::spawn_blocking` instead.
    pub fn send(self) -> BbResult<Vec<u8>> {
        debug!("GET (download) {}", self.path);
        let url = self.client.request_url(&self.path, &self.query);
        self.client.inner.transport.fetch_bytes(url)
    }

    pub fn send_async(self) -> ResponseFuture<Vec<u8>> {
        let Download {
            client,
            path,
            query,
        } = self;
        let client = client.clone();
        spawn_request(move || {
            Download {
                client: &client,
                path,
                query,
            }
            .send()
        })
    }
}

/// Future returned by the async variants; resolves to what the blocking
/// variant returns for the same request.
///
/// Dropping it does not stop a request that has already started.
#[must_use = "futures do nothing unless awaited"]
pub struct ResponseFuture<T> {
    state: FutureState<T>,
}

enum FutureState<T> {
    Running(JoinHandle<BbResult<T>>),
    Failed(Option<BbError>),
}

impl<T> fmt::Debug for ResponseFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            FutureState::Running(_) => "running",
            FutureState::Failed(_) => "failed",
        };
        f.debug_struct("ResponseFuture").field("state", &state).finish()
    }
}

impl<T> Future for ResponseFuture<T> {
    type Output = BbResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            FutureState::Running(handle) => Pin::new(handle).poll(cx).map(|joined| {
                joined.unwrap_or_else(|e| Err(BbError::Internal(format!("request worker failed: {e}"))))
            }),
            FutureState::Failed(err) => Poll::Ready(Err(err
                .take()
                .unwrap_or_else(|| BbError::Internal("future polled after completion".into())))),
        }
    }
}

fn spawn_request<T, F>(work: F) -> ResponseFuture<T>
where
    F: FnOnce() -> BbResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = match Handle::try_current() {
        Ok(handle) => FutureState::Running(handle.spawn_blocking(work)),
        Err(e) => FutureState::Failed(Some(BbError::Internal(format!(
            "async request needs a tokio runtime: {e}"
        )))),
    };
    ResponseFuture { state }
}
