// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Interceptor chain
//!
//! A request flows through the registered interceptors in order and
//! terminates at the [`HttpClient`]. Each link either answers the request
//! itself or hands it to the rest of the chain via [`Chain::proceed`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::http::{HttpClient, Request, Response};

/// A link in the request pipeline
///
/// # Example
///
/// ```rust,no_run
/// use tiirikka::{Chain, Interceptor, Request, Response, Result};
/// use async_trait::async_trait;
///
/// struct RefererInjector;
///
/// #[async_trait]
/// impl Interceptor for RefererInjector {
///     async fn intercept(&self, request: Request, chain: &Chain<'_>) -> Result<Response> {
///         chain.proceed(request.header("referer", "https://example.com/")).await
///     }
/// }
/// ```
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Handle a request: yield a response or delegate to `chain.proceed`
    async fn intercept(&self, request: Request, chain: &Chain<'_>) -> Result<Response>;
}

/// Ordered interceptors terminating at an HTTP client
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
    client: HttpClient,
}

impl InterceptorChain {
    /// Create a chain with no interceptors
    pub fn new(client: HttpClient) -> Self {
        Self {
            interceptors: Vec::new(),
            client,
        }
    }

    /// Add an interceptor after the existing ones
    pub fn add<I: Interceptor + 'static>(&mut self, interceptor: I) {
        self.interceptors.push(Arc::new(interceptor));
    }

    /// Add a shared interceptor after the existing ones
    pub fn add_shared(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    /// Run a request through the chain
    pub async fn execute(&self, request: Request) -> Result<Response> {
        Chain {
            next: &self.interceptors,
            client: &self.client,
        }
        .proceed(request)
        .await
    }

    /// Get the terminal HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Number of registered interceptors
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Check if the chain has no interceptors
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

/// The remainder of a chain, as seen by one interceptor
pub struct Chain<'a> {
    next: &'a [Arc<dyn Interceptor>],
    client: &'a HttpClient,
}

impl<'a> Chain<'a> {
    /// Hand the request to the next link (or the client, at the end)
    pub async fn proceed(&self, request: Request) -> Result<Response> {
        match self.next.split_first() {
            Some((head, rest)) => {
                let chain = Chain {
                    next: rest,
                    client: self.client,
                };
                head.intercept(request, &chain).await
            }
            None => self.client.execute(request).await,
        }
    }
}
