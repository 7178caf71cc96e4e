// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Challenge interceptor
//!
//! The chain link callers install. Decides per request between cached
//! clearance, a fresh solve, and degraded passthrough. `intercept` never
//! fails on its own account: the caller gets a response, or the transport
//! error the unmodified request would have produced anyway.

use std::sync::Arc;

use async_trait::async_trait;

use super::cache::ClearanceCache;
use super::chain::{Chain, Interceptor};
use super::config::BypassConfig;
use super::rebuild::{RequestRebuilder, ResolvedIdentity};
use super::single_flight::HostFlights;
use super::solver::ChallengeSolver;
use crate::browser::{AmbientCookieStore, BrowserEngine};
use crate::error::Result;
use crate::http::{HttpClient, Request, Response};

/// Interceptor that transparently bypasses challenge checkpoints
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tiirikka::{
///     BypassConfig, ChallengeInterceptor, HttpClient, InterceptorChain, Request,
/// };
/// # use tiirikka::{AmbientCookieStore, BrowserEngine};
/// # async fn demo(
/// #     engine: Arc<dyn BrowserEngine>,
/// #     ambient: Arc<dyn AmbientCookieStore>,
/// # ) -> tiirikka::Result<()> {
/// let client = HttpClient::new()?;
/// let mut chain = InterceptorChain::new(client.clone());
/// chain.add(ChallengeInterceptor::new(
///     client,
///     engine,
///     ambient,
///     BypassConfig::default(),
/// ));
///
/// // Challenged hosts are solved transparently
/// let response = chain.execute(Request::get("https://site.example/")?).await?;
/// # Ok(())
/// # }
/// ```
pub struct ChallengeInterceptor {
    cache: Arc<ClearanceCache>,
    rebuilder: RequestRebuilder,
    solver: ChallengeSolver,
    flights: HostFlights,
}

impl ChallengeInterceptor {
    /// Create an interceptor with its own clearance cache
    pub fn new(
        client: HttpClient,
        engine: Arc<dyn BrowserEngine>,
        ambient: Arc<dyn AmbientCookieStore>,
        config: BypassConfig,
    ) -> Self {
        Self::with_cache(client, engine, ambient, config, Arc::new(ClearanceCache::new()))
    }

    /// Create an interceptor writing into an existing cache
    ///
    /// Sharing one cache pools clearances across interceptor instances.
    pub fn with_cache(
        client: HttpClient,
        engine: Arc<dyn BrowserEngine>,
        ambient: Arc<dyn AmbientCookieStore>,
        config: BypassConfig,
        cache: Arc<ClearanceCache>,
    ) -> Self {
        let rebuilder = RequestRebuilder::new(client, ResolvedIdentity::new());
        let solver = ChallengeSolver::new(
            engine,
            ambient,
            cache.clone(),
            rebuilder.clone(),
            Arc::new(config),
        );
        Self {
            cache,
            rebuilder,
            solver,
            flights: HostFlights::new(),
        }
    }

    /// The clearance cache backing this interceptor
    pub fn cache(&self) -> &Arc<ClearanceCache> {
        &self.cache
    }
}

#[async_trait]
impl Interceptor for ChallengeInterceptor {
    async fn intercept(&self, request: Request, chain: &Chain<'_>) -> Result<Response> {
        let Some(host) = request.host().map(str::to_string) else {
            // Nothing to key a clearance on
            return chain.proceed(request).await;
        };

        if let Some(cookies) = self.cache.get(&host) {
            tracing::trace!(host = %host, "clearance cache hit");
            return self.rebuilder.proceed(request, &cookies).await;
        }

        let _flight = self.flights.acquire(&host).await;

        // Another flow may have solved this host while we waited
        if let Some(cookies) = self.cache.get(&host) {
            tracing::trace!(host = %host, "clearance solved by concurrent flow");
            return self.rebuilder.proceed(request, &cookies).await;
        }

        match self.solver.attempt_bypass(&request).await? {
            Some(response) => Ok(response),
            None => {
                tracing::warn!(
                    host = %host,
                    url = %request.url,
                    "challenge bypass failed, passing request through unmodified"
                );
                chain.proceed(request).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{
        MemoryCookieStore, Navigation, NavigationEnd, NavigationHandle, NavigationSignal,
        ObserverVerdict, SubRequestObserver,
    };
    use crate::intercept::chain::InterceptorChain;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{header, header_exists, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn init_logs() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("tiirikka=trace")
            .try_init();
    }

    /// Engine that deposits cookies into the ambient store after a delay,
    /// or holds navigations open forever
    struct ScriptedEngine {
        ambient: Arc<MemoryCookieStore>,
        deposits: Option<String>,
        delay: Duration,
        hold_open: bool,
        navigations: AtomicUsize,
        held: Mutex<Vec<NavigationSignal>>,
    }

    impl ScriptedEngine {
        fn depositing(ambient: Arc<MemoryCookieStore>, raw: &str) -> Self {
            Self {
                ambient,
                deposits: Some(raw.to_string()),
                delay: Duration::ZERO,
                hold_open: false,
                navigations: AtomicUsize::new(0),
                held: Mutex::new(Vec::new()),
            }
        }

        fn never_solving(ambient: Arc<MemoryCookieStore>) -> Self {
            Self {
                deposits: None,
                ..Self::depositing(ambient, "")
            }
        }

        fn holding_open(ambient: Arc<MemoryCookieStore>) -> Self {
            Self {
                hold_open: true,
                ..Self::never_solving(ambient)
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn navigations(&self) -> usize {
            self.navigations.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BrowserEngine for ScriptedEngine {
        async fn user_agent(&self) -> Option<String> {
            Some("Scripted/1.0".to_string())
        }

        async fn navigate(
            &self,
            navigation: Navigation,
            observer: SubRequestObserver,
        ) -> Result<NavigationHandle> {
            self.navigations.fetch_add(1, Ordering::SeqCst);
            let (signal, handle) = NavigationHandle::channel(navigation.url.clone());

            if self.hold_open {
                self.held.lock().push(signal);
                return Ok(handle);
            }

            let ambient = self.ambient.clone();
            let deposits = self.deposits.clone();
            let delay = self.delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Some(raw) = deposits {
                    let host = navigation.url.host_str().unwrap().to_string();
                    ambient.set_raw(host, raw);
                }
                if navigation.observes(&navigation.url)
                    && observer(&navigation.url) == ObserverVerdict::Complete
                {
                    signal.complete(NavigationEnd::ObserverSignalled);
                } else {
                    signal.complete(NavigationEnd::LoadFinished);
                }
            });
            Ok(handle)
        }
    }

    fn host_of(server: &MockServer) -> String {
        Url::parse(&server.uri())
            .unwrap()
            .host_str()
            .unwrap()
            .to_string()
    }

    fn chain_with(engine: Arc<ScriptedEngine>, ambient: Arc<MemoryCookieStore>) -> InterceptorChain {
        chain_with_config(engine, ambient, BypassConfig::default())
    }

    fn chain_with_config(
        engine: Arc<ScriptedEngine>,
        ambient: Arc<MemoryCookieStore>,
        config: BypassConfig,
    ) -> InterceptorChain {
        let client = HttpClient::new().unwrap();
        let mut chain = InterceptorChain::new(client.clone());
        chain.add(ChallengeInterceptor::new(client, engine, ambient, config));
        chain
    }

    #[tokio::test]
    async fn test_fast_path_end_to_end() {
        init_logs();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("cookie", "cf_clearance=abc; other=1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("cleared"))
            .mount(&server)
            .await;
        let host = host_of(&server);

        let ambient = Arc::new(MemoryCookieStore::new());
        ambient.set_raw(host.clone(), "cf_clearance=abc; other=1");
        let engine = Arc::new(ScriptedEngine::never_solving(ambient.clone()));

        let client = HttpClient::new().unwrap();
        let mut chain = InterceptorChain::new(client.clone());
        let interceptor =
            ChallengeInterceptor::new(client, engine.clone(), ambient, BypassConfig::default());
        let cache = interceptor.cache().clone();
        chain.add(interceptor);

        let response = chain
            .execute(Request::get(server.uri()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.text_lossy(), "cleared");
        assert_eq!(engine.navigations(), 0);
        let cookies = cache.get(&host).unwrap();
        assert_eq!(cookies.get("cf_clearance"), Some("abc"));
        assert_eq!(cookies.get("other"), Some("1"));
    }

    #[tokio::test]
    async fn test_cache_hit_never_resolves_again() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let ambient = Arc::new(MemoryCookieStore::new());
        let engine = Arc::new(ScriptedEngine::depositing(
            ambient.clone(),
            "cf_clearance=abc",
        ));
        let chain = chain_with(engine.clone(), ambient);

        for _ in 0..3 {
            let response = chain
                .execute(Request::get(server.uri()).unwrap())
                .await
                .unwrap();
            assert!(response.is_success());
        }
        assert_eq!(engine.navigations(), 1);
    }

    #[tokio::test]
    async fn test_failed_solve_passes_through_unmodified() {
        init_logs();
        let server = MockServer::start().await;
        // Any cookie or user-agent tampering would be caught here
        Mock::given(method("GET"))
            .and(header_exists("cookie"))
            .respond_with(ResponseTemplate::new(500).set_body_string("tampered"))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("blocked"))
            .with_priority(5)
            .mount(&server)
            .await;

        let ambient = Arc::new(MemoryCookieStore::new());
        let engine = Arc::new(ScriptedEngine::never_solving(ambient.clone()));
        let chain = chain_with(engine.clone(), ambient);

        let request = Request::get(server.uri()).unwrap();
        let intercepted = chain.execute(request.clone()).await.unwrap();
        let direct = chain.client().execute(request).await.unwrap();

        assert_eq!(engine.navigations(), 1);
        assert_eq!(intercepted.status_code(), direct.status_code());
        assert_eq!(intercepted.body, direct.body);
        assert_eq!(intercepted.text_lossy(), "blocked");
    }

    #[tokio::test]
    async fn test_single_flight_collapses_concurrent_solves() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let ambient = Arc::new(MemoryCookieStore::new());
        let engine = Arc::new(
            ScriptedEngine::depositing(ambient.clone(), "cf_clearance=abc")
                .with_delay(Duration::from_millis(50)),
        );
        let chain = Arc::new(chain_with(engine.clone(), ambient));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let chain = chain.clone();
            let url = server.uri();
            handles.push(tokio::spawn(async move {
                chain.execute(Request::get(url).unwrap()).await.unwrap()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_success());
        }

        assert_eq!(engine.navigations(), 1);
    }

    #[tokio::test]
    async fn test_hung_engine_degrades_to_passthrough() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("blocked"))
            .mount(&server)
            .await;

        let ambient = Arc::new(MemoryCookieStore::new());
        let engine = Arc::new(ScriptedEngine::holding_open(ambient.clone()));
        let config = BypassConfig::new().solve_timeout(Duration::from_millis(50));
        let chain = chain_with_config(engine.clone(), ambient, config);

        let response = chain
            .execute(Request::get(server.uri()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status_code(), 403);
        assert_eq!(engine.navigations(), 1);
    }

    #[tokio::test]
    async fn test_recovered_user_agent_applies_to_rebuilds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "Scripted/1.0"))
            .and(header("cookie", "cf_clearance=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("as-browser"))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("unexpected"))
            .with_priority(5)
            .mount(&server)
            .await;

        let ambient = Arc::new(MemoryCookieStore::new());
        let engine = Arc::new(ScriptedEngine::depositing(
            ambient.clone(),
            "cf_clearance=abc",
        ));
        let chain = chain_with(engine.clone(), ambient);

        // First call solves, second replays from cache; both must look like
        // the browser that passed the challenge
        for _ in 0..2 {
            let response = chain
                .execute(Request::get(server.uri()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.text_lossy(), "as-browser");
        }
        assert_eq!(engine.navigations(), 1);
    }

    #[tokio::test]
    async fn test_shared_cache_pools_clearances() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;
        let host = host_of(&server);

        let ambient = Arc::new(MemoryCookieStore::new());
        let engine = Arc::new(ScriptedEngine::never_solving(ambient.clone()));
        let cache = Arc::new(ClearanceCache::new());
        cache.put(
            host.as_str(),
            crate::http::cookie::CookieSet::parse("cf_clearance=abc"),
        );

        let client = HttpClient::new().unwrap();
        let mut chain = InterceptorChain::new(client.clone());
        chain.add(ChallengeInterceptor::with_cache(
            client,
            engine.clone(),
            ambient,
            BypassConfig::default(),
            cache,
        ));

        let response = chain
            .execute(Request::get(server.uri()).unwrap())
            .await
            .unwrap();
        assert!(response.is_success());
        // Pre-seeded cache means no solve at all
        assert_eq!(engine.navigations(), 0);
    }
}
