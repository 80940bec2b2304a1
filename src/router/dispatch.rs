use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use tracing::{debug, trace};

use super::{Error, Handler, Middleware, PatternCache, Result, Route};
use crate::{
    decode,
    http::{Reply, Request, Response},
    utils::Also,
    Config,
};

/// A frozen route table, ready to answer requests.
///
/// Cloning is cheap and clones share the same routes, so one router can
/// serve any number of concurrent dispatches.
#[derive(Clone)]
pub struct Router(Arc<Inner>);

struct Inner {
    config: Config,
    routes: Box<[Route]>,
    patterns: PatternCache,
}

impl Router {
    pub(crate) fn new(config: Config, routes: Vec<Route>, patterns: PatternCache) -> Self {
        Self(Arc::new(Inner {
            config,
            routes: routes.into_boxed_slice(),
            patterns,
        }))
    }

    pub fn config(&self) -> &Config {
        &self.0.config
    }

    pub fn routes(&self) -> &[Route] {
        &self.0.routes
    }

    pub fn patterns(&self) -> &PatternCache {
        &self.0.patterns
    }

    /// Routes `request` through every matching middleware, in registration
    /// order, until one of them answers.
    ///
    /// Returns the first reply, or `Ok(None)` when a middleware wrote to
    /// `response` itself. Fails with [`Error::NotFound`] when nothing
    /// answered, and with the middleware's own error when one fails.
    pub async fn dispatch(
        &self,
        request: &mut Request,
        response: &mut Response,
    ) -> Result<Option<Reply>> {
        debug!(method = %request.method, url = %request.url, "-->");
        let result = match self.execute(request, response, false).await {
            Ok(Outcome::Answered(reply)) => Ok(reply),
            Ok(Outcome::Unanswered) => Err(Error::not_found(&request.method, &request.url)),
            Err(error) => Err(error),
        };
        result.also(|result| {
            debug!(
                answered = matches!(result, Ok(Some(_))),
                sent = response.headers_sent(),
                failed = result.is_err(),
                "<--"
            )
        })
    }

    async fn execute(
        &self,
        request: &mut Request,
        response: &mut Response,
        nested: bool,
    ) -> Result<Outcome> {
        let (middlewares, params) = self.collect(request);
        if middlewares.is_empty() {
            return Ok(unanswered(response));
        }

        if !nested || !request.is_decoded() {
            decode::decode(request, &self.0.config).await?;
        }
        if nested {
            for (name, value) in params {
                request.params.entry(name).or_insert(value);
            }
        } else {
            request.params = params;
        }

        for middleware in middlewares {
            debug!(middleware = middleware.name(), "-->");
            let reply = middleware
                .call(request, response)
                .await
                .also(|result| debug!(middleware = middleware.name(), response = ?result, "<--"))?;
            if response.headers_sent() {
                return Ok(Outcome::Answered(None));
            }
            if reply.is_some() {
                return Ok(Outcome::Answered(reply));
            }
        }
        Ok(unanswered(response))
    }

    /// Middlewares of every route matching `request`, and the path params
    /// captured on the way. The first route to capture a name keeps it.
    fn collect(&self, request: &Request) -> (Vec<&Handler>, HashMap<String, String>) {
        let mut middlewares = Vec::new();
        let mut params = HashMap::new();
        for route in self.0.routes.iter() {
            if !route.method.matches(&request.method) {
                continue;
            }
            if let Some(pattern) = route.pattern() {
                let Some(captures) = pattern.captures(&request.url) else {
                    continue;
                };
                trace!(method = %route.method, path = ?route.path, "route matched");
                for (name, value) in captures {
                    params
                        .entry(name.to_string())
                        .or_insert_with(|| value.to_string());
                }
            }
            middlewares.extend(route.middlewares());
        }
        (middlewares, params)
    }
}

/// How a chain ended. `Unanswered` becomes [`Error::NotFound`] at the top
/// level and lets the outer chain continue when the router is nested.
enum Outcome {
    Answered(Option<Reply>),
    Unanswered,
}

fn unanswered(response: &Response) -> Outcome {
    if response.headers_sent() {
        Outcome::Answered(None)
    } else {
        Outcome::Unanswered
    }
}

/// A router used inside another chain keeps the outer params, reuses the
/// already decoded body and lets the chain continue when none of its routes
/// answered. Errors raised by its middlewares pass through unchanged.
#[async_trait]
impl Middleware for Router {
    async fn call(
        &self,
        request: &mut Request,
        response: &mut Response,
    ) -> Result<Option<Reply>> {
        match self.execute(request, response, true).await? {
            Outcome::Answered(reply) => Ok(reply),
            Outcome::Unanswered => Ok(None),
        }
    }

    fn name(&self) -> &str {
        "router"
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.0.config)
            .field("routes", &self.0.routes)
            .finish()
    }
}
