use std::sync::Arc;

use tracing::{trace, warn};

use super::{
    CompiledPattern, Declaration, Error, Handler, PatternCache, Result, RouteMethod, Router,
};
use crate::Config;

/// A registered `(method, path, middlewares)` entry.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: RouteMethod,
    /// Literal pattern as registered; `None` matches every path.
    pub path: Option<String>,
    pattern: Option<Arc<CompiledPattern>>,
    middlewares: Vec<Handler>,
}

impl Route {
    pub fn pattern(&self) -> Option<&CompiledPattern> {
        self.pattern.as_deref()
    }

    pub fn middlewares(&self) -> &[Handler] {
        &self.middlewares
    }
}

/// Build phase of a router: an append-only list of routes.
///
/// Every registration consumes and returns the table so routes can be
/// chained. [`RouteTable::build`] freezes the table into a [`Router`].
///
/// ```
/// use micro_router::{Handler, RouteTable};
///
/// let table = RouteTable::new()
///     .use_(Handler::from_fn(|_, _| Ok(None)))
///     .get("/hello/:name", Handler::from_fn(|request, _| {
///         Ok(request.param("name").map(|name| format!("Hello {name}").into()))
///     }));
/// assert_eq!(table.routes().len(), 2);
/// let router = table.build().unwrap();
/// assert_eq!(router.routes().len(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    config: Config,
    routes: Vec<Route>,
    patterns: PatternCache,
    error: Option<regex::Error>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn patterns(&self) -> &PatternCache {
        &self.patterns
    }

    /// Stores the flattened `declaration` under `(method, path)`.
    ///
    /// A [`Router`] in first position of the declaration is mounted under
    /// `path` (see [`RouteTable::mount`]) instead of being called; the
    /// remaining handlers form the entry. Nothing is stored when no handler
    /// remains.
    pub fn register<D: Into<Declaration>>(
        mut self,
        method: RouteMethod,
        path: Option<&str>,
        declaration: D,
    ) -> Self {
        let mut handlers = declaration.into().flatten();
        if matches!(handlers.first(), Some(Handler::Router(_))) {
            if let Handler::Router(router) = handlers.remove(0) {
                self.mount_routes(path, router.routes().iter().cloned());
            }
        }
        self.push(method, path, handlers);
        self
    }

    pub fn get<D: Into<Declaration>>(self, path: &str, declaration: D) -> Self {
        self.register(RouteMethod::Get, Some(path), declaration)
    }

    pub fn post<D: Into<Declaration>>(self, path: &str, declaration: D) -> Self {
        self.register(RouteMethod::Post, Some(path), declaration)
    }

    pub fn put<D: Into<Declaration>>(self, path: &str, declaration: D) -> Self {
        self.register(RouteMethod::Put, Some(path), declaration)
    }

    pub fn patch<D: Into<Declaration>>(self, path: &str, declaration: D) -> Self {
        self.register(RouteMethod::Patch, Some(path), declaration)
    }

    pub fn delete<D: Into<Declaration>>(self, path: &str, declaration: D) -> Self {
        self.register(RouteMethod::Delete, Some(path), declaration)
    }

    pub fn head<D: Into<Declaration>>(self, path: &str, declaration: D) -> Self {
        self.register(RouteMethod::Head, Some(path), declaration)
    }

    pub fn options<D: Into<Declaration>>(self, path: &str, declaration: D) -> Self {
        self.register(RouteMethod::Options, Some(path), declaration)
    }

    /// Path-less registration: candidates for every request with `method`.
    pub fn on<D: Into<Declaration>>(self, method: RouteMethod, declaration: D) -> Self {
        self.register(method, None, declaration)
    }

    /// Candidates for every request, whatever its method or path.
    pub fn use_<D: Into<Declaration>>(self, declaration: D) -> Self {
        self.register(RouteMethod::Use, None, declaration)
    }

    pub fn use_at<D: Into<Declaration>>(self, path: &str, declaration: D) -> Self {
        self.register(RouteMethod::Use, Some(path), declaration)
    }

    /// Re-registers every route of `table` under `prefix`, keeping its
    /// method. Path-less routes are registered under `prefix*`.
    pub fn mount(mut self, prefix: &str, table: RouteTable) -> Self {
        self.inherit_error(table.error);
        self.mount_routes(Some(prefix), table.routes);
        self
    }

    /// Re-registers every route of `table` as is.
    pub fn merge(mut self, table: RouteTable) -> Self {
        self.inherit_error(table.error);
        self.mount_routes(None, table.routes);
        self
    }

    /// Freezes the table.
    pub fn build(self) -> Result<Router> {
        if let Some(error) = self.error {
            return Err(error.into());
        }
        if let Some(route) = self
            .routes
            .iter()
            .find(|route| !self.config.accepts(route.method))
        {
            return Err(Error::MethodNotAccepted(route.method));
        }
        Ok(Router::new(self.config, self.routes, self.patterns))
    }

    fn mount_routes<I: IntoIterator<Item = Route>>(&mut self, prefix: Option<&str>, routes: I) {
        for route in routes {
            let path = match prefix {
                Some(prefix) => Some(format!(
                    "{prefix}{}",
                    route.path.as_deref().unwrap_or("*")
                )),
                None => route.path,
            };
            self.push(route.method, path.as_deref(), route.middlewares);
        }
    }

    fn push(&mut self, method: RouteMethod, path: Option<&str>, middlewares: Vec<Handler>) {
        if middlewares.is_empty() {
            trace!(method = %method, path = ?path, "no middlewares, route skipped");
            return;
        }
        let pattern = match path {
            Some(path) => match self.patterns.get_or_compile(path) {
                Ok(pattern) => Some(pattern),
                Err(error) => {
                    warn!(method = %method, path, "invalid route pattern: {}", error);
                    self.inherit_error(Some(error));
                    return;
                }
            },
            None => None,
        };
        trace!(method = %method, path = ?path, count = middlewares.len(), "route registered");
        self.routes.push(Route {
            method,
            path: path.map(str::to_string),
            pattern,
            middlewares,
        });
    }

    fn inherit_error(&mut self, error: Option<regex::Error>) {
        if self.error.is_none() {
            self.error = error;
        }
    }
}
