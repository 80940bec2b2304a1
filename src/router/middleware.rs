use std::{fmt, sync::Arc};

use async_trait::async_trait;
use futures::future::BoxFuture;

use super::{Result, Router};
use crate::http::{Reply, Request, Response};

/// A step in the chain that answers a request.
///
/// Returning `Ok(Some(reply))`, or writing to the [`Response`] directly,
/// ends the chain. Returning `Ok(None)` hands the request to the next
/// middleware.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn call(&self, request: &mut Request, response: &mut Response)
        -> Result<Option<Reply>>;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

pub type SyncFn = dyn Fn(&mut Request, &mut Response) -> Result<Option<Reply>> + Send + Sync;

struct AsyncFn<F>(F);

#[async_trait]
impl<F> Middleware for AsyncFn<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, Result<Option<Reply>>>
        + Send
        + Sync,
{
    async fn call(
        &self,
        request: &mut Request,
        response: &mut Response,
    ) -> Result<Option<Reply>> {
        (self.0)(request, response).await
    }

    fn name(&self) -> &str {
        std::any::type_name::<F>()
    }
}

#[derive(Clone)]
pub enum Handler {
    Sync(Arc<SyncFn>),
    Async(Arc<dyn Middleware>),
    /// A built router called as one middleware of the chain.
    Router(Router),
}

impl Handler {
    pub fn new<M: Middleware + 'static>(middleware: M) -> Self {
        Self::Async(Arc::new(middleware))
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut Request, &mut Response) -> Result<Option<Reply>> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    pub fn from_async<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, Result<Option<Reply>>>
            + Send
            + Sync
            + 'static,
    {
        Self::Async(Arc::new(AsyncFn(f)))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Sync(_) => "fn",
            Self::Async(middleware) => middleware.name(),
            Self::Router(_) => "router",
        }
    }

    pub async fn call(
        &self,
        request: &mut Request,
        response: &mut Response,
    ) -> Result<Option<Reply>> {
        match self {
            Self::Sync(f) => f(request, response),
            Self::Async(middleware) => middleware.call(request, response).await,
            Self::Router(router) => Middleware::call(router, request, response).await,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.name()).finish()
    }
}

impl From<Router> for Handler {
    fn from(router: Router) -> Self {
        Self::Router(router)
    }
}

/// A single handler or an arbitrarily nested group of handlers.
///
/// ```
/// use micro_router::{chain, Handler};
///
/// let a = Handler::from_fn(|_, _| Ok(None));
/// let b = Handler::from_fn(|_, _| Ok(None));
/// let c = Handler::from_fn(|_, _| Ok(Some("c".into())));
/// assert_eq!(chain![a, [b, [c]]].flatten().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub enum Declaration {
    Leaf(Handler),
    Group(Vec<Declaration>),
}

impl Declaration {
    /// Depth-first, left-to-right list of every handler in the declaration.
    pub fn flatten(self) -> Vec<Handler> {
        let mut handlers = Vec::new();
        self.flatten_into(&mut handlers);
        handlers
    }

    fn flatten_into(self, handlers: &mut Vec<Handler>) {
        match self {
            Self::Leaf(handler) => handlers.push(handler),
            Self::Group(group) => group
                .into_iter()
                .for_each(|declaration| declaration.flatten_into(handlers)),
        }
    }
}

impl From<Handler> for Declaration {
    fn from(handler: Handler) -> Self {
        Self::Leaf(handler)
    }
}

impl From<Router> for Declaration {
    fn from(router: Router) -> Self {
        Self::Leaf(Handler::Router(router))
    }
}

impl<T: Into<Declaration>> From<Vec<T>> for Declaration {
    fn from(group: Vec<T>) -> Self {
        Self::Group(group.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Declaration>, const N: usize> From<[T; N]> for Declaration {
    fn from(group: [T; N]) -> Self {
        Self::Group(group.into_iter().map(Into::into).collect())
    }
}

/// Builds a [`Declaration`] with bracket nesting: `chain![a, [b, [c]], d]`.
///
/// Items are single token trees; wrap closures or longer expressions in
/// parentheses.
#[macro_export]
macro_rules! chain {
    (@item [$($inner:tt),* $(,)?]) => {
        $crate::chain![$($inner),*]
    };
    (@item $handler:expr) => {
        $crate::Declaration::from($handler)
    };
    ($($item:tt),* $(,)?) => {
        $crate::Declaration::Group(vec![$($crate::chain!(@item $item)),*])
    };
}

#[cfg(test)]
mod tests {
    use http::Method;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chain;

    fn named(name: &'static str) -> Handler {
        Handler::from_fn(move |_, _| Ok(Some(Reply::from(name))))
    }

    async fn replies(handlers: Vec<Handler>) -> Vec<Reply> {
        let mut replies = Vec::new();
        for handler in handlers {
            let mut request = Request::new(Method::GET, "/");
            let mut response = Response::new();
            if let Some(reply) = handler.call(&mut request, &mut response).await.unwrap() {
                replies.push(reply);
            }
        }
        replies
    }

    #[tokio::test]
    async fn test_flatten_keeps_order() {
        let declaration = chain![
            (named("h1")),
            [(named("h2")), (named("h3")), [(named("h4"))]],
            (named("h5"))
        ];
        let expected: Vec<Reply> = ["h1", "h2", "h3", "h4", "h5"]
            .into_iter()
            .map(Reply::from)
            .collect();
        assert_eq!(replies(declaration.flatten()).await, expected);
    }

    #[tokio::test]
    async fn test_flatten_is_depth_independent() {
        let nested = chain![(named("a")), [(named("b")), [(named("c"))]]];
        let flat = chain![(named("a")), (named("b")), (named("c"))];
        assert_eq!(
            replies(nested.flatten()).await,
            replies(flat.flatten()).await
        );
    }

    #[test]
    fn test_empty_groups() {
        let declaration = Declaration::from(vec![
            Declaration::Group(vec![]),
            Declaration::from(vec![Declaration::Group(vec![])]),
        ]);
        assert!(declaration.flatten().is_empty());
        assert!(chain![].flatten().is_empty());
    }

    #[tokio::test]
    async fn test_async_handler() {
        let handler = Handler::from_async(|request, _| {
            Box::pin(async move { Ok(Some(Reply::from(request.url.clone()))) })
        });
        assert_eq!(replies(vec![handler]).await, vec![Reply::from("/")]);
    }

    struct Greeter;

    #[async_trait]
    impl Middleware for Greeter {
        async fn call(
            &self,
            _request: &mut Request,
            response: &mut Response,
        ) -> Result<Option<Reply>> {
            response.send(http::StatusCode::OK, "hi")?;
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_middleware_trait() {
        let handler = Handler::new(Greeter);
        assert!(handler.name().ends_with("Greeter"));
        let mut request = Request::new(Method::GET, "/");
        let mut response = Response::new();
        assert_eq!(handler.call(&mut request, &mut response).await.unwrap(), None);
        assert!(response.headers_sent());
    }
}
