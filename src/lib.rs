//! Request routing library: path patterns, middleware chains and sub-routers.
//!
//! # Example usage
//!
//! ```
//! use http::Method;
//! use micro_router::{Handler, Reply, Request, Response, RouteTable};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> micro_router::Result<()> {
//! micro_router::logging::install();
//!
//! let hello = RouteTable::new()
//!     .get("/:world", Handler::from_fn(|request, _| {
//!         Ok(request.param("world").map(|world| format!("Hello {world}").into()))
//!     }))
//!     .get("/:world/from/:country", Handler::from_fn(|request, _| {
//!         Ok(Some(Reply::Json(json!(request.params))))
//!     }))
//!     .build()?;
//!
//! let router = RouteTable::new()
//!     .get("/", Handler::from_fn(|_, _| Ok(Some("Welcome to micro".into()))))
//!     .use_at("/hello", hello)
//!     .build()?;
//!
//! let mut request = Request::new(Method::GET, "/hello/mike");
//! let reply = router.dispatch(&mut request, &mut Response::new()).await?;
//! assert_eq!(reply, Some(Reply::from("Hello mike")));
//! # Ok(())
//! # }
//! ```
pub mod config;
pub mod decode;
pub mod http;
pub mod logging;
pub mod router;
mod utils;

pub use config::Config;
pub use decode::{Encoding, Limit};
pub use crate::http::{Body, HeaderMapExt, Reply, Request, Response};
pub use router::{
    CompiledPattern, Declaration, Error, Handler, Middleware, PatternCache, Result, Route,
    RouteMethod, RouteTable, Router,
};
