pub mod dispatch;
pub mod method;
pub mod middleware;
pub mod pattern;
pub mod table;

use std::fmt::Display;

use http::{Method, StatusCode};
use tokio::io;

pub use dispatch::Router;
pub use method::RouteMethod;
pub use middleware::{Declaration, Handler, Middleware};
pub use pattern::{CompiledPattern, PatternCache};
pub use table::{Route, RouteTable};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// No middleware answered the request.
    NotFound { method: Method, url: String },
    PayloadTooLarge { limit: usize },
    /// A middleware failed; carried unchanged to the dispatch caller.
    Handler(anyhow::Error),
    Io(io::Error),
    Pattern(regex::Error),
    MethodNotAccepted(RouteMethod),
    Config(String),
    AlreadySent,
}

impl Error {
    pub fn new<S: AsRef<str>>(message: S) -> Self {
        Self::Handler(anyhow::anyhow!(message.as_ref().to_string()))
    }

    pub fn not_found(method: &Method, url: &str) -> Self {
        Self::NotFound {
            method: method.clone(),
            url: url.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Status code a transport adapter should answer with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Io(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        Self::Handler(value)
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<regex::Error> for Error {
    fn from(value: regex::Error) -> Self {
        Self::Pattern(value)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { method, url } => {
                write!(f, "The url {url} requested by {method}, wasn't found")
            }
            Self::PayloadTooLarge { limit } => {
                write!(f, "Request body exceeds the limit of {limit} bytes")
            }
            Self::Handler(error) => error.fmt(f),
            Self::Io(error) => write!(f, "Io({error})"),
            Self::Pattern(error) => write!(f, "Invalid route pattern: {error}"),
            Self::MethodNotAccepted(method) => {
                write!(f, "Method {method} is not accepted by this router")
            }
            Self::Config(message) => write!(f, "Invalid configuration: {message}"),
            Self::AlreadySent => "Response was already sent".fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Handler(error) => Some(error.as_ref()),
            Self::Io(error) => Some(error),
            Self::Pattern(error) => Some(error),
            _ => None,
        }
    }
}
