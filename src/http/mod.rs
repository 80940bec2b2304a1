pub mod body;
pub mod headers;
pub mod request;
pub mod response;

pub use body::{Body, Reply};
pub use headers::HeaderMapExt;
pub use request::{Payload, Request};
pub use response::Response;
