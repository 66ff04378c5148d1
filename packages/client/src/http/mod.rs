//! HTTP data model
//!
//! Header container, request descriptor, multipart container and the
//! response envelope shared by every pipeline stage.

pub mod headers;
pub mod multipart;
pub mod request;
pub mod response;

pub use headers::{HeaderError, HeaderMap, canonical_name, content_type, is_json};
pub use multipart::{FormData, Part};
pub use request::{
    Credentials, Progress, ProgressHandler, Query, RequestBody, RequestDescriptor, RequestMode,
    ResponseType,
};
pub use response::{ResponseBody, ResponseEnvelope};
