//! Pure request/response transforms
//!
//! - [`query`]: URL normalisation, path templating and query serialization
//! - [`body`]: request body encoding and content-type negotiation
//! - [`response`]: response payload decoding

pub mod body;
pub mod query;
pub mod response;

pub use body::{encode_body, form_encode};
pub use query::{append_query, encode, expand_path, is_absolute_url, normalize_url, resolve_url, serialize};
pub use response::{decode_body, decode_lossy, transform_response};
