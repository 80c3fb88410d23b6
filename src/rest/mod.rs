pub mod args;
pub mod client;
pub mod encode;
pub mod error;
pub mod types;
pub mod xml;

pub use args::{ArgValue, CanonicalArgs, RequestArgs, normalize};
pub use client::{DEFAULT_TIMEOUT, EvdbClient, USER_AGENT, md5_hex};
pub use encode::{BodyPart, EncodedRequest, encode_request, multipart_body, url_escape, urlencoded_body};
pub use error::{ApiError, AuthError, ErrorRecord};
pub use types::{ClientConfig, Credential, DEFAULT_API_ROOT};
pub use xml::{ForceArray, XmlValue, decode_document};
