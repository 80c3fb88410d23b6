//! Client library for the evdb events/venues REST+XML API.
//!
//! The service exposes named methods under `<api_root>/rest/<method>`; every
//! request is an HTTP POST whose arguments are form-encoded (multipart when a
//! `*_file` upload field is present) and whose response is an XML document
//! decoded into a generic [`XmlValue`] tree. Remote failures arrive as an
//! error envelope inside an otherwise successful response; the client turns
//! both those and HTTP-level failures into typed [`ApiError`] values and
//! keeps an inspectable last-error record.
//!
//! # Logging in and calling a method
//!
//! ```no_run
//! use evdb_rs::{ClientConfig, Credential, EvdbClient, ForceArray, RequestArgs};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), evdb_rs::ApiError> {
//!     let mut client = EvdbClient::new(ClientConfig::new("my-app-key"))?;
//!
//!     // Two-round digest handshake; the session key it yields is injected
//!     // into every later call.
//!     client
//!         .login("someuser", Credential::Password("secret".into()))
//!         .await?;
//!
//!     let event = client
//!         .call(
//!             "events/get",
//!             RequestArgs::from([("id", "E0-001-000000000-0")]),
//!             ForceArray::Off,
//!         )
//!         .await?;
//!     println!("title: {:?}", event.text_of("title"));
//!     Ok(())
//! }
//! ```
//!
//! # Uploading a file
//!
//! Any argument key ending in `_file` is treated as an upload: its value
//! names a file whose content is sent as a multipart part, while sibling
//! fields ride along as plain form fields.
//!
//! ```no_run
//! # use evdb_rs::{ClientConfig, EvdbClient, ForceArray, RequestArgs};
//! # async fn example(client: &mut EvdbClient) -> Result<(), evdb_rs::ApiError> {
//! let result = client
//!     .call(
//!         "events/images/add",
//!         RequestArgs::from([
//!             ("id", "E0-001-000000000-0"),
//!             ("image_file", "/tmp/flyer.jpg"),
//!         ]),
//!         ForceArray::Off,
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error convention
//!
//! A decoded response carrying a top-level `string` field is a failure no
//! matter the HTTP status; `string` is the machine code and `description`
//! the human text. Branch on the error kind, or read
//! [`EvdbClient::last_error`] after the fact:
//!
//! ```no_run
//! # use evdb_rs::{ApiError, EvdbClient, ForceArray, RequestArgs};
//! # async fn example(client: &mut EvdbClient) -> Result<(), ApiError> {
//! match client
//!     .call("events/get", RequestArgs::from([("id", "nope")]), ForceArray::Off)
//!     .await
//! {
//!     Ok(event) => println!("found {:?}", event.text_of("title")),
//!     Err(ApiError::Remote { code, description }) => {
//!         eprintln!("service said no: {code}: {description}")
//!     }
//!     Err(other) => return Err(other),
//! }
//! # Ok(())
//! # }
//! ```
pub mod common;
pub mod rest;

pub use common::{HttpClient, build_http_client};
pub use rest::{
    ApiError, ArgValue, AuthError, BodyPart, CanonicalArgs, ClientConfig, Credential,
    DEFAULT_API_ROOT, DEFAULT_TIMEOUT, EncodedRequest, ErrorRecord, EvdbClient, ForceArray,
    RequestArgs, USER_AGENT,
    XmlValue, decode_document, encode_request, md5_hex, multipart_body, normalize, url_escape,
    urlencoded_body,
};
