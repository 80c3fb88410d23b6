pub mod http;

pub use http::{HttpClient, build_http_client};
