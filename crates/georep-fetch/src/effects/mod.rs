//! I/O for blob transfers: filesystem checks, HTTP and the orchestrator that
//! ties them together.

mod downloader;
mod http;
mod preconditions;

pub use downloader::BlobDownloader;
pub use http::{BoxStream, HttpClient, HttpResponse};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
