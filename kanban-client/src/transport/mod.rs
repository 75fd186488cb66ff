/// Transports carrying drops to the server
///
/// # Transport Types
///
/// - **Http**: `reqwest` client against the kanban API
/// - **Mock**: In-memory board that records requests and fails on demand
///
/// The session only sees [`BoardTransport`], so the same drop logic runs
/// against a live server or in unit tests.

pub mod http;
pub mod mock;
pub mod transport_trait;

// Re-export main types
pub use http::HttpTransport;
pub use mock::{MockTransport, RecordedRequest};
pub use transport_trait::{BoardTransport, ClientError, ClientResult};
