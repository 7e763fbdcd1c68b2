//! Backend access for Dock.
//!
//! Every remote interaction goes through the [`DockBackend`] trait. Two
//! implementations are provided:
//!
//! - [`HttpBackend`] talks to the real REST backend over `reqwest`.
//! - [`InMemoryBackend`] is a scriptable stand-in for tests and offline
//!   demos: seeded manifests, server-side duplicate rejection, injected
//!   failures, and artificial latency.

pub mod backend;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod memory;

pub use backend::DockBackend;
pub use endpoint::Endpoint;
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;
pub use memory::{Failure, InMemoryBackend};
