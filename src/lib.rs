//! Property datatype registry
//!
//! Resolves the declared datatype of a knowledge-base property (`P31` is an
//! item, `P625` a globe coordinate, ...) for serializers that need to know
//! how to render a statement's value.
//!
//! ## Architecture
//!
//! ```text
//! PropertyTypes::get_type("P2044")
//!         │
//!         ├─► cache hit (seed snapshot, earlier lookup, set_type) ──► datatype
//!         │
//!         └─► RemoteResolver::resolve
//!                 │
//!                 ├─► WebResourceFetcher::fetch(wbgetentities URL)
//!                 ├─► entities.P2044.datatype  ("quantity")
//!                 └─► DatatypeId::Quantity ──► cached, returned
//! ```
//!
//! Failures never reach the caller: they are logged and the datatype is
//! reported as unknown. `export_snapshot` writes the cache back out in the
//! seed format so the seed can be refreshed without code changes.

pub mod config;
pub mod datatype;
pub mod error;
pub mod fetcher;
pub mod property_id;
pub mod registry;
pub mod resolver;
pub mod snapshot;
pub mod value;

pub use config::RegistryConfig;
pub use datatype::DatatypeId;
pub use error::{FetchError, PropertyIdError, ResolveError, SnapshotError};
pub use fetcher::{HttpFetcher, OfflineFetcher, WebResourceFetcher};
pub use property_id::PropertyId;
pub use registry::{PropertyTypes, TypeLookup};
pub use resolver::RemoteResolver;
pub use value::{Value, ValueKind};
