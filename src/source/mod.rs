pub mod cached;
pub mod http;
pub mod static_source;
pub mod trait_def;

pub use cached::{CachedEventSource, FetchStatus};
pub use http::HttpEventSource;
pub use static_source::StaticEventSource;
pub use trait_def::{EventSource, SourceError, SourceResult};
