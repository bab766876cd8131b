pub mod cache;
pub mod client;
pub mod normalize;
pub mod transport;

pub use cache::{CacheKey, TranslationCache};
pub use normalize::normalize;
pub use client::{TranslateError, TranslationClient};
pub use transport::{HttpTransport, TranslateRequest, TranslationTransport, TransportError};
