//! Service Layer
//!
//! Filter engines that implement `BloomFilterApi` over the domain core.

pub mod local_filters;
pub mod remote_filter;

pub use local_filters::LocalFilterRegistry;
pub use remote_filter::RemoteBloomFilter;
