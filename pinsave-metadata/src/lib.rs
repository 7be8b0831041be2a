//! Metadata resolution: token URI → gateway URL → parsed post metadata.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod resolver;

pub use resolver::{rewrite_gateway_url, MetadataFragment, MetadataResolver, ResolverConfig};
