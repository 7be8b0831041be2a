//! Aggregation read path: enumerate on-chain references, resolve each
//! metadata document, and assemble the ordered post list.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod service;

pub use service::{AggregationConfig, AggregationService};
