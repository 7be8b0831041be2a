//! Chain configuration lookup and read-only contract enumeration.
//!
//! [`ChainReader`] performs the supply-enumeration scan against the Pin Save
//! contract on a supported chain: one `totalSupply()` call, then
//! `tokenURI(id)` for every id from the supply down to 1.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod abi;
mod config;
mod reader;

pub use config::{resolve_chain_config, supported_chains};
pub use reader::{ChainReader, ChainReaderConfig};
