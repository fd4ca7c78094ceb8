//! # sqlcache Codec
//!
//! Payload serializers for cached query results.
//!
//! - [`JsonSerializer`]: self-describing text, readable with any Redis client
//! - [`BincodeSerializer`]: compact binary, smaller and faster to decode
//! - [`Codec`]: runtime choice between the two, driven by [`SerializerKind`]
//!
//! ## Example
//!
//! ```rust
//! use sqlcache_codec::{Codec, SerializerKind};
//! use sqlcache_core::Serializer;
//!
//! let codec = Codec::from(SerializerKind::Bincode);
//! let bytes = codec.serialize(&vec![1u32, 2, 3]).unwrap();
//! let back: Vec<u32> = codec.deserialize(&bytes).unwrap();
//! assert_eq!(back, vec![1, 2, 3]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod binary;
mod codec;
mod json;

pub use binary::BincodeSerializer;
pub use codec::{Codec, SerializerKind};
pub use json::JsonSerializer;

// Re-export the trait from core
pub use sqlcache_core::traits::Serializer;
