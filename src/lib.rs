//! An in-process key/value storage engine on an open-addressed, linearly
//! probed hash table with SipHash-2-4 indexing.
//!
//! ```
//! use probekv::Engine;
//!
//! let engine = Engine::init(16)?;
//! engine.put(b"language", b"rust")?;
//! assert_eq!(engine.get(b"language")?, b"rust");
//! engine.delete(b"language")?;
//! assert!(engine.get(b"language").is_err());
//! # Ok::<(), probekv::Error>(())
//! ```

mod bucket;
pub mod config;
mod engine;
mod error;
mod keys;
mod resize;
mod siphash;
mod table;

pub use engine::{Engine, Stats};
pub use error::{Error, Result};
