//! Core codec module
//!
//! This module contains the record processing components:
//! - `delimiter` - Parsing and serialization of the three-tier grammar
//! - `address` - 1-based positional extraction
//! - `projector` - Typed projection with lenient coercion
//! - `codec` - read / project / update orchestration
//! - `traits` - Storage seam used by the codec
//! - `async` - tokio facade for concurrent callers

pub mod address;
pub mod r#async;
pub mod codec;
pub mod delimiter;
pub mod projector;
pub mod traits;

pub use codec::LegacyCodec;
pub use projector::TypeProjector;
pub use r#async::AsyncLegacyCodec;
pub use traits::RecordStore;
