//! Content-addressed binary store
//!
//! Every binary lives at `<base>/binr/.cache/<sha256>`, named after the
//! digest of its own bytes. Entries are written once and never modified, so
//! identical content requested by different namespaces is stored once.
//!
//! # Integrity Model
//!
//! - Downloads land in a `.partial` file inside the store
//! - A published checksum is verified before the rename into place
//! - Without a published checksum the computed digest becomes the name
//! - Unverified partial files are never renamed into the store
//!
//! # Entry States
//!
//! | State | File | Description |
//! |-------|------|-------------|
//! | Partial | `<timestamp>-<id>.partial` | Download in progress or aborted |
//! | Committed | `<sha256>` | Verified, immutable |

pub mod partial;
pub mod store;

pub use partial::Cleanup;
pub use store::{CacheStore, Stored};
