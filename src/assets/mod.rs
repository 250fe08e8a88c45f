//! Static asset subsystem.
//!
//! # Data Flow
//! ```text
//! Request classified as Dispatch::Static
//!     → resolver.rs (decode, confine to root, directory index)
//!     → Hit: site.rs streams the file via ServeFile (200, 206 or 304)
//!     → Miss: site.rs serves the fallback document, 200
//! ```
//!
//! # Design Decisions
//! - Never 404 and never a directory listing: client-side routes land on
//!   the fallback document
//! - Traversal attempts are misses, logged at warn
//! - Dotfiles are never served

pub mod resolver;
pub mod site;

pub use resolver::{AssetResolver, MissReason, Resolution};
pub use site::StaticSite;
