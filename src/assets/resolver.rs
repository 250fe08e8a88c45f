//! Mapping request paths onto files under the asset root.
//!
//! # Responsibilities
//! - Percent-decode the request path
//! - Reject any `..` component outright
//! - Treat dot-prefixed names (`.env`, `.git/`) as absent
//! - Resolve directories to their index file
//! - Refuse anything whose real path leaves the asset root (symlinks)
//!
//! # Design Decisions
//! - Every failure is a `Miss`; callers serve the fallback document
//! - The root is canonicalized once at startup

use std::fs::Metadata;
use std::io;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use tokio::fs;

use crate::config::AssetsConfig;

/// Why a path did not resolve to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// Nothing exists at the resolved location.
    NotFound,
    /// The path tried to leave the asset root.
    Traversal,
    /// A directory without an index file.
    Directory,
    /// The path is not valid UTF-8 after decoding, or contains NUL.
    Undecodable,
    /// A segment of the path starts with `.`.
    Hidden,
}

/// A file found under the asset root.
#[derive(Debug)]
pub struct Asset {
    pub path: PathBuf,
    pub metadata: Metadata,
}

/// Outcome of resolving a request path.
#[derive(Debug)]
pub enum Resolution {
    Hit(Asset),
    Miss(MissReason),
}

/// Resolves request paths against a fixed asset root.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
    index_file: String,
}

impl AssetResolver {
    /// Create a resolver; fails if the root cannot be canonicalized.
    pub fn from_config(config: &AssetsConfig) -> io::Result<Self> {
        Ok(Self {
            root: config.root.canonicalize()?,
            index_file: config.index_file.clone(),
        })
    }

    /// Canonical asset root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a raw (still percent-encoded) request path.
    pub async fn resolve(&self, raw_path: &str) -> Resolution {
        let Ok(decoded) = percent_decode_str(raw_path).decode_utf8() else {
            return Resolution::Miss(MissReason::Undecodable);
        };
        if decoded.contains('\0') {
            return Resolution::Miss(MissReason::Undecodable);
        }

        let mut candidate = self.root.clone();
        for component in Path::new(&*decoded).components() {
            match component {
                Component::Normal(segment) if is_hidden(segment.as_encoded_bytes()) => {
                    return Resolution::Miss(MissReason::Hidden);
                }
                Component::Normal(segment) => candidate.push(segment),
                Component::ParentDir => return Resolution::Miss(MissReason::Traversal),
                Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            }
        }

        let Ok(mut metadata) = fs::metadata(&candidate).await else {
            return Resolution::Miss(MissReason::NotFound);
        };

        if metadata.is_dir() {
            candidate.push(&self.index_file);
            metadata = match fs::metadata(&candidate).await {
                Ok(m) if m.is_file() => m,
                _ => return Resolution::Miss(MissReason::Directory),
            };
        } else if decoded.ends_with('/') {
            // `/app.js/` names a directory that does not exist.
            return Resolution::Miss(MissReason::NotFound);
        }

        if !metadata.is_file() {
            return Resolution::Miss(MissReason::NotFound);
        }

        let Ok(real) = fs::canonicalize(&candidate).await else {
            return Resolution::Miss(MissReason::NotFound);
        };
        // A symlink may land on a dot-prefixed target inside the root.
        match real.strip_prefix(&self.root) {
            Ok(relative) if relative.iter().any(|s| is_hidden(s.as_encoded_bytes())) => {
                Resolution::Miss(MissReason::Hidden)
            }
            Ok(_) => Resolution::Hit(Asset {
                path: real,
                metadata,
            }),
            Err(_) => Resolution::Miss(MissReason::Traversal),
        }
    }
}

fn is_hidden(segment: &[u8]) -> bool {
    segment.first() == Some(&b'.')
}
