//! Package reference handling
//!
//! This module parses the references users pass to `relbin install`:
//! - GitHub short-form: `owner/repo`, `@owner/repo`, `github:owner/repo`
//! - With release tag: `owner/repo@v1.0.0`
//! - With tag and asset: `owner/repo@v1.0.0::tool-linux-amd64.tar.gz`
//! - Direct download URLs: `https://example.com/releases/tool.tar.gz`
//!
//! ## Module Organization
//!
//! - `package_ref.rs`: `PackageReference` enum, `GitHubRef` and parsing

pub mod package_ref;

pub use package_ref::PackageReference;
