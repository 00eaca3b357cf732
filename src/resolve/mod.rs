// src/resolve/mod.rs
//! Cross-file symbol resolution for Java sources.

pub mod context;
pub mod index;
pub mod jdk;
pub mod library;
pub mod scope;

pub use context::{CacheStats, ContextConfig, ContextId, ResolutionContext, ResolutionScope};
pub use index::{DeclId, Declaration, FileId, Library, Origin};
pub use scope::{Missing, Resolution, Resolver};
