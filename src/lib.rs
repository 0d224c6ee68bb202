// Allow dead code for public API functions that may not be used internally
// but are part of the library's exposed interface
#![allow(dead_code)]

pub mod ai;
pub mod batch;
pub mod cascade;
pub mod cli;
pub mod competitor;
pub mod config;
pub mod corrections;
pub mod export;
pub mod logger;
pub mod normalizer;
pub mod overrides;
pub mod rate_limit;
pub mod region;
pub mod registry;
pub mod scorer;
pub mod taxonomy;
pub mod websearch;

pub use cascade::{Cascade, ClassificationResult, ResolutionSource, ResolverState};
pub use config::AppConfig;
