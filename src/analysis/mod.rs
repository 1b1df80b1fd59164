//! Tree traversal and structural search over TypeScript syntax trees.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌────────────┐     ┌──────────────────┐
//! │ SourceSet   │────▶│ ParseCache │────▶│ SourceTree (CST) │
//! └─────────────┘     └────────────┘     └──────────────────┘
//!                                                 │
//!                          ┌──────────────────────┼──────────────────┐
//!                          ▼                      ▼                  ▼
//!                 ┌─────────────────┐   ┌─────────────────┐  ┌──────────────┐
//!                 │ patterns (walk) │   │ query (engine)  │  │ stats (walk) │
//!                 └─────────────────┘   └─────────────────┘  └──────────────┘
//!                          │                      │                  │
//!                          ▼                      ▼                  ▼
//!                      AnalysisReport (path -> [MatchRecord])    Statistics
//! ```

mod cache;
pub mod kinds;
pub mod patterns;
pub mod query;
mod record;
pub mod stats;
pub mod walk;

pub use cache::ParseCache;
pub use kinds::Construct;
pub use patterns::{find_class_definitions, find_function_calls, find_imports};
pub use query::{CompiledQuery, RawCapture};
pub use record::{AnalysisReport, MatchRecord};
pub use stats::{generate_stats, ConstructCounts, Statistics};
pub use walk::{collect_nodes, traverse, Visit};
