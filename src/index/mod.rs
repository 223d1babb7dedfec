pub mod build;
pub mod crawl;
pub mod detect;
pub mod schema;
pub mod stats;
pub mod store;
pub mod sync;
pub mod types;

pub use build::ScanPipeline;
pub use store::ContentStore;
pub use sync::IndexSynchronizer;
pub use types::*;
