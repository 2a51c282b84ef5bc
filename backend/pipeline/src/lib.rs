//! Transfer pipeline: fetch, filter, download and upload media items with a
//! bounded hand-off between the download and upload stages.

pub mod duplicates;
pub mod existing;
pub mod pipeline;
pub mod sink;
pub mod skip;
pub mod staging;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use duplicates::NoDuplicateIndex;
pub use existing::ExistingItems;
pub use pipeline::Pipeline;
pub use sink::{Callbacks, SinkFanout};
pub use skip::SkipPolicy;
pub use staging::{PendingTransfer, StagedFile};
pub use stats::Stats;
