pub mod batch;
pub mod queue;

pub use batch::{Batch, BatchTrigger};
pub use queue::EntryQueue;
