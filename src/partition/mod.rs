mod contiguity;
mod cut_edges;
mod flip;
mod partition;
mod partition_set;

pub(self) use cut_edges::CutEdgeSet;
pub(self) use partition_set::PartitionSet;
pub use flip::{Flip, NodeMove};
pub use partition::Partition;
