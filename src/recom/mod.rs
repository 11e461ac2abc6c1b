mod balanced_cut;
mod params;
mod proposal;
mod spanning_tree;

pub use params::RecomParams;
pub use proposal::Recom;
