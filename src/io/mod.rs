//! Loaders for dual graphs and initial plans.

mod assignment;
mod csv;
mod json;

pub use assignment::{Assignment, DistrictLabels};
pub use csv::read_assignment_csv;
pub use json::{parse_dual_graph, read_dual_graph};
