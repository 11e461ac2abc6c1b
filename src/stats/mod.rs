mod ensemble;

pub use ensemble::{Ensemble, Report, Summary};
