mod demographic;
mod electoral;
mod registry;
mod updater;
mod value;

pub use registry::UpdaterRegistry;
pub use updater::{FullFn, IncrementalFn, Strategy, Updater};
pub use value::{Shape, Value, Values};
