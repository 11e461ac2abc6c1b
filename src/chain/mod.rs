mod chain;
mod config;

pub use chain::{ChainStep, MarkovChain, Phase, Plan};
pub use config::ChainConfig;
