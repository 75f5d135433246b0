pub mod collector;
pub mod history;
pub mod platform;
pub mod ranker;
pub mod rate;
pub mod sampler;
pub mod snapshot;
pub mod source;
