pub mod hub;
pub mod ws;

pub use hub::{JobEvent, JobEventHub};
