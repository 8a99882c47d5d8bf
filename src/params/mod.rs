pub mod store;
pub mod types;

pub use store::{ParameterSet, ParameterStore};
pub use types::{ChatParameter, ParameterRange};
