mod rotation;
mod service;
mod slot;

pub use rotation::*;
pub use service::*;
pub use slot::*;
