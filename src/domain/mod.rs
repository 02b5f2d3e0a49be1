pub mod order;
pub mod signal;

pub use order::*;
pub use signal::*;
