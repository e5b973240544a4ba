pub mod cycle_guard;

pub use cycle_guard::*;
