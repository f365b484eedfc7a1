pub mod bookkeeper;
pub mod services;

pub use bookkeeper::{Bookkeeper, WriteStatus};
