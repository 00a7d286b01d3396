pub mod error;
pub mod fs;
pub mod tags;
