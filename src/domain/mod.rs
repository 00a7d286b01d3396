pub mod album;
pub mod change;
