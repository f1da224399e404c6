pub mod boards;
pub mod classification;
pub mod constants;
pub mod error;
pub mod types;
