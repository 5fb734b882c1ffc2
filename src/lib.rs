pub mod error;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod process;
