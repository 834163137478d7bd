pub mod annotations;
pub mod definitions;
pub mod engine;
pub mod error;
pub mod history;
pub mod utils;
