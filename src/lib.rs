pub mod app;
pub mod config;
pub mod error;
pub mod frames;
pub mod generators;
pub mod maze;
pub mod solvers;

pub use error::{MazeError, Result};
