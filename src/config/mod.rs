//! Configuration management for the tetromino tiling solver

pub mod settings;

pub use settings::{
    CliOverrides, EncodingConfig, OutputConfig, OutputFormat, PuzzleConfig, Settings, SolverConfig,
};
