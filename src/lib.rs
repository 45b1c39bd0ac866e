pub mod common;
pub mod editor;
pub mod errors;
pub mod export;
pub mod generate_commands;
pub mod graph;
pub mod services;
pub mod snapshot;
pub mod tracker;
pub mod tracker_execution;
pub mod zone;
