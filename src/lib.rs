pub mod algorithm;
pub mod common;
pub mod config;
pub mod experiment;
pub mod frontier;
pub mod heuristic;
pub mod level;
pub mod solver;
pub mod stat;
