// src/lib.rs
//! Job posting legitimacy checker: presence probing, text heuristics,
//! a small classifier and an optional generative-model narrative, served
//! over a Rocket web UI and a CLI.

pub mod analysis;
pub mod cli;
pub mod core;
pub mod environment;
pub mod utils;
pub mod web;

pub use analysis::{AnalysisReport, AnalysisRequest, JobAnalyzer};
pub use web::{build_rocket, start_web_server};
