pub mod chart;
pub mod config;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod sample;
pub mod stats;
pub mod window;
