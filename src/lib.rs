pub mod config;
pub mod dataset;
pub mod error;
pub mod fantasy;
pub mod games;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod standings;
pub mod tiers;
