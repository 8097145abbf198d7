// Library for tests to access modules

pub mod cli;
pub mod config;
pub mod confirm;
pub mod docker_cli;
pub mod docker_repo;
pub mod engine;
pub mod models;
pub mod orchestrator;
pub mod probe;
pub mod report;
pub mod sequencer;
pub mod style;
pub mod units;
