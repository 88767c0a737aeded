pub mod app;
pub mod cli;
pub mod config;
pub mod csv;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod gate;
pub mod html;
pub mod logging;
pub mod openai;
pub mod pipeline;
pub mod schedule;
pub mod state;
pub mod utils;
pub mod view;
pub mod web;
