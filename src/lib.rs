//! Builds a compressed, aggregated review tree out of flat change records and
//! projects it into terminal rows, a CSV export and a progress figure.

#![allow(clippy::enum_variant_names)]

pub mod application;
pub mod cli;
pub mod config;
pub mod export;
pub mod ext;
pub mod pipeline;
pub mod render;
pub mod source;
