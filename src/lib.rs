#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::similar_names
)]

pub mod capability;
pub mod config;
pub mod evaluation;
pub mod observability;
pub mod scoring;
