pub mod config;
pub mod logging;

pub mod classify;
pub mod describe;
pub mod materialize;
pub mod provider;
pub mod reference;
pub mod resolve;
pub mod selection;
