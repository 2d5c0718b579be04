pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod effect;
pub mod error;
pub mod git;
pub mod issue;
pub mod manifest;
pub mod ui;

pub use effect::EffectMode;
pub use error::{ReleaseError, Result};
