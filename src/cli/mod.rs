//! Workflow layer between argument parsing and the domain logic

pub mod orchestration;

pub use orchestration::{
    BumpArgs, BumpResult, FinishArgs, FinishResult, Releaser, StartArgs, StartResult,
};
