//! Deployment parameters for the Virtual Andon stack.

pub mod props;

pub use props::{InfraError, StackOutput, StackProps};
