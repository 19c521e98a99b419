#![allow(dead_code)]

pub mod project;
pub mod registry;

pub use project::{TestProject, create_test_project};
pub use registry::MockRegistry;
