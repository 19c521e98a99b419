//! Registry implementations for fetching package documents

pub mod npm;

pub use npm::NpmRegistry;
