//! Algorithms for brainviz
//!
//! This crate provides the reference source-localization engine used by the
//! live pipeline. Any solver implementing
//! [`brainviz_core::LocalizationEngine`] can take its place.

pub mod localization;

pub use localization::*;
