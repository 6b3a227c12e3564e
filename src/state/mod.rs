//! State management module
//!
//! This module handles all application state, including:
//! - The list of images being browsed (library.rs)
//! - Shared data structures (data.rs)
//! - Transient edits: rotation and crop (edit.rs)
//! - The open image and its rendered result (session.rs)

pub mod data;
pub mod edit;
pub mod library;
pub mod session;
