//! Pipeline stages for restructuring converter output.
//!
//! Each submodule implements one step and is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ classify ──▶ assets
//! (folders,    (headings,   (rename images,
//!  images)      captions)    rewrite links)
//! ```
//!
//! 1. [`discover`]: recognise conversion folders by name and list their images
//! 2. [`classify`]: pure text pass: promote numbered headings, attach captions
//! 3. [`assets`]: the only stage that writes: renames images and rewrites
//!    the document in place
//!
//! Folder-level orchestration lives in [`crate::restructure`].

pub mod assets;
pub mod classify;
pub mod discover;
