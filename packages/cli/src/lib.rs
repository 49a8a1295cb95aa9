#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Support code for the `ctfboard-render` binary.

pub mod config;
pub mod page;

pub use config::{OptionOverrides, RenderConfigError, load_render_options};
pub use page::standalone_page;
