//! sprout - scaffold projects and components from catalog templates.
//!
//! sprout provisions new frontend projects and components from versioned
//! npm template packages described by a remote catalog. A single
//! interactive pipeline drives the whole flow: it guards the target
//! directory, collects project metadata, resolves a template from the
//! catalog, acquires (and keeps up to date) the template package in a
//! local cache, renders it into the target directory, and finishes with
//! either a dependency install or the template's own generator.
//!
//! # Module Organization
//!
//! - [`cli`]: argument parsing and the `init` / `templates` commands
//! - [`pipeline`]: the sequential provisioning pipeline and its phases
//! - [`registry`]: catalog client and template descriptors
//! - [`cache`]: versioned template package cache backed by npm
//! - [`materializer`]: copy and render templates into the target
//! - [`postprocess`]: dependency install and custom generator execution
//! - [`project`]: initialization kinds, metadata, and name formatting
//! - [`prompt`]: interactive prompt seam (scriptable in tests)
//! - [`npm`]: npm availability checks and subprocess execution
//! - [`config`]: explicit run settings (cache root, catalog, registry)
//! - [`core`]: error types and user-facing error presentation

pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod materializer;
pub mod npm;
pub mod pipeline;
pub mod postprocess;
pub mod project;
pub mod prompt;
pub mod registry;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
