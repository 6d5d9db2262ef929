//! Interactive prompt seam.
//!
//! The pipeline only needs three primitives: confirmation, free-text input,
//! and single selection from a menu. They live behind the [`Prompt`] trait
//! so the pipeline can be driven by a scripted fake in tests while
//! production uses `dialoguer` against the terminal.

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};

use crate::core::SproutError;

/// Interactive prompt operations required by the pipeline.
pub trait Prompt {
    /// Yes/no confirmation with a default answer.
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Free-text input; `default` pre-fills the answer when present.
    fn input(&self, message: &str, default: Option<&str>) -> Result<String>;

    /// Single selection from a menu; returns the chosen index.
    fn select(&self, message: &str, items: &[String]) -> Result<usize>;
}

/// Terminal prompt implementation backed by `dialoguer`.
pub struct DialoguerPrompt;

impl DialoguerPrompt {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for DialoguerPrompt {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(|e| {
                SproutError::PromptFailed {
                    reason: e.to_string(),
                }
                .into()
            })
    }

    fn input(&self, message: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::new()
            .with_prompt(message)
            .allow_empty(true);
        if let Some(d) = default {
            input = input.default(d.to_string());
        }
        input.interact_text().map_err(|e| {
            SproutError::PromptFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn select(&self, message: &str, items: &[String]) -> Result<usize> {
        Select::new()
            .with_prompt(message)
            .items(items)
            .default(0)
            .interact()
            .map_err(|e| {
                SproutError::PromptFailed {
                    reason: e.to_string(),
                }
                .into()
            })
    }
}
