//! Directory guard: confirm-before-clobber policy for the target directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::constants::DISPOSABLE_DIRS;
use crate::prompt::Prompt;
use crate::utils::fs::empty_dir;

/// Inspect the target directory and enforce the overwrite policy.
///
/// Returns `false` when the user declines to continue into a non-empty
/// directory: a deliberate abort, not an error. Only dotfiles and the
/// dependency install directory do not count toward non-emptiness; any
/// other entry is user content. When the user chooses to continue (or `force` is
/// set), a second confirmation gates an irreversible clear of the
/// directory; declining the clear proceeds in place, accepting the
/// overwrite risk.
///
/// # Errors
///
/// A failed directory listing is fatal and aborts the run.
pub fn assess_and_prepare<P: Prompt>(target: &Path, force: bool, prompt: &P) -> Result<bool> {
    if !target.exists() {
        debug!("target {} does not exist yet, proceeding", target.display());
        return Ok(true);
    }

    if is_effectively_empty(target)? {
        debug!("target {} is empty, proceeding", target.display());
        return Ok(true);
    }

    if !force {
        let proceed = prompt.confirm(
            "The target directory is not empty. Continue creating the project?",
            false,
        )?;
        if !proceed {
            return Ok(false);
        }
    }

    let clear = prompt.confirm(
        "Irreversibly clear all contents of the target directory?",
        false,
    )?;
    if clear {
        empty_dir(target)?;
    }

    Ok(true)
}

fn is_effectively_empty(target: &Path) -> Result<bool> {
    let entries = fs::read_dir(target)
        .with_context(|| format!("Failed to read target directory: {}", target.display()))?;

    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            return Ok(false);
        };
        if name.starts_with('.') || DISPOSABLE_DIRS.contains(&name) {
            continue;
        }
        return Ok(false);
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Answer, ScriptedPrompt};
    use tempfile::TempDir;

    #[test]
    fn empty_directory_proceeds_without_prompting() -> Result<()> {
        let temp = TempDir::new()?;
        let prompt = ScriptedPrompt::new(vec![]);
        assert!(assess_and_prepare(temp.path(), false, &prompt)?);
        Ok(())
    }

    #[test]
    fn dotfiles_and_artifacts_do_not_count() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join(".gitignore"), "target")?;
        fs::create_dir(temp.path().join("node_modules"))?;

        let prompt = ScriptedPrompt::new(vec![]);
        assert!(assess_and_prepare(temp.path(), false, &prompt)?);
        Ok(())
    }

    #[test]
    fn render_excluded_directories_still_count_as_content() -> Result<()> {
        let temp = TempDir::new()?;
        fs::create_dir(temp.path().join("public"))?;
        fs::write(temp.path().join("public/index.html"), "<h1>mine</h1>")?;

        // The confirmation must be asked; declining leaves the tree alone.
        let prompt = ScriptedPrompt::new(vec![Answer::Confirm(false)]);
        assert!(!assess_and_prepare(temp.path(), false, &prompt)?);
        assert_eq!(
            fs::read_to_string(temp.path().join("public/index.html"))?,
            "<h1>mine</h1>"
        );
        Ok(())
    }

    #[test]
    fn declining_to_continue_aborts_without_writes() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join("existing.txt"), "keep me")?;

        let prompt = ScriptedPrompt::new(vec![Answer::Confirm(false)]);
        assert!(!assess_and_prepare(temp.path(), false, &prompt)?);
        assert_eq!(fs::read_to_string(temp.path().join("existing.txt"))?, "keep me");
        Ok(())
    }

    #[test]
    fn confirmed_clear_empties_the_directory() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join("existing.txt"), "old")?;

        let prompt = ScriptedPrompt::new(vec![Answer::Confirm(true), Answer::Confirm(true)]);
        assert!(assess_and_prepare(temp.path(), false, &prompt)?);
        assert!(!temp.path().join("existing.txt").exists());
        Ok(())
    }

    #[test]
    fn declined_clear_proceeds_in_place() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join("existing.txt"), "old")?;

        let prompt = ScriptedPrompt::new(vec![Answer::Confirm(true), Answer::Confirm(false)]);
        assert!(assess_and_prepare(temp.path(), false, &prompt)?);
        assert!(temp.path().join("existing.txt").exists());
        Ok(())
    }

    #[test]
    fn force_skips_the_continue_confirmation() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join("existing.txt"), "old")?;

        // Only the clear confirmation is asked.
        let prompt = ScriptedPrompt::new(vec![Answer::Confirm(false)]);
        assert!(assess_and_prepare(temp.path(), true, &prompt)?);
        Ok(())
    }
}
