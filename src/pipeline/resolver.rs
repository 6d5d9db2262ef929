//! Template resolution: kind filtering, metadata collection, and binding
//! the user's selection to a full descriptor.

use anyhow::Result;
use tracing::debug;

use crate::constants::DEFAULT_PROJECT_VERSION;
use crate::core::SproutError;
use crate::project::naming::{format_class_name, format_name};
use crate::project::{InitKind, ProjectMetadata};
use crate::prompt::Prompt;
use crate::registry::TemplateDescriptor;

/// Outcome of resolution: the chosen template and the collected metadata.
#[derive(Debug)]
pub struct Resolution {
    /// The descriptor the user selected from the filtered menu.
    pub template: TemplateDescriptor,
    /// Metadata collected for the run.
    pub metadata: ProjectMetadata,
}

/// Filter the catalog to the chosen kind, collect project metadata, and
/// bind the user's selection.
///
/// Filtering to zero candidates fails fast with
/// [`SproutError::NoMatchingTemplates`] instead of presenting an empty
/// menu.
pub fn resolve<P: Prompt>(
    kind: InitKind,
    templates: &[TemplateDescriptor],
    prompt: &P,
) -> Result<Resolution> {
    let filtered: Vec<&TemplateDescriptor> = templates
        .iter()
        .filter(|t| t.tag.iter().any(|tag| tag == kind.tag()))
        .collect();

    if filtered.is_empty() {
        return Err(SproutError::NoMatchingTemplates {
            kind: kind.tag().to_string(),
        }
        .into());
    }
    debug!("{} templates match kind '{}'", filtered.len(), kind.tag());

    let metadata = collect_metadata(kind, prompt)?;

    let labels: Vec<String> = filtered.iter().map(|t| t.name.clone()).collect();
    let choice = prompt.select("Select a template", &labels)?;
    let template = filtered
        .get(choice)
        .copied()
        .ok_or_else(|| SproutError::PromptFailed {
            reason: format!("selection index {choice} out of range"),
        })?
        .clone();

    debug!("selected template {}@{}", template.npm_name, template.version);
    Ok(Resolution { template, metadata })
}

/// Collect and validate project metadata interactively.
///
/// Prompts repeat until each value is acceptable: the name must survive
/// sanitization non-empty, the version must parse as a semantic version,
/// and components additionally require a non-empty description.
pub fn collect_metadata<P: Prompt>(kind: InitKind, prompt: &P) -> Result<ProjectMetadata> {
    let (raw_name, name, class_name) = loop {
        let raw = prompt.input(&format!("Enter the {} name", kind.label()), None)?;
        let formatted = format_name(&raw);
        if formatted.is_empty() {
            continue;
        }
        let class_name = format_class_name(&formatted);
        debug!("name '{raw}' formatted to '{formatted}' / '{class_name}'");
        break (raw, formatted, class_name);
    };

    let version = loop {
        let input = prompt.input(
            &format!("Enter the {} version", kind.label()),
            Some(DEFAULT_PROJECT_VERSION),
        )?;
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        match semver::Version::parse(trimmed) {
            Ok(_) => break trimmed.to_string(),
            Err(e) => {
                tracing::warn!("'{trimmed}' is not a valid semantic version: {e}");
            }
        }
    };

    let description = if kind == InitKind::Component {
        loop {
            let input = prompt.input("Enter the component description", None)?;
            let trimmed = input.trim();
            if !trimmed.is_empty() {
                break Some(trimmed.to_string());
            }
        }
    } else {
        None
    };

    Ok(ProjectMetadata {
        raw_name,
        name,
        class_name,
        version,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TemplateKind;
    use crate::test_utils::{Answer, ScriptedPrompt};

    fn descriptor(name: &str, npm_name: &str, tags: &[&str]) -> TemplateDescriptor {
        TemplateDescriptor {
            name: name.to_string(),
            npm_name: npm_name.to_string(),
            version: "1.0.0".to_string(),
            tag: tags.iter().map(ToString::to_string).collect(),
            kind: TemplateKind::Normal,
            ignore: Vec::new(),
            build_path: None,
            example_path: None,
        }
    }

    #[test]
    fn filters_by_kind_and_binds_selection() -> Result<()> {
        let templates = vec![
            descriptor("Template A", "tpl-a", &["project"]),
            descriptor("Widget B", "tpl-b", &["component"]),
            descriptor("Template C", "tpl-c", &["project"]),
        ];
        let prompt = ScriptedPrompt::new(vec![
            Answer::Input("my app".to_string()),
            Answer::Input("1.0.0".to_string()),
            Answer::Select(1),
        ]);

        let resolution = resolve(InitKind::Project, &templates, &prompt)?;
        assert_eq!(resolution.template.npm_name, "tpl-c");
        assert_eq!(resolution.metadata.name, "MyApp");
        assert_eq!(resolution.metadata.class_name, "my-app");
        Ok(())
    }

    #[test]
    fn zero_candidates_fail_fast() {
        let templates = vec![descriptor("Widget B", "tpl-b", &["component"])];
        let prompt = ScriptedPrompt::new(vec![]);

        let err = resolve(InitKind::Project, &templates, &prompt).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SproutError>(),
            Some(SproutError::NoMatchingTemplates { kind }) if kind == "project"
        ));
    }

    #[test]
    fn name_prompt_repeats_until_sanitizable() -> Result<()> {
        let prompt = ScriptedPrompt::new(vec![
            Answer::Input("   ".to_string()),
            Answer::Input("123".to_string()),
            Answer::Input("my lib".to_string()),
            Answer::Input("2.0.0".to_string()),
        ]);

        let metadata = collect_metadata(InitKind::Project, &prompt)?;
        assert_eq!(metadata.name, "MyLib");
        assert_eq!(metadata.raw_name, "my lib");
        assert_eq!(metadata.version, "2.0.0");
        assert!(metadata.description.is_none());
        Ok(())
    }

    #[test]
    fn version_prompt_rejects_invalid_semver() -> Result<()> {
        let prompt = ScriptedPrompt::new(vec![
            Answer::Input("app".to_string()),
            Answer::Input("not-a-version".to_string()),
            Answer::Input("1.2.3".to_string()),
        ]);

        let metadata = collect_metadata(InitKind::Project, &prompt)?;
        assert_eq!(metadata.version, "1.2.3");
        Ok(())
    }

    #[test]
    fn component_kind_requires_description() -> Result<()> {
        let prompt = ScriptedPrompt::new(vec![
            Answer::Input("widget".to_string()),
            Answer::Input("1.0.0".to_string()),
            Answer::Input("".to_string()),
            Answer::Input("A widget".to_string()),
        ]);

        let metadata = collect_metadata(InitKind::Component, &prompt)?;
        assert_eq!(metadata.description.as_deref(), Some("A widget"));
        Ok(())
    }
}
