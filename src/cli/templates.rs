//! The `templates` command: print the catalog without scaffolding anything.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::config::Settings;
use crate::registry::RegistryClient;

/// Command to list the templates the catalog currently offers.
#[derive(Args)]
pub struct TemplatesCommand {
    /// Template catalog endpoint
    #[arg(long, value_name = "URL", env = "SPROUT_CATALOG_URL")]
    catalog_url: Option<String>,

    /// Only show templates carrying this tag (e.g. "project", "component")
    #[arg(long, value_name = "TAG")]
    tag: Option<String>,
}

impl TemplatesCommand {
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load(None, self.catalog_url, None)?;
        let registry = RegistryClient::new(settings.catalog_url.clone());
        let templates = registry.fetch_templates().await?;

        let mut shown = 0;
        for template in &templates {
            if let Some(tag) = &self.tag {
                if !template.tag.iter().any(|t| t == tag) {
                    continue;
                }
            }
            shown += 1;
            println!(
                "{} {} ({}@{}) {} [{}]",
                "•".green(),
                template.name.bold(),
                template.npm_name,
                template.version,
                template.kind.as_str(),
                template.tag.join(", ")
            );
        }

        if shown == 0 {
            println!("No templates match the requested tag.");
        }
        Ok(())
    }
}
