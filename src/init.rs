//! Project initialization.
//!
//! Creates the directory layout, a default page template and a default
//! `haiku.toml`.

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Page template written by `init`.
const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{title}}</title>
</head>
<body>
  <article class="haiku">
    <h1>{{title}}</h1>
    <time>{{date}}</time>
    <div class="lines">
{{lines}}
    </div>
  </article>
  <script type="application/json" id="haiku-data">
{{json}}
  </script>
</body>
</html>
"#;

/// Create a new project rooted at `config.get_root()`.
pub fn new_project(config: &SiteConfig) -> Result<()> {
    let template = config.paths.template_path();

    for path in [&config.config_path, &template] {
        if path.exists() {
            bail!(
                "`{}` already exists. Remove it manually or init in a different path.",
                path.display()
            );
        }
    }

    init_structure(config)?;
    write_new(&template, DEFAULT_TEMPLATE)?;
    init_default_config(&config.config_path)?;

    log!("init"; "created project at {}", config.get_root().display());
    Ok(())
}

/// Create the four project directories.
fn init_structure(config: &SiteConfig) -> Result<()> {
    let paths = &config.paths;
    for dir in [&paths.inbox, &paths.archive, &paths.data, &paths.assets] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(())
}

/// Write default configuration file
fn init_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&SiteConfig::default())?;
    write_new(path, &content)
}

fn write_new(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
