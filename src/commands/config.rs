use anyhow::Result;
use colored::Colorize;

use droid_doctor::config::CONFIG_FILE;
use droid_doctor::output::DoctorOutput;
use droid_doctor::{DoctorConfig, OutputFormat};

use super::GlobalOptions;

pub enum ConfigAction {
    Init { force: bool },
    Validate,
}

pub fn run(action: ConfigAction, options: &GlobalOptions, format: OutputFormat) -> Result<()> {
    let path = options.config_dir().join(CONFIG_FILE);

    match action {
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists. Use --force to overwrite.",
                    path.display()
                );
            }

            DoctorConfig::create_default(&path)?;

            if format == OutputFormat::Json {
                let output = DoctorOutput::new("config init").with_data(serde_json::json!({
                    "path": path.display().to_string()
                }));
                println!("{}", output.to_json()?);
            } else {
                println!("{} Created {}", "✓".green(), path.display());
            }
        }
        ConfigAction::Validate => {
            if !path.exists() {
                anyhow::bail!(
                    "No {} found. Run `droid-doctor config init` first.",
                    CONFIG_FILE
                );
            }

            let config = DoctorConfig::load_from(&path)?;
            let validation = config.validate();

            if format == OutputFormat::Json {
                let output = DoctorOutput::new("config validate")
                    .with_success(validation.is_ok())
                    .with_data(serde_json::json!({
                        "path": path.display().to_string(),
                        "error": validation.as_ref().err().map(|e| e.to_string()),
                    }));
                println!("{}", output.to_json()?);
            } else if validation.is_ok() {
                println!("{} {} is valid", "✓".green(), path.display());
            }

            validation?;
        }
    }

    Ok(())
}
