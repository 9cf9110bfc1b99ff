use anyhow::Result;
use colored::Colorize;

use droid_doctor::environment::SdkComponent;
use droid_doctor::output::DoctorOutput;
use droid_doctor::{OutputFormat, SdkInfo};

use super::GlobalOptions;

pub fn run(options: &GlobalOptions, format: OutputFormat) -> Result<()> {
    let config = options.load_config()?;
    let env = options.load_environment(&config)?;

    if format == OutputFormat::Json {
        let output = DoctorOutput::new("env").with_data(serde_json::to_value(&env)?);
        println!("{}", output.to_json()?);
        return Ok(());
    }

    println!("{}", "SDKs".bold());
    if env.sdks.is_empty() {
        println!("  {}", "none detected".dimmed());
    }

    for (name, info) in &env.sdks {
        match info {
            SdkInfo::Marker(marker) => println!("  {}: {}", name, marker.yellow()),
            SdkInfo::Installed(components) => {
                println!("  {}:", name);
                for (component, value) in components {
                    let rendered = match value {
                        SdkComponent::Versions(versions) if versions.is_empty() => "none".dimmed().to_string(),
                        SdkComponent::Versions(versions) => versions.join(", "),
                        SdkComponent::Value(value) => value.clone(),
                        SdkComponent::Other(value) => value.to_string(),
                    };
                    println!("    {}: {}", component, rendered);
                }
            }
        }
    }

    Ok(())
}
