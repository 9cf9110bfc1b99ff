use anyhow::Result;
use colored::Colorize;

use droid_doctor::{Loader, MemorySink, NoopLoader, OutputFormat, SpinnerLoader, StdoutSink};
use droid_doctor::output::DoctorOutput;

use super::GlobalOptions;

pub async fn run(options: &GlobalOptions, format: OutputFormat) -> Result<()> {
    let context = options.check_context()?;
    let check = &context.android_sdk;

    let mut loader: Box<dyn Loader> = match format {
        OutputFormat::Text => Box::new(SpinnerLoader::new()),
        OutputFormat::Json => Box::new(NoopLoader),
    };
    loader.start(&format!("Checking {}", check.label()));

    let diagnostic = check.get_diagnostics(&context.env).await;

    if !diagnostic.needs_to_be_fixed {
        loader.succeed(check.label());
        match format {
            OutputFormat::Json => {
                let output = DoctorOutput::new("fix").with_data(serde_json::json!({
                    "diagnostic": diagnostic,
                    "message": "Nothing to fix"
                }));
                println!("{}", output.to_json()?);
            }
            OutputFormat::Text => {
                println!("{}", "Nothing to fix. Android SDK is ready! ✨".green());
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let mut sink = MemorySink::default();
            check.run_automatic_fix(loader.as_mut(), &context.env, &mut sink);
            let output = DoctorOutput::new("fix")
                .with_success(false)
                .with_data(serde_json::json!({
                    "diagnostic": diagnostic,
                    "manualInstallation": sink.messages,
                }));
            println!("{}", output.to_json()?);
        }
        OutputFormat::Text => {
            check.run_automatic_fix(loader.as_mut(), &context.env, &mut StdoutSink);
            println!(
                "{} Run {} again after installing.",
                "→".cyan(),
                "droid-doctor doctor".cyan()
            );
        }
    }

    Ok(())
}
