use anyhow::Result;
use colored::Colorize;

use droid_doctor::checks::{run_all_checks, CheckResult, CheckSeverity};
use droid_doctor::output::{DoctorOutput, Summary};
use droid_doctor::OutputFormat;

use super::GlobalOptions;

pub async fn run(options: &GlobalOptions, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Text {
        println!("{}", "Running Android SDK checks...".cyan());
        println!();
    }

    let context = options.check_context()?;
    let results = run_all_checks(&context.android_sdk, &context.env, &context.config).await;
    let has_errors = results.iter().any(|r| r.severity == CheckSeverity::Error);

    match format {
        OutputFormat::Json => output_json(&results, has_errors)?,
        OutputFormat::Text => output_text(&results),
    }

    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}

fn output_text(results: &[CheckResult]) {
    for result in results {
        let icon = match result.severity {
            CheckSeverity::Pass => "✓".green(),
            CheckSeverity::Error => "✗".red(),
        };

        println!("{} {}", icon, result.name);

        if !result.message.is_empty() {
            println!("  {}", result.message.dimmed());
        }

        if result.severity == CheckSeverity::Error && !result.description.is_empty() {
            println!("  {}", result.description.dimmed());
        }
    }

    let summary = Summary::of(results);

    println!();
    println!(
        "{}: {} passed, {} errors",
        "Summary".bold(),
        summary.passed.to_string().green(),
        summary.errors.to_string().red()
    );

    if summary.errors == 0 {
        println!();
        println!("{}", "Android SDK is ready! ✨".green().bold());
    } else {
        println!();
        println!(
            "{} Run {} to see how to fix it.",
            "→".cyan(),
            "droid-doctor fix".cyan()
        );
    }
}

fn output_json(results: &[CheckResult], has_errors: bool) -> Result<()> {
    let output = DoctorOutput::new("doctor")
        .with_success(!has_errors)
        .with_checks(results.to_vec())
        .with_data(serde_json::json!({ "summary": Summary::of(results) }));

    println!("{}", output.to_json()?);
    Ok(())
}
