use anyhow::Result;
use catche_core::{ImportReport, ImportRequest, Settings};
use console::style;

/// Run one import from the command line
pub fn execute(settings: Settings, request: ImportRequest, json: bool) -> Result<()> {
    // Reject bad input before looking for Chrome or building an S3 client
    request.validate()?;

    let runtime = super::runtime()?;
    let report = runtime.block_on(async {
        let service = catche_api::import_service(settings).await?;
        Ok::<_, anyhow::Error>(service.run(request).await)
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.success {
        anyhow::bail!("{}", report.message);
    }
    Ok(())
}

fn print_report(report: &ImportReport) {
    let stages = report
        .stages
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" -> ");

    println!("{} {}", style("Run:").bold(), report.run_id);
    println!("{} {}", style("Object:").bold(), report.object_key);
    println!("{} {}", style("Stages:").bold(), stages);
    if let Some(bytes) = report.bytes_downloaded {
        println!("{} {} bytes", style("Downloaded:").bold(), bytes);
    }
    if let Some(url) = &report.final_url {
        println!("{} {}", style("Final page:").bold(), url);
    }

    let elapsed = report.finished_at - report.started_at;
    if report.success {
        println!(
            "{} {} ({:.1}s)",
            style("✓").green(),
            report.message,
            elapsed.num_milliseconds() as f64 / 1000.0
        );
    } else {
        println!("{} {}", style("✗").red(), report.message);
    }
}
