use anyhow::{Context, Result};
use gp2als_core::{pipeline, ImportConfig};

pub fn run_import(config: ImportConfig) -> Result<()> {
    tracing::info!(
        "Importing rehearsal marks from {} into {}",
        config.notation.display(),
        config.project_file().display()
    );

    let project = config.project_file();
    let report = pipeline::run(config)
        .with_context(|| format!("Failed to import locators into {}", project.display()))?;

    println!(
        "'{}' is now in '{}'",
        report.saved.output.display(),
        report.saved.backup.display()
    );
    println!("\nLocators:");
    for (id, marker) in (1..).zip(&report.markers) {
        println!("  {id:>3}. {marker}");
    }
    println!(
        "\n✓ New Ableton project created in '{}'",
        report.saved.output.display()
    );

    Ok(())
}
