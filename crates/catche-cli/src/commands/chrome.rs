use anyhow::Result;
use catche_browser::ChromeFinder;
use console::style;
use std::path::PathBuf;

/// Report which Chrome binary imports would launch
pub fn execute(chrome_path: Option<PathBuf>, headless: bool) -> Result<()> {
    let chrome = ChromeFinder::new(chrome_path).find()?;

    println!("{} {}", style("Chrome:").bold(), chrome.display());
    println!(
        "{} {}",
        style("Mode:").bold(),
        if headless { "headless" } else { "headed" }
    );
    Ok(())
}
