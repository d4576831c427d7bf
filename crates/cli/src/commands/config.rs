use anyhow::Result;
use billed_core::workspace::{load_config, root_dir, save_config};
use billed_core::BilledError;
use billed_types::config::DateLocale;
use billed_types::output::ConfigOutput;
use billed_utils::output::{render, OutputFormat};

/// `billed config show`
pub fn show(fmt: OutputFormat) -> Result<()> {
    let config = load_config()?;
    let out = ConfigOutput {
        root: root_dir()?.display().to_string(),
        api_url: config.api.base_url.clone(),
        timeout_secs: config.api.timeout_secs,
        locale: config.display.locale.to_string(),
        verbose: config.system.verbose,
    };
    render(fmt, &out)
}

/// `billed config url <url>`
pub fn set_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url)
        .map_err(|e| BilledError::InvalidConfig(format!("{url}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(BilledError::InvalidConfig(format!("{url}: expected an http(s) URL")).into());
    }

    let mut config = load_config()?;
    config.api.base_url = url.to_string();
    save_config(&config)?;
    println!("✓ API URL set to {url}");
    Ok(())
}

/// `billed config locale <fr|en>`
pub fn set_locale(locale: &str) -> Result<()> {
    let locale: DateLocale = locale.parse().map_err(BilledError::InvalidConfig)?;
    let mut config = load_config()?;
    config.display.locale = locale;
    save_config(&config)?;
    println!("✓ Date locale set to {locale}");
    Ok(())
}

/// `billed config verbose <true|false>`
pub fn set_verbose(enabled: bool) -> Result<()> {
    let mut config = load_config()?;
    config.system.verbose = enabled;
    save_config(&config)?;
    println!("✓ Verbose logging {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}
