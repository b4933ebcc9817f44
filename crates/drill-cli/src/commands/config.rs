use drill_config::DrillConfig;

/// Print the effective configuration as TOML.
pub fn handle(config: &DrillConfig) -> anyhow::Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

fn render(config: &DrillConfig) -> anyhow::Result<String> {
    Ok(toml::to_string_pretty(config)?)
}
