use crate::rulefire::RuleFireConfig;

/// Internal validation, called automatically during `RuleFireConfig::from_str` / `load`.
pub(crate) fn validate(config: &RuleFireConfig) -> anyhow::Result<()> {
    // rules.file must name a file
    if let Some(rules) = &config.rules
        && rules.file.as_os_str().is_empty()
    {
        anyhow::bail!("rules.file must not be empty");
    }

    // logging.level must be non-blank; EnvFilter parsing happens at init time
    if config.logging.level.trim().is_empty() {
        anyhow::bail!("logging.level must not be empty");
    }

    Ok(())
}
