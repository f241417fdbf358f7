use crate::config::LoggingConfig;

/// Log target of the per-item batch outcome lines.
pub const AUDIT_TARGET: &str = "batch_outcome";

pub fn setup_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = config
        .level
        .parse::<log::LevelFilter>()
        .map_err(|_| anyhow::anyhow!("Invalid log level: {}", config.level))?;

    let base_config = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d][%H:%M:%S"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level);

    // Main log: everything except the per-item audit lines
    let mut main_log = fern::Dispatch::new()
        .filter(|metadata| metadata.target() != AUDIT_TARGET)
        .chain(std::io::stderr());
    if let Some(ref output) = config.output {
        main_log = main_log.chain(fern::log_file(output)?);
    }

    let mut dispatch = base_config.chain(main_log);

    if let Some(ref audit_output) = config.audit_output {
        let audit_log = fern::Dispatch::new()
            .filter(|metadata| metadata.target() == AUDIT_TARGET)
            .chain(fern::log_file(audit_output)?);
        dispatch = dispatch.chain(audit_log);
    }

    dispatch.apply()?;
    Ok(())
}
