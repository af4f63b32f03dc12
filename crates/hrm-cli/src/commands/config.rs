//! Configuration commands.

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use hrm_config_and_utils::{Config, Paths};

pub fn config_show(ctx: &Context, format: OutputFormat) -> Result<()> {
    output::print_data(&ctx.config, format, |config| {
        output::print_heading("Configuration");
        output::print_row("Data dir", &ctx.paths.base_dir().display().to_string());
        output::print_row("Config file", &ctx.paths.config_file().display().to_string());
        output::print_row("Log file", &ctx.paths.log_file().display().to_string());
        output::print_row("Log level", &config.log_level);
        output::print_row("Duplicate email", &format!("{:?}", config.duplicate_email_policy));
        output::print_row("Duplicate key", &format!("{:?}", config.duplicate_key_policy));
        output::print_row("Corrupt document", &format!("{:?}", config.corrupt_document_policy));
        output::print_row(
            "Passwordless",
            if config.allow_passwordless_profiles { "allowed" } else { "rejected" },
        );
    });
    Ok(())
}

/// Write a default config file unless one exists (or `force`).
pub fn config_init(paths: &Paths, force: bool, format: OutputFormat) -> Result<()> {
    let path = paths.config_file();
    if path.exists() && !force {
        anyhow::bail!("{} already exists; pass --force to overwrite", path.display());
    }
    Config::default().save(paths)?;
    output::print_success(&format!("Wrote {}", path.display()), format);
    Ok(())
}
