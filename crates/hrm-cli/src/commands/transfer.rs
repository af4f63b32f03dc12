//! Backup commands.

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Write a backup file, or print the document with `--stdout`.
pub fn export(ctx: &Context, out_dir: Option<PathBuf>, to_stdout: bool, format: OutputFormat) -> Result<()> {
    if to_stdout {
        println!("{}", ctx.store.export_to_json()?);
        return Ok(());
    }
    let dir = out_dir.unwrap_or_else(|| ctx.paths.exports_dir());
    let path = ctx.store.export_to_file(&dir)?;
    output::print_data(&path, format, |path| println!("Exported to {}", path.display()));
    Ok(())
}

/// Replace the whole store with a backup file.
pub fn import(ctx: &Context, file: &Path, format: OutputFormat) -> Result<()> {
    ctx.store.import_from_file(file)?;
    let records = ctx.store.load()?.record_count();
    output::print_success(
        &format!("Imported {} record(s) from {}", records, file.display()),
        format,
    );
    Ok(())
}
