//! Collection commands: select, insert, update, delete, upsert.

use super::{parse_eq, read_json_arg, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use hrm_document_store::{Collection, UpsertOptions};
use tracing::debug;

/// Arguments of `hrm select`.
pub struct SelectArgs<'a> {
    pub collection: Collection,
    pub columns: &'a str,
    pub filters: &'a [String],
    pub order: Option<&'a str>,
    pub descending: bool,
    pub limit: Option<usize>,
    pub single: bool,
}

pub fn select(ctx: &Context, args: SelectArgs<'_>, format: OutputFormat) -> Result<()> {
    let mut query = ctx.store.from(args.collection).select(args.columns);
    for filter in args.filters {
        let (column, value) = parse_eq(filter)?;
        query = query.eq(column, value);
    }
    if let Some(column) = args.order {
        query = query.order(column, !args.descending);
    }
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }
    debug!(spec = ?query.spec(), "Running select");

    if args.single {
        let record = query.single()?;
        output::print_optional_record(record.as_ref(), format);
    } else {
        let records = query.execute()?;
        output::print_records(&records, format);
    }
    Ok(())
}

pub fn insert(ctx: &Context, collection: Collection, json: &str, format: OutputFormat) -> Result<()> {
    let records = ctx.store.from(collection).insert(read_json_arg(json)?)?;
    output::print_records(&records, format);
    Ok(())
}

pub fn update(
    ctx: &Context,
    collection: Collection,
    json: &str,
    filter: &str,
    format: OutputFormat,
) -> Result<()> {
    let (column, value) = parse_eq(filter)?;
    let records = ctx
        .store
        .from(collection)
        .update(read_json_arg(json)?)
        .eq(column, value)?;
    output::print_records(&records, format);
    Ok(())
}

pub fn delete(ctx: &Context, collection: Collection, filter: &str, format: OutputFormat) -> Result<()> {
    let (column, value) = parse_eq(filter)?;
    ctx.store.from(collection).delete().eq(column.as_str(), value)?;
    output::print_success(&format!("Deleted {} where {}", collection, column), format);
    Ok(())
}

pub fn upsert(
    ctx: &Context,
    collection: Collection,
    json: &str,
    on_conflict: &str,
    format: OutputFormat,
) -> Result<()> {
    let record = ctx
        .store
        .from(collection)
        .upsert(read_json_arg(json)?, UpsertOptions::on_conflict(on_conflict))?;
    output::print_optional_record(Some(&record), format);
    Ok(())
}
