//! CLI command implementations.

mod auth;
mod config;
mod employee;
mod query;
mod transfer;

pub use auth::{auth_session, auth_sign_in, auth_sign_out, auth_sign_up};
pub use config::{config_init, config_show};
pub use employee::{employee_create, evaluate};
pub use query::{delete, insert, select, update, upsert, SelectArgs};
pub use transfer::{export, import};

use anyhow::{Context as _, Result};
use hrm_config_and_utils::{Config, Paths};
use hrm_document_store::{DocumentStore, StoreOptions};
use serde_json::Value;
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// Everything a command needs: resolved paths, config and an open store.
pub struct Context {
    pub paths: Paths,
    pub config: Config,
    pub store: DocumentStore,
}

impl Context {
    pub fn open(paths: Paths, config: Config) -> Result<Self> {
        paths.ensure_dirs()?;
        let store = DocumentStore::open(&paths.slots_dir(), StoreOptions::from_config(&config))
            .context("Failed to open the document store")?;
        Ok(Self {
            paths,
            config,
            store,
        })
    }
}

/// Resolve the data directory: `--data-dir` wins over `HRM_DATA_DIR` and the default.
pub fn resolve_paths(data_dir: Option<PathBuf>) -> Result<Paths> {
    match data_dir {
        Some(dir) => Ok(Paths::with_base_dir(dir)),
        None => Ok(Paths::new()?),
    }
}

/// Read a JSON argument: inline text, `@path` for a file, or `-` for stdin.
pub fn read_json_arg(arg: &str) -> Result<Value> {
    let text = if arg == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    } else if let Some(path) = arg.strip_prefix('@') {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?
    } else {
        arg.to_string()
    };
    serde_json::from_str(&text).context("Argument is not valid JSON")
}

/// Parse `column=value`. The value is read as JSON when it parses
/// (`42`, `true`, `null`, `"quoted"`), otherwise taken as a plain string.
pub fn parse_eq(arg: &str) -> Result<(String, Value)> {
    let (column, raw) = arg
        .split_once('=')
        .with_context(|| format!("Expected column=value, got '{}'", arg))?;
    let column = column.trim();
    if column.is_empty() {
        anyhow::bail!("Expected column=value, got '{}'", arg);
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((column.to_string(), value))
}

/// Prompt on stdout and read one trimmed line.
fn prompt_line(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Use the given password or read one without echo.
fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eq_values_parse_as_json_first() {
        assert_eq!(parse_eq("score=42").unwrap(), ("score".into(), json!(42)));
        assert_eq!(parse_eq("read=false").unwrap(), ("read".into(), json!(false)));
        assert_eq!(parse_eq("id=\"42\"").unwrap(), ("id".into(), json!("42")));
        assert_eq!(
            parse_eq("email=a@x.com").unwrap(),
            ("email".into(), json!("a@x.com"))
        );
        assert_eq!(parse_eq("note=a=b").unwrap(), ("note".into(), json!("a=b")));
        assert!(parse_eq("novalue").is_err());
        assert!(parse_eq("=x").is_err());
    }

    #[test]
    fn json_arg_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.json");
        std::fs::write(&path, r#"{"title": "x"}"#).unwrap();
        let value = read_json_arg(&format!("@{}", path.display())).unwrap();
        assert_eq!(value, json!({"title": "x"}));
        assert!(read_json_arg("{broken").is_err());
    }

    #[test]
    fn context_opens_store_under_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = resolve_paths(Some(dir.path().to_path_buf())).unwrap();
        let ctx = Context::open(paths, Config::default()).unwrap();
        ctx.store.load().unwrap();
        assert!(dir.path().join("slots").join("hrm_database.json").exists());
    }
}
