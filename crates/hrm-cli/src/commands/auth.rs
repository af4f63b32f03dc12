//! Authentication commands.

use super::{password_or_prompt, prompt_line, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use hrm_document_store::{AuthResponse, SignUpOptions};

fn print_auth(response: &AuthResponse, verb: &str, format: OutputFormat) {
    output::print_data(response, format, |response| {
        let email = response.session.email().unwrap_or("user");
        println!("{} as {} ({})", verb, email, response.session.role());
    });
}

/// Create an account and sign in.
pub fn auth_sign_up(
    ctx: &Context,
    email: Option<String>,
    password: Option<String>,
    options: SignUpOptions,
    format: OutputFormat,
) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_line("Email")?,
    };
    let password = password_or_prompt(password)?;
    let response = ctx.store.auth().sign_up(&email, &password, options)?;
    print_auth(&response, "Signed up", format);
    Ok(())
}

/// Sign in with email and password.
pub fn auth_sign_in(
    ctx: &Context,
    email: Option<String>,
    password: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    if let Some(session) = ctx.store.auth().get_session() {
        let current = session.email().unwrap_or("unknown");
        if email.as_deref().map_or(true, |e| e == current) {
            output::print_success(&format!("Already signed in as {}", current), format);
            return Ok(());
        }
    }

    let email = match email {
        Some(email) => email,
        None => prompt_line("Email")?,
    };
    if email.is_empty() {
        anyhow::bail!("Email is required");
    }
    let password = password_or_prompt(password)?;
    let response = ctx.store.auth().sign_in_with_password(&email, &password)?;
    print_auth(&response, "Signed in", format);
    Ok(())
}

pub fn auth_sign_out(ctx: &Context, format: OutputFormat) -> Result<()> {
    ctx.store.auth().sign_out();
    output::print_success("Signed out", format);
    Ok(())
}

/// Show the current session.
pub fn auth_session(ctx: &Context, format: OutputFormat) -> Result<()> {
    let session = ctx.store.auth().get_session();
    match format {
        OutputFormat::Json => output::print_json(&hrm_document_store::Response {
            data: session,
            error: None,
        }),
        OutputFormat::Text => match session {
            Some(session) => {
                println!("Auth:     signed in");
                output::print_row("User ID", session.user_id().unwrap_or("unknown"));
                output::print_row("Email", session.email().unwrap_or("unknown"));
                output::print_row("Role", session.role().as_str());
                output::print_row("Since", &session.established_at);
            }
            None => println!("Auth:     not signed in"),
        },
    }
    Ok(())
}
