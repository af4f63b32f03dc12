//! Employee provisioning and evaluation commands.

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::{Context as _, Result};
use hrm_document_store::{CategoryScores, CreateEmployeeRequest, NewEvaluation};

pub fn employee_create(ctx: &Context, request: CreateEmployeeRequest, format: OutputFormat) -> Result<()> {
    let created = ctx.store.create_employee(request)?;
    output::print_data(&created, format, |created| {
        println!("{}", created.message);
        output::print_row("User ID", &created.user_id);
        output::print_row("Email", &created.email);
        output::print_row("Temporary password", &created.temporary_password);
    });
    Ok(())
}

/// Submit an evaluation. The evaluator defaults to the signed-in user.
pub fn evaluate(
    ctx: &Context,
    employee_id: String,
    evaluator_id: Option<String>,
    categories: CategoryScores,
    comments: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let evaluator_id = match evaluator_id {
        Some(id) => id,
        None => ctx
            .store
            .auth()
            .get_session()
            .and_then(|s| s.user_id().map(str::to_string))
            .context("No evaluator given and nobody is signed in")?,
    };
    let evaluation = ctx.store.submit_evaluation(NewEvaluation {
        employee_id,
        evaluator_id,
        categories,
        comments,
    })?;
    output::print_data(&evaluation, format, |evaluation| {
        println!("Evaluation recorded");
        output::print_row("ID", &evaluation.id);
        output::print_row("Employee", &evaluation.employee_id);
        output::print_row("Score", &format!("{:.1}", evaluation.score));
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrm_config_and_utils::{Config, Paths};
    use hrm_document_store::SignUpOptions;

    const SCORES: CategoryScores = CategoryScores {
        productivity: 4,
        quality: 4,
        teamwork: 5,
        communication: 3,
    };

    #[test]
    fn evaluator_defaults_to_session_user() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::open(Paths::with_base_dir(dir.path().to_path_buf()), Config::default()).unwrap();

        let err = evaluate(&ctx, "p1".into(), None, SCORES, None, OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("nobody is signed in"));

        let me = ctx
            .store
            .auth()
            .sign_up("boss@x.com", "pw", SignUpOptions::default())
            .unwrap();
        evaluate(&ctx, "p1".into(), None, SCORES, None, OutputFormat::Json).unwrap();

        let stored = ctx.store.evaluations_for("p1").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(Some(stored[0].evaluator_id.as_str()), me.session.user_id());
    }
}
