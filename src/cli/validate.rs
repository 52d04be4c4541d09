//! `validate` command implementation.

use crate::cli::args::ValidateArgs;
use crate::core::backoff::Sleeper;
use crate::core::models::ValidationPayload;
use crate::core::pipeline::UsagePipeline;
use crate::core::validator::resolve_credential;
use crate::error::{OrgcostError, Result};
use crate::render;
use crate::storage::ResolvedConfig;

/// Execute the validate command.
///
/// The result is always printed. A rejected or missing key also returns an
/// error so the process exits non-zero.
///
/// # Errors
///
/// Returns [`OrgcostError::AuthNotConfigured`] when there is no key to check
/// and [`OrgcostError::AuthInvalid`] when the API rejects it.
pub async fn execute(args: &ValidateArgs, config: &ResolvedConfig, no_color: bool) -> Result<()> {
    let pipeline = UsagePipeline::new(config.client_settings())?;
    let payload = check(&pipeline, args, &config.base_url).await;
    let valid = payload.valid;

    let output = render::render_validation(payload, config.format, config.pretty, no_color)?;
    print!("{output}");

    if valid {
        return Ok(());
    }
    let explicit = args.api_key.as_deref().unwrap_or_default();
    if resolve_credential(explicit, pipeline.default_credential()).is_none() {
        Err(OrgcostError::AuthNotConfigured)
    } else {
        Err(OrgcostError::AuthInvalid {
            reason: format!("rejected by {}", config.base_url),
        })
    }
}

/// Run the key check and package the result.
pub async fn check<S: Sleeper + Clone>(
    pipeline: &UsagePipeline<S>,
    args: &ValidateArgs,
    base_url: &str,
) -> ValidationPayload {
    let valid = pipeline
        .validate(args.api_key.as_deref().unwrap_or_default())
        .await;
    tracing::info!(valid, base_url, "Validated API key");
    ValidationPayload {
        valid,
        base_url: base_url.to_string(),
    }
}
