use crate::{Error, LanguageModel, MergedContext, Prompt};

/// Script returned when no topic had usable context.
pub const NO_INFORMATION: &str = "No information available.";

/// Turns the merged context into one broadcast script with a single model call.
///
/// [`MergedContext::NoInformation`] short-circuits to [`NO_INFORMATION`] and the
/// model is never called. Any provider error is fatal for the broadcast.
#[tracing::instrument(skip_all, fields(model = model.model_name(), blocks = context.blocks().len()))]
pub async fn compose_broadcast<M>(model: &M, context: &MergedContext) -> Result<String, Error>
where
    M: LanguageModel + Sync,
{
    if let MergedContext::NoInformation = context {
        tracing::warn!("Nothing to compose");
        return Ok(NO_INFORMATION.to_string());
    }

    let script = model
        .complete(Prompt::broadcast_anchor(context.render()))
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to compose broadcast"))
        .map_err(|e| Error::Composition(e.to_string()))?;

    if script.trim().is_empty() {
        return Err(Error::Composition("model returned an empty script".into()));
    }

    Ok(script)
}
