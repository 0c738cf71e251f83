//! Storage reset command.

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use gomarket_storage::Store;

use super::ResetArgs;
use crate::context::Context;

/// Wipe the whole store, including keys that do not belong to the cart.
pub async fn run(args: ResetArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store();

    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Erase everything in {}?", store.path().display()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Reset cancelled.");
            return Ok(());
        }
    }

    store
        .clear()
        .await
        .with_context(|| format!("Failed to clear {}", store.path().display()))?;
    tracing::info!(path = %store.path().display(), "store cleared");

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "cleared": true }));
    } else {
        ctx.output.success("Store cleared.");
    }
    Ok(())
}
