//! Session inspection: who am I, where may I go, and live change tracking.

use std::time::Duration;

use lopcafe_client::{Route, SessionStore};

use super::Context;
use crate::error::CliError;
use crate::output;

pub fn whoami(ctx: &Context) {
    output::session(&ctx.store.session());
}

/// Report what the policy decides for a view path.
///
/// # Errors
///
/// Returns `CliError::NotFound` for a path no view serves.
pub fn open(ctx: &Context, path: &str) -> Result<(), CliError> {
    let route = Route::from_path(path).ok_or_else(|| CliError::NotFound(path.to_string()))?;
    output::decision(route, route.authorize(&ctx.store.session()));
    Ok(())
}

/// Print the session every time it changes, including changes made by
/// other processes, until interrupted.
pub async fn watch(ctx: &Context, interval: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let mut changes = ctx.store.subscribe();
    let watcher = ctx.store.spawn_watcher(interval);
    output::session(&changes.borrow_and_update());

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                output::session(&changes.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    watcher.abort();
    Ok(())
}
