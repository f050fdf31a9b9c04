use freshness::tracing::setup_tracing;
use freshness::{Identity, SessionPhase};
use sitedesk::AppShell;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("starting sitedesk shell");
    let shell = AppShell::new();

    // Sign in and wait for the initial load sequence to settle.
    shell.sign_in(Identity::new("u-ada"));
    let phase = await_settled(&shell).await;
    match phase {
        SessionPhase::Ready => info!("session ready"),
        SessionPhase::Failed(reason) => {
            warn!(%reason, "initial load failed");
            return Err(reason);
        }
        other => return Err(format!("unexpected phase: {other}")),
    }

    for project in shell.projects().snapshot().await {
        info!(
            project = %project.name,
            status = ?project.status,
            open_todos = project.open_todos(),
            "project"
        );
    }
    info!(
        users = shell.users().snapshot().await.len(),
        companies = shell.companies().snapshot().await.len(),
        "directory loaded"
    );

    // Simulate the tab coming back to the foreground.
    shell
        .visibility_regained()
        .await
        .map_err(|e| e.to_string())?;

    shell.sign_out().await;
    shell.shutdown().await.map_err(|e| e.to_string())?;

    info!("sitedesk shell stopped");
    Ok(())
}

/// Waits until the session phase leaves `Resolving` (and the initial
/// `Unresolved`).
async fn await_settled(shell: &AppShell) -> SessionPhase {
    let mut phases = shell.handle().phase_watch();
    loop {
        let current = phases.borrow_and_update().clone();
        match current {
            SessionPhase::Ready | SessionPhase::Failed(_) => return current,
            _ => {
                if phases.changed().await.is_err() {
                    return shell.phase();
                }
            }
        }
    }
}
