//! Executing a sync plan: pre-send hook, transfer, post-send hook.

use crate::error::{Error, Result};
use crate::plan::SyncPlan;
use crate::runner::Runner;

/// Sends the project described by `plan`.
///
/// The pre-send hook runs first; if it fails, neither the transfer nor the
/// post-send hook runs. The post-send hook only runs after a successful
/// transfer. Hooks are skipped in dry-run mode, the transfer itself runs
/// with `--dry-run`. A failed transfer is reported, not retried.
pub fn send(plan: &SyncPlan, runner: &mut dyn Runner) -> Result<()> {
    if plan.dry_run {
        println!("****** DRY RUN ******");
        println!("No changes will be made.");
    }

    if !plan.dry_run {
        if let Some(hook) = plan.pre_hook() {
            println!("Executing pre-send command...");
            hook.run(&plan.project, runner)?;
        }
    }

    let command = plan.transfer_command();
    println!("Syncing project '{}'...", plan.project);
    println!("Source: {}", plan.local_path.display());
    println!("Remote: {}", plan.remote);
    println!("Port: {}", plan.port);
    if let Some(dir) = &plan.backup_dir {
        println!("Backup Dir: {dir}");
    }
    println!("Executing command: {command}");

    let code = runner.run(&command)?;
    if code != Some(0) {
        return Err(Error::Transfer {
            project: plan.project.clone(),
            code,
        });
    }
    println!("\nSync completed successfully.");

    if !plan.dry_run {
        if let Some(hook) = plan.post_hook() {
            println!("Executing post-send command...");
            if let Err(e) = hook.run(&plan.project, runner) {
                tracing::warn!(project = %plan.project, error = %e, "post-send command failed");
                return Err(e);
            }
        }
    }
    Ok(())
}
