//! Teardown of the sample's resource group.

use super::NetworkProvisioner;
use crate::models::ResourceId;

/// What the cleanup step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Nothing was created, so nothing was deleted.
    NotNeeded,
    /// The resource group with this name was deleted.
    Deleted(String),
    /// Deletion was attempted and failed; the message is kept for the report.
    Failed(String),
}

/// Delete the resource group if one was created.
///
/// A failed deletion is logged and reported, never returned.
pub fn cleanup<P: NetworkProvisioner>(
    provisioner: &P,
    group: Option<&ResourceId>,
) -> CleanupOutcome {
    let Some(group) = group else {
        log::info!("Did not create any resources in Azure. No clean up is necessary");
        return CleanupOutcome::NotNeeded;
    };

    let name = group.resource_group().unwrap_or(group.name()).to_string();
    log::info!("Deleting Resource Group...");
    match provisioner.delete_resource_group(group) {
        Ok(()) => {
            log::info!("Deleted Resource Group: {name}");
            CleanupOutcome::Deleted(name)
        }
        Err(e) => {
            log::error!("Failed to delete Resource Group {name}: {e}");
            log::error!("Delete it manually: az group delete --name {name} --yes");
            CleanupOutcome::Failed(e.to_string())
        }
    }
}
