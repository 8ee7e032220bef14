//! Azure subnet data model.

use super::{Ipv4, ResourceId};
use serde::{Deserialize, Serialize};

/// A subnet as returned by `az network vnet show` / `az network vnet subnet create`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    /// Name of the subnet.
    pub name: String,
    /// ARM id, used to bind the gateway IP configuration.
    pub id: ResourceId,
    /// Single address prefix (older API shape).
    #[serde(default)]
    pub address_prefix: Option<Ipv4>,
    /// Address prefixes (newer API shape).
    #[serde(default)]
    pub address_prefixes: Option<Vec<Ipv4>>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

impl Subnet {
    /// Every prefix of the subnet whichever shape the CLI returned.
    pub fn prefixes(&self) -> Vec<Ipv4> {
        let mut prefixes: Vec<Ipv4> = self.address_prefix.into_iter().collect();
        if let Some(more) = &self.address_prefixes {
            prefixes.extend(more.iter().filter(|p| Some(**p) != self.address_prefix));
        }
        prefixes
    }
}
