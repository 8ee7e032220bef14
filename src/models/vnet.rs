//! Azure Virtual Network (VNet) data model.

use super::{Ipv4, ResourceId, Subnet};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressSpace {
    #[serde(default)]
    pub address_prefixes: Vec<Ipv4>,
}

/// Represents an Azure Virtual Network with its subnets.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetwork {
    /// Name of the virtual network.
    pub name: String,
    pub id: ResourceId,
    /// Azure region location.
    pub location: String,
    #[serde(default)]
    pub address_space: AddressSpace,
    /// Subnets within this VNet.
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

impl VirtualNetwork {
    /// Find a subnet by name (case-insensitive, as Azure treats it).
    pub fn subnet(&self, name: &str) -> Result<&Subnet, Box<dyn Error>> {
        self.subnets
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                format!(
                    "Subnet '{name}' not found in vnet '{}' (have: {})",
                    self.name,
                    self.subnets
                        .iter()
                        .map(|s| s.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
                .into()
            })
    }

    /// Find a subnet by name and require it to carry `prefix`.
    pub fn subnet_with_prefix(&self, name: &str, prefix: &Ipv4) -> Result<&Subnet, Box<dyn Error>> {
        let subnet = self.subnet(name)?;
        let prefixes = subnet.prefixes();
        if !prefixes.contains(prefix) {
            let have: Vec<String> = prefixes.iter().map(|p| p.to_string()).collect();
            return Err(format!(
                "Subnet '{}' in vnet '{}' has prefixes [{}], expected {prefix}",
                subnet.name,
                self.name,
                have.join(", ")
            )
            .into());
        }
        Ok(subnet)
    }
}

impl fmt::Display for VirtualNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cidrs: Vec<String> = self
            .address_space
            .address_prefixes
            .iter()
            .map(|c| c.to_string())
            .collect();
        write!(
            f,
            "{} [{}] ({} subnets, {})",
            self.name,
            cidrs.join(", "),
            self.subnets.len(),
            self.location
        )
    }
}
