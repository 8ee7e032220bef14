//! Azure public IP address data model.

use super::ResourceId;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PublicIpSku {
    pub name: String,
    #[serde(default)]
    pub tier: Option<String>,
}

/// Output of `az network public-ip create` (inside its `publicIp` envelope).
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpAddress {
    pub name: String,
    pub id: ResourceId,
    pub location: String,
    /// Not assigned until the gateway is attached when allocation is Dynamic.
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub public_ip_allocation_method: Option<String>,
    #[serde(default)]
    pub sku: Option<PublicIpSku>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}
