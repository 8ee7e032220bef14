//! Virtual network gateway data model, including its Point-to-Site
//! (VPN client) configuration.

use super::{Ipv4, ResourceId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GatewaySku {
    pub name: String,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

/// Reference to another resource by id (`{"id": "..."}`).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SubResource {
    pub id: ResourceId,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GatewayIpConfiguration {
    pub name: String,
    #[serde(default)]
    pub private_ip_allocation_method: Option<String>,
    #[serde(default)]
    pub public_ip_address: Option<SubResource>,
    #[serde(default)]
    pub subnet: Option<SubResource>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressPool {
    #[serde(default)]
    pub address_prefixes: Vec<Ipv4>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RootCertificate {
    pub name: String,
    #[serde(default)]
    pub public_cert_data: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RevokedCertificate {
    pub name: String,
    pub thumbprint: String,
}

/// Point-to-Site settings of a gateway.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct VpnClientConfiguration {
    #[serde(default)]
    pub vpn_client_address_pool: Option<AddressPool>,
    #[serde(default)]
    pub vpn_client_protocols: Vec<String>,
    #[serde(default)]
    pub vpn_client_root_certificates: Vec<RootCertificate>,
    #[serde(default)]
    pub vpn_client_revoked_certificates: Vec<RevokedCertificate>,
}

impl VpnClientConfiguration {
    pub fn has_root_certificate(&self, name: &str) -> bool {
        self.vpn_client_root_certificates
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn is_revoked(&self, thumbprint: &str) -> bool {
        self.vpn_client_revoked_certificates
            .iter()
            .any(|c| c.thumbprint.eq_ignore_ascii_case(thumbprint))
    }
}

/// Output of `az network vnet-gateway create/update/show`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkGateway {
    pub name: String,
    pub id: ResourceId,
    pub location: String,
    #[serde(default)]
    pub gateway_type: Option<String>,
    #[serde(default)]
    pub vpn_type: Option<String>,
    #[serde(default)]
    pub sku: Option<GatewaySku>,
    #[serde(default)]
    pub enable_bgp: Option<bool>,
    #[serde(default)]
    pub ip_configurations: Vec<GatewayIpConfiguration>,
    #[serde(default)]
    pub vpn_client_configuration: Option<VpnClientConfiguration>,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

impl VirtualNetworkGateway {
    /// P2S configuration, empty when none is attached yet.
    pub fn p2s(&self) -> VpnClientConfiguration {
        self.vpn_client_configuration.clone().unwrap_or_default()
    }
}

impl fmt::Display for VirtualNetworkGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {} sku={}, {})",
            self.name,
            self.gateway_type.as_deref().unwrap_or("?"),
            self.vpn_type.as_deref().unwrap_or("?"),
            self.sku.as_ref().map(|s| s.name.as_str()).unwrap_or("?"),
            self.location
        )
    }
}
