//! The remote operations the sample performs, one method per step.

use crate::models::{
    PublicIpAddress, ResourceGroup, ResourceId, VirtualNetwork, VirtualNetworkGateway,
};
use crate::plan::NetworkPlan;
use std::error::Error;
use std::fmt;

/// The resource group was created but its details could not be read back.
///
/// Returned by [`NetworkProvisioner::create_resource_group`] so the group is
/// still deleted during cleanup.
#[derive(Debug)]
pub struct UnreadResourceGroup {
    /// Id of the group that exists now.
    pub id: ResourceId,
    pub cause: String,
}

impl fmt::Display for UnreadResourceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resource group {} was created but could not be read: {}", self.id, self.cause)
    }
}

impl Error for UnreadResourceGroup {}

/// Each call returns once the remote long-running operation has completed.
pub trait NetworkProvisioner {
    /// Fails with [`UnreadResourceGroup`] when the group exists but its
    /// description could not be decoded.
    fn create_resource_group(
        &self,
        name: &str,
        location: &str,
    ) -> Result<ResourceGroup, Box<dyn Error>>;

    /// Create the virtual network with every subnet of the plan.
    fn create_virtual_network(&self, plan: &NetworkPlan) -> Result<VirtualNetwork, Box<dyn Error>>;

    fn create_public_ip(&self, plan: &NetworkPlan) -> Result<PublicIpAddress, Box<dyn Error>>;

    /// Create the gateway bound to `GatewaySubnet` of `vnet` and to `public_ip`.
    fn create_vpn_gateway(
        &self,
        plan: &NetworkPlan,
        vnet: &VirtualNetwork,
        public_ip: &PublicIpAddress,
    ) -> Result<VirtualNetworkGateway, Box<dyn Error>>;

    /// Attach the client address pool, protocols and root certificate.
    fn configure_point_to_site(
        &self,
        plan: &NetworkPlan,
        root_cert_data: &str,
    ) -> Result<VirtualNetworkGateway, Box<dyn Error>>;

    /// Generate the VPN client package and return its download URL.
    fn generate_vpn_profile(&self, plan: &NetworkPlan) -> Result<String, Box<dyn Error>>;

    fn revoke_client_certificate(
        &self,
        plan: &NetworkPlan,
        thumbprint: &str,
    ) -> Result<VirtualNetworkGateway, Box<dyn Error>>;

    fn delete_resource_group(&self, group: &ResourceId) -> Result<(), Box<dyn Error>>;
}
