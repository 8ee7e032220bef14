//! Domain models for the Point-to-Site sample.
//!
//! This module contains the data structures decoded from the Azure CLI:
//! - [`Ipv4`] - IPv4 address with CIDR notation support
//! - [`ResourceId`] - parsed ARM resource identifiers
//! - [`ResourceGroup`], [`VirtualNetwork`], [`Subnet`], [`PublicIpAddress`]
//! - [`VirtualNetworkGateway`] and its [`VpnClientConfiguration`]

mod gateway;
mod ipv4;
mod public_ip;
mod resource_group;
mod resource_id;
mod subnet;
mod vnet;

// Re-export public types
pub use gateway::{
    AddressPool, GatewayIpConfiguration, GatewaySku, RevokedCertificate, RootCertificate,
    SubResource, VirtualNetworkGateway, VpnClientConfiguration,
};
pub use ipv4::{get_cidr_mask, Ipv4};
pub use public_ip::{PublicIpAddress, PublicIpSku};
pub use resource_group::{ResourceGroup, ResourceGroupProperties};
pub use resource_id::ResourceId;
pub use subnet::Subnet;
pub use vnet::{AddressSpace, VirtualNetwork};
