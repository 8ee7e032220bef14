//! Inputs of one sample run.
//!
//! - [`names`] - random resource names
//! - [`validate`] - address plan checks done before any remote call

mod names;
mod validate;

pub use names::{random_name, MAX_NAME_LENGTH};
pub use validate::validate_plan;

use crate::config;
use crate::models::Ipv4;
use std::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct SubnetSpec {
    pub name: String,
    pub prefix: Ipv4,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySpec {
    pub sku: String,
    pub gateway_type: String,
    pub vpn_type: String,
    pub enable_bgp: bool,
    pub tags: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointToSiteSpec {
    /// Pool VPN clients get their addresses from.
    pub address_pool: Ipv4,
    pub protocols: Vec<String>,
    pub root_cert_name: String,
    pub revoked_cert_name: String,
}

/// Everything the workflow creates, decided up front.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkPlan {
    pub resource_group: String,
    pub location: String,
    pub vnet_name: String,
    pub public_ip_name: String,
    pub gateway_name: String,
    pub address_prefixes: Vec<Ipv4>,
    /// Subnets in creation order, the gateway subnet first.
    pub subnets: Vec<SubnetSpec>,
    pub gateway: GatewaySpec,
    pub p2s: PointToSiteSpec,
}

impl NetworkPlan {
    /// The sample topology with fresh random names.
    pub fn sample(location: &str, gateway_sku: &str) -> Result<NetworkPlan, Box<dyn Error>> {
        let address_prefixes = config::VNET_ADDRESS_PREFIXES
            .iter()
            .map(|p| Ipv4::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let subnets = config::SUBNETS
            .iter()
            .map(|(name, prefix)| {
                Ok(SubnetSpec {
                    name: name.to_string(),
                    prefix: Ipv4::new(prefix)?,
                })
            })
            .collect::<Result<Vec<_>, Box<dyn Error>>>()?;

        let plan = NetworkPlan {
            resource_group: random_name(config::RG_PREFIX),
            location: location.to_string(),
            vnet_name: random_name(config::VNET_PREFIX),
            public_ip_name: random_name(config::PIP_PREFIX),
            gateway_name: random_name(config::GATEWAY_PREFIX),
            address_prefixes,
            subnets,
            gateway: GatewaySpec {
                sku: gateway_sku.to_string(),
                gateway_type: config::GATEWAY_TYPE.to_string(),
                vpn_type: config::VPN_TYPE.to_string(),
                enable_bgp: false,
                tags: config::GATEWAY_TAGS
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
            p2s: PointToSiteSpec {
                address_pool: Ipv4::new(config::P2S_ADDRESS_POOL)?,
                protocols: config::P2S_CLIENT_PROTOCOLS
                    .iter()
                    .map(|p| p.to_string())
                    .collect(),
                root_cert_name: config::ROOT_CERT_NAME.to_string(),
                revoked_cert_name: config::REVOKED_CERT_NAME.to_string(),
            },
        };
        validate_plan(&plan)?;
        Ok(plan)
    }

    /// The subnet the gateway is bound to.
    pub fn gateway_subnet(&self) -> Option<&SubnetSpec> {
        self.subnets
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(config::GATEWAY_SUBNET_NAME))
    }
}
