//! Address plan checks, run before any resource is created.

use super::NetworkPlan;
use crate::config;
use std::error::Error;

/// Smallest subnet Azure accepts.
const MAX_SUBNET_MASK: u8 = 29;
/// `GatewaySubnet` must be /27 or larger for VpnGw SKUs.
const MAX_GATEWAY_SUBNET_MASK: u8 = 27;

/// Check names, containment and overlap of every prefix in the plan.
///
/// Returns one error listing every problem found.
pub fn validate_plan(plan: &NetworkPlan) -> Result<(), Box<dyn Error>> {
    let mut problems: Vec<String> = Vec::new();

    for (label, name) in [
        ("resource group", &plan.resource_group),
        ("virtual network", &plan.vnet_name),
        ("public ip", &plan.public_ip_name),
        ("gateway", &plan.gateway_name),
        ("location", &plan.location),
        ("gateway sku", &plan.gateway.sku),
    ] {
        if name.trim().is_empty() {
            problems.push(format!("{label} name is empty"));
        }
    }

    if plan.address_prefixes.is_empty() {
        problems.push("virtual network has no address prefix".to_string());
    }
    for (i, a) in plan.address_prefixes.iter().enumerate() {
        if !a.is_network_addr() {
            problems.push(format!("address prefix {a} is not a network address"));
        }
        for b in plan.address_prefixes.iter().skip(i + 1) {
            if a.overlaps(b) {
                problems.push(format!("address prefixes {a} and {b} overlap"));
            }
        }
    }

    match plan.gateway_subnet() {
        None => problems.push(format!(
            "no subnet named {}",
            config::GATEWAY_SUBNET_NAME
        )),
        Some(gw) if gw.prefix.mask > MAX_GATEWAY_SUBNET_MASK => problems.push(format!(
            "{} {} is smaller than /{MAX_GATEWAY_SUBNET_MASK}",
            gw.name, gw.prefix
        )),
        Some(_) => {}
    }

    for (i, s) in plan.subnets.iter().enumerate() {
        if s.prefix.mask > MAX_SUBNET_MASK {
            problems.push(format!(
                "subnet {} {} is smaller than /{MAX_SUBNET_MASK}",
                s.name, s.prefix
            ));
        }
        if !s.prefix.is_network_addr() {
            problems.push(format!(
                "subnet {} {} is not a network address",
                s.name, s.prefix
            ));
        }
        if !plan.address_prefixes.iter().any(|p| p.contains(&s.prefix)) {
            problems.push(format!(
                "subnet {} {} is outside the virtual network address space",
                s.name, s.prefix
            ));
        }
        for other in plan.subnets.iter().skip(i + 1) {
            if s.name.eq_ignore_ascii_case(&other.name) {
                problems.push(format!("subnet name {} is used twice", s.name));
            }
            if s.prefix.overlaps(&other.prefix) {
                problems.push(format!(
                    "subnets {} {} and {} {} overlap",
                    s.name, s.prefix, other.name, other.prefix
                ));
            }
        }
    }

    let pool = plan.p2s.address_pool;
    if let Some(p) = plan.address_prefixes.iter().find(|p| p.overlaps(&pool)) {
        problems.push(format!(
            "P2S address pool {pool} overlaps virtual network prefix {p}"
        ));
    }
    if plan.p2s.protocols.is_empty() {
        problems.push("P2S configuration has no client protocol".to_string());
    }

    if problems.is_empty() {
        log::debug!("Network plan for {} is valid", plan.resource_group);
        Ok(())
    } else {
        for p in &problems {
            log::error!("Invalid network plan: {p}");
        }
        Err(format!("Invalid network plan: {}", problems.join("; ")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ipv4;
    use crate::plan::SubnetSpec;

    fn plan() -> NetworkPlan {
        NetworkPlan::sample("eastus", "VpnGw1").expect("sample plan must be valid")
    }

    fn subnet(name: &str, prefix: &str) -> SubnetSpec {
        SubnetSpec {
            name: name.to_string(),
            prefix: Ipv4::new(prefix).unwrap(),
        }
    }

    #[test]
    fn test_sample_is_valid() {
        assert!(validate_plan(&plan()).is_ok());
    }

    #[test]
    fn test_missing_gateway_subnet() {
        let mut p = plan();
        p.subnets.retain(|s| s.name != "GatewaySubnet");
        let err = validate_plan(&p).unwrap_err().to_string();
        assert!(err.contains("no subnet named GatewaySubnet"), "{err}");
    }

    #[test]
    fn test_gateway_subnet_too_small() {
        let mut p = plan();
        p.subnets[0] = subnet("GatewaySubnet", "192.168.200.0/28");
        let err = validate_plan(&p).unwrap_err().to_string();
        assert!(err.contains("smaller than /27"), "{err}");
    }

    #[test]
    fn test_subnet_outside_vnet() {
        let mut p = plan();
        p.subnets.push(subnet("Stray", "10.0.0.0/24"));
        let err = validate_plan(&p).unwrap_err().to_string();
        assert!(err.contains("Stray 10.0.0.0/24 is outside"), "{err}");
    }

    #[test]
    fn test_overlapping_subnets() {
        let mut p = plan();
        p.subnets.push(subnet("FrontEnd2", "192.168.1.128/25"));
        let err = validate_plan(&p).unwrap_err().to_string();
        assert!(err.contains("FrontEnd 192.168.1.0/24 and FrontEnd2"), "{err}");
    }

    #[test]
    fn test_duplicate_subnet_name() {
        let mut p = plan();
        p.subnets.push(subnet("backend", "10.254.2.0/24"));
        let err = validate_plan(&p).unwrap_err().to_string();
        assert!(err.contains("subnet name BackEnd is used twice"), "{err}");
    }

    #[test]
    fn test_pool_overlapping_vnet() {
        let mut p = plan();
        p.p2s.address_pool = Ipv4::new("10.254.128.0/24").unwrap();
        let err = validate_plan(&p).unwrap_err().to_string();
        assert!(
            err.contains("P2S address pool 10.254.128.0/24 overlaps virtual network prefix 10.254.0.0/16"),
            "{err}"
        );
    }

    #[test]
    fn test_reports_every_problem() {
        let mut p = plan();
        p.location = " ".to_string();
        p.subnets.push(subnet("Host", "192.168.3.5/24"));
        let err = validate_plan(&p).unwrap_err().to_string();
        assert!(err.contains("location name is empty"), "{err}");
        assert!(err.contains("Host 192.168.3.5/24 is not a network address"), "{err}");
    }
}
