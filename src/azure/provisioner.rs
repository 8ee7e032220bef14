//! [`NetworkProvisioner`] backed by the Azure CLI.

use super::cli::{parse_enveloped, parse_json, AzCli, CommandRunner};
use crate::config;
use crate::models::{
    PublicIpAddress, ResourceGroup, ResourceId, VirtualNetwork, VirtualNetworkGateway,
};
use crate::plan::NetworkPlan;
use crate::workflow::{NetworkProvisioner, UnreadResourceGroup};
use std::error::Error;

/// ASN used when BGP is requested (Azure's default for VPN gateways).
const DEFAULT_BGP_ASN: &str = "65515";

pub struct AzCliProvisioner<R: CommandRunner = AzCli> {
    runner: R,
    /// Subscription the resources are created in.
    subscription_id: String,
}

impl AzCliProvisioner<AzCli> {
    pub fn new(subscription_id: &str) -> Self {
        Self::with_runner(AzCli, subscription_id)
    }
}

impl<R: CommandRunner> AzCliProvisioner<R> {
    pub fn with_runner(runner: R, subscription_id: &str) -> Self {
        AzCliProvisioner {
            runner,
            subscription_id: subscription_id.to_string(),
        }
    }

    fn show_gateway(&self, plan: &NetworkPlan) -> Result<VirtualNetworkGateway, Box<dyn Error>> {
        let out = self.runner.run_line(&format!(
            "az network vnet-gateway show --resource-group {rg} --name {gw} --output json",
            rg = plan.resource_group,
            gw = plan.gateway_name,
        ))?;
        parse_json(&out, "virtual network gateway")
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

impl<R: CommandRunner> NetworkProvisioner for AzCliProvisioner<R> {
    fn create_resource_group(
        &self,
        name: &str,
        location: &str,
    ) -> Result<ResourceGroup, Box<dyn Error>> {
        let out = self.runner.run_line(&format!(
            "az group create --name {name} --location {location} --output json"
        ))?;
        // The group exists from here on, even if the output is unreadable.
        parse_json(&out, "resource group").map_err(|e| -> Box<dyn Error> {
            match ResourceId::for_resource_group(&self.subscription_id, name) {
                Ok(id) => Box::new(UnreadResourceGroup {
                    id,
                    cause: e.to_string(),
                }),
                Err(_) => e,
            }
        })
    }

    fn create_virtual_network(&self, plan: &NetworkPlan) -> Result<VirtualNetwork, Box<dyn Error>> {
        let (first, rest) = plan
            .subnets
            .split_first()
            .ok_or("Network plan has no subnets")?;
        let prefixes: Vec<String> = plan.address_prefixes.iter().map(|p| p.to_string()).collect();

        self.runner.run_line(&format!(
            "az network vnet create --resource-group {rg} --name {vnet} --location {loc} --address-prefixes {prefixes} --subnet-name {subnet} --subnet-prefixes {subnet_prefix} --output json",
            rg = plan.resource_group,
            vnet = plan.vnet_name,
            loc = plan.location,
            prefixes = prefixes.join(" "),
            subnet = first.name,
            subnet_prefix = first.prefix,
        ))?;

        for subnet in rest {
            log::info!("Adding subnet {} {}", subnet.name, subnet.prefix);
            self.runner.run_line(&format!(
                "az network vnet subnet create --resource-group {rg} --vnet-name {vnet} --name {name} --address-prefixes {prefix} --output json",
                rg = plan.resource_group,
                vnet = plan.vnet_name,
                name = subnet.name,
                prefix = subnet.prefix,
            ))?;
        }

        let out = self.runner.run_line(&format!(
            "az network vnet show --resource-group {rg} --name {vnet} --output json",
            rg = plan.resource_group,
            vnet = plan.vnet_name,
        ))?;
        let vnet: VirtualNetwork = parse_json(&out, "virtual network")?;
        for subnet in &plan.subnets {
            vnet.subnet_with_prefix(&subnet.name, &subnet.prefix)?;
        }
        Ok(vnet)
    }

    fn create_public_ip(&self, plan: &NetworkPlan) -> Result<PublicIpAddress, Box<dyn Error>> {
        let out = self.runner.run_line(&format!(
            "az network public-ip create --resource-group {rg} --name {pip} --location {loc} --sku {sku} --allocation-method {alloc} --output json",
            rg = plan.resource_group,
            pip = plan.public_ip_name,
            loc = plan.location,
            sku = config::PUBLIC_IP_SKU,
            alloc = config::PUBLIC_IP_ALLOCATION,
        ))?;
        parse_enveloped(&out, "publicIp", "public ip")
    }

    fn create_vpn_gateway(
        &self,
        plan: &NetworkPlan,
        vnet: &VirtualNetwork,
        public_ip: &PublicIpAddress,
    ) -> Result<VirtualNetworkGateway, Box<dyn Error>> {
        let gateway_subnet = vnet.subnet(config::GATEWAY_SUBNET_NAME)?;
        log::info!("Binding gateway to subnet {}", gateway_subnet.id);

        let gw = &plan.gateway;
        let mut cmd = args(&[
            "az",
            "network",
            "vnet-gateway",
            "create",
            "--resource-group",
            &plan.resource_group,
            "--name",
            &plan.gateway_name,
            "--location",
            &plan.location,
            "--vnet",
            vnet.id.as_str(),
            "--public-ip-addresses",
            public_ip.id.as_str(),
            "--gateway-type",
            &gw.gateway_type,
            "--vpn-type",
            &gw.vpn_type,
            "--sku",
            &gw.sku,
        ]);
        if !gw.tags.is_empty() {
            cmd.push("--tags".to_string());
            cmd.extend(gw.tags.iter().map(|(k, v)| format!("{k}={v}")));
        }
        if gw.enable_bgp {
            cmd.extend(args(&["--asn", DEFAULT_BGP_ASN]));
        }
        cmd.extend(args(&["--output", "json"]));

        let out = self.runner.run(&cmd)?;
        parse_enveloped(&out, "vnetGateway", "virtual network gateway")
    }

    fn configure_point_to_site(
        &self,
        plan: &NetworkPlan,
        root_cert_data: &str,
    ) -> Result<VirtualNetworkGateway, Box<dyn Error>> {
        let p2s = &plan.p2s;
        let mut cmd = args(&[
            "az",
            "network",
            "vnet-gateway",
            "update",
            "--resource-group",
            &plan.resource_group,
            "--name",
            &plan.gateway_name,
            "--address-prefixes",
            &p2s.address_pool.to_string(),
            "--client-protocol",
        ]);
        cmd.extend(p2s.protocols.iter().cloned());
        cmd.extend(args(&["--output", "json"]));
        self.runner.run(&cmd)?;

        self.runner.run(&args(&[
            "az",
            "network",
            "vnet-gateway",
            "root-cert",
            "create",
            "--resource-group",
            &plan.resource_group,
            "--gateway-name",
            &plan.gateway_name,
            "--name",
            &p2s.root_cert_name,
            "--public-cert-data",
            root_cert_data,
            "--output",
            "json",
        ]))?;

        self.show_gateway(plan)
    }

    fn generate_vpn_profile(&self, plan: &NetworkPlan) -> Result<String, Box<dyn Error>> {
        let out = self.runner.run_line(&format!(
            "az network vnet-gateway vpn-client generate --resource-group {rg} --name {gw} --output json",
            rg = plan.resource_group,
            gw = plan.gateway_name,
        ))?;
        let url: String = parse_json(&out, "vpn client package url")?;
        if !url.starts_with("https://") {
            return Err(format!("Unexpected VPN client package url: '{url}'").into());
        }
        Ok(url)
    }

    fn revoke_client_certificate(
        &self,
        plan: &NetworkPlan,
        thumbprint: &str,
    ) -> Result<VirtualNetworkGateway, Box<dyn Error>> {
        self.runner.run_line(&format!(
            "az network vnet-gateway revoked-cert create --resource-group {rg} --gateway-name {gw} --name {name} --thumbprint {thumbprint} --output json",
            rg = plan.resource_group,
            gw = plan.gateway_name,
            name = plan.p2s.revoked_cert_name,
        ))?;
        self.show_gateway(plan)
    }

    fn delete_resource_group(&self, group: &ResourceId) -> Result<(), Box<dyn Error>> {
        let name = group
            .resource_group()
            .ok_or_else(|| format!("Not a resource group id: {group}"))?;
        self.runner.run_line(&format!(
            "az group delete --name {name} --subscription {sub} --yes --output json",
            sub = group.subscription_id(),
        ))?;
        Ok(())
    }
}
