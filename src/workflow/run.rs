//! The Point-to-Site sample run, step by step.

use super::cleanup::{cleanup, CleanupOutcome};
use super::{NetworkProvisioner, UnreadResourceGroup};
use crate::azure::download_client_package;
use crate::models::{ResourceId, VirtualNetworkGateway};
use crate::output::step;
use crate::plan::NetworkPlan;
use std::error::Error;
use std::path::PathBuf;

/// Certificate material and options that are not part of the network plan.
#[derive(Debug, Clone)]
pub struct SampleInputs {
    /// Base64 public data of the root certificate.
    pub root_cert_data: String,
    /// Normalized thumbprint of the client certificate to revoke.
    pub client_cert_thumbprint: String,
    /// Where to save the VPN client package, if anywhere.
    pub download_dir: Option<PathBuf>,
}

/// What one successful run created.
#[derive(Debug, Clone)]
pub struct SampleReport {
    pub resource_group: ResourceId,
    pub vnet: String,
    pub public_ip: String,
    pub gateway: String,
    /// Download URL of the VPN client package.
    pub profile_url: String,
    pub package_path: Option<PathBuf>,
    pub revoked_thumbprint: String,
    pub cleanup: CleanupOutcome,
}

/// Run the sample, then delete whatever resource group it created.
///
/// Cleanup runs on success and on every failure after the resource group
/// exists. The main flow's error is returned after cleanup.
pub async fn run_sample<P: NetworkProvisioner>(
    provisioner: &P,
    plan: &NetworkPlan,
    inputs: &SampleInputs,
) -> Result<SampleReport, Box<dyn Error>> {
    let mut created: Option<ResourceId> = None;
    let result = provision(provisioner, plan, inputs, &mut created).await;
    let outcome = cleanup(provisioner, created.as_ref());
    result.map(|mut report| {
        report.cleanup = outcome;
        report
    })
}

async fn provision<P: NetworkProvisioner>(
    provisioner: &P,
    plan: &NetworkPlan,
    inputs: &SampleInputs,
    created: &mut Option<ResourceId>,
) -> Result<SampleReport, Box<dyn Error>> {
    step(1, "Creating resource group...");
    let group = provisioner
        .create_resource_group(&plan.resource_group, &plan.location)
        .map_err(|e| {
            if let Some(unread) = e.downcast_ref::<UnreadResourceGroup>() {
                *created = Some(unread.id.clone());
            }
            e
        })?;
    *created = Some(group.id.clone());
    log::info!("Created a resource group with name: {}", group.name);

    step(2, "Creating virtual network...");
    let vnet = provisioner.create_virtual_network(plan)?;
    log::info!("Created a virtual network: {vnet}");

    step(3, "Creating public ip...");
    let public_ip = provisioner.create_public_ip(plan)?;
    log::info!(
        "Created public ip: {} ({})",
        public_ip.name,
        public_ip.ip_address.as_deref().unwrap_or("not yet assigned")
    );

    step(4, "Creating virtual network gateway...");
    let gateway = provisioner.create_vpn_gateway(plan, &vnet, &public_ip)?;
    log::info!("Created virtual network gateway: {gateway}");

    step(5, "Creating Point-to-Site configuration...");
    let gateway = provisioner.configure_point_to_site(plan, &inputs.root_cert_data)?;
    check_root_certificate(&gateway, &plan.p2s.root_cert_name)?;
    log::info!("Created Point-to-Site configuration");

    step(6, "Generating VPN profile...");
    let profile_url = provisioner.generate_vpn_profile(plan)?;
    log::info!("Profile generation is done. Please download client package at: {profile_url}");
    let package_path = match &inputs.download_dir {
        Some(dir) => Some(download_client_package(&profile_url, dir, &plan.gateway_name).await?),
        None => None,
    };

    step(7, "Revoking client certificate...");
    let gateway =
        provisioner.revoke_client_certificate(plan, &inputs.client_cert_thumbprint)?;
    if !gateway.p2s().is_revoked(&inputs.client_cert_thumbprint) {
        log::warn!(
            "Gateway {} does not list {} as revoked yet",
            gateway.name,
            inputs.client_cert_thumbprint
        );
    }
    log::info!("Revoked client certificate");

    Ok(SampleReport {
        resource_group: group.id,
        vnet: vnet.to_string(),
        public_ip: public_ip.name,
        gateway: gateway.to_string(),
        profile_url,
        package_path,
        revoked_thumbprint: inputs.client_cert_thumbprint.clone(),
        cleanup: CleanupOutcome::NotNeeded,
    })
}

fn check_root_certificate(
    gateway: &VirtualNetworkGateway,
    cert_name: &str,
) -> Result<(), Box<dyn Error>> {
    if gateway.p2s().has_root_certificate(cert_name) {
        Ok(())
    } else {
        Err(format!(
            "Gateway {} has no root certificate named {cert_name} after update",
            gateway.name
        )
        .into())
    }
}
