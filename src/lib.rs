//! Azure Point-to-Site VPN gateway sample.
//!
//! Creates a resource group, virtual network, public IP and VPN gateway,
//! attaches a Point-to-Site configuration, generates the VPN client package,
//! revokes a client certificate and deletes the resource group again.

pub mod azure;
pub mod certs;
pub mod config;
pub mod models;
pub mod output;
pub mod plan;
pub mod workflow;

use azure::{login_service_principal, AzCli, AzCliProvisioner};
use config::{Cli, Settings};
use plan::NetworkPlan;
use std::error::Error;
use workflow::{run_sample, SampleInputs, SampleReport};

/// Resolve settings and certificates, sign in, and run the sample end to end.
pub async fn run(cli: &Cli, settings: &Settings) -> Result<SampleReport, Box<dyn Error>> {
    // Fail on bad local input before touching Azure.
    let root_cert_data = certs::load_root_certificate(&settings.cert_path)?;
    let client_cert_thumbprint = certs::normalize_thumbprint(&settings.client_cert_thumbprint)?;
    let plan = NetworkPlan::sample(&cli.location, &cli.gateway_sku)?;
    log::info!(
        "Plan: rg={} vnet={} pip={} gateway={} in {}",
        plan.resource_group,
        plan.vnet_name,
        plan.public_ip_name,
        plan.gateway_name,
        plan.location
    );

    let account = login_service_principal(&AzCli, settings)?;

    let inputs = SampleInputs {
        root_cert_data,
        client_cert_thumbprint,
        download_dir: cli.download_dir.clone(),
    };
    run_sample(&AzCliProvisioner::new(&account.id), &plan, &inputs).await
}
