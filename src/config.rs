//! Sample topology constants, environment settings and command line flags.

use clap::Parser;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_LOCATION: &str = "eastus";
pub const VNET_ADDRESS_PREFIXES: [&str; 2] = ["192.168.0.0/16", "10.254.0.0/16"];
pub const GATEWAY_SUBNET_NAME: &str = "GatewaySubnet";
/// (name, prefix) of every subnet; the gateway subnet comes first.
pub const SUBNETS: [(&str, &str); 3] = [
    (GATEWAY_SUBNET_NAME, "192.168.200.0/24"),
    ("FrontEnd", "192.168.1.0/24"),
    ("BackEnd", "10.254.1.0/24"),
];

pub const GATEWAY_TYPE: &str = "Vpn";
pub const VPN_TYPE: &str = "RouteBased";
pub const DEFAULT_GATEWAY_SKU: &str = "VpnGw1";
pub const GATEWAY_TAGS: [(&str, &str); 1] = [("key", "value")];

pub const P2S_ADDRESS_POOL: &str = "172.16.201.0/24";
pub const P2S_CLIENT_PROTOCOLS: [&str; 2] = ["IkeV2", "SSTP"];
pub const ROOT_CERT_NAME: &str = "p2scert.cer";
pub const REVOKED_CERT_NAME: &str = "p2sclientcert.cer";

pub const PUBLIC_IP_SKU: &str = "Standard";
pub const PUBLIC_IP_ALLOCATION: &str = "Static";

pub const RG_PREFIX: &str = "NetworkSampleRG";
pub const VNET_PREFIX: &str = "vnet";
pub const PIP_PREFIX: &str = "pip";
pub const GATEWAY_PREFIX: &str = "vngw";

/// Provision a Point-to-Site VPN gateway in a throw-away resource group,
/// then delete it again.
#[derive(Parser, Debug)]
#[command(name = "azure-vpn-p2s")]
#[command(about = "Azure Point-to-Site VPN gateway sample", long_about = None)]
pub struct Cli {
    /// Azure region for every resource
    #[arg(long, default_value = DEFAULT_LOCATION)]
    pub location: String,
    /// Virtual network gateway SKU (e.g. VpnGw1, VpnGw2)
    #[arg(long, default_value = DEFAULT_GATEWAY_SKU)]
    pub gateway_sku: String,
    /// Download the generated VPN client package into this directory
    #[arg(long)]
    pub download_dir: Option<PathBuf>,
    /// log4rs configuration file
    #[arg(long, default_value = "log4rs.yml")]
    pub log_config: PathBuf,
}

/// Values read from the environment (or `.env`).
#[derive(Clone, PartialEq)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub subscription_id: String,
    /// Root certificate (.cer) uploaded to the gateway.
    pub cert_path: PathBuf,
    /// Thumbprint of the client certificate to revoke.
    pub client_cert_thumbprint: String,
}

impl Settings {
    pub fn from_env() -> Result<Settings, Box<dyn Error>> {
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; reports all missing keys at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Settings, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut get = |key: &'static str| match lookup(key) {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => {
                missing.push(key);
                String::new()
            }
        };

        let settings = Settings {
            client_id: get("CLIENT_ID"),
            client_secret: get("CLIENT_SECRET"),
            tenant_id: get("TENANT_ID"),
            subscription_id: get("SUBSCRIPTION_ID"),
            cert_path: PathBuf::from(get("CERT_PATH")),
            client_cert_thumbprint: get("CLIENT_CERT_THUMBPRINT"),
        };

        if !missing.is_empty() {
            return Err(format!(
                "Missing environment variable(s): {}",
                missing.join(", ")
            )
            .into());
        }
        Ok(settings)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("tenant_id", &self.tenant_id)
            .field("subscription_id", &self.subscription_id)
            .field("cert_path", &self.cert_path)
            .field("client_cert_thumbprint", &self.client_cert_thumbprint)
            .finish()
    }
}
