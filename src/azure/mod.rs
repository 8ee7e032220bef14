//! Azure CLI interaction.
//!
//! This module handles all Azure-related operations:
//! - [`cli`] - Command execution for Azure CLI
//! - [`login`] - Service principal sign-in
//! - [`provisioner`] - The sample's resources, created and deleted through `az`
//! - [`download`] - Fetching the generated VPN client package

mod cli;
mod download;
mod login;
mod provisioner;

// Re-export public types and functions
pub use cli::{parse_enveloped, parse_json, redact, run_args, split_command, AzCli, CommandRunner};
pub use download::{download_client_package, package_file_name};
pub use login::{login_service_principal, Account};
pub use provisioner::AzCliProvisioner;
