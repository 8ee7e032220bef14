//! Service principal sign-in for the Azure CLI.

use super::cli::{parse_json, CommandRunner};
use crate::config::Settings;
use serde::Deserialize;
use std::error::Error;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Subscription id.
    pub id: String,
    /// Subscription display name.
    pub name: String,
    pub tenant_id: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// `az login --service-principal` then select the configured subscription.
///
/// Returns the active account so the caller can log where resources land.
pub fn login_service_principal<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
) -> Result<Account, Box<dyn Error>> {
    log::info!(
        "Logging in as service principal {} (tenant {})",
        settings.client_id,
        settings.tenant_id
    );
    // `@-` makes az read the secret from stdin, so it never shows in argv.
    let login: [&str; 11] = [
        "az",
        "login",
        "--service-principal",
        "--username",
        &settings.client_id,
        "--password",
        "@-",
        "--tenant",
        &settings.tenant_id,
        "--output",
        "none",
    ];
    let login: Vec<String> = login.iter().map(|a| a.to_string()).collect();
    runner
        .run_with_input(&login, &settings.client_secret)
        .map_err(|e| format!("Azure login failed: {e}"))?;

    runner.run_line(&format!(
        "az account set --subscription {}",
        settings.subscription_id
    ))?;

    let out = runner.run_line("az account show --output json")?;
    let account: Account = parse_json(&out, "account")?;
    if !account.id.eq_ignore_ascii_case(&settings.subscription_id) {
        return Err(format!(
            "Active subscription {} does not match SUBSCRIPTION_ID {}",
            account.id, settings.subscription_id
        )
        .into());
    }
    log::info!("Using subscription '{}' ({})", account.name, account.id);
    Ok(account)
}
