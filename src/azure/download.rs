//! Download of the generated VPN client package.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DOWNLOAD_TIMEOUT_SECS: u64 = 120;

/// File name for a gateway's client package, e.g. `vpnclient_vngw123_2024-05-01.zip`.
pub fn package_file_name(gateway_name: &str, date: chrono::NaiveDate) -> String {
    format!("vpnclient_{gateway_name}_{}.zip", date.format("%Y-%m-%d"))
}

/// Fetch `url` into `dir` and return the written path.
pub async fn download_client_package(
    url: &str,
    dir: &Path,
    gateway_name: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {e}"))?;
    download_with(&client, url, dir, gateway_name).await
}

/// [`download_client_package`] with a caller-supplied HTTP client.
pub async fn download_with(
    client: &reqwest::Client,
    url: &str,
    dir: &Path,
    gateway_name: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| format!("Error creating {}: {e}", dir.display()))?;
    let path = dir.join(package_file_name(
        gateway_name,
        chrono::Utc::now().date_naive(),
    ));

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("Error downloading VPN client package: {e}"))?
        .error_for_status()
        .map_err(|e| format!("HTTP error downloading VPN client package: {e}"))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| format!("Error reading VPN client package: {e}"))?;

    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    log::info!(
        "Saved VPN client package ({} bytes) to {}",
        bytes.len(),
        path.display()
    );
    Ok(path)
}
