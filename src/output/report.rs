//! Summary of a finished sample run.

use super::terminal::format_label;
use crate::workflow::{CleanupOutcome, SampleReport};
use colored::Colorize;

const LABEL_WIDTH: usize = 17;

/// Render the report as aligned `label: value` lines.
pub fn report_lines(report: &SampleReport) -> Vec<String> {
    let package = report
        .package_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "not downloaded".to_string());
    let cleanup = match &report.cleanup {
        CleanupOutcome::NotNeeded => "nothing to delete".to_string(),
        CleanupOutcome::Deleted(name) => format!("deleted {name}"),
        CleanupOutcome::Failed(e) => format!("FAILED: {e}"),
    };

    [
        ("resource group", report.resource_group.to_string()),
        ("virtual network", report.vnet.clone()),
        ("public ip", report.public_ip.clone()),
        ("gateway", report.gateway.clone()),
        ("client package", report.profile_url.clone()),
        ("saved package", package),
        ("revoked cert", report.revoked_thumbprint.clone()),
        ("cleanup", cleanup),
    ]
    .into_iter()
    .map(|(label, value)| format!("{}{value}", format_label(label, LABEL_WIDTH)))
    .collect()
}

/// Print the report to stdout.
pub fn print_report(report: &SampleReport) {
    println!("{}", "# Point-to-Site sample summary".on_green());
    for line in report_lines(report) {
        println!("  {line}");
    }
    if let CleanupOutcome::Failed(_) = report.cleanup {
        println!(
            "#{}# resource group {} may still exist",
            "NOTE".on_red(),
            report.resource_group
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_report_lines() {
        let report = SampleReport {
            resource_group: "/subscriptions/s1/resourceGroups/NetworkSampleRG1"
                .parse()
                .unwrap(),
            vnet: "vnet1 [192.168.0.0/16] (3 subnets, eastus)".to_string(),
            public_ip: "pip1".to_string(),
            gateway: "vngw1 (Vpn RouteBased sku=VpnGw1, eastus)".to_string(),
            profile_url: "https://example/pkg.zip".to_string(),
            package_path: Some(PathBuf::from("out/vpnclient.zip")),
            revoked_thumbprint: "AB".to_string(),
            cleanup: CleanupOutcome::Deleted("NetworkSampleRG1".to_string()),
        };
        let lines = report_lines(&report);
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[2], "public ip:       pip1");
        assert_eq!(lines[5], "saved package:   out/vpnclient.zip");
        assert_eq!(lines[7], "cleanup:         deleted NetworkSampleRG1");
    }
}
