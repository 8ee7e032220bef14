//! Integration tests for azure-vpn-p2s
//!
//! These tests drive the complete sample run against a recording provisioner
//! and check the resource group cleanup contract.

use azure_vpn_p2s::azure::{AzCliProvisioner, CommandRunner};
use azure_vpn_p2s::models::{
    PublicIpAddress, ResourceGroup, ResourceId, VirtualNetwork, VirtualNetworkGateway,
};
use azure_vpn_p2s::plan::NetworkPlan;
use azure_vpn_p2s::workflow::{
    run_sample, CleanupOutcome, NetworkProvisioner, SampleInputs,
};
use std::cell::RefCell;
use std::error::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const THUMBPRINT: &str = "0123456789ABCDEF0123456789ABCDEF01234567";

fn fixture<T: serde::de::DeserializeOwned>(file: &str) -> T {
    let json = std::fs::read_to_string(format!("src/tests/test_data/{file}"))
        .expect("Error reading fixture");
    serde_json::from_str(&json).expect("Error parsing fixture")
}

/// Records each call; fails the step named in `fail_at`.
#[derive(Default)]
struct FakeProvisioner {
    fail_at: Option<&'static str>,
    fail_delete: bool,
    profile_url: Option<String>,
    calls: RefCell<Vec<&'static str>>,
}

impl FakeProvisioner {
    fn failing_at(step: &'static str) -> Self {
        FakeProvisioner {
            fail_at: Some(step),
            ..Default::default()
        }
    }

    fn record(&self, step: &'static str) -> Result<(), Box<dyn Error>> {
        self.calls.borrow_mut().push(step);
        if self.fail_at == Some(step) {
            return Err(format!("{step} failed").into());
        }
        Ok(())
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn deletes(&self) -> usize {
        self.calls().iter().filter(|c| **c == "delete").count()
    }
}

impl NetworkProvisioner for FakeProvisioner {
    fn create_resource_group(&self, _: &str, _: &str) -> Result<ResourceGroup, Box<dyn Error>> {
        self.record("group")?;
        Ok(fixture("group_create.json"))
    }

    fn create_virtual_network(&self, _: &NetworkPlan) -> Result<VirtualNetwork, Box<dyn Error>> {
        self.record("vnet")?;
        Ok(fixture("vnet_show.json"))
    }

    fn create_public_ip(&self, _: &NetworkPlan) -> Result<PublicIpAddress, Box<dyn Error>> {
        self.record("pip")?;
        let wrapped: serde_json::Value = fixture("public_ip_create.json");
        Ok(serde_json::from_value(wrapped["publicIp"].clone())?)
    }

    fn create_vpn_gateway(
        &self,
        _: &NetworkPlan,
        _: &VirtualNetwork,
        _: &PublicIpAddress,
    ) -> Result<VirtualNetworkGateway, Box<dyn Error>> {
        self.record("gateway")?;
        Ok(fixture("vnet_gateway_created.json"))
    }

    fn configure_point_to_site(
        &self,
        _: &NetworkPlan,
        _: &str,
    ) -> Result<VirtualNetworkGateway, Box<dyn Error>> {
        self.record("p2s")?;
        Ok(fixture("vnet_gateway_revoked.json"))
    }

    fn generate_vpn_profile(&self, _: &NetworkPlan) -> Result<String, Box<dyn Error>> {
        self.record("profile")?;
        Ok(self
            .profile_url
            .clone()
            .unwrap_or_else(|| "https://example.blob.core.windows.net/vpn/pkg.zip".to_string()))
    }

    fn revoke_client_certificate(
        &self,
        _: &NetworkPlan,
        _: &str,
    ) -> Result<VirtualNetworkGateway, Box<dyn Error>> {
        self.record("revoke")?;
        Ok(fixture("vnet_gateway_revoked.json"))
    }

    fn delete_resource_group(&self, _: &ResourceId) -> Result<(), Box<dyn Error>> {
        self.calls.borrow_mut().push("delete");
        if self.fail_delete {
            return Err("delete failed".into());
        }
        Ok(())
    }
}

fn inputs() -> SampleInputs {
    SampleInputs {
        root_cert_data: "MIIC5zCCAc".to_string(),
        client_cert_thumbprint: THUMBPRINT.to_string(),
        download_dir: None,
    }
}

fn plan() -> NetworkPlan {
    NetworkPlan::sample("eastus", "VpnGw1").expect("Sample plan must be valid")
}

#[tokio::test]
async fn test_full_run_deletes_group_once() {
    let fake = FakeProvisioner::default();
    let report = run_sample(&fake, &plan(), &inputs())
        .await
        .expect("Sample run should succeed");

    assert_eq!(
        fake.calls(),
        vec!["group", "vnet", "pip", "gateway", "p2s", "profile", "revoke", "delete"]
    );
    assert_eq!(
        report.cleanup,
        CleanupOutcome::Deleted("NetworkSampleRG12345".to_string())
    );
    assert_eq!(report.revoked_thumbprint, THUMBPRINT);
    assert!(report.profile_url.starts_with("https://"));
    assert!(report.package_path.is_none());
}

#[tokio::test]
async fn test_no_delete_when_group_not_created() {
    let fake = FakeProvisioner::failing_at("group");
    let err = run_sample(&fake, &plan(), &inputs()).await.unwrap_err();

    assert_eq!(err.to_string(), "group failed");
    assert_eq!(fake.calls(), vec!["group"]);
    assert_eq!(fake.deletes(), 0);
}

#[tokio::test]
async fn test_delete_after_every_later_failure() {
    for step in ["vnet", "pip", "gateway", "p2s", "profile", "revoke"] {
        let fake = FakeProvisioner::failing_at(step);
        let err = run_sample(&fake, &plan(), &inputs()).await.unwrap_err();

        assert_eq!(err.to_string(), format!("{step} failed"));
        assert_eq!(fake.deletes(), 1, "failure at {step} must delete once");
        assert_eq!(fake.calls().last(), Some(&"delete"));
        assert_eq!(fake.calls()[fake.calls().len() - 2], step);
    }
}

#[tokio::test]
async fn test_delete_failure_does_not_mask_result() {
    let fake = FakeProvisioner {
        fail_delete: true,
        ..Default::default()
    };
    let report = run_sample(&fake, &plan(), &inputs())
        .await
        .expect("Main flow succeeded, cleanup failure is only reported");
    assert_eq!(
        report.cleanup,
        CleanupOutcome::Failed("delete failed".to_string())
    );

    let fake = FakeProvisioner {
        fail_at: Some("gateway"),
        fail_delete: true,
        ..Default::default()
    };
    let err = run_sample(&fake, &plan(), &inputs()).await.unwrap_err();
    assert_eq!(err.to_string(), "gateway failed");
    assert_eq!(fake.deletes(), 1);
}

#[tokio::test]
async fn test_missing_root_certificate_fails_and_cleans_up() {
    struct NoCertProvisioner(FakeProvisioner);

    impl NetworkProvisioner for NoCertProvisioner {
        fn create_resource_group(&self, n: &str, l: &str) -> Result<ResourceGroup, Box<dyn Error>> {
            self.0.create_resource_group(n, l)
        }
        fn create_virtual_network(&self, p: &NetworkPlan) -> Result<VirtualNetwork, Box<dyn Error>> {
            self.0.create_virtual_network(p)
        }
        fn create_public_ip(&self, p: &NetworkPlan) -> Result<PublicIpAddress, Box<dyn Error>> {
            self.0.create_public_ip(p)
        }
        fn create_vpn_gateway(
            &self,
            p: &NetworkPlan,
            v: &VirtualNetwork,
            ip: &PublicIpAddress,
        ) -> Result<VirtualNetworkGateway, Box<dyn Error>> {
            self.0.create_vpn_gateway(p, v, ip)
        }
        fn configure_point_to_site(
            &self,
            p: &NetworkPlan,
            _: &str,
        ) -> Result<VirtualNetworkGateway, Box<dyn Error>> {
            // gateway without any P2S configuration
            self.0.create_vpn_gateway(p, &fixture("vnet_show.json"), &self.0.create_public_ip(p)?)
        }
        fn generate_vpn_profile(&self, p: &NetworkPlan) -> Result<String, Box<dyn Error>> {
            self.0.generate_vpn_profile(p)
        }
        fn revoke_client_certificate(
            &self,
            p: &NetworkPlan,
            t: &str,
        ) -> Result<VirtualNetworkGateway, Box<dyn Error>> {
            self.0.revoke_client_certificate(p, t)
        }
        fn delete_resource_group(&self, g: &ResourceId) -> Result<(), Box<dyn Error>> {
            self.0.delete_resource_group(g)
        }
    }

    let fake = NoCertProvisioner(FakeProvisioner::default());
    let err = run_sample(&fake, &plan(), &inputs()).await.unwrap_err();
    assert!(
        err.to_string().contains("has no root certificate named p2scert.cer"),
        "{err}"
    );
    assert_eq!(fake.0.deletes(), 1);
    assert!(!fake.0.calls().contains(&"profile"));
}

/// Answer a single HTTP request on a local port; returns the base url.
async fn serve_once(body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(body).await.unwrap();
        socket.shutdown().await.ok();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_full_run_downloads_client_package() {
    // the default client honours proxy variables
    std::env::set_var("NO_PROXY", "127.0.0.1");
    let url = serve_once(b"PK\x03\x04package").await;
    let dir = std::env::temp_dir().join(format!("azure-vpn-p2s-it-{}", rand::random::<u32>()));
    let fake = FakeProvisioner {
        profile_url: Some(format!("{url}/vpnclient.zip")),
        ..Default::default()
    };
    let inputs = SampleInputs {
        download_dir: Some(dir.clone()),
        ..inputs()
    };

    let report = run_sample(&fake, &plan(), &inputs)
        .await
        .expect("Sample run with download should succeed");

    let path = report.package_path.expect("Package should be saved");
    assert_eq!(path.parent(), Some(dir.as_path()));
    assert_eq!(std::fs::read(&path).unwrap(), b"PK\x03\x04package");
    assert_eq!(fake.deletes(), 1);
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_failed_download_still_cleans_up() {
    let fake = FakeProvisioner {
        profile_url: Some("not a url".to_string()),
        ..Default::default()
    };
    let inputs = SampleInputs {
        download_dir: Some(std::env::temp_dir().join("azure-vpn-p2s-it-unused")),
        ..inputs()
    };

    let err = run_sample(&fake, &plan(), &inputs).await.unwrap_err();
    assert!(err.to_string().starts_with("Error downloading VPN client package"), "{err}");
    assert!(!fake.calls().contains(&"revoke"));
    assert_eq!(fake.deletes(), 1);
}

/// Replays `az` output by sub command and records every command line.
struct AzReplay {
    group_create: &'static str,
    calls: RefCell<Vec<String>>,
}

impl CommandRunner for &AzReplay {
    fn run(&self, args: &[String]) -> Result<String, Box<dyn Error>> {
        let line = args.join(" ");
        self.calls.borrow_mut().push(line.clone());
        if line.starts_with("az group create") {
            Ok(self.group_create.to_string())
        } else {
            Ok(String::new())
        }
    }

    fn run_with_input(&self, args: &[String], _: &str) -> Result<String, Box<dyn Error>> {
        self.run(args)
    }
}

#[tokio::test]
async fn test_unreadable_group_output_still_deletes_group() {
    let az = AzReplay {
        group_create: r#"{"id": "weird", "name": "NetworkSampleRG12345", "location": "eastus"}"#,
        calls: RefCell::new(Vec::new()),
    };
    let mut plan = plan();
    plan.resource_group = "NetworkSampleRG12345".to_string();

    let err = run_sample(&AzCliProvisioner::with_runner(&az, "sub1"), &plan, &inputs())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("was created but could not be read"), "{err}");
    let calls = az.calls.borrow();
    assert_eq!(calls.len(), 2, "{calls:?}");
    assert!(calls[0].starts_with("az group create --name NetworkSampleRG12345"));
    assert_eq!(
        calls[1],
        "az group delete --name NetworkSampleRG12345 --subscription sub1 --yes --output json"
    );
}
