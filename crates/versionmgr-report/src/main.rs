use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use versionmgr_view::{ReportRequest, ReportResponse};

/// Tell a versionmgr server what is running on this machine.
#[derive(Parser, Debug)]
#[command(about, disable_version_flag = true)]
struct Args {
    /// Base URL of the versionmgr server.
    #[arg(long, env = "VERSIONMGR_URL")]
    url: String,

    #[arg(long, env = "VERSIONMGR_APPLICATION")]
    application: String,

    #[arg(long = "version", env = "VERSIONMGR_VERSION")]
    app_version: String,

    /// Defaults to this machine's hostname.
    #[arg(long, env = "VERSIONMGR_HOST")]
    host: Option<String>,

    #[arg(long, env = "VERSIONMGR_DEPLOYMENT")]
    deployment: Option<String>,

    #[arg(long, env = "VERSIONMGR_CLUSTER")]
    cluster: Option<String>,

    #[arg(long, env = "VERSIONMGR_ARGUMENTS", allow_hyphen_values = true)]
    arguments: Option<String>,
}

fn local_hostname() -> Option<String> {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn report_endpoint(base: &str) -> String {
    format!("{}/version", base.trim_end_matches('/'))
}

impl Args {
    fn into_request(self) -> (String, ReportRequest) {
        let endpoint = report_endpoint(&self.url);
        let req = ReportRequest {
            host: self.host.or_else(local_hostname),
            application: Some(self.application),
            version: Some(self.app_version),
            deployment: self.deployment,
            arguments: self.arguments,
            cluster: self.cluster,
        };
        (endpoint, req)
    }
}

async fn send(endpoint: &str, req: &ReportRequest) -> anyhow::Result<ReportResponse> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("versionmgr-report/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()?;

    let resp = client
        .post(endpoint)
        .json(req)
        .send()
        .await
        .with_context(|| format!("post report to {endpoint}"))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("versionmgr answered {status}: {}", body.trim());
    }

    resp.json().await.context("parse report response")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (endpoint, req) = Args::parse().into_request();
    tracing::debug!(%endpoint, ?req, "reporting");

    let resp = send(&endpoint, &req).await?;
    println!("{}", resp.previous.version.as_deref().unwrap_or("none"));

    Ok(())
}
