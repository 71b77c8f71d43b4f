/*
[INPUT]:  CLI arguments, YAML configuration file, private key file
[OUTPUT]: Signed gateway request (dry run) or the gateway's JSON response
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or the request flow
*/

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use alipay_gateway_cli::request::verify_request;
use alipay_gateway_cli::{CliConfig, DryRunReport, build_client, build_request, parse_param};

#[derive(Parser, Debug)]
#[command(name = "alipay-gateway-cli", version, about = "Signed payment gateway request runner")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: PathBuf,
    /// Gateway method, e.g. alipay.trade.query
    #[arg(long = "method", value_name = "NAME")]
    method: String,
    /// Business content as JSON
    #[arg(long = "biz", value_name = "JSON", default_value = "{}")]
    biz: String,
    /// Extra or overriding request field, repeatable
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param_arg)]
    params: Vec<(String, String)>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    /// Print the signed request instead of sending it
    #[arg(long = "dry-run")]
    dry_run: bool,
    /// Check the produced signature against the configured key
    #[arg(long = "verify")]
    verify: bool,
}

fn parse_param_arg(raw: &str) -> std::result::Result<(String, String), String> {
    parse_param(raw).map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    info!(
        config_path = %args.config_path.display(),
        method = %args.method,
        dry_run = args.dry_run,
        "starting alipay-gateway-cli"
    );

    let config = CliConfig::from_file(&args.config_path).context("load config")?;
    info!(app_id = %config.app_id, gateway_url = %config.gateway_url, "configuration loaded");

    let client = build_client(&config)?;
    let request = build_request(&client, &args.method, &args.biz, &args.params)?;

    if args.dry_run {
        let report = DryRunReport::new(&client, &request, args.verify);
        if report.verified == Some(false) {
            warn!("signature failed self-verification");
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.verify && !verify_request(&client, &request) {
        return Err(anyhow!("signature failed self-verification"));
    }

    let response = client.send(request).await.context("send request")?;
    if let Ok(business) = response.business(&args.method) {
        info!(code = %business.code, msg = %business.msg, "business result");
    }
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
