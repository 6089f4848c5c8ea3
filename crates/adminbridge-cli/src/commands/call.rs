use std::str::FromStr;

use adminbridge_core::{AdminBridge, ApiRequest, Method, ResponseType};
use anyhow::{Context, Result, anyhow, bail};
use colored::Colorize;
use serde_json::Value;

use crate::cli::CallArgs;
use crate::output::{OutputFormat, json::print_json};

pub async fn run(bridge: &AdminBridge, args: CallArgs, format: OutputFormat) -> Result<()> {
    let request = build_request(&args)?;

    if let Some(output) = &args.output {
        let body = bridge
            .client
            .invoke_bytes(request.with_response_type(ResponseType::Bytes))
            .await?;
        std::fs::write(output, &body).with_context(|| format!("Failed to write {}", output))?;
        println!("{} Wrote {} bytes to {}", "✓".green().bold(), body.len(), output);
        return Ok(());
    }

    let response = bridge.client.invoke(request).await?;

    if format.is_json() {
        return print_json(&response);
    }

    if let Some(message) = &response.message {
        eprintln!("{} {}", "message:".dimmed(), message);
    }
    if let (Some(rows), Some(total)) = (response.rows(), response.row_total()) {
        eprintln!("{} {} of {}", "rows:".dimmed(), rows.len(), total);
    }
    print_json(&response.data)
}

fn build_request(args: &CallArgs) -> Result<ApiRequest> {
    let method = Method::from_str(&args.method.to_uppercase())
        .map_err(|_| anyhow!("Invalid HTTP method: {}", args.method))?;
    let mut request = ApiRequest::new(method, args.path.clone());

    if let Some(params) = &args.params {
        let params = parse_json("--params", params)?;
        if !params.is_object() {
            bail!("--params must be a JSON object");
        }
        request = request.with_params(params);
    }

    if let Some(data) = &args.data {
        request = request.with_json(parse_json("--data", data)?);
    }

    for header in &args.headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| anyhow!("Header must look like 'name: value', got '{}'", header))?;
        request = request.with_header(name.trim(), value.trim());
    }

    Ok(request)
}

fn parse_json(flag: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("{} is not valid JSON", flag))
}
