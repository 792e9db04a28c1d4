//! Raw request command: any method and route through the full client stack.

use console::style;

use cs_api::{Method, RequestBody, RequestOptions, ResponseBody};
use cs_core::error::{CsError, CsResult};

use super::Context;
use crate::OutputFormat;

pub async fn run(
    ctx: &Context,
    method: &str,
    path: &str,
    body: Option<String>,
    no_retry: bool,
    format: OutputFormat,
) -> CsResult<()> {
    let method = parse_method(method)?;
    let body = body
        .map(|raw| serde_json::from_str::<serde_json::Value>(&raw))
        .transpose()?
        .map(RequestBody::Json);
    let options = if no_retry {
        RequestOptions::no_retry()
    } else {
        RequestOptions::default()
    };

    let resp = ctx.api.send(method, path, body, options).await?;

    match format {
        OutputFormat::Json => super::print_json(&serde_json::json!({
            "status": resp.status,
            "body": resp.body.clone().into_value(),
        })),
        OutputFormat::Text => {
            println!("{}", style(resp.status).green().bold());
            match &resp.body {
                ResponseBody::Json(value) => super::print_json(value),
                ResponseBody::Text(text) => println!("{text}"),
            }
        }
    }
    Ok(())
}

fn parse_method(raw: &str) -> CsResult<Method> {
    match raw.to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "PATCH" => Ok(Method::PATCH),
        "DELETE" => Ok(Method::DELETE),
        "HEAD" => Ok(Method::HEAD),
        other => Err(CsError::InvalidRequest(format!("unsupported method {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("get").unwrap(), Method::GET);
        assert_eq!(parse_method("Patch").unwrap(), Method::PATCH);
        assert!(parse_method("BREW").is_err());
    }
}
