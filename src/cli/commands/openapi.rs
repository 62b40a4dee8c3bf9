use anyhow::Result;
use tracing::debug;
use utoipa::OpenApi;

use crate::cli::OpenApiFormat;
use crate::schemas::ApiDoc;

/// Render the OpenAPI document in the requested format.
pub fn render_openapi(format: OpenApiFormat) -> Result<String> {
    let doc = ApiDoc::openapi();
    let rendered = match format {
        OpenApiFormat::Json => serde_json::to_string_pretty(&doc)?,
        OpenApiFormat::Yaml => serde_yaml::to_string(&doc)?,
    };
    debug!("Rendered OpenAPI document ({} bytes)", rendered.len());
    Ok(rendered)
}

pub fn print_openapi(format: OpenApiFormat) -> Result<()> {
    println!("{}", render_openapi(format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_both_formats() {
        let json = render_openapi(OpenApiFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["paths"]["/api/listings"].is_object());

        let yaml = render_openapi(OpenApiFormat::Yaml).unwrap();
        assert!(yaml.contains("/api/listings/{listing_id}/like"));
    }
}
