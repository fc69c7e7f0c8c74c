//! Export the REST `OpenAPI` document as JSON.
//!
//! Usage: `cargo run --bin export_openapi > openapi.json`

#![allow(clippy::print_stdout)]

use civicdata_api::rest::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), serde_json::Error> {
    print!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
