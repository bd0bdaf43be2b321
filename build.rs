use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};

/// Stamps the binary with its build time, sent to the backend as `X-Build-Timestamp`.
fn main() -> Result<(), Box<dyn Error>> {
    // Set build timestamp in milliseconds since epoch
    let build_timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)?
        .as_millis()
        .to_string();
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", build_timestamp);
    println!("cargo:rerun-if-changed=build.rs");

    Ok(())
}
