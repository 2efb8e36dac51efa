//! Prints the JSON schema of the server configuration file

use schemars::schema_for;

#[allow(dead_code)]
mod runtime;

fn main() -> anyhow::Result<()> {
    let schema = schema_for!(runtime::Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
