use mps_api_sdk::{MpsApiError, MpsClient};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Read configuration from environment variables
    let api_url = env::var("MPS_API_URL").unwrap_or_else(|_| "http://127.0.0.1:9000".to_string());
    let api_key = env::var("MPS_API_KEY").ok();

    // Create a client with optional authentication
    let mut client = MpsClient::new(&api_url)?;

    if let Some(key) = api_key {
        println!("🔐 Using API key authentication");
        client = client.with_api_key(key);
    } else {
        println!("⚠ No API key provided (set MPS_API_KEY environment variable)");
    }

    let text = "NAME auth_demo\nROWS\n N obj\n G c\nCOLUMNS\n x obj 1 c 1\nRHS\n RHS c 2\nENDATA\n";

    println!("📄 Converting MPS document...");

    match client.mps_to_model(text).await {
        Ok(model) => {
            println!("✓ Success!\n");
            println!("{}", serde_json::to_string_pretty(&model)?);
        }
        Err(e) => {
            eprintln!("✗ Error: {}", e);
            match &e {
                MpsApiError::AuthenticationFailed => {
                    eprintln!("\nTip: Make sure MPS_API_KEY is set correctly");
                }
                MpsApiError::ApiError { line: Some(line), .. } => {
                    eprintln!("\nThe document is invalid at line {}", line);
                }
                _ => {}
            }
            return Err(e.into());
        }
    }

    Ok(())
}
