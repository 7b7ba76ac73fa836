//! List the languages a LibreTranslate instance supports

use dotenvy::dotenv;
use libretranslate_client::LibreTranslate;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("=== LibreTranslate Language Listing ===");

    // Check environment variables
    match std::env::var("LIBRETRANSLATE_URL") {
        Ok(url) => println!("✅ LIBRETRANSLATE_URL: {}", url),
        Err(_) => {
            println!("❌ LIBRETRANSLATE_URL is not set");
            return;
        }
    }

    // Create the client
    println!("\n--- Creating client ---");
    let client = match LibreTranslate::from_env() {
        Ok(c) => {
            println!("✅ Client created");
            println!("   Base URL: {}", c.config().base_url);
            println!("   Retry ceiling: {}", c.config().retry_max);
            c
        }
        Err(e) => {
            println!("❌ Client creation failed: {}", e);
            return;
        }
    };

    let cancel = CancellationToken::new();

    // Fetch the supported languages
    println!("\n--- Fetching languages ---");
    match client.get_languages(&cancel).await {
        Ok(languages) => {
            println!("✅ {} languages supported", languages.len());
            for language in &languages {
                println!("   {} ({})", language.name, language.code);
            }
        }
        Err(e) => {
            println!("❌ Language fetch failed: {}", e);
            return;
        }
    }

    // Fetch the frontend settings
    println!("\n--- Fetching frontend settings ---");
    match client.get_frontend_setting(&cancel).await {
        Ok(setting) => {
            println!("✅ Settings fetched");
            println!("   Key required: {}", setting.key_required);
            println!("   Character limit: {}", setting.char_limit);
            println!(
                "   Default pair: {} -> {}",
                setting.language.source.code, setting.language.target.code
            );
        }
        Err(e) => println!("❌ Settings fetch failed: {}", e),
    }

    println!("\n=== Done ===");
}
