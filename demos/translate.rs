//! Translate a phrase through a LibreTranslate instance

use dotenvy::dotenv;
use libretranslate_client::{Format, LibreTranslate};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("=== LibreTranslate Translation Test ===");

    // Check environment variables
    match std::env::var("LIBRETRANSLATE_URL") {
        Ok(url) => println!("✅ LIBRETRANSLATE_URL: {}", url),
        Err(_) => {
            println!("❌ LIBRETRANSLATE_URL is not set");
            return;
        }
    }
    match std::env::var("LIBRETRANSLATE_API_KEY") {
        Ok(_) => println!("✅ LIBRETRANSLATE_API_KEY is set"),
        Err(_) => println!("⚠️  LIBRETRANSLATE_API_KEY not set, sending requests without a key"),
    }

    // Create the client
    println!("\n--- Creating client ---");
    let client = match LibreTranslate::from_env() {
        Ok(c) => {
            println!("✅ Client created");
            println!("   Base URL: {}", c.config().base_url);
            c
        }
        Err(e) => {
            println!("❌ Client creation failed: {}", e);
            return;
        }
    };

    let cancel = CancellationToken::new();

    // Plain text translation
    println!("\n--- Plain text ---");
    match client.translate(&cancel, "Hello, world!", "en", "es").await {
        Ok(translated) => {
            println!("✅ Translation succeeded");
            println!("   Source: Hello, world!");
            println!("   Result: {}", translated);
        }
        Err(e) => {
            println!("❌ Translation failed: {}", e);
            println!("   Error details: {:?}", e);
            return;
        }
    }

    // HTML translation keeps markup intact
    println!("\n--- HTML ---");
    match client
        .translate_with_format(&cancel, "<p>Hello, world!</p>", "en", "es", Format::Html)
        .await
    {
        Ok(translated) => {
            println!("✅ Translation succeeded");
            println!("   Result: {}", translated);
        }
        Err(e) => println!("❌ Translation failed: {}", e),
    }

    println!("\n=== Done ===");
}
