use std::env;
use std::fs;

use nanogen::{
    enhance, AspectRatio, Config, GenerationClient, GenerationRequest, ImageBlob, Quality,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file first
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    nanogen::logger::init_with_config(
        nanogen::logger::LoggerConfig::development()
            .with_level(nanogen::logger::LogLevel::Debug),
    )?;

    log::info!("🔍 Checking environment...");

    match env::var("KIE_API_KEY") {
        Ok(key) => {
            log::info!("✅ Generation API key found in environment");
            log::debug!("Key starts with: {}...", &key[..5.min(key.len())]);
        }
        Err(_) => {
            log::error!("❌ KIE_API_KEY is not set, generation will fail");
        }
    }

    if env::var("IMGBB_API_KEY").is_err() {
        log::warn!("⚠️  IMGBB_API_KEY not set, reference images will be rejected");
    }

    let config = Config::from_env();

    log::info!("🔄 Creating generation client...");
    let client = match GenerationClient::new(config) {
        Ok(client) => {
            log::info!("✅ Generation client initialized successfully");
            client
        }
        Err(e) => {
            log::error!("❌ Failed to initialize generation client: {}", e);
            return Err(e.into());
        }
    };

    let prompt = env::args()
        .nth(1)
        .unwrap_or_else(|| "a red fox resting under a maple tree".to_string());
    let enhanced = enhance(&prompt);
    log::info!("✨ Prompt: {}", enhanced);

    let mut request = GenerationRequest::new(enhanced, AspectRatio::Widescreen, Quality::Hd);

    // Optional reference image from a local path
    if let Ok(path) = env::var("REFERENCE_IMAGE") {
        let bytes = fs::read(&path)?;
        let file_name = path.rsplit('/').next().unwrap_or("reference.png").to_string();
        request = request.with_images(vec![ImageBlob::new(file_name, bytes)]);
        log::info!("🖼️  Using reference image: {}", path);
    }

    let timer = nanogen::logger::timer("generate");
    let result = client.generate(request).await?;
    drop(timer);

    log::info!("🎉 Image ready: {}", result.image_url);
    println!("{}", result.image_url);

    Ok(())
}
