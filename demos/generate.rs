use nanogen::{AspectRatio, Config, GenerationClient, GenerationRequest, Quality};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }
    nanogen::logger::init()?;

    let client = GenerationClient::new(Config::from_env())?;

    let request = GenerationRequest::new(
        "a lighthouse on a stormy coast, dramatic waves, golden hour",
        AspectRatio::Widescreen,
        Quality::Hd,
    );

    let result = client.generate(request).await?;
    println!("{}", result.image_url);

    Ok(())
}
