use betterhunt::{Config, build_rocket};

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    let _rocket = build_rocket(config)?.launch().await?;
    Ok(())
}
