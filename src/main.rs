use clap::Parser;
use color_eyre::eyre::Report;
use messagely::Settings;
use messagely::error_layer::ErrorLayer;

#[tokio::main]
async fn main() -> Result<(), Report> {
    ErrorLayer.setup()?;
    let settings = Settings::parse();
    messagely::run(settings).await
}
