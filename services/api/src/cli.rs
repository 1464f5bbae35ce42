use crate::infra::{build_pipeline, parse_condition};
use crate::server;
use clap::{Args, Parser, Subcommand};
use outfit_ai::config::AppConfig;
use outfit_ai::error::AppError;
use outfit_ai::workflows::outfits::{Garment, GenerationRequest, WeatherCondition, WeatherContext};
use outfit_ai::workflows::wardrobe::WardrobeImporter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Outfit AI",
    about = "Serve or run daily outfit generation from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Generate outfits from a wardrobe CSV and print them as JSON
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Wardrobe CSV to preload into the in-memory store
    #[arg(long)]
    pub(crate) wardrobe: Option<PathBuf>,
    /// User the preloaded wardrobe belongs to
    #[arg(long, default_value = "demo")]
    pub(crate) user: String,
}

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Wardrobe CSV export (id, name, category, primary_color, ...)
    #[arg(long)]
    pub(crate) wardrobe: PathBuf,
    /// Current temperature in Fahrenheit. Weather rules are skipped without it.
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) temperature: Option<f32>,
    /// Sky condition, e.g. sunny, cloudy, rainy, snowy
    #[arg(long, value_parser = parse_condition)]
    pub(crate) condition: Option<WeatherCondition>,
    /// Free-text occasion such as "office" or "date night"
    #[arg(long)]
    pub(crate) occasion: Option<String>,
    /// Number of outfits to return
    #[arg(long, default_value_t = 3)]
    pub(crate) count: usize,
    /// Seed for reproducible candidate search
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

impl GenerateArgs {
    fn weather(&self) -> Option<WeatherContext> {
        self.temperature.map(|temperature_f| {
            WeatherContext::new(temperature_f, self.condition.unwrap_or_default())
        })
    }

    fn into_request(self, wardrobe: Vec<Garment>) -> GenerationRequest {
        let mut request = GenerationRequest::new(wardrobe);
        request.weather = self.weather();
        request.preferences.occasion = self.occasion;
        request.config.seed = self.seed;
        request.target_count = self.count;
        request
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Generate(args) => run_generate(args).await,
    }
}

async fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let wardrobe = WardrobeImporter::from_path(&args.wardrobe)?;
    let pipeline = build_pipeline(&config.judge)?;

    let outfits = pipeline.generate(args.into_request(wardrobe)).await?;
    println!("{}", serde_json::to_string_pretty(&outfits)?);
    Ok(())
}
