use crate::infra::build_service;
use clap::Args;
use scheme_advisor::config::AppConfig;
use scheme_advisor::error::AppError;
use scheme_advisor::recommendation::{
    Profile, ProfileSummary, RecommendationResponse, SchemeCatalog,
};
use scheme_advisor::telemetry;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Profile JSON file, or `-` to read from stdin
    #[arg(long, default_value = "-")]
    pub(crate) profile: PathBuf,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub(crate) pretty: bool,
}

pub(crate) async fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let raw = read_profile(&args.profile)?;
    let profile: Profile = serde_json::from_str(&raw)?;

    let service = build_service(&config.recommendation)?;
    let result = service.recommend(&profile).await;

    let response = RecommendationResponse {
        result,
        user_profile: ProfileSummary::from(&profile),
    };
    print_json(&response, args.pretty)
}

pub(crate) fn run_catalog() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = SchemeCatalog::load(config.recommendation.catalog_path.as_deref())?;
    print_json(catalog.schemes(), true)
}

fn read_profile(source: &Path) -> Result<String, AppError> {
    if source.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        return Ok(raw);
    }
    Ok(std::fs::read_to_string(source)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<(), AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
