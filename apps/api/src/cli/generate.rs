use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::letter::resume::load_resume;
use crate::state::AppState;

/// One letter, synchronously: prints the output path once it is written.
pub async fn handle_generate(args: GenerateArgs, mut config: Config) -> Result<()> {
    if let Some(tier) = args.tier {
        config.model_tier = tier;
    }

    let job_description = read_job_description(args.job_file.as_deref()).await?;
    if job_description.trim().is_empty() {
        warn!("Empty job description; the letter will be generic");
    }

    let resume = load_resume(&config.resume_path).await?;
    let state = AppState::from_config(&config)?;

    info!("Generating cover letter with {}", config.model_tier.model());
    let letter = state.letters.generate(&job_description, &resume).await?;

    if !letter.format_matched {
        eprintln!("Warning: the letter did not follow the expected format; check it before sending.");
    }
    println!("{}", letter.path.display());
    println!("Cost: ${:.4}", letter.cost_usd);
    Ok(())
}

pub async fn handle_cost(config: Config) -> Result<()> {
    let ledger = crate::cost::CostLedger::new(config.cost_file);
    let total = ledger.total().await?;
    println!("Total spend: ${total:.4} ({})", ledger.path().display());
    Ok(())
}

async fn read_job_description(job_file: Option<&Path>) -> Result<String> {
    match job_file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read job description from {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read job description from stdin")?;
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_job_description_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jd.txt");
        std::fs::write(&path, "Data Analyst position").unwrap();
        assert_eq!(
            read_job_description(Some(&path)).await.unwrap(),
            "Data Analyst position"
        );
    }

    #[tokio::test]
    async fn test_cost_needs_no_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let cost_file = dir.path().join("costTracking.txt");
        std::fs::write(&cost_file, "0.25").unwrap();
        let config = Config::from_lookup(|key| match key {
            "COST_FILE" => Some(cost_file.display().to_string()),
            _ => None,
        })
        .unwrap();

        handle_cost(config).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_job_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_job_description(Some(&dir.path().join("absent.txt")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("absent.txt"));
    }
}
