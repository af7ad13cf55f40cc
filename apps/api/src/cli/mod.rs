pub mod generate;
pub mod serve;

use clap::{Args, Parser, Subcommand};

use crate::cost::ModelTier;

#[derive(Parser)]
#[command(name = "coverletter", version, about = "Generate tailored cover letters from a résumé")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write one cover letter for a job description
    Generate(GenerateArgs),
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Print the total recorded completion spend
    Cost,
}

#[derive(Args, Clone)]
pub struct GenerateArgs {
    /// File holding the job description; reads stdin when omitted
    #[arg(short, long)]
    pub job_file: Option<std::path::PathBuf>,

    /// Model tier: high or standard (overrides MODEL_TIER)
    #[arg(short, long)]
    pub tier: Option<ModelTier>,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Default log level when RUST_LOG is unset.
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        match self.verbose {
            0 => configured,
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_with_tier() {
        let cli = Cli::try_parse_from(["coverletter", "generate", "--job-file", "jd.txt", "--tier", "standard"])
            .unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.job_file.unwrap(), std::path::PathBuf::from("jd.txt"));
                assert_eq!(args.tier, Some(ModelTier::Standard));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_tier() {
        assert!(Cli::try_parse_from(["coverletter", "generate", "--tier", "ultra"]).is_err());
    }

    #[test]
    fn test_verbosity_overrides_configured_level() {
        let cli = Cli::try_parse_from(["coverletter", "-vv", "cost"]).unwrap();
        assert_eq!(cli.log_level("info"), "trace");
        let cli = Cli::try_parse_from(["coverletter", "serve", "--port", "9000"]).unwrap();
        assert_eq!(cli.log_level("warn"), "warn");
    }
}
