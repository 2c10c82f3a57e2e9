use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use talent_ai::error::AppError;

use crate::commands::{
    run_rules_check, run_rules_evaluate, run_shortlist, RulesCheckArgs, RulesEvaluateArgs,
    ShortlistArgs,
};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Talent Automation",
    about = "Run the candidate rule engine and shortlist generator from the command line",
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
    /// Validate or dry-run automation rules
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
    /// Print a ranked shortlist from a score export
    Shortlist(ShortlistArgs),
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Validate a JSON array of rule definitions against the field catalog
    Check(RulesCheckArgs),
    /// Evaluate one candidate against a rule file and print the decisions
    Evaluate(RulesEvaluateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// CSV score export backing the shortlist endpoint
    #[arg(long)]
    pub(crate) scores_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rules {
            command: RulesCommand::Check(args),
        } => run_rules_check(args),
        Command::Rules {
            command: RulesCommand::Evaluate(args),
        } => run_rules_evaluate(args),
        Command::Shortlist(args) => run_shortlist(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talent_ai::workflows::shortlist::EntityKind;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["talent-ai-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_shortlist_flags() {
        let cli = Cli::try_parse_from([
            "talent-ai-api",
            "shortlist",
            "--scores",
            "scores.csv",
            "--entity",
            "gig-7",
            "--kind",
            "gig",
            "--min-score",
            "60",
            "--budget-fit",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Shortlist(args)) => {
                assert_eq!(args.entity, "gig-7");
                assert_eq!(args.kind, Some(EntityKind::Gig));
                assert_eq!(args.min_score, Some(60));
                assert!(args.budget_fit);
                assert!(!args.highly_recommended);
            }
            other => panic!("expected shortlist command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_entity_kind() {
        let result = Cli::try_parse_from([
            "talent-ai-api",
            "shortlist",
            "--scores",
            "scores.csv",
            "--entity",
            "gig-7",
            "--kind",
            "project",
        ]);
        assert!(result.is_err());
    }
}
