use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use talent_ai::error::AppError;
use talent_ai::workflows::automation::{
    CandidateFields, Decision, InMemoryRuleRepository, RuleDraft, RuleEngine, RuleEngineError,
    WorkspaceId,
};
use talent_ai::workflows::shortlist::{
    EntityId, EntityKind, ScoreExport, Shortlist, ShortlistGenerator, ShortlistOptions,
};

use crate::infra::{parse_entity_kind, read_json};

#[derive(Args, Debug)]
pub(crate) struct RulesCheckArgs {
    /// JSON file holding an array of rule definitions
    pub(crate) path: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct RulesEvaluateArgs {
    /// JSON file holding an array of rule definitions
    #[arg(long)]
    pub(crate) rules: PathBuf,
    /// JSON object mapping candidate field names to values
    #[arg(long)]
    pub(crate) candidate: PathBuf,
    /// Workspace to evaluate in; also assigned to rules that omit one
    #[arg(long, default_value = "default")]
    pub(crate) workspace: String,
}

#[derive(Args, Debug)]
pub(crate) struct ShortlistArgs {
    /// CSV score export
    #[arg(long)]
    pub(crate) scores: PathBuf,
    /// Gig or vacancy id to shortlist
    #[arg(long)]
    pub(crate) entity: String,
    /// Entity kind selecting the default cap (gig or vacancy)
    #[arg(long, value_parser = parse_entity_kind)]
    pub(crate) kind: Option<EntityKind>,
    #[arg(long)]
    pub(crate) min_score: Option<u8>,
    #[arg(long)]
    pub(crate) max_candidates: Option<usize>,
    /// Keep only HIGHLY_RECOMMENDED candidates
    #[arg(long)]
    pub(crate) highly_recommended: bool,
    /// Order equal composite scores by price then delivery score
    #[arg(long)]
    pub(crate) budget_fit: bool,
}

#[derive(Debug, PartialEq)]
pub(crate) enum CheckOutcome {
    Admitted { id: String, name: String },
    Rejected { name: String, kind: &'static str, reason: String },
}

pub(crate) fn run_rules_check(args: RulesCheckArgs) -> Result<(), AppError> {
    let drafts: Vec<RuleDraft> = read_json(&args.path)?;
    let outcomes = check_drafts(drafts)?;

    println!("Rule check: {}", args.path.display());
    let mut rejected = 0;
    for outcome in &outcomes {
        match outcome {
            CheckOutcome::Admitted { id, name } => println!("  ok       {id}  {name}"),
            CheckOutcome::Rejected { name, kind, reason } => {
                rejected += 1;
                println!("  rejected {name}  [{kind}] {reason}");
            }
        }
    }
    println!(
        "{} admitted, {} rejected",
        outcomes.len() - rejected,
        rejected
    );

    Ok(())
}

/// Admit each draft into a scratch engine, collecting per-rule results.
pub(crate) fn check_drafts(drafts: Vec<RuleDraft>) -> Result<Vec<CheckOutcome>, AppError> {
    let engine = RuleEngine::new(Arc::new(InMemoryRuleRepository::default()));
    let mut outcomes = Vec::with_capacity(drafts.len());

    for draft in drafts {
        let name = draft.name.clone();
        match engine.add_rule(draft) {
            Ok(rule) => outcomes.push(CheckOutcome::Admitted {
                id: rule.id.0,
                name,
            }),
            Err(RuleEngineError::Validation(error)) => outcomes.push(CheckOutcome::Rejected {
                name,
                kind: error.kind(),
                reason: error.to_string(),
            }),
            Err(error) => return Err(error.into()),
        }
    }

    Ok(outcomes)
}

pub(crate) fn run_rules_evaluate(args: RulesEvaluateArgs) -> Result<(), AppError> {
    let drafts: Vec<RuleDraft> = read_json(&args.rules)?;
    let fields: CandidateFields = read_json(&args.candidate)?;
    let workspace_id = WorkspaceId(args.workspace);

    let decisions = evaluate_candidate(drafts, &fields, &workspace_id)?;

    println!("Decisions for workspace {workspace_id}");
    if decisions.is_empty() {
        println!("  (no rule matched)");
    }
    for (position, decision) in decisions.iter().enumerate() {
        println!(
            "  {}. {} -> {} ({})",
            position + 1,
            decision.rule_id,
            decision.action.kind,
            decision.autonomy_level.label()
        );
    }

    Ok(())
}

pub(crate) fn evaluate_candidate(
    drafts: Vec<RuleDraft>,
    fields: &CandidateFields,
    workspace_id: &WorkspaceId,
) -> Result<Vec<Decision>, AppError> {
    let engine = RuleEngine::new(Arc::new(InMemoryRuleRepository::default()));
    for mut draft in drafts {
        if draft.workspace_id.0.trim().is_empty() {
            draft.workspace_id = workspace_id.clone();
        }
        engine.add_rule(draft)?;
    }

    Ok(engine.evaluate(fields, workspace_id)?)
}

pub(crate) fn run_shortlist(args: ShortlistArgs) -> Result<(), AppError> {
    let export = ScoreExport::from_path(&args.scores)?;
    let generator = ShortlistGenerator::new(Arc::new(export));
    let options = ShortlistOptions {
        kind: args.kind.unwrap_or_default(),
        min_score: args.min_score,
        max_candidates: args.max_candidates,
        include_only_highly_recommended: Some(args.highly_recommended),
        prioritize_budget_fit: Some(args.budget_fit),
    };

    let shortlist = generator.generate_shortlist(&EntityId(args.entity), &options)?;
    print!("{}", render_shortlist(&shortlist));
    Ok(())
}

pub(crate) fn render_shortlist(shortlist: &Shortlist) -> String {
    let summary = shortlist.summary();
    let mut output = format!(
        "Shortlist for {} ({}), {}\n",
        shortlist.entity_id,
        shortlist.options.kind.label(),
        summary.headline()
    );
    if let Some(average) = summary.average_composite_score {
        output.push_str(&format!(
            "Average composite {average:.1} | highly recommended {} | recommended {} | neutral {}\n",
            summary.highly_recommended, summary.recommended, summary.neutral
        ));
    }

    for (position, candidate) in shortlist.candidates.iter().enumerate() {
        let score = candidate
            .composite_score
            .map(|score| score.to_string())
            .unwrap_or_else(|| "-".to_string());
        let bucket = candidate
            .recommendation
            .map(|recommendation| recommendation.label())
            .unwrap_or("UNRATED");
        output.push_str(&format!(
            "{:>3}. {:<16} {:>3}  {}\n",
            position + 1,
            candidate.id.0,
            score,
            bucket
        ));
        if !candidate.strengths.is_empty() {
            output.push_str(&format!("       + {}\n", candidate.strengths.join(", ")));
        }
    }

    output
}
