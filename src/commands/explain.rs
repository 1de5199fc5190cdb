use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::info;

use fcg_lib::output::FCG_OUTPUT_VERSION;
use fcg_lib::{
    evaluate_tree, ExplainOutput, FcgError, FcgOutput, Framework, NodeExplanation,
};

use crate::cli::InputArgs;
use crate::formatting::{render_error, write_output};
use crate::pipeline::{load_design, load_rule_file, load_variables, transform_session};
use crate::settings::load_config;

/// Run the explain command: which rules matched which nodes, and why.
pub async fn run_explain(
    config_path: Option<PathBuf>,
    input: InputArgs,
    rules: PathBuf,
    framework: Option<Framework>,
) -> ExitCode {
    let body = match build_explain_output(config_path, &input, &rules, framework).await {
        Ok(body) => body,
        Err(err) => return render_error(err, input.format, input.output),
    };
    if let Err(err) = write_output(&body, input.format, input.output.as_deref()) {
        return render_error(FcgError::Config(err.to_string()), input.format, None);
    }
    ExitCode::SUCCESS
}

async fn build_explain_output(
    config_path: Option<PathBuf>,
    input: &InputArgs,
    rules_path: &Path,
    framework: Option<Framework>,
) -> Result<FcgOutput, FcgError> {
    let config = load_config(config_path.as_deref())?;
    let framework = framework.unwrap_or(config.framework);
    let hidden = input.hidden.map(Into::into).unwrap_or(config.hidden_nodes);

    let rules = load_rule_file(Some(rules_path))?;
    let design = load_design(&input.input, &config).await?;
    let variables = load_variables(input.variables.as_deref())?;
    let mut session = transform_session(&config, hidden, variables);
    let tree = design.transform(&mut session, None)?;

    let mut resolved = evaluate_tree(&tree, &rules, framework);
    let mut nodes = Vec::new();
    tree.walk(&mut |node| {
        if let Some(evaluation) = resolved.shift_remove(&node.id) {
            if !evaluation.is_empty() {
                nodes.push(NodeExplanation {
                    node_id: node.id.clone(),
                    name: node.name.clone(),
                    evaluation,
                });
            }
        }
    });
    let conflicts: usize = nodes.iter().map(|n| n.evaluation.conflicts.len()).sum();
    info!(matched = nodes.len(), conflicts, "explain finished");

    Ok(FcgOutput::Explain(ExplainOutput {
        version: FCG_OUTPUT_VERSION.to_string(),
        input: design.descriptor(),
        framework,
        rule_count: rules.len(),
        node_count: tree.node_count(),
        nodes,
    }))
}
