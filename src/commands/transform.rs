use std::path::PathBuf;
use std::process::ExitCode;

use fcg_lib::output::FCG_OUTPUT_VERSION;
use fcg_lib::{FcgError, FcgOutput, TransformOutput};

use crate::cli::InputArgs;
use crate::formatting::{render_error, write_output};
use crate::pipeline::{load_design, load_variables, transform_session};
use crate::settings::load_config;

/// Run the transform command: print the AltNode tree.
pub async fn run_transform(config_path: Option<PathBuf>, input: InputArgs) -> ExitCode {
    let body = match build_transform_output(config_path, &input).await {
        Ok(body) => body,
        Err(err) => return render_error(err, input.format, input.output),
    };
    if let Err(err) = write_output(&body, input.format, input.output.as_deref()) {
        return render_error(FcgError::Config(err.to_string()), input.format, None);
    }
    ExitCode::SUCCESS
}

async fn build_transform_output(
    config_path: Option<PathBuf>,
    input: &InputArgs,
) -> Result<FcgOutput, FcgError> {
    let config = load_config(config_path.as_deref())?;
    let hidden = input.hidden.map(Into::into).unwrap_or(config.hidden_nodes);

    let design = load_design(&input.input, &config).await?;
    let variables = load_variables(input.variables.as_deref())?;
    let mut session = transform_session(&config, hidden, variables);
    let tree = design.transform(&mut session, None)?;

    Ok(FcgOutput::Transform(TransformOutput {
        version: FCG_OUTPUT_VERSION.to_string(),
        input: design.descriptor(),
        node_count: tree.node_count(),
        tree: serde_json::to_value(&tree)?,
    }))
}
