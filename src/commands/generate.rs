use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{debug, info};

use fcg_lib::output::FCG_OUTPUT_VERSION;
use fcg_lib::{
    evaluate_tree, generate, FcgError, FcgOutput, Framework, GenerateOutput, GenerateRequest,
    SvgMode,
};

use crate::cli::InputArgs;
use crate::formatting::{render_error, write_output};
use crate::pipeline::{
    asset_resolver, load_design, load_responsive, load_rule_file, load_variables,
    transform_session, write_component,
};
use crate::settings::{format_effective_config, load_config, resolve_generate_settings, GenerateFlags};

/// Flags of the generate command beyond the shared input flags.
pub struct GenerateArgs {
    pub input: InputArgs,
    pub framework: Option<Framework>,
    pub rules: Option<PathBuf>,
    pub assets: Option<PathBuf>,
    pub responsive: Option<PathBuf>,
    pub svg_mode: Option<SvgMode>,
    pub with_props: bool,
    pub name: Option<String>,
    pub out_dir: Option<PathBuf>,
}

/// Run the generate command.
pub async fn run_generate(config_path: Option<PathBuf>, args: GenerateArgs) -> ExitCode {
    let format = args.input.format;
    let output = args.input.output.clone();
    let body = match build_generate_output(config_path, args).await {
        Ok(body) => body,
        Err(err) => return render_error(err, format, output),
    };
    if let Err(err) = write_output(&body, format, output.as_deref()) {
        return render_error(FcgError::Config(err.to_string()), format, None);
    }
    ExitCode::SUCCESS
}

async fn build_generate_output(
    config_path: Option<PathBuf>,
    args: GenerateArgs,
) -> Result<FcgOutput, FcgError> {
    let config = load_config(config_path.as_deref())?;
    let flags = GenerateFlags {
        framework: args.framework,
        hidden: args.input.hidden.map(Into::into),
        svg_mode: args.svg_mode,
        with_props: args.with_props,
        component_name: args.name.clone(),
    };
    let settings = resolve_generate_settings(&flags, &config);
    debug!("{}", format_effective_config(&settings, config_path.as_deref()));

    let design = load_design(&args.input.input, &config).await?;
    let variables = load_variables(args.input.variables.as_deref())?;
    let rules = load_rule_file(args.rules.as_deref())?;
    let responsive = load_responsive(args.responsive.as_deref())?;

    let mut session = transform_session(&config, settings.hidden, variables);
    let tree = design.transform(&mut session, responsive.as_ref())?;

    let resolved = evaluate_tree(&tree, &rules, settings.framework);
    let request = GenerateRequest::new(&tree, settings.framework)
        .with_rules(&rules)
        .with_resolved(&resolved)
        .with_options(settings.options.clone())
        .with_variables(session.variables());
    let resolver = asset_resolver(&design, args.assets.as_deref())?;
    let result = generate(&request, resolver.as_ref()).await;

    let written = match &args.out_dir {
        Some(dir) => write_component(dir, &result, settings.framework.extension())?,
        None => Vec::new(),
    };
    info!(
        component = %result.metadata.component_name,
        written = written.len(),
        warnings = result.warnings.len(),
        "generate finished"
    );

    Ok(FcgOutput::Generate(GenerateOutput {
        version: FCG_OUTPUT_VERSION.to_string(),
        input: design.descriptor(),
        framework: settings.framework,
        result,
        written,
    }))
}
