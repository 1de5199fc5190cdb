use std::path::Path;

use fcg_lib::transform::HiddenMode;
use fcg_lib::{Config, FcgError, Framework, GenerateOptions, SvgMode};

/// Flags given on the command line; `None`/`false` fall back to config.
#[derive(Debug, Default, Clone)]
pub struct GenerateFlags {
    pub framework: Option<Framework>,
    pub hidden: Option<HiddenMode>,
    pub svg_mode: Option<SvgMode>,
    pub with_props: bool,
    pub component_name: Option<String>,
}

/// Resolved settings after merging CLI args and config file.
#[derive(Debug, Clone)]
pub struct ResolvedGenerateSettings {
    pub framework: Framework,
    pub hidden: HiddenMode,
    pub options: GenerateOptions,
}

/// Merge CLI arguments with config file, preferring CLI when flags are present.
pub fn resolve_generate_settings(flags: &GenerateFlags, config: &Config) -> ResolvedGenerateSettings {
    let mut options = GenerateOptions::from_config(config);
    if let Some(svg_mode) = flags.svg_mode {
        options.svg_mode = svg_mode;
    }
    options.with_props |= flags.with_props;
    options.component_name = flags
        .component_name
        .as_ref()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    ResolvedGenerateSettings {
        framework: flags.framework.unwrap_or(config.framework),
        hidden: flags.hidden.unwrap_or(config.hidden_nodes),
        options,
    }
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/fcg/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, FcgError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        FcgError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        FcgError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Format effective settings as a single-line string.
pub fn format_effective_config(
    settings: &ResolvedGenerateSettings,
    config_source: Option<&Path>,
) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let hidden = match settings.hidden {
        HiddenMode::Drop => "drop",
        HiddenMode::Preserve => "preserve",
    };
    let svg_mode = match settings.options.svg_mode {
        SvgMode::Inline => "inline",
        SvgMode::Export => "export",
    };
    format!(
        "Effective config [{source}]: framework={}, hidden={}, svg_mode={}, with_props={}, spacing_tolerance={:.2}",
        settings.framework,
        hidden,
        svg_mode,
        settings.options.with_props,
        settings.options.spacing_tolerance,
    )
}
