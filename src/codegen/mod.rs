//! Code generation from an AltNode tree.
//!
//! Three targets share one shape: [`generate`] collects asset references,
//! resolves them in two batched calls, then renders the tree synchronously.
//!
//! - [`Framework::ReactTailwind`] - React component with Tailwind v3 classes
//! - [`Framework::ReactTailwindV4`] - the same output migrated to Tailwind v4 syntax
//! - [`Framework::HtmlCss`] - plain markup plus a stylesheet with one rule per node

pub mod assets;
pub mod helpers;
mod html_css;
mod react;
pub mod svg;
pub mod tailwind;


use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::alt_node::{AltNode, StyleMap};
use crate::config::Config;
use crate::rules::{evaluate, ResolvedProperties, Rule, RuleEvaluation};
use crate::variables::VariableMap;

pub use assets::{
    collect_refs, AssetRefs, AssetResolver, FigmaAssetResolver, NoAssets, ResolvedAssets,
    StaticAssets,
};
pub use tailwind::css_prop_to_tailwind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    ReactTailwind,
    ReactTailwindV4,
    HtmlCss,
}

impl Framework {
    pub const ALL: [Framework; 3] = [
        Framework::ReactTailwind,
        Framework::ReactTailwindV4,
        Framework::HtmlCss,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Framework::ReactTailwind => "react-tailwind",
            Framework::ReactTailwindV4 => "react-tailwind-v4",
            Framework::HtmlCss => "html-css",
        }
    }

    pub fn language(self) -> &'static str {
        match self {
            Framework::ReactTailwind | Framework::ReactTailwindV4 => "tsx",
            Framework::HtmlCss => "html",
        }
    }

    /// File extension for the written component.
    pub fn extension(self) -> &'static str {
        match self {
            Framework::ReactTailwind | Framework::ReactTailwindV4 => "tsx",
            Framework::HtmlCss => "html",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Framework::ALL
            .into_iter()
            .find(|framework| framework.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| {
                format!(
                    "Unknown framework '{}'. Expected one of: react-tailwind, react-tailwind-v4, html-css",
                    s
                )
            })
    }
}

/// How vector nodes are emitted by the React generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SvgMode {
    /// Base64 data URLs inside the markup.
    Inline,
    /// `import` statements plus separate `.svg` assets.
    Export,
}

impl FromStr for SvgMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(SvgMode::Inline),
            "export" => Ok(SvgMode::Export),
            other => Err(format!("Unknown SVG mode '{}'. Expected inline or export", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    pub with_props: bool,
    pub svg_mode: SvgMode,
    pub spacing_tolerance: f64,
    /// Overrides the name derived from the root node.
    pub component_name: Option<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            with_props: false,
            svg_mode: SvgMode::Inline,
            spacing_tolerance: tailwind::DEFAULT_TOLERANCE,
            component_name: None,
        }
    }
}

impl GenerateOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            with_props: config.with_props,
            svg_mode: config.svg_mode,
            spacing_tolerance: config.spacing_tolerance,
            component_name: None,
        }
    }
}

/// Everything one generation run reads.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a, 'src> {
    pub root: &'a AltNode<'src>,
    /// Pre-computed evaluations keyed by node id; nodes missing here are
    /// evaluated against `rules` on the fly.
    pub resolved: Option<&'a ResolvedProperties>,
    pub rules: &'a [Rule],
    pub framework: Framework,
    pub options: GenerateOptions,
    pub variables: Option<&'a VariableMap>,
}

impl<'a, 'src> GenerateRequest<'a, 'src> {
    pub fn new(root: &'a AltNode<'src>, framework: Framework) -> Self {
        Self {
            root,
            resolved: None,
            rules: &[],
            framework,
            options: GenerateOptions::default(),
            variables: None,
        }
    }

    pub fn with_rules(mut self, rules: &'a [Rule]) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_resolved(mut self, resolved: &'a ResolvedProperties) -> Self {
        self.resolved = Some(resolved);
        self
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_variables(mut self, variables: &'a VariableMap) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn component_name(&self) -> String {
        match &self.options.component_name {
            Some(name) => helpers::pascal_case(name),
            None => helpers::pascal_case(&self.root.unique_name),
        }
    }

    fn evaluation(&self, node: &AltNode<'_>) -> RuleEvaluation {
        match self.resolved.and_then(|resolved| resolved.get(&node.id)) {
            Some(evaluation) => evaluation.clone(),
            None => evaluate(node, self.rules, self.framework),
        }
    }

    /// Non-empty `:root` variable block, if a map was supplied.
    fn root_variables(&self) -> Option<String> {
        self.variables
            .map(VariableMap::root_definitions)
            .filter(|defs| !defs.is_empty())
    }
}

/// Styles a generator emits for one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct NodeStyles {
    /// Extracted styles with rule declarations layered on top.
    pub styles: StyleMap,
    /// Raw utility classes from rules, emitted after everything else.
    pub rule_classes: Option<String>,
}

/// Hidden nodes are skipped unless a responsive merge says they exist at
/// some breakpoint.
pub(crate) fn is_rendered(node: &AltNode<'_>) -> bool {
    node.visible
        || node
            .presence
            .is_some_and(|p| p.mobile || p.tablet || p.desktop)
}

/// Rule values still holding template placeholders never reach the output.
fn is_usable_rule_value(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !value.contains("$value") && !value.contains("${")
}

/// Rule keys may be written camelCase (`backgroundColor`).
fn css_property_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub(crate) fn node_styles(request: &GenerateRequest<'_, '_>, node: &AltNode<'_>) -> NodeStyles {
    let evaluation = request.evaluation(node);
    let mut styles = node.styles.clone();
    for (key, value) in evaluation.css_properties() {
        if is_usable_rule_value(&value.to_string()) {
            styles.set(css_property_name(key), value.clone());
        }
    }
    let rule_classes = evaluation
        .class_name()
        .filter(|classes| is_usable_rule_value(classes));
    NodeStyles {
        styles,
        rule_classes,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Svg,
}

/// File produced alongside the component (exported SVGs).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAsset {
    pub filename: String,
    /// Path relative to the component file, as used in imports.
    pub path: String,
    pub content: String,
    pub kind: AssetKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub component_name: String,
    pub node_id: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCode {
    pub code: String,
    pub format: Framework,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<GeneratedAsset>,
    pub metadata: GenerationMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_fonts_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Generator output before the shared metadata is attached.
pub(crate) struct Rendered {
    pub code: String,
    pub css: Option<String>,
    pub assets: Vec<GeneratedAsset>,
    pub warnings: Vec<String>,
}

/// Resolve assets, then render.
pub async fn generate(
    request: &GenerateRequest<'_, '_>,
    resolver: &dyn AssetResolver,
) -> GeneratedCode {
    let refs = collect_refs(request.root);
    let resolved = assets::resolve(&refs, resolver).await;
    render(request, &resolved)
}

/// Render with already-resolved assets. Never fails: anything missing is
/// replaced by a placeholder and reported in `warnings`.
pub fn render(request: &GenerateRequest<'_, '_>, resolved: &ResolvedAssets) -> GeneratedCode {
    let component_name = request.component_name();
    let rendered = match request.framework {
        Framework::ReactTailwind => react::render(request, resolved, &component_name, false),
        Framework::ReactTailwindV4 => react::render(request, resolved, &component_name, true),
        Framework::HtmlCss => html_css::render(request, resolved),
    };

    let mut warnings = resolved.warnings.clone();
    warnings.extend(rendered.warnings);

    info!(
        framework = %request.framework,
        component = %component_name,
        nodes = request.root.node_count(),
        assets = rendered.assets.len(),
        warnings = warnings.len(),
        "code generated"
    );

    GeneratedCode {
        code: rendered.code,
        format: request.framework,
        language: request.framework.language().to_string(),
        css: rendered.css,
        assets: rendered.assets,
        metadata: GenerationMetadata {
            component_name,
            node_id: request.root.id.clone(),
            generated_at: humantime::format_rfc3339_seconds(SystemTime::now()).to_string(),
        },
        google_fonts_url: helpers::google_fonts_url(request.root),
        warnings,
    }
}
