//! Figma-to-code library
//!
//! Turns a Figma design tree into source code: a React component with
//! Tailwind classes (v3 or v4 syntax) or plain HTML with a stylesheet.
//! Input is a JSON export on disk or a design fetched through the Figma REST API.
//!
//! # Module Overview
//!
//! - [`figma`] - Design-node model and the REST client
//! - [`transform`] - Design tree to [`AltNode`] tree (layout, paint, text, naming)
//! - [`rules`] - Declarative style rules with provenance and conflict reporting
//! - [`variables`] - Design variables rendered as CSS custom properties
//! - [`codegen`] - Generators, Tailwind mapping and asset resolution
//! - [`config`] - Configuration file support
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use fcg_lib::{generate, root_node_from_json, Framework, GenerateRequest, NoAssets, TransformSession};
//! use fcg_lib::transform::HiddenMode;
//!
//! # async fn example() -> fcg_lib::Result<()> {
//! let raw = std::fs::read_to_string("card.json")?;
//! let design = root_node_from_json(serde_json::from_str(&raw)?, None)?;
//!
//! let mut session = TransformSession::new(HiddenMode::Drop);
//! if let Some(tree) = session.transform(&design) {
//!     let request = GenerateRequest::new(&tree, Framework::ReactTailwind);
//!     let generated = generate(&request, &NoAssets).await;
//!     println!("{}", generated.code);
//! }
//! # Ok(())
//! # }
//! ```

pub mod alt_node;
pub mod codegen;
pub mod config;
pub mod error;
pub mod figma;
pub mod output;
pub mod resource;
pub mod rules;
pub mod transform;
pub mod variables;

pub use alt_node::{AltNode, ResponsiveOverlay, ResponsiveOverlays, StyleMap, StyleValue};
pub use codegen::{
    generate, render, AssetResolver, FigmaAssetResolver, Framework, GenerateOptions,
    GenerateRequest, GeneratedCode, NoAssets, StaticAssets, SvgMode,
};
pub use config::Config;
pub use error::{ErrorCategory, ErrorPayload, FcgError, Result};
pub use figma::{root_node_from_json, DesignNode, FigmaAuth, FigmaClient, FigmaError};
pub use output::{
    ErrorOutput, ExplainOutput, FcgOutput, GenerateOutput, NodeExplanation, ResourceDescriptor,
    TransformOutput, FCG_OUTPUT_VERSION,
};
pub use resource::{parse_resource, FigmaInfo, ParsedResource, ResourceKind};
pub use rules::{evaluate, evaluate_tree, load_rules, ResolvedProperties, Rule, RuleEvaluation};
pub use transform::TransformSession;
pub use variables::VariableMap;
