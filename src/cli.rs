use clap::{Args, Parser, Subcommand, ValueEnum};
use fcg_lib::transform::HiddenMode;
use fcg_lib::{Framework, SvgMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fcg")]
#[command(
    version,
    about = "Figma Code Generator - Turn Figma designs into React/Tailwind or HTML/CSS",
    long_about = "Figma Code Generator (FCG)\n\nModes:\n- generate: transform a design tree and emit a component (react-tailwind, react-tailwind-v4, html-css).\n- transform: print the intermediate AltNode tree as JSON.\n- explain: show which style rules matched each node, which rule won each property, and conflicts.\n\nInputs are local JSON exports or Figma URLs (FIGMA_TOKEN or FIGMA_OAUTH_TOKEN required).\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose (debug) logging on stderr")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) with defaults for framework/hidden nodes/svg mode/tolerance; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

/// Flags shared by every subcommand that reads a design tree.
#[derive(Args, Clone)]
pub struct InputArgs {
    #[arg(
        long,
        help = "Design input: local JSON export (node, file or nodes response) or Figma URL"
    )]
    pub input: String,

    #[arg(long, value_enum, help = "Hidden node handling (defaults to config, then drop)")]
    pub hidden: Option<HiddenArg>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Design variables JSON ({ id: { name, value, type } }) emitted as CSS custom properties"
    )]
    pub variables: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "json", help = "Output format")]
    pub format: OutputFormat,

    #[arg(long, short, help = "Output file path for the JSON payload (stdout if omitted)")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a component from a design input
    Generate {
        #[command(flatten)]
        input: InputArgs,

        #[arg(
            long,
            help = "Target framework: react-tailwind, react-tailwind-v4 or html-css (defaults to config)"
        )]
        framework: Option<Framework>,

        #[arg(long, value_name = "PATH", help = "Style rules file (JSON or YAML)")]
        rules: Option<PathBuf>,

        #[arg(
            long,
            value_name = "PATH",
            help = "Pre-resolved assets JSON ({ images: { ref: url }, svgs: { nodeId: svg } })"
        )]
        assets: Option<PathBuf>,

        #[arg(
            long,
            value_name = "PATH",
            help = "Responsive overlays JSON keyed by node id ({ md, lg, presence })"
        )]
        responsive: Option<PathBuf>,

        #[arg(long, help = "SVG handling for React output: inline or export")]
        svg_mode: Option<SvgMode>,

        #[arg(long, help = "Expose text content and images as component props")]
        with_props: bool,

        #[arg(long, value_name = "NAME", help = "Component name (defaults to the root node name)")]
        name: Option<String>,

        #[arg(
            long,
            value_name = "DIR",
            help = "Write the component and exported assets into this directory; created if missing"
        )]
        out_dir: Option<PathBuf>,
    },

    /// Print the transformed AltNode tree as JSON
    Transform {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Explain rule matches, provenance and conflicts per node
    Explain {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_name = "PATH", help = "Style rules file (JSON or YAML)")]
        rules: PathBuf,

        #[arg(long, help = "Framework used to filter framework-specific rules")]
        framework: Option<Framework>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum HiddenArg {
    Drop,
    Preserve,
}

impl From<HiddenArg> for HiddenMode {
    fn from(arg: HiddenArg) -> Self {
        match arg {
            HiddenArg::Drop => HiddenMode::Drop,
            HiddenArg::Preserve => HiddenMode::Preserve,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, HiddenArg, OutputFormat};
    use clap::Parser;
    use fcg_lib::{Framework, SvgMode};

    #[test]
    fn generate_command_uses_defaults() {
        let cli = Cli::parse_from(["fcg", "generate", "--input", "card.json"]);

        assert!(!cli.verbose);
        assert!(cli.config.is_none());

        match cli.command {
            Commands::Generate {
                input,
                framework,
                rules,
                assets,
                responsive,
                svg_mode,
                with_props,
                name,
                out_dir,
            } => {
                assert_eq!(input.input, "card.json");
                assert!(input.hidden.is_none());
                assert!(input.variables.is_none());
                assert!(matches!(input.format, OutputFormat::Json));
                assert!(input.output.is_none());
                assert!(framework.is_none());
                assert!(rules.is_none());
                assert!(assets.is_none());
                assert!(responsive.is_none());
                assert!(svg_mode.is_none());
                assert!(!with_props);
                assert!(name.is_none());
                assert!(out_dir.is_none());
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn generate_command_respects_overrides() {
        let cli = Cli::parse_from([
            "fcg",
            "generate",
            "--input",
            "https://www.figma.com/design/abc123/Site?node-id=1-2",
            "--framework",
            "react-tailwind-v4",
            "--rules",
            "rules.yaml",
            "--variables",
            "vars.json",
            "--assets",
            "assets.json",
            "--responsive",
            "responsive.json",
            "--hidden",
            "preserve",
            "--svg-mode",
            "export",
            "--with-props",
            "--name",
            "hero card",
            "--out-dir",
            "out",
            "--format",
            "pretty",
            "--config",
            "fcg.toml",
        ]);

        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("fcg.toml"))
        );
        match cli.command {
            Commands::Generate {
                input,
                framework,
                rules,
                svg_mode,
                with_props,
                name,
                out_dir,
                ..
            } => {
                assert!(matches!(input.hidden, Some(HiddenArg::Preserve)));
                assert!(matches!(input.format, OutputFormat::Pretty));
                assert_eq!(framework, Some(Framework::ReactTailwindV4));
                assert_eq!(rules.as_deref(), Some(std::path::Path::new("rules.yaml")));
                assert_eq!(svg_mode, Some(SvgMode::Export));
                assert!(with_props);
                assert_eq!(name.as_deref(), Some("hero card"));
                assert_eq!(out_dir.as_deref(), Some(std::path::Path::new("out")));
            }
            _ => panic!("expected generate command with overrides"),
        }
    }

    #[test]
    fn unknown_framework_is_rejected() {
        let result = Cli::try_parse_from([
            "fcg",
            "generate",
            "--input",
            "card.json",
            "--framework",
            "vue",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn explain_requires_rules() {
        assert!(Cli::try_parse_from(["fcg", "explain", "--input", "card.json"]).is_err());

        let cli = Cli::parse_from([
            "fcg",
            "--verbose",
            "explain",
            "--input",
            "card.json",
            "--rules",
            "rules.json",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Explain {
                rules, framework, ..
            } => {
                assert_eq!(rules, std::path::PathBuf::from("rules.json"));
                assert!(framework.is_none());
            }
            _ => panic!("expected explain command"),
        }
    }
}
