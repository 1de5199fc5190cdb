use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use fcg_lib::output::FCG_OUTPUT_VERSION;
use fcg_lib::{ErrorOutput, FcgError, FcgOutput};

use crate::cli::OutputFormat;

/// Explain output lists at most this many nodes in the terminal.
const MAX_PRETTY_NODES: usize = 50;

/// Write output in the requested format.
pub fn write_output(
    body: &FcgOutput,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output)?,
        OutputFormat::Pretty => write_pretty_output(body, output)?,
    };
    Ok(())
}

/// Render an error and return the fatal exit code.
pub fn render_error(err: FcgError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    tracing::error!(error = %err, "command failed");
    let error_payload = err.to_payload();
    let payload = FcgOutput::Error(ErrorOutput {
        version: FCG_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(body: &FcgOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &FcgOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output keeps the JSON shape.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &FcgOutput, colorize: bool) -> String {
    match body {
        FcgOutput::Generate(out) => {
            let mut buf = String::new();
            let header = color("[GENERATE]", "36", colorize);
            writeln!(
                buf,
                "{} {} ({}, root {})",
                header,
                out.result.metadata.component_name,
                out.framework,
                out.result.metadata.node_id,
            )
            .ok();
            writeln!(buf, "Input: {} (kind: {:?})", out.input.value, out.input.kind).ok();
            if !out.result.warnings.is_empty() {
                writeln!(buf, "{}", color("Warnings:", "33", colorize)).ok();
                for warning in &out.result.warnings {
                    writeln!(buf, "- {warning}").ok();
                }
            }
            if !out.written.is_empty() {
                writeln!(buf, "Written:").ok();
                for path in &out.written {
                    writeln!(buf, "- {}", path.display()).ok();
                }
            }
            if let Some(fonts) = &out.result.google_fonts_url {
                writeln!(buf, "Fonts: {fonts}").ok();
            }
            writeln!(buf).ok();
            writeln!(buf, "{}", out.result.code).ok();
            buf
        }
        FcgOutput::Transform(out) => {
            let mut buf = String::new();
            let header = color("[TRANSFORM]", "34", colorize);
            writeln!(buf, "{} {} nodes", header, out.node_count).ok();
            writeln!(buf, "Input: {} (kind: {:?})", out.input.value, out.input.kind).ok();
            let tree = serde_json::to_string_pretty(&out.tree).unwrap_or_default();
            writeln!(buf, "{tree}").ok();
            buf
        }
        FcgOutput::Explain(out) => {
            let mut buf = String::new();
            let header = color("[EXPLAIN]", "35", colorize);
            writeln!(
                buf,
                "{} {} of {} nodes matched by {} rules ({})",
                header,
                out.nodes.len(),
                out.node_count,
                out.rule_count,
                out.framework
            )
            .ok();
            for node in out.nodes.iter().take(MAX_PRETTY_NODES) {
                writeln!(
                    buf,
                    "- {} ({}): {}",
                    node.name,
                    node.node_id,
                    node.evaluation.matched_rules.join(", ")
                )
                .ok();
                for (property, rule) in &node.evaluation.provenance {
                    writeln!(buf, "    {property} <- {rule}").ok();
                }
                for conflict in &node.evaluation.conflicts {
                    let line = format!(
                        "    ! {}: {} overrides {} ({:?})",
                        conflict.property,
                        conflict.winner,
                        conflict.overridden.join(", "),
                        conflict.severity
                    );
                    writeln!(buf, "{}", color(&line, "33", colorize)).ok();
                }
            }
            if out.nodes.len() > MAX_PRETTY_NODES {
                writeln!(buf, "... {} more", out.nodes.len() - MAX_PRETTY_NODES).ok();
            }
            buf
        }
        FcgOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcg_lib::codegen::GenerationMetadata;
    use fcg_lib::output::{ExplainOutput, GenerateOutput, NodeExplanation, ResourceDescriptor};
    use fcg_lib::rules::{ConflictSeverity, RuleConflict};
    use fcg_lib::{Framework, GeneratedCode, ResourceKind, RuleEvaluation};

    fn input() -> ResourceDescriptor {
        ResourceDescriptor {
            kind: ResourceKind::File,
            value: "card.json".into(),
        }
    }

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(
            FcgError::Config("boom".to_string()),
            OutputFormat::Json,
            None,
        );
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn format_pretty_shows_generation_summary_and_code() {
        let output = FcgOutput::Generate(GenerateOutput {
            version: FCG_OUTPUT_VERSION.to_string(),
            input: input(),
            framework: Framework::ReactTailwind,
            result: GeneratedCode {
                code: "export function Card() {}".into(),
                format: Framework::ReactTailwind,
                language: "tsx".into(),
                css: None,
                assets: Vec::new(),
                metadata: GenerationMetadata {
                    component_name: "Card".into(),
                    node_id: "1:2".into(),
                    generated_at: "2024-01-01T00:00:00Z".into(),
                },
                google_fonts_url: None,
                warnings: vec!["Image abc unresolved; placeholder used".into()],
            },
            written: vec![PathBuf::from("out/Card.tsx")],
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[GENERATE] Card (react-tailwind"));
        assert!(pretty.contains("Warnings:"));
        assert!(pretty.contains("- Image abc unresolved"));
        assert!(pretty.contains("- out/Card.tsx"));
        assert!(pretty.contains("export function Card() {}"));
    }

    #[test]
    fn format_pretty_lists_provenance_and_conflicts() {
        let mut evaluation = RuleEvaluation::default();
        evaluation.matched_rules = vec!["base".into(), "accent".into()];
        evaluation.provenance.insert("color".into(), "accent".into());
        evaluation.conflicts.push(RuleConflict {
            property: "color".into(),
            winner: "accent".into(),
            overridden: vec!["base".into()],
            severity: ConflictSeverity::Minor,
        });
        let output = FcgOutput::Explain(ExplainOutput {
            version: FCG_OUTPUT_VERSION.to_string(),
            input: input(),
            framework: Framework::HtmlCss,
            rule_count: 2,
            node_count: 4,
            nodes: vec![NodeExplanation {
                node_id: "1:3".into(),
                name: "Title".into(),
                evaluation,
            }],
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[EXPLAIN] 1 of 4 nodes matched by 2 rules (html-css)"));
        assert!(pretty.contains("- Title (1:3): base, accent"));
        assert!(pretty.contains("color <- accent"));
        assert!(pretty.contains("! color: accent overrides base (Minor)"));
    }

    #[test]
    fn format_pretty_handles_errors() {
        let output = FcgOutput::Error(ErrorOutput {
            version: FCG_OUTPUT_VERSION.to_string(),
            message: Some("bad input".to_string()),
            error: fcg_lib::ErrorPayload {
                category: fcg_lib::ErrorCategory::Config,
                message: "bad input".to_string(),
                remediation: Some("check flags".to_string()),
            },
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] bad input"));
        assert!(pretty.contains("Hint: check flags"));
    }
}
