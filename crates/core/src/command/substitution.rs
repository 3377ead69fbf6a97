//! Placeholder substitution for command arguments.
//!
//! Commands in the configuration may reference `{env_name}`, `{env_dir}`,
//! `{work_dir}`, `{config_dir}`, `{posargs}` and `{tool:<name>}`. The first
//! four are textual and can appear inside a larger argument; `{posargs}` and
//! `{tool:<name>}` expand to zero or more arguments and must therefore stand
//! alone. Doubled braces (`{{`, `}}`) produce literal braces.

use crate::config::ToolConfig;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;

use super::spec::CommandSpec;

/// Values available to placeholder substitution for one run.
#[derive(Debug)]
pub struct SubstitutionContext<'a> {
    pub env_name: &'a str,
    pub env_dir: &'a Path,
    pub work_dir: &'a Path,
    pub config_dir: &'a Path,
    pub posargs: &'a [String],
    pub tools: &'a BTreeMap<String, ToolConfig>,
}

#[derive(Debug, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

fn scan(text: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    literal.push('{');
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    name.push(inner);
                }
                if !closed {
                    return Err(Error::ConfigError(format!(
                        "unterminated placeholder in: {text}"
                    )));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(name));
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    literal.push('}');
                } else {
                    return Err(Error::ConfigError(format!("unmatched '}}' in: {text}")));
                }
            }
            c => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn is_splice(name: &str) -> bool {
    name == "posargs" || name.starts_with("tool:")
}

/// Statically check the placeholders of a command text against the known
/// names and the defined tool blocks, without needing run-time values.
pub fn validate_text(text: &str, tool_names: &[&str]) -> Result<()> {
    for segment in scan(text)? {
        if let Segment::Placeholder(name) = segment {
            match name.as_str() {
                "env_name" | "env_dir" | "work_dir" | "config_dir" | "posargs" => {}
                other => {
                    if let Some(tool) = other.strip_prefix("tool:") {
                        if !tool_names.contains(&tool) {
                            return Err(Error::ConfigError(format!(
                                "command references undefined tool block [tool.{tool}]"
                            )));
                        }
                    } else {
                        return Err(Error::ConfigError(format!(
                            "unknown placeholder '{{{other}}}' in: {text}"
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}

/// Expand the textual placeholders of `text`. Splice placeholders are
/// rejected here: they cannot appear inside a larger token.
fn expand_text(text: &str, ctx: &SubstitutionContext<'_>) -> Result<String> {
    let mut out = String::new();
    for segment in scan(text)? {
        match segment {
            Segment::Literal(lit) => out.push_str(&lit),
            Segment::Placeholder(name) => match name.as_str() {
                "env_name" => out.push_str(ctx.env_name),
                "env_dir" => out.push_str(&ctx.env_dir.display().to_string()),
                "work_dir" => out.push_str(&ctx.work_dir.display().to_string()),
                "config_dir" => out.push_str(&ctx.config_dir.display().to_string()),
                other if is_splice(other) => {
                    return Err(Error::ConfigError(format!(
                        "'{{{other}}}' must be a standalone argument in: {text}"
                    )));
                }
                other => {
                    return Err(Error::ConfigError(format!(
                        "unknown placeholder '{{{other}}}' in: {text}"
                    )));
                }
            },
        }
    }
    Ok(out)
}

fn splice_placeholder(arg: &str) -> Result<Option<String>> {
    let segments = scan(arg)?;
    match segments.as_slice() {
        [Segment::Placeholder(name)] if is_splice(name) => Ok(Some(name.clone())),
        _ => Ok(None),
    }
}

/// Expand a parsed command against the run's substitution context, producing
/// the final argument vector that will be executed.
pub fn expand_spec(spec: &CommandSpec, ctx: &SubstitutionContext<'_>) -> Result<CommandSpec> {
    let program = expand_text(&spec.program, ctx)?;

    let mut args = Vec::with_capacity(spec.args.len());
    for arg in &spec.args {
        match splice_placeholder(arg)? {
            Some(name) if name == "posargs" => args.extend(ctx.posargs.iter().cloned()),
            Some(name) => {
                let tool = name.strip_prefix("tool:").unwrap_or(&name);
                let config = ctx.tools.get(tool).ok_or_else(|| {
                    Error::ConfigError(format!(
                        "command references undefined tool block [tool.{tool}]"
                    ))
                })?;
                args.extend(config.to_args());
            }
            None => args.push(expand_text(arg, ctx)?),
        }
    }

    Ok(CommandSpec {
        program,
        args,
        continue_on_failure: spec.continue_on_failure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn ctx<'a>(
        posargs: &'a [String],
        tools: &'a BTreeMap<String, ToolConfig>,
        dirs: &'a (PathBuf, PathBuf, PathBuf),
    ) -> SubstitutionContext<'a> {
        SubstitutionContext {
            env_name: "lint",
            env_dir: &dirs.0,
            work_dir: &dirs.1,
            config_dir: &dirs.2,
            posargs,
            tools,
        }
    }

    fn dirs() -> (PathBuf, PathBuf, PathBuf) {
        (
            PathBuf::from("/tmp/work/lint"),
            PathBuf::from("/tmp/work"),
            PathBuf::from("/project"),
        )
    }

    #[test]
    fn test_expand_textual_placeholders() {
        let tools = BTreeMap::new();
        let d = dirs();
        let spec = CommandSpec::new(
            "pytest",
            vec!["--basetemp={env_dir}/tmp".to_string(), "{env_name}".to_string()],
        );
        let expanded = expand_spec(&spec, &ctx(&[], &tools, &d)).unwrap();
        assert_eq!(expanded.args, vec!["--basetemp=/tmp/work/lint/tmp", "lint"]);
    }

    #[test]
    fn test_expand_posargs_splices_arguments() {
        let tools = BTreeMap::new();
        let d = dirs();
        let posargs = vec!["-k".to_string(), "smoke test".to_string()];
        let spec = CommandSpec::new("pytest", vec!["{posargs}".to_string()]);
        let expanded = expand_spec(&spec, &ctx(&posargs, &tools, &d)).unwrap();
        assert_eq!(expanded.args, vec!["-k", "smoke test"]);
    }

    #[test]
    fn test_expand_empty_posargs_vanishes() {
        let tools = BTreeMap::new();
        let d = dirs();
        let spec = CommandSpec::new("pytest", vec!["{posargs}".to_string()]);
        let expanded = expand_spec(&spec, &ctx(&[], &tools, &d)).unwrap();
        assert!(expanded.args.is_empty());
    }

    #[test]
    fn test_expand_tool_block_splices_flags() {
        let mut tools = BTreeMap::new();
        tools.insert(
            "flake8".to_string(),
            ToolConfig {
                ignore: vec!["W503".to_string()],
                max_line_length: Some(88),
                ..Default::default()
            },
        );
        let d = dirs();
        let spec = CommandSpec::new(
            "flake8",
            vec!["src".to_string(), "{tool:flake8}".to_string()],
        );
        let expanded = expand_spec(&spec, &ctx(&[], &tools, &d)).unwrap();
        assert_eq!(
            expanded.args,
            vec!["src", "--ignore=W503", "--max-line-length=88"]
        );
    }

    #[test]
    fn test_embedded_splice_is_error() {
        let tools = BTreeMap::new();
        let d = dirs();
        let spec = CommandSpec::new("pytest", vec!["--args={posargs}".to_string()]);
        let err = expand_spec(&spec, &ctx(&[], &tools, &d)).unwrap_err();
        assert!(err.to_string().contains("standalone"));
    }

    #[test]
    fn test_unknown_placeholder_is_error() {
        let tools = BTreeMap::new();
        let d = dirs();
        let spec = CommandSpec::new("pytest", vec!["{nope}".to_string()]);
        assert!(expand_spec(&spec, &ctx(&[], &tools, &d)).is_err());
    }

    #[test]
    fn test_doubled_braces_are_literal() {
        let tools = BTreeMap::new();
        let d = dirs();
        let spec = CommandSpec::new("echo", vec!["{{env_name}}".to_string()]);
        let expanded = expand_spec(&spec, &ctx(&[], &tools, &d)).unwrap();
        assert_eq!(expanded.args, vec!["{env_name}"]);
    }

    #[test]
    fn test_validate_text_accepts_known_names() {
        validate_text("pytest {posargs} --basetemp={env_dir}", &[]).unwrap();
        validate_text("flake8 {tool:flake8}", &["flake8"]).unwrap();
    }

    #[test]
    fn test_validate_text_rejects_unknown_tool() {
        let err = validate_text("flake8 {tool:flake8}", &[]).unwrap_err();
        assert!(err.to_string().contains("undefined tool"));
    }

    #[test]
    fn test_validate_text_rejects_unterminated() {
        assert!(validate_text("echo {env_name", &[]).is_err());
        assert!(validate_text("echo env_name}", &[]).is_err());
    }
}
