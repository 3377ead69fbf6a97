use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a single command is written in the configuration file.
///
/// Either a plain string (`"pytest --maxfail=1"`) or a table with explicit
/// fields (`{ cmd = "flake8 src", continue_on_failure = true }`). A plain
/// string starting with `"- "` is shorthand for `continue_on_failure = true`,
/// the same prefix notation tox uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandEntry {
    Simple(String),
    Detailed {
        cmd: String,
        #[serde(default)]
        continue_on_failure: bool,
    },
}

impl CommandEntry {
    /// The raw command text, without the ignore-failure prefix.
    pub fn text(&self) -> &str {
        match self {
            CommandEntry::Simple(s) => s.strip_prefix("- ").unwrap_or(s).trim(),
            CommandEntry::Detailed { cmd, .. } => cmd.trim(),
        }
    }

    pub fn continue_on_failure(&self) -> bool {
        match self {
            CommandEntry::Simple(s) => s.starts_with("- "),
            CommandEntry::Detailed {
                continue_on_failure,
                ..
            } => *continue_on_failure,
        }
    }
}

/// A validated command: program, argument vector, and the ignore-failure flag.
///
/// Built from a [`CommandEntry`] at load time so that malformed commands are
/// rejected before anything executes. Arguments may still contain
/// placeholders; substitution resolves them per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub continue_on_failure: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            continue_on_failure: false,
        }
    }

    pub fn with_continue_on_failure(mut self, flag: bool) -> Self {
        self.continue_on_failure = flag;
        self
    }

    /// Parse a configuration entry into a command spec.
    pub fn parse(entry: &CommandEntry) -> Result<Self> {
        let tokens = split_command_line(entry.text())?;
        let mut iter = tokens.into_iter();
        let program = iter
            .next()
            .ok_or_else(|| Error::ConfigError("empty command".to_string()))?;
        Ok(Self {
            program,
            args: iter.collect(),
            continue_on_failure: entry.continue_on_failure(),
        })
    }

    /// Render the command the way it would be typed in a shell, quoting
    /// arguments that contain spaces.
    pub fn to_shell_string(&self) -> String {
        let mut cmd = quote_token(&self.program);
        for arg in &self.args {
            cmd.push(' ');
            cmd.push_str(&quote_token(arg));
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_shell_string())
    }
}

fn quote_token(token: &str) -> String {
    if token.is_empty() || token.contains(' ') {
        format!("'{token}'")
    } else {
        token.to_string()
    }
}

/// Split a command line into tokens, honoring single and double quotes.
///
/// Quotes group words but are not kept in the output; there is no escape
/// processing beyond that. An unbalanced quote is a configuration error.
pub fn split_command_line(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                } else {
                    current.push(ch);
                }
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }

    if quote.is_some() {
        return Err(Error::ConfigError(format!(
            "unbalanced quote in command: {line}"
        )));
    }
    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_words() {
        let tokens = split_command_line("poetry run pytest").unwrap();
        assert_eq!(tokens, vec!["poetry", "run", "pytest"]);
    }

    #[test]
    fn test_split_quoted_argument() {
        let tokens = split_command_line("sh -c 'exit 7'").unwrap();
        assert_eq!(tokens, vec!["sh", "-c", "exit 7"]);

        let tokens = split_command_line(r#"echo "hello world" done"#).unwrap();
        assert_eq!(tokens, vec!["echo", "hello world", "done"]);
    }

    #[test]
    fn test_split_adjacent_quotes_join() {
        // Quote directly adjacent to a word extends the same token.
        let tokens = split_command_line(r#"grep --include='*.py' TODO"#).unwrap();
        assert_eq!(tokens, vec!["grep", "--include=*.py", "TODO"]);
    }

    #[test]
    fn test_split_empty_quoted_token() {
        let tokens = split_command_line("printf '' done").unwrap();
        assert_eq!(tokens, vec!["printf", "", "done"]);
    }

    #[test]
    fn test_split_unbalanced_quote_is_error() {
        let err = split_command_line("echo 'oops").unwrap_err();
        assert!(err.to_string().contains("unbalanced quote"));
    }

    #[test]
    fn test_parse_simple_entry() {
        let entry = CommandEntry::Simple("flake8 src --statistics".to_string());
        let spec = CommandSpec::parse(&entry).unwrap();
        assert_eq!(spec.program, "flake8");
        assert_eq!(spec.args, vec!["src", "--statistics"]);
        assert!(!spec.continue_on_failure);
    }

    #[test]
    fn test_parse_ignore_failure_prefix() {
        let entry = CommandEntry::Simple("- coverage report".to_string());
        let spec = CommandSpec::parse(&entry).unwrap();
        assert_eq!(spec.program, "coverage");
        assert_eq!(spec.args, vec!["report"]);
        assert!(spec.continue_on_failure);
    }

    #[test]
    fn test_parse_detailed_entry() {
        let entry = CommandEntry::Detailed {
            cmd: "mypy src".to_string(),
            continue_on_failure: true,
        };
        let spec = CommandSpec::parse(&entry).unwrap();
        assert_eq!(spec.program, "mypy");
        assert!(spec.continue_on_failure);
    }

    #[test]
    fn test_parse_empty_command_is_error() {
        let entry = CommandEntry::Simple("   ".to_string());
        let err = CommandSpec::parse(&entry).unwrap_err();
        assert!(err.to_string().contains("empty command"));
    }

    #[test]
    fn test_to_shell_string_quotes_spaces() {
        let spec = CommandSpec::new("sh", vec!["-c".to_string(), "exit 7".to_string()]);
        assert_eq!(spec.to_shell_string(), "sh -c 'exit 7'");
    }

    #[test]
    fn test_entry_deserializes_both_shapes() {
        #[derive(serde::Deserialize)]
        struct Holder {
            commands: Vec<CommandEntry>,
        }

        let holder: Holder = toml::from_str(
            r#"
            commands = [
                "pytest",
                { cmd = "flake8 src", continue_on_failure = true },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(holder.commands.len(), 2);
        assert_eq!(holder.commands[0].text(), "pytest");
        assert!(holder.commands[1].continue_on_failure());
    }
}
