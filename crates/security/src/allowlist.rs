//! Allowlist policies: which base commands the shell tool may run.

/// Result of checking a command against the allowlist.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandCheckResult {
    /// Command is allowed
    Allowed,
    /// Command is denied
    Denied { command: String, reason: String },
    /// Nothing to run
    Empty,
}

/// Allowlist of base commands for shell execution.
///
/// Rules:
/// - An empty list allows every command
/// - Otherwise the first word of the command must be in the list
#[derive(Debug, Clone, Default)]
pub struct CommandAllowlist {
    allowed: Vec<String>,
}

impl CommandAllowlist {
    pub fn new(allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Check a full command line.
    pub fn check(&self, command: &str) -> CommandCheckResult {
        let Some(base) = base_command(command) else {
            return CommandCheckResult::Empty;
        };

        if self.is_unrestricted() || self.allowed.iter().any(|a| *a == base) {
            CommandCheckResult::Allowed
        } else {
            CommandCheckResult::Denied {
                reason: format!(
                    "command '{}' is not in the allowlist ({})",
                    base,
                    self.allowed.join(", ")
                ),
                command: base,
            }
        }
    }
}

/// The first word of a command line, honoring shell quoting.
///
/// Single quotes are literal, double quotes allow backslash escapes, and an
/// unquoted backslash escapes the next character. An unterminated quote
/// yields `None`, like a shell would refuse to run it.
pub fn base_command(command: &str) -> Option<String> {
    let mut word = String::new();
    let mut started = false;
    let mut chars = command.trim_start().chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => break,
            '\'' => {
                started = true;
                loop {
                    match chars.next()? {
                        '\'' => break,
                        other => word.push(other),
                    }
                }
            }
            '"' => {
                started = true;
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => word.push(chars.next()?),
                        other => word.push(other),
                    }
                }
            }
            '\\' => {
                started = true;
                word.push(chars.next()?);
            }
            other => {
                started = true;
                word.push(other);
            }
        }
    }

    started.then_some(word)
}
