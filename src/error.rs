use std::panic::Location;
use std::{fmt, sync::Arc};

#[derive(Debug, Clone)]
pub enum Cause {
    Any(WebhookError),
    Std(Arc<dyn std::error::Error + Send + Sync>),
}

/// Keyed error carrying the caller location and a chain of causes.
///
/// Only transport and configuration faults are reported through this type;
/// builder normalization never fails.
#[derive(Debug, Clone)]
pub struct WebhookError {
    pub key: &'static str,
    pub causes: Vec<Cause>,
    pub file: &'static str,
    pub line: u32,
}

impl WebhookError {
    #[track_caller]
    #[inline]
    pub fn new(key: &'static str) -> Self {
        let loc = Location::caller();
        Self {
            key,
            causes: Vec::new(),
            file: loc.file(),
            line: loc.line(),
        }
    }

    #[inline]
    pub fn push_any(mut self, cause: WebhookError) -> Self {
        self.causes.push(Cause::Any(cause));
        self
    }

    #[inline]
    pub fn push_str(mut self, message: impl Into<String>) -> Self {
        self.causes
            .push(Cause::Std(Arc::new(std::io::Error::other(message.into()))));
        self
    }

    #[inline]
    pub fn push_std(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.causes.push(Cause::Std(Arc::new(cause)));
        self
    }

    /// Print error with ASCII tree of causes
    pub fn print_tree(&self) {
        eprintln!("[ERROR] {}:{} - {}", self.file, self.line, self.key);
        self.print_causes("");
    }

    fn print_causes(&self, prefix: &str) {
        for (i, cause) in self.causes.iter().enumerate() {
            let is_last = i == self.causes.len() - 1;
            let branch = if is_last { "└── " } else { "├── " };
            let extension = if is_last { "    " } else { "│   " };

            match cause {
                Cause::Any(e) => {
                    eprintln!("{}{}[{}:{}] {}", prefix, branch, e.file, e.line, e.key);
                    e.print_causes(&format!("{}{}", prefix, extension));
                }
                Cause::Std(e) => {
                    eprintln!("{}{}{}", prefix, branch, e);

                    let mut source = e.source();
                    let mut depth = 0;
                    while let Some(err) = source {
                        eprintln!(
                            "{}{}{}↳ {}",
                            prefix,
                            extension,
                            "  ".repeat(depth + 1),
                            err
                        );
                        source = err.source();
                        depth += 1;
                    }
                }
            }
        }
    }
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] {}", self.file, self.line, self.key)?;
        if !self.causes.is_empty() {
            write!(f, " (causes: {})", self.causes.len())?;
        }
        Ok(())
    }
}

impl std::error::Error for WebhookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes.iter().find_map(|c| match c {
            Cause::Any(e) => Some(e as &dyn std::error::Error),
            Cause::Std(e) => Some(e.as_ref() as &(dyn std::error::Error + 'static)),
        })
    }
}

impl From<reqwest::Error> for WebhookError {
    #[track_caller]
    fn from(e: reqwest::Error) -> Self {
        WebhookError::new("transport").push_std(e)
    }
}

impl From<serde_json::Error> for WebhookError {
    #[track_caller]
    fn from(e: serde_json::Error) -> Self {
        WebhookError::new("serde_json").push_std(e)
    }
}

impl From<std::env::VarError> for WebhookError {
    #[track_caller]
    fn from(e: std::env::VarError) -> Self {
        WebhookError::new("env_var").push_std(e)
    }
}

impl From<std::io::Error> for WebhookError {
    #[track_caller]
    fn from(e: std::io::Error) -> Self {
        WebhookError::new("io_error").push_std(e)
    }
}

impl From<String> for WebhookError {
    #[track_caller]
    fn from(s: String) -> Self {
        WebhookError::new("string_error").push_str(s)
    }
}

impl From<&str> for WebhookError {
    #[track_caller]
    fn from(s: &str) -> Self {
        WebhookError::new("str_error").push_str(s)
    }
}

pub type Result<T> = std::result::Result<T, WebhookError>;
