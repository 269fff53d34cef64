//! Console progress lines
//!
//! Operator-facing output with bracketed severity tags. These go to stdout
//! next to the tracing output on stderr.

use std::fmt;

/// Severity tag printed at the start of a progress line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Ok,
    Info,
    Warn,
    /// Advisory: a day was skipped after repeated server errors
    Aviso,
    /// Error: a day was skipped after repeated connection failures
    Erro,
    ErroFatal,
    Interrupcao,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "[OK]",
            Self::Info => "[INFO]",
            Self::Warn => "[WARN]",
            Self::Aviso => "[AVISO]",
            Self::Erro => "[ERRO]",
            Self::ErroFatal => "[ERRO FATAL]",
            Self::Interrupcao => "[INTERRUPÇÃO]",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats a tagged progress line
pub fn format_line(tag: Tag, message: impl fmt::Display) -> String {
    format!("{tag} {message}")
}

/// Prints a tagged progress line to stdout
pub fn report(tag: Tag, message: impl fmt::Display) {
    println!("{}", format_line(tag, message));
}

/// Prints the banner that opens a new day
pub fn day_banner(day: impl fmt::Display) {
    println!();
    println!("=== Coletando casos de {day} ===");
}
