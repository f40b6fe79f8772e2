use crate::{
    language::errors::{SyntaxError, SyntaxErrors},
    runtime::error::AgoraError,
};
use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(agora::syntax))]
pub struct SyntaxDiagnostic {
    #[source_code]
    src: NamedSource,
    #[label("here")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
    message: String,
}

impl SyntaxDiagnostic {
    pub fn from_error(src: NamedSource, err: &SyntaxError) -> Self {
        Self {
            src,
            span: err.to_source_span(),
            help: err.help.clone(),
            message: err.message.clone(),
        }
    }
}

/// Engine errors hold `Rc` handles, so the report carries their rendered
/// form.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(agora::runtime))]
pub struct RuntimeDiagnostic {
    message: String,
    kind: &'static str,
    #[help]
    help: Option<String>,
}

impl RuntimeDiagnostic {
    pub fn new(error: &AgoraError) -> Self {
        let help = match error {
            AgoraError::MessageNotUnderstood { .. } => {
                Some("declare the pattern with METHOD: or VARIABLE: before sending it".to_string())
            }
            AgoraError::ReifierMisused { .. } => {
                Some("declarations read `pattern [PUBLIC|LOCAL] REIFIER: ...`".to_string())
            }
            AgoraError::Exception(_) => {
                Some("wrap the code in TRY: ... CATCH: pattern DO: ...".to_string())
            }
            _ => None,
        };
        Self {
            message: error.to_string(),
            kind: error.kind(),
            help,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

pub fn emit_syntax_errors(name: &str, source: &str, errors: &SyntaxErrors) {
    for err in &errors.errors {
        let src = NamedSource::new(name, source.to_string());
        let diagnostic = SyntaxDiagnostic::from_error(src, err);
        eprintln!("{:?}", Report::new(diagnostic));
    }
}

pub fn report_runtime_error(error: &AgoraError) {
    eprintln!("{:?}", Report::new(RuntimeDiagnostic::new(error)));
}

pub fn report_io_error(path: &Path, error: &std::io::Error) {
    eprintln!("Failed to access {}: {}", path.display(), error);
}
