use crate::language::span::Span;
use miette::SourceSpan;
use thiserror::Error;

/// A reader error pinned to the token that caused it.
#[derive(Clone, Debug, Error)]
#[error("{message} at {span}")]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
    pub help: Option<String>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn to_source_span(&self) -> SourceSpan {
        (self.span.start, self.span.len()).into()
    }
}

/// Every error collected while reading one program, in source order.
#[derive(Clone, Debug, Error)]
#[error("{}", one_per_line(.errors))]
pub struct SyntaxErrors {
    pub errors: Vec<SyntaxError>,
}

impl SyntaxErrors {
    pub fn new(errors: Vec<SyntaxError>) -> Self {
        Self { errors }
    }
}

fn one_per_line(errors: &[SyntaxError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn errors_render_one_per_line_with_their_spans() {
        let errors = SyntaxErrors::new(vec![
            SyntaxError::new("expected an expression", Span::new(3, 4)),
            SyntaxError::new("unterminated string", Span::new(10, 12)).with_help("close it"),
        ]);
        let rendered = errors.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("expected an expression at "));
        assert!(lines[1].starts_with("unterminated string at "));
        assert_eq!(errors.errors[1].help.as_deref(), Some("close it"));
    }

    #[test]
    fn source_span_covers_the_token() {
        let error = SyntaxError::new("bad token", Span::new(5, 9));
        let span = error.to_source_span();
        assert_eq!(span.offset(), 5);
        assert_eq!(span.len(), 4);
    }
}
