use ariadne::{Color, Fmt, Label, Report, ReportKind};

use crate::prelude::*;

fn label(kind: ErrorKind) -> &'static str {
    use AbstractionFault::*;
    match kind {
        ErrorKind::UnmatchedParenthesis => "this list is never closed",
        ErrorKind::ReservedNameMisuse => "reserved name",
        ErrorKind::MalformedAbstraction(TooFewTerms) => "expected (λ name ... body)",
        ErrorKind::MalformedAbstraction(NonAtomParameter) => "expected a name",
        ErrorKind::MalformedAbstraction(LambdaParameter) => "reserved name",
        ErrorKind::MalformedApplication => "nothing to apply this to",
        ErrorKind::EmptyList => "empty list",
    }
}

pub fn build_report(e: &Error) -> Report {
    let color = match e.kind {
        ErrorKind::UnmatchedParenthesis => Color::Yellow,
        _ => Color::Red,
    };
    Report::build(ReportKind::Error, (), e.span.start)
        .with_message(e.kind.to_string())
        .with_label(
            Label::new(e.span.clone())
                .with_message(format!("{}", label(e.kind).fg(color)))
                .with_color(color),
        )
        .finish()
}
