use chumsky::error::Simple;
use chumsky::primitive::{choice, end, filter, just};
use chumsky::recursive::recursive;
use chumsky::text::TextParser as _;
use chumsky::{text, Parser};
use lts::{Act, Mode};
use thiserror::Error;

use crate::ast::{Definition, HideSet, Model, Process, ProcessKind, SourceSpan, Span};

/// A syntax error with its resolved source location.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub location: SourceSpan,
}

// File       ::=  Model*
// Model      ::=  Definition (',' Definition)* ('\' HideSet)? '.'
// Definition ::=  Name '=' Process
// Process    ::=  (Name | Choice) ('||' Process)?
// Choice     ::=  Sequence ('|' Choice)?
// Sequence   ::=  Action '->' (Sequence | Name)
//             |   'STOP' | 'ERROR'
//             |   '(' Process ')'
// HideSet    ::=  '{' Action (',' Action)* '}'
// Name       ::=  [A-Z] [A-Za-z0-9_]*        (STOP and ERROR are reserved)
// Action     ::=  ('!' | '?')? [a-z] [A-Za-z0-9_]*
pub fn parse(source: &str) -> Result<Vec<Model>, ParseError> {
    let ident_tail = filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_').repeated();

    let name = filter(|c: &char| c.is_ascii_uppercase())
        .then(ident_tail.clone())
        .try_map(|(first, rest), span| {
            let name: String = std::iter::once(first).chain(rest).collect();
            match name.as_str() {
                "STOP" | "ERROR" => Err(Simple::custom(span, format!("{name} is reserved"))),
                _ => Ok(name),
            }
        })
        .padded()
        .boxed();

    let mode = choice((just('!').to(Mode::Broadcast), just('?').to(Mode::Listen)))
        .or_not()
        .map(|mode| mode.unwrap_or(Mode::Plain));
    let action = mode
        .then(filter(|c: &char| c.is_ascii_lowercase()))
        .then(ident_tail)
        .map(|((mode, first), rest)| {
            let name = std::iter::once(first).chain(rest).collect();
            Act { name, mode }
        })
        .padded()
        .boxed();

    let name_process = name
        .clone()
        .map_with_span(|name, span: Span| Process { kind: ProcessKind::Name(name), span })
        .boxed();

    let process = recursive(|process| {
        let sequence = recursive(|sequence| {
            let continuation = sequence.or(name_process.clone());
            let arrow = action
                .clone()
                .then_ignore(just("->").padded())
                .then(continuation)
                .map(|(act, cont)| ProcessKind::Sequence(act, Box::new(cont)));
            let stop = text::keyword("STOP").map(|_| ProcessKind::Stop);
            let error = text::keyword("ERROR").map(|_| ProcessKind::Error);
            let group = process.clone().delimited_by(just('(').padded(), just(')').padded());

            choice((
                arrow.map_with_span(|kind, span| Process { kind, span }),
                stop.padded().map_with_span(|kind, span| Process { kind, span }),
                error.padded().map_with_span(|kind, span| Process { kind, span }),
                group,
            ))
            .boxed()
        });

        let choice_level = recursive(|choice_level| {
            sequence
                .then(just('|').padded().ignore_then(choice_level).or_not())
                .map_with_span(|(first, rest), span| match rest {
                    Some(rest) => Process {
                        kind: ProcessKind::Choice(Box::new(first), Box::new(rest)),
                        span,
                    },
                    None => first,
                })
                .boxed()
        });

        name_process
            .clone()
            .or(choice_level)
            .then(just("||").padded().ignore_then(process).or_not())
            .map_with_span(|(left, right), span| match right {
                Some(right) => Process {
                    kind: ProcessKind::Parallel(Box::new(left), Box::new(right)),
                    span,
                },
                None => left,
            })
            .boxed()
    });

    let definition = name
        .then_ignore(just('=').padded())
        .then(process)
        .map_with_span(|(name, body), span| Definition { name, body, span });

    let hide_actions = action
        .separated_by(just(',').padded())
        .at_least(1)
        .delimited_by(just('{').padded(), just('}').padded());
    let hide_set = just('\\')
        .padded()
        .ignore_then(hide_actions)
        .map_with_span(|actions, span| HideSet { actions, span });

    let model = definition
        .separated_by(just(',').padded())
        .at_least(1)
        .then(hide_set.or_not())
        .then_ignore(just('.').padded())
        .map_with_span(|(definitions, hide), span| Model { definitions, hide, span });

    let file = model.repeated().padded().then_ignore(end());

    file.parse(source).map_err(|errors| resolve_error(source, errors))
}

fn resolve_error(source: &str, errors: Vec<Simple<char>>) -> ParseError {
    // chumsky reports one error per rewound alternative; the first one is
    // the deepest, which is the one worth showing.
    let error = errors.into_iter().next().expect("parse failed without errors");
    ParseError {
        message: error.to_string(),
        location: SourceSpan::resolve(source, &error.span()),
    }
}
