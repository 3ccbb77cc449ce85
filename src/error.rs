//! Diagnostics for the public API.

use evalconst_core::api::{FoldError, OptionError};
use evalconst_core::ast::Program;
use evalconst_core::evaluator::InternalError;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("evaluation of `{call}` failed unexpectedly")]
    #[diagnostic(
        code(evalconst::internal),
        help("the checker accepted a call the evaluator could not run; this is a bug in the tree or in evalconst")
    )]
    Internal {
        call: String,
        #[source]
        cause: InternalError,
        #[source_code]
        function: String,
        #[label("evaluated here")]
        span: Option<SourceSpan>,
    },

    #[error(transparent)]
    #[diagnostic(
        code(evalconst::options),
        help("supported options are prefix, step-limit and stack-limit")
    )]
    Options(#[from] OptionError),

    #[error("no fixture named '{0}'")]
    #[diagnostic(code(evalconst::fixture))]
    UnknownFixture(String),
}

impl Error {
    /// Attach the source of the caller to a pass failure.
    pub fn from_fold(program: &Program<'_>, error: FoldError) -> Self {
        match error {
            FoldError::Internal {
                function,
                call,
                cause,
            } => {
                let source = program
                    .functions()
                    .find(|f| f.fq_name() == function)
                    .map(|f| program.render_function(f.id))
                    .unwrap_or(function);
                let span = source
                    .find(&call)
                    .map(|offset| SourceSpan::from((offset, call.len())));
                Error::Internal {
                    call,
                    cause,
                    function: source,
                    span,
                }
            }
        }
    }
}
