use qoelog_types::{Diagnostic, Error, ParsePolicy, Result};

/// Strategy applied to every scanner diagnostic
///
/// Returning `Ok(Some(_))` keeps the diagnostic in the index report,
/// `Ok(None)` drops it and `Err(_)` aborts the parse.
pub trait DiagnosticHandler {
    fn handle(&mut self, diagnostic: Diagnostic) -> Result<Option<Diagnostic>>;
}

impl<F> DiagnosticHandler for F
where
    F: FnMut(Diagnostic) -> Result<Option<Diagnostic>>,
{
    fn handle(&mut self, diagnostic: Diagnostic) -> Result<Option<Diagnostic>> {
        self(diagnostic)
    }
}

/// Logs a warning and keeps going
pub struct WarnHandler;

impl DiagnosticHandler for WarnHandler {
    fn handle(&mut self, diagnostic: Diagnostic) -> Result<Option<Diagnostic>> {
        warn(&diagnostic);
        Ok(Some(diagnostic))
    }
}

/// Turns the first diagnostic into a fatal error
///
/// Diagnostics that never escalate are handled as by [`WarnHandler`].
pub struct StrictHandler;

impl DiagnosticHandler for StrictHandler {
    fn handle(&mut self, diagnostic: Diagnostic) -> Result<Option<Diagnostic>> {
        if !diagnostic.kind.escalates() {
            return WarnHandler.handle(diagnostic);
        }
        Err(Error::Diagnostic(diagnostic))
    }
}

pub struct IgnoreHandler;

impl DiagnosticHandler for IgnoreHandler {
    fn handle(&mut self, _diagnostic: Diagnostic) -> Result<Option<Diagnostic>> {
        Ok(None)
    }
}

fn warn(diagnostic: &Diagnostic) {
    tracing::warn!(
        file = %diagnostic.at.file,
        line = diagnostic.at.line,
        kind = diagnostic.kind.name(),
        "{}",
        diagnostic.kind
    );
}

pub fn handler_for(policy: ParsePolicy) -> Box<dyn DiagnosticHandler> {
    match policy {
        ParsePolicy::Warn => Box::new(WarnHandler),
        ParsePolicy::Error => Box::new(StrictHandler),
        ParsePolicy::Ignore => Box::new(IgnoreHandler),
    }
}
