/// Warnings reported while transforming a scene
use thiserror::Error;

/// Anomalies the transformations recover from and report to the caller
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Warning {
    #[error("The \"{0}\" subdivision will be exported without performing a subdivision. Please convert it to a mesh in Anim8or if subdivisions are desired.")]
    SubdivisionNotRefined(String),
}

/// Receives human-readable warnings.
///
/// Sinks never influence control flow; what happens to a message is up to
/// the caller.
pub trait WarningSink {
    fn warn(&mut self, message: &str);
}

impl<F> WarningSink for F
where
    F: FnMut(&str),
{
    fn warn(&mut self, message: &str) {
        (self)(message)
    }
}

/// Drops every warning
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl WarningSink for Discard {
    fn warn(&mut self, _message: &str) {}
}

/// Keeps warnings in the order they were reported
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarningLog {
    messages: Vec<String>,
}

impl WarningLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

impl WarningSink for WarningLog {
    fn warn(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }
}

pub(crate) fn report(sink: &mut dyn WarningSink, warning: Warning) {
    sink.warn(&warning.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdivision_warning_text() {
        let warning = Warning::SubdivisionNotRefined("Body".to_string());
        assert_eq!(
            warning.to_string(),
            "The \"Body\" subdivision will be exported without performing a subdivision. \
             Please convert it to a mesh in Anim8or if subdivisions are desired."
        );
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |message: &str| seen.push(message.len());
            report(&mut sink, Warning::SubdivisionNotRefined("x".to_string()));
        }
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_warning_log_keeps_order() {
        let mut log = WarningLog::new();
        log.warn("first");
        Discard.warn("dropped");
        log.warn("second");
        assert_eq!(log.len(), 2);
        assert_eq!(log.messages(), ["first".to_string(), "second".to_string()]);
    }
}
