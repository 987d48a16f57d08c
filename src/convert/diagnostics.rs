//! Advisory conversion diagnostics
//!
//! Conversions never fail because information is discarded; they report it.
//! Diagnostics flow through an explicit [`DiagnosticSink`] chosen by the
//! caller instead of an ambient global warning channel: [`crate::convert`]
//! wires in a `tracing`-backed sink (or a null sink when warnings are
//! suppressed), while [`crate::convert_with_sink`] hands control to the
//! caller, typically via [`Diagnostics`].

use crate::dtype::DType;

/// Classification of an advisory notification
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The output representation cannot encode all distinctions present in
    /// the input
    PrecisionLoss,
    /// Negative values collapse when mapping into an unsigned or boolean
    /// range
    SignLoss,
    /// A narrowing conversion skipped rescaling because every value already
    /// fits the target width; output values are raw casts
    DowncastWithoutScaling,
}

impl DiagnosticKind {
    /// Short label for logging
    pub const fn label(self) -> &'static str {
        match self {
            Self::PrecisionLoss => "precision loss",
            Self::SignLoss => "sign loss",
            Self::DowncastWithoutScaling => "downcast without scaling",
        }
    }
}

/// A single advisory notification emitted during conversion
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// What category of information was discarded
    pub kind: DiagnosticKind,
    /// Human-readable description naming the dtypes involved
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn precision_loss(from: DType, to: DType) -> Self {
        Self {
            kind: DiagnosticKind::PrecisionLoss,
            message: format!("possible precision loss converting from {from} to {to}"),
        }
    }

    pub(crate) fn sign_loss(from: DType, to: DType) -> Self {
        Self {
            kind: DiagnosticKind::SignLoss,
            message: format!(
                "possible sign loss when converting negative image of type {from} \
                 to positive image of type {to}"
            ),
        }
    }

    pub(crate) fn downcast(from: DType, to: DType, max: i128) -> Self {
        Self {
            kind: DiagnosticKind::DowncastWithoutScaling,
            message: format!(
                "downcasting {from} to {to} without scaling because max value {max} fits in {to}"
            ),
        }
    }
}

/// Receiver for advisory notifications
///
/// Implemented for closures, so `&mut |d: Diagnostic| ...` works directly.
pub trait DiagnosticSink {
    /// Deliver one notification
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// Collecting sink that records every notification for later inspection
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over the recorded notifications in emission order
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of recorded notifications
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any recorded notification has the given kind
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    /// Consume the collector, returning the recorded notifications
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl DiagnosticSink for Diagnostics {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}

/// Default sink: forwards notifications to `tracing` at warn level
pub(crate) struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(kind = diagnostic.kind.label(), "{}", diagnostic.message);
    }
}

/// Sink used when the caller suppressed warnings
pub(crate) struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_records_in_order() {
        let mut sink = Diagnostics::new();
        sink.emit(Diagnostic::precision_loss(DType::U16, DType::U8));
        sink.emit(Diagnostic::sign_loss(DType::I8, DType::U8));
        assert_eq!(sink.len(), 2);
        assert!(sink.has(DiagnosticKind::PrecisionLoss));
        assert!(sink.has(DiagnosticKind::SignLoss));
        assert!(!sink.has(DiagnosticKind::DowncastWithoutScaling));

        let kinds: Vec<_> = sink.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DiagnosticKind::PrecisionLoss, DiagnosticKind::SignLoss]
        );
    }

    #[test]
    fn test_closure_sink() {
        let mut count = 0;
        {
            let mut sink = |_d: Diagnostic| count += 1;
            sink.emit(Diagnostic::downcast(DType::U64, DType::I16, 9));
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn test_messages_name_dtypes() {
        let d = Diagnostic::downcast(DType::U64, DType::I16, 9);
        assert!(d.message.contains("u64"));
        assert!(d.message.contains("i16"));
        assert!(d.message.contains('9'));
    }
}
