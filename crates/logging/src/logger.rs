//! crates/logging/src/logger.rs
//! Injectable logger handles.

use tracing::Span;

/// Handle a component logs through.
///
/// The handle is cheap to clone; clones share the same span. Components keep
/// one in their struct and pass `parent: logger.span()` to the `tracing`
/// macros.
#[derive(Clone, Debug)]
pub struct Logger {
    component: &'static str,
    span: Span,
}

impl Logger {
    /// Creates a logger for a top-level component.
    #[must_use]
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            span: tracing::info_span!("zssh", component),
        }
    }

    /// Creates a logger that carries no span context.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            component: "",
            span: Span::none(),
        }
    }

    /// Derives a logger for a sub-component nested under this one.
    #[must_use]
    pub fn child(&self, component: &'static str) -> Self {
        Self {
            component,
            span: tracing::info_span!(parent: &self.span, "zssh", component),
        }
    }

    /// Name of the component this logger was created for.
    #[must_use]
    pub const fn component(&self) -> &'static str {
        self.component
    }

    /// Span to use as the `parent:` of emitted events.
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_keeps_its_own_component_name() {
        let parent = Logger::new("connect");
        let child = parent.child("auth");
        assert_eq!(parent.component(), "connect");
        assert_eq!(child.component(), "auth");
    }

    #[test]
    fn disabled_logger_has_no_span() {
        let logger = Logger::disabled();
        assert!(logger.span().is_none());
        assert_eq!(logger.component(), "");
    }

    #[test]
    fn events_with_disabled_parent_do_not_panic() {
        let logger = Logger::default();
        tracing::info!(parent: logger.span(), "nothing listens");
    }
}
