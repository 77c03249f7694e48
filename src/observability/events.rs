//! Engine events
//!
//! Every log line names one of these events.

use std::fmt;

/// Observable events of the translation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Entity schemas registered
    SchemasLoaded,

    // Translation
    /// Criteria compiled into an executable query
    CriteriaTranslated,
    /// Criteria rejected by the translator
    TranslationRejected,
    /// A filter of unknown kind was skipped
    FilterSkipped,

    // Execution
    /// Query run against a store
    QueryExecuted,
    /// Query failed in the store
    QueryFailed,

    // Catalog
    /// Product written to the store
    ProductCreated,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",

            Event::CriteriaTranslated => "CRITERIA_TRANSLATED",
            Event::TranslationRejected => "TRANSLATION_REJECTED",
            Event::FilterSkipped => "FILTER_SKIPPED",

            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryFailed => "QUERY_FAILED",

            Event::ProductCreated => "PRODUCT_CREATED",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::TranslationRejected | Event::QueryFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::SchemasLoaded,
            Event::CriteriaTranslated,
            Event::TranslationRejected,
            Event::FilterSkipped,
            Event::QueryExecuted,
            Event::QueryFailed,
            Event::ProductCreated,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_failure_events() {
        assert!(Event::TranslationRejected.is_failure());
        assert!(Event::QueryFailed.is_failure());
        assert!(!Event::FilterSkipped.is_failure());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::CriteriaTranslated), "CRITERIA_TRANSLATED");
    }
}
