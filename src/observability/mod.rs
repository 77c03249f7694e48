//! Observability for the engine
//!
//! Structured JSON-lines logging keyed by typed [`Event`]s. Logging is
//! synchronous and never affects translation or execution results.
//!
//! ```ignore
//! use criteria_engine::observability::{Event, Logger};
//!
//! Logger::trace(Event::CriteriaTranslated, &[("root", "products")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
