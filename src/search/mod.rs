//! Cross-page search: concurrent fetch of the sibling pages, the results
//! panel, and the input controller tying them to user events.

pub mod aggregator;
pub mod panel;
pub mod session;

#[cfg(test)]
mod tests;

pub use aggregator::{SearchAggregator, SearchError};
pub use panel::{PanelContent, ResultsPanel};
pub use session::{SearchOutcome, SearchSession};
