use bson::Document;
use co2_client::ClientError;

use crate::error::DashboardError;
use crate::table::Table;

/// Outcome of one fetch. `Empty` is a successful fetch that matched nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Rows(Vec<Document>),
    Empty,
    Failed(String),
}

impl Resolution {
    pub fn from_fetch(result: Result<Vec<Document>, ClientError>) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => Resolution::Empty,
            Ok(rows) => Resolution::Rows(rows),
            Err(e) => Resolution::Failed(e.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Resolution::Empty)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Resolution::Failed(_))
    }
}

/// `Idle -> Fetching -> {Displaying, Empty, Error}`, driven by an explicit
/// user action. A fetch cannot start while another one is in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    #[default]
    Idle,
    Fetching,
    Displaying(Table),
    Empty,
    Error(String),
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Fetching => "fetching",
            ViewState::Displaying(_) => "displaying",
            ViewState::Empty => "empty",
            ViewState::Error(_) => "error",
        }
    }

    pub fn begin(&mut self) -> Result<(), DashboardError> {
        if matches!(self, ViewState::Fetching) {
            return Err(DashboardError::InvalidTransition {
                from: self.name(),
                action: "begin a fetch",
            });
        }
        *self = ViewState::Fetching;
        Ok(())
    }

    pub fn finish(&mut self, resolution: Resolution) -> Result<(), DashboardError> {
        if !matches!(self, ViewState::Fetching) {
            return Err(DashboardError::InvalidTransition {
                from: self.name(),
                action: "finish a fetch",
            });
        }
        *self = match resolution {
            Resolution::Rows(rows) => ViewState::Displaying(Table::from_documents(&rows)),
            Resolution::Empty => ViewState::Empty,
            Resolution::Failed(message) => ViewState::Error(message),
        };
        Ok(())
    }

    /// `begin`, fetch, `finish`. A view already fetching is rejected before
    /// `fetch` runs.
    pub fn run(&mut self, fetch: impl FnOnce() -> Resolution) -> Result<(), DashboardError> {
        self.begin()?;
        let resolution = fetch();
        self.finish(resolution)
    }

    /// One full cycle from `Idle`.
    pub fn fetched(fetch: impl FnOnce() -> Resolution) -> Result<Self, DashboardError> {
        let mut state = ViewState::Idle;
        state.run(fetch)?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn fetch_results_map_to_terminal_states() {
        let rows = ViewState::fetched(|| Resolution::Rows(vec![doc! { "_id": 1 }])).unwrap();
        assert!(matches!(rows, ViewState::Displaying(ref t) if t.len() == 1));
        assert_eq!(ViewState::fetched(|| Resolution::Empty).unwrap(), ViewState::Empty);
        assert_eq!(
            ViewState::fetched(|| Resolution::Failed("boom".into())).unwrap(),
            ViewState::Error("boom".into())
        );
    }

    #[test]
    fn run_while_fetching_is_rejected_without_fetching() {
        let mut state = ViewState::Idle;
        state.begin().unwrap();

        let mut called = false;
        let err = state
            .run(|| {
                called = true;
                Resolution::Empty
            })
            .unwrap_err();
        assert!(!called);
        assert!(matches!(err, DashboardError::InvalidTransition { from: "fetching", .. }));
        assert_eq!(state, ViewState::Fetching);
    }

    #[test]
    fn run_refreshes_a_terminal_state() {
        let mut state = ViewState::Error("timeout".into());
        state.run(|| Resolution::Rows(vec![doc! { "_id": 2 }])).unwrap();
        assert_eq!(state.name(), "displaying");
    }

    #[test]
    fn begin_is_not_reentrant() {
        let mut state = ViewState::Idle;
        state.begin().unwrap();
        let err = state.begin().unwrap_err();
        assert_eq!(
            err,
            DashboardError::InvalidTransition {
                from: "fetching",
                action: "begin a fetch"
            }
        );
    }

    #[test]
    fn finish_requires_fetching() {
        let mut state = ViewState::Idle;
        assert!(state.finish(Resolution::Empty).is_err());
        assert_eq!(state, ViewState::Idle);
    }

    #[test]
    fn terminal_states_can_fetch_again() {
        let mut state = ViewState::Error("timeout".into());
        state.begin().unwrap();
        state.finish(Resolution::Empty).unwrap();
        assert_eq!(state, ViewState::Empty);
    }

    #[test]
    fn from_fetch_separates_empty_from_failure() {
        assert!(Resolution::from_fetch(Ok(vec![])).is_empty());
        assert!(Resolution::from_fetch(Err(ClientError::Http("refused".into()))).is_failed());
    }
}
