//! Debounced, page-aware search orchestration.
//!
//! - [`Debouncer`]: turns a stream of keystrokes into committed queries
//! - [`Pagination`]: page cursor clamped to the reported result count
//! - [`FetchCoordinator`]: runs fetches and tags them with sequence numbers
//! - [`SearchSession`]: owns [`SearchState`] and wires the pieces together

mod coordinator;
mod debounce;
mod pagination;
mod session;
mod state;

pub use coordinator::{Dispatch, FetchCoordinator, FetchOutcome, RequestTicket};
pub use debounce::Debouncer;
pub use pagination::Pagination;
pub use session::{SearchSession, SessionEvent};
pub use state::{PagerView, SearchState, StatusLine};
