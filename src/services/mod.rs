pub mod cancel;
pub mod normalizer;
pub mod providers;
pub mod request_builder;
pub mod session;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use providers::{HttpRecommendationProvider, RecommendationProvider};
pub use session::{SearchOutcome, SearchSession, SearchTicket};
