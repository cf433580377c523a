pub mod candidates;
pub mod health;

pub use candidates::{get_candidate, list_candidates, post_candidate, CandidateError};
pub use health::{gtg, invalid_request, metrics};
