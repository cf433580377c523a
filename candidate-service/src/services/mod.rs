pub mod credentials;
pub mod database;
pub mod identity;
pub mod metrics;
pub mod store;

pub use credentials::{
    AmbientCredentialProvider, CredentialProvider, StaticCredentialProvider, StoreCredential,
};
pub use database::MongoCandidateStore;
pub use identity::InstanceId;
pub use metrics::{init_metrics, render_metrics};
pub use store::{CandidateStore, InMemoryCandidateStore, StoreError};
