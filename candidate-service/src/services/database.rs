use crate::config::StoreConfig;
use crate::models::{Candidate, CandidateSummary};
use crate::services::credentials::StoreCredential;
use crate::services::store::{CandidateStore, StoreError};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, FindOptions, ReplaceOptions},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

const APP_NAME: &str = "candidate-service";

/// Candidates collection reached over the MongoDB wire protocol.
///
/// The client pools connections internally; clones share the pool.
#[derive(Clone)]
pub struct MongoCandidateStore {
    client: MongoClient,
    db: Database,
    container: String,
}

impl MongoCandidateStore {
    pub async fn connect(
        config: &StoreConfig,
        credential: Option<StoreCredential>,
    ) -> Result<Self, AppError> {
        tracing::info!(
            database = %config.database,
            container = %config.container,
            explicit_credential = credential.is_some(),
            "Connecting to document store"
        );

        let mut options = ClientOptions::parse(&config.endpoint).await.map_err(|e| {
            tracing::error!("Failed to parse document store endpoint: {}", e);
            AppError::from(e)
        })?;
        options.app_name = Some(APP_NAME.to_string());
        if let Some(timeout) = config.server_selection_timeout {
            options.server_selection_timeout = Some(timeout);
        }
        if let Some(credential) = credential {
            options.credential = Some(credential.into_mongo());
        }

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create document store client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(&config.database);
        tracing::info!(database = %config.database, "Document store client ready");

        Ok(Self {
            client,
            db,
            container: config.container.clone(),
        })
    }

    pub fn candidates(&self) -> Collection<Candidate> {
        self.db.collection(&self.container)
    }

    fn summaries(&self) -> Collection<CandidateSummary> {
        self.db.collection(&self.container)
    }

    fn name_projection() -> FindOptions {
        FindOptions::builder()
            .projection(doc! { "_id": 0, "CandidateName": 1 })
            .build()
    }

    async fn query(&self, filter: Document) -> Result<Vec<CandidateSummary>, StoreError> {
        // Whole-collection scan: CandidateName is not the shard key.
        let cursor = self
            .summaries()
            .find(filter, Self::name_projection())
            .await?;
        let summaries: Vec<CandidateSummary> = cursor.try_collect().await?;
        Ok(summaries)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl CandidateStore for MongoCandidateStore {
    async fn find_by_name(&self, name: &str) -> Result<Vec<CandidateSummary>, StoreError> {
        tracing::debug!(name = %name, "Querying candidate by name");
        self.query(doc! { "CandidateName": name }).await
    }

    async fn list_all(&self) -> Result<Vec<CandidateSummary>, StoreError> {
        tracing::debug!("Listing all candidates");
        self.query(doc! {}).await
    }

    async fn upsert(&self, name: &str) -> Result<Candidate, StoreError> {
        let candidate = Candidate::new(name);
        let options = ReplaceOptions::builder().upsert(true).build();

        let result = self
            .candidates()
            .replace_one(doc! { "_id": &candidate.id }, &candidate, options)
            .await?;
        tracing::debug!(
            name = %name,
            matched = result.matched_count,
            inserted = result.upserted_id.is_some(),
            "Upserted candidate"
        );

        Ok(candidate)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }
}
