use crate::domain::entities::identity_record::IdentityRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::identity_store::{IdentityStore, SimilarityMatch};
use crate::domain::values::deletion::DeletionOutcome;
use crate::domain::values::embedding::Embedding;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

/// Identity store backed by a Qdrant collection over its REST API.
///
/// Upserts wait for the write to be applied. Deletes do not, so the
/// follow-up visibility read may still see the record.
pub struct QdrantIdentityStore {
    client: Client,
    base_url: String,
    collection: String,
    dimension: usize,
}

#[derive(Deserialize)]
struct QdrantResponse<T> {
    result: T,
}

#[derive(Deserialize)]
struct CollectionsResult {
    collections: Vec<CollectionDescription>,
}

#[derive(Deserialize)]
struct CollectionDescription {
    name: String,
}

#[derive(Deserialize)]
struct ScoredPoint {
    score: f32,
    #[serde(default)]
    payload: Option<NamePayload>,
}

#[derive(Deserialize)]
struct ScrollResult {
    points: Vec<serde_json::Value>,
}

#[derive(Serialize, Deserialize)]
struct NamePayload {
    name: String,
}

#[derive(Serialize)]
struct PointStruct<'a> {
    id: &'a str,
    vector: &'a [f32],
    payload: NamePayload,
}

fn name_filter(name: &str) -> serde_json::Value {
    json!({ "must": [{ "key": "name", "match": { "value": name } }] })
}

impl QdrantIdentityStore {
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>, dimension: usize) -> Self {
        Self {
            client: Client::builder()
                .user_agent("faceid/0.1")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            dimension,
        }
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!("{}/collections/{}{}", self.base_url, self.collection, suffix)
    }

    fn check(&self, vector: &Embedding) -> Result<(), DomainError> {
        vector.check_dimension(self.dimension).map_err(DomainError::InvalidInput)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, DomainError> {
        let resp = req
            .send()
            .await
            .map_err(|e| DomainError::StoreUnavailable(format!("Qdrant request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::StoreUnavailable(format!("Qdrant {status}: {body}")));
        }

        let parsed: QdrantResponse<T> = resp
            .json()
            .await
            .map_err(|e| DomainError::StoreUnavailable(format!("Qdrant parse error: {e}")))?;
        Ok(parsed.result)
    }

    async fn scroll_one(&self, name: &str) -> Result<bool, DomainError> {
        let result: ScrollResult = self
            .send(self.client.post(self.collection_url("/points/scroll")).json(&json!({
                "filter": name_filter(name),
                "limit": 1,
                "with_payload": false,
                "with_vector": false,
            })))
            .await?;
        Ok(!result.points.is_empty())
    }
}

#[async_trait::async_trait]
impl IdentityStore for QdrantIdentityStore {
    async fn ensure_collection(&self) -> Result<(), DomainError> {
        let existing: CollectionsResult = self
            .send(self.client.get(format!("{}/collections", self.base_url)))
            .await?;
        if existing.collections.iter().any(|c| c.name == self.collection) {
            debug!(collection = %self.collection, "collection already exists");
            return Ok(());
        }

        let _: serde_json::Value = self
            .send(self.client.put(self.collection_url("")).json(&json!({
                "vectors": { "size": self.dimension, "distance": "Cosine" }
            })))
            .await?;
        info!(collection = %self.collection, dimension = self.dimension, "created collection");
        Ok(())
    }

    async fn upsert(&self, name: &str, vector: &Embedding) -> Result<(), DomainError> {
        self.check(vector)?;
        let record = IdentityRecord::new(name, vector.clone());
        let point = PointStruct {
            id: &record.id,
            vector: record.vector.as_slice(),
            payload: NamePayload { name: record.name.clone() },
        };
        let _: serde_json::Value = self
            .send(
                self.client
                    .put(self.collection_url("/points?wait=true"))
                    .json(&json!({ "points": [point] })),
            )
            .await?;
        Ok(())
    }

    async fn search(&self, vector: &Embedding, limit: usize) -> Result<Vec<SimilarityMatch>, DomainError> {
        self.check(vector)?;
        if limit == 0 {
            return Ok(vec![]);
        }
        let points: Vec<ScoredPoint> = self
            .send(self.client.post(self.collection_url("/points/search")).json(&json!({
                "vector": vector.as_slice(),
                "limit": limit,
                "with_payload": true,
            })))
            .await?;

        let mut matches = Vec::with_capacity(points.len());
        for point in points {
            match point.payload {
                Some(p) => matches.push(SimilarityMatch { name: p.name, score: point.score }),
                None => warn!(score = point.score, "search hit without a name payload"),
            }
        }
        Ok(matches)
    }

    async fn exists(&self, name: &str) -> Result<bool, DomainError> {
        self.scroll_one(name).await
    }

    async fn delete(&self, name: &str) -> Result<DeletionOutcome, DomainError> {
        let _: serde_json::Value = self
            .send(
                self.client
                    .post(self.collection_url("/points/delete?wait=false"))
                    .json(&json!({ "filter": name_filter(name) })),
            )
            .await?;

        if self.scroll_one(name).await? {
            Ok(DeletionOutcome::RemovalPending)
        } else {
            Ok(DeletionOutcome::ConfirmedRemoved)
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
