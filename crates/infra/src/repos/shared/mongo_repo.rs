use anyhow::Result;
use futures::stream::StreamExt;
use mongodb::{
    bson::{doc, from_document, to_document, Document},
    Collection, Cursor,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

/// Mapping between a domain entity and its persisted document shape
pub trait MongoDocument<E>: Serialize + DeserializeOwned {
    fn to_domain(self) -> E;
    fn from_domain(entity: &E) -> Self;
    fn get_id_filter(&self) -> Document;
}

pub fn id_filter(id: &str) -> Document {
    doc! {
        "_id": id
    }
}

fn entity_to_persistence<E, D: MongoDocument<E>>(entity: &E) -> Result<Document> {
    let raw = D::from_domain(entity);
    to_document(&raw).map_err(anyhow::Error::new)
}

fn persistence_to_entity<E, D: MongoDocument<E>>(doc: Document) -> Result<E> {
    let raw: D = from_document(doc)?;
    Ok(raw.to_domain())
}

pub async fn insert<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    entity: &E,
) -> Result<()> {
    let doc = entity_to_persistence::<E, D>(entity)?;
    collection.insert_one(doc, None).await?;
    Ok(())
}

pub async fn save<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    entity: &E,
) -> Result<()> {
    let raw = D::from_domain(entity);
    let filter = raw.get_id_filter();
    let doc = to_document(&raw)?;
    let res = collection.replace_one(filter, doc, None).await?;
    // A zero-match replace means the caller holds an entity that is not in
    // the store, that must surface as an error and not as a silent no-op
    if res.matched_count == 0 {
        anyhow::bail!("Tried to replace a document that does not exist");
    }
    Ok(())
}

pub async fn find<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    id: &str,
) -> Option<E> {
    find_one_by::<E, D>(collection, id_filter(id)).await
}

pub async fn find_one_by<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    filter: Document,
) -> Option<E> {
    match collection.find_one(filter, None).await {
        Ok(Some(doc)) => match persistence_to_entity::<E, D>(doc) {
            Ok(e) => Some(e),
            Err(e) => {
                error!("Unable to deserialize document: {:?}", e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            error!("Mongodb query failed: {:?}", e);
            None
        }
    }
}

pub async fn find_many_by<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    filter: Document,
) -> Result<Vec<E>> {
    let cursor = collection.find(filter, None).await?;
    Ok(consume_cursor::<E, D>(cursor).await)
}

async fn consume_cursor<E, D: MongoDocument<E>>(mut cursor: Cursor<Document>) -> Vec<E> {
    let mut documents = Vec::new();
    while let Some(result) = cursor.next().await {
        match result.map_err(anyhow::Error::new).and_then(persistence_to_entity::<E, D>) {
            Ok(document) => documents.push(document),
            Err(e) => {
                error!("Error consuming mongodb cursor: {:?}", e);
            }
        }
    }

    documents
}
