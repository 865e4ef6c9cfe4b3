//! In-memory translation storage with a value index.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{RepoError, TranslationRepo};
use bridge_domain::{AttributeName, EntityId, Locale, TranslatedEntity, TranslationMutation};

type ValueKey = (Locale, AttributeName, String);

#[derive(Default)]
struct TranslationIndex {
    entities: HashMap<EntityId, TranslatedEntity>,
    /// (locale, attribute, value) -> entities holding that exact value
    by_value: HashMap<ValueKey, BTreeSet<EntityId>>,
}

impl TranslationIndex {
    fn index_locale(
        &mut self,
        id: EntityId,
        locale: &Locale,
        attrs: Option<&BTreeMap<AttributeName, String>>,
    ) {
        for (attribute, value) in attrs.into_iter().flatten() {
            self.by_value
                .entry((locale.clone(), attribute.clone(), value.clone()))
                .or_default()
                .insert(id);
        }
    }

    fn unindex_locale(
        &mut self,
        id: EntityId,
        locale: &Locale,
        attrs: Option<&BTreeMap<AttributeName, String>>,
    ) {
        for (attribute, value) in attrs.into_iter().flatten() {
            let key = (locale.clone(), attribute.clone(), value.clone());
            if let Some(ids) = self.by_value.get_mut(&key) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.by_value.remove(&key);
                }
            }
        }
    }
}

/// Translation repository keeping whole records plus an equality index.
#[derive(Default)]
pub struct InMemoryTranslationRepo {
    index: RwLock<TranslationIndex>,
}

impl InMemoryTranslationRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranslationRepo for InMemoryTranslationRepo {
    async fn get(&self, id: EntityId) -> Result<Option<TranslatedEntity>, RepoError> {
        Ok(self.index.read().await.entities.get(&id).cloned())
    }

    async fn insert(&self, entity: &TranslatedEntity) -> Result<(), RepoError> {
        let mut index = self.index.write().await;
        if index.entities.contains_key(&entity.id()) {
            return Err(RepoError::constraint(format!(
                "entity {} already exists",
                entity.id()
            )));
        }
        for (locale, attrs) in entity.translations() {
            index.index_locale(entity.id(), locale, Some(attrs));
        }
        index.entities.insert(entity.id(), entity.clone());
        Ok(())
    }

    async fn modify(
        &self,
        id: EntityId,
        mutation: TranslationMutation,
        now: DateTime<Utc>,
    ) -> Result<Option<TranslatedEntity>, RepoError> {
        let mut index = self.index.write().await;
        let Some(mut entity) = index.entities.get(&id).cloned() else {
            return Ok(None);
        };

        let locale = mutation.locale().clone();
        let before = entity.attributes(&locale).cloned();
        if entity.apply(mutation, now) {
            index.unindex_locale(id, &locale, before.as_ref());
            index.index_locale(id, &locale, entity.attributes(&locale));
            index.entities.insert(id, entity.clone());
        }
        Ok(Some(entity))
    }

    async fn delete(&self, id: EntityId) -> Result<bool, RepoError> {
        let mut index = self.index.write().await;
        let Some(entity) = index.entities.remove(&id) else {
            return Ok(false);
        };
        for (locale, attrs) in entity.translations() {
            index.unindex_locale(id, locale, Some(attrs));
        }
        Ok(true)
    }

    async fn find_by_attribute_value(
        &self,
        locale: &Locale,
        attribute: &AttributeName,
        value: &str,
    ) -> Result<Vec<EntityId>, RepoError> {
        let index = self.index.read().await;
        let key = (locale.clone(), attribute.clone(), value.to_string());
        Ok(index
            .by_value
            .get(&key)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(code: &str) -> Locale {
        Locale::new(code).unwrap()
    }

    fn attr(name: &str) -> AttributeName {
        AttributeName::new(name).unwrap()
    }

    fn set(code: &str, name: &str, value: &str) -> TranslationMutation {
        TranslationMutation::Set {
            locale: locale(code),
            attribute: attr(name),
            value: value.to_string(),
        }
    }

    async fn repo_with_entity() -> (InMemoryTranslationRepo, EntityId) {
        let repo = InMemoryTranslationRepo::new();
        let entity = TranslatedEntity::new(Utc::now());
        repo.insert(&entity).await.unwrap();
        (repo, entity.id())
    }

    #[tokio::test]
    async fn modify_missing_entity_returns_none() {
        let repo = InMemoryTranslationRepo::new();
        let result = repo
            .modify(EntityId::new(), set("fr", "title", "Titre"), Utc::now())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn index_follows_overwrites() {
        let (repo, id) = repo_with_entity().await;
        repo.modify(id, set("fr", "title", "Titre"), Utc::now())
            .await
            .unwrap();
        repo.modify(id, set("fr", "title", "Autre"), Utc::now())
            .await
            .unwrap();

        let old = repo
            .find_by_attribute_value(&locale("fr"), &attr("title"), "Titre")
            .await
            .unwrap();
        assert!(old.is_empty());
        let new = repo
            .find_by_attribute_value(&locale("fr"), &attr("title"), "Autre")
            .await
            .unwrap();
        assert_eq!(new, vec![id]);
    }

    #[tokio::test]
    async fn lookup_is_scoped_to_locale_and_attribute() {
        let (repo, id) = repo_with_entity().await;
        repo.modify(id, set("fr", "title", "Paris"), Utc::now())
            .await
            .unwrap();

        for (code, name) in [("en", "title"), ("fr", "body")] {
            let hits = repo
                .find_by_attribute_value(&locale(code), &attr(name), "Paris")
                .await
                .unwrap();
            assert!(hits.is_empty(), "unexpected hit for {code}/{name}");
        }
    }

    #[tokio::test]
    async fn removing_a_locale_unindexes_it() {
        let (repo, id) = repo_with_entity().await;
        repo.modify(id, set("fr", "title", "Titre"), Utc::now())
            .await
            .unwrap();
        repo.modify(
            id,
            TranslationMutation::RemoveLocale {
                locale: locale("fr"),
            },
            Utc::now(),
        )
        .await
        .unwrap();

        let hits = repo
            .find_by_attribute_value(&locale("fr"), &attr("title"), "Titre")
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn delete_unindexes_everything() {
        let (repo, id) = repo_with_entity().await;
        repo.modify(id, set("en", "title", "Title"), Utc::now())
            .await
            .unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert!(repo.get(id).await.unwrap().is_none());
        let hits = repo
            .find_by_attribute_value(&locale("en"), &attr("title"), "Title")
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn insert_indexes_existing_translations() {
        let repo = InMemoryTranslationRepo::new();
        let mut entity = TranslatedEntity::new(Utc::now());
        entity.apply(set("fr", "title", "Titre"), Utc::now());
        repo.insert(&entity).await.unwrap();

        let hits = repo
            .find_by_attribute_value(&locale("fr"), &attr("title"), "Titre")
            .await
            .unwrap();
        assert_eq!(hits, vec![entity.id()]);
        assert!(repo.insert(&entity).await.is_err());
    }
}
