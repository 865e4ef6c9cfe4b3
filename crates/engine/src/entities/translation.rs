//! Translation map operations.
//!
//! Every write is a single [`TranslationMutation`] applied by the repository
//! as one read-modify-write of one record, so two locales written
//! concurrently both survive.

use std::sync::Arc;

use bridge_domain::{
    AttributeName, DomainError, EntityId, Locale, TranslatedEntity, TranslationMutation,
};

use crate::infrastructure::ports::{ClockPort, RepoError, TranslationRepo};

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Where a fallback read found its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedValue {
    pub locale: Locale,
    pub value: String,
}

pub struct TranslationMap {
    repo: Arc<dyn TranslationRepo>,
    clock: Arc<dyn ClockPort>,
    default_locale: Locale,
}

impl TranslationMap {
    pub fn new(
        repo: Arc<dyn TranslationRepo>,
        clock: Arc<dyn ClockPort>,
        default_locale: Locale,
    ) -> Self {
        Self {
            repo,
            clock,
            default_locale,
        }
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Register a new entity with no translations.
    pub async fn create(&self) -> Result<TranslatedEntity, TranslationError> {
        let entity = TranslatedEntity::new(self.clock.now());
        self.repo.insert(&entity).await?;
        tracing::debug!(entity_id = %entity.id(), "Created translated entity");
        Ok(entity)
    }

    /// Register an entity under a known id (e.g. the id of the record it
    /// translates).
    pub async fn create_with_id(&self, id: EntityId) -> Result<TranslatedEntity, TranslationError> {
        let entity = TranslatedEntity::new(self.clock.now()).with_id(id);
        self.repo.insert(&entity).await?;
        Ok(entity)
    }

    pub async fn get_entity(&self, id: EntityId) -> Result<TranslatedEntity, TranslationError> {
        self.repo
            .get(id)
            .await?
            .ok_or(TranslationError::EntityNotFound(id))
    }

    pub async fn delete(&self, id: EntityId) -> Result<bool, TranslationError> {
        Ok(self.repo.delete(id).await?)
    }

    /// Create or overwrite one attribute in one locale.
    pub async fn set(
        &self,
        id: EntityId,
        locale: Locale,
        attribute: AttributeName,
        value: impl Into<String>,
    ) -> Result<TranslatedEntity, TranslationError> {
        self.apply(
            id,
            TranslationMutation::Set {
                locale,
                attribute,
                value: value.into(),
            },
        )
        .await
    }

    pub async fn remove(
        &self,
        id: EntityId,
        locale: Locale,
        attribute: AttributeName,
    ) -> Result<TranslatedEntity, TranslationError> {
        self.apply(id, TranslationMutation::Remove { locale, attribute })
            .await
    }

    pub async fn remove_locale(
        &self,
        id: EntityId,
        locale: Locale,
    ) -> Result<TranslatedEntity, TranslationError> {
        self.apply(id, TranslationMutation::RemoveLocale { locale })
            .await
    }

    /// Apply one mutation atomically and return the updated record.
    pub async fn apply(
        &self,
        id: EntityId,
        mutation: TranslationMutation,
    ) -> Result<TranslatedEntity, TranslationError> {
        let locale = mutation.locale().clone();
        let entity = self
            .repo
            .modify(id, mutation, self.clock.now())
            .await?
            .ok_or(TranslationError::EntityNotFound(id))?;
        tracing::trace!(entity_id = %id, locale = %locale, "Applied translation mutation");
        Ok(entity)
    }

    /// Value for exactly `locale`/`attribute`; no fallback.
    pub async fn get(
        &self,
        id: EntityId,
        locale: &Locale,
        attribute: &AttributeName,
    ) -> Result<Option<String>, TranslationError> {
        let entity = self.get_entity(id).await?;
        Ok(entity.get(locale, attribute).map(str::to_string))
    }

    /// Try `locale`, then its bare language (`fr` for `fr-ca`), then the
    /// configured default locale.
    pub async fn get_with_fallback(
        &self,
        id: EntityId,
        locale: &Locale,
        attribute: &AttributeName,
    ) -> Result<Option<LocalizedValue>, TranslationError> {
        let entity = self.get_entity(id).await?;
        let language = Locale::new(locale.language()).ok().filter(|l| l != locale);
        let found = [Some(locale), language.as_ref(), Some(&self.default_locale)]
            .into_iter()
            .flatten()
            .find_map(|candidate| {
                entity.get(candidate, attribute).map(|value| LocalizedValue {
                    locale: candidate.clone(),
                    value: value.to_string(),
                })
            });
        Ok(found)
    }

    pub async fn has_locale(&self, id: EntityId, locale: &Locale) -> Result<bool, TranslationError> {
        Ok(self.get_entity(id).await?.has_locale(locale))
    }

    pub async fn locales(&self, id: EntityId) -> Result<Vec<Locale>, TranslationError> {
        Ok(self.get_entity(id).await?.locales().cloned().collect())
    }

    /// Entities whose `attribute` in `locale` equals `value` exactly.
    pub async fn find_by_attribute_value(
        &self,
        locale: &Locale,
        attribute: &AttributeName,
        value: &str,
    ) -> Result<Vec<EntityId>, TranslationError> {
        Ok(self
            .repo
            .find_by_attribute_value(locale, attribute, value)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::memory::InMemoryTranslationRepo;
    use crate::infrastructure::ports::MockTranslationRepo;
    use chrono::Utc;

    fn locale(code: &str) -> Locale {
        Locale::new(code).unwrap()
    }

    fn attr(name: &str) -> AttributeName {
        AttributeName::new(name).unwrap()
    }

    fn map() -> TranslationMap {
        TranslationMap::new(
            Arc::new(InMemoryTranslationRepo::new()),
            Arc::new(FixedClock(Utc::now())),
            locale("en"),
        )
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let map = map();
        let entity = map.create().await.unwrap();

        map.set(entity.id(), locale("fr"), attr("title"), "Savoie")
            .await
            .unwrap();
        let value = map
            .get(entity.id(), &locale("fr"), &attr("title"))
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("Savoie"));
        assert!(map.has_locale(entity.id(), &locale("fr")).await.unwrap());
        assert!(!map.has_locale(entity.id(), &locale("de")).await.unwrap());
    }

    #[tokio::test]
    async fn empty_string_is_a_value() {
        let map = map();
        let entity = map.create().await.unwrap();
        map.set(entity.id(), locale("en"), attr("subtitle"), "")
            .await
            .unwrap();

        let value = map
            .get(entity.id(), &locale("en"), &attr("subtitle"))
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn when_entity_missing_then_reads_and_writes_fail() {
        let map = map();
        let ghost = EntityId::new();

        let err = map
            .set(ghost, locale("fr"), attr("title"), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::EntityNotFound(id) if id == ghost));
        let err = map.get(ghost, &locale("fr"), &attr("title")).await.unwrap_err();
        assert!(matches!(err, TranslationError::EntityNotFound(_)));
    }

    #[tokio::test]
    async fn removing_last_attribute_drops_the_locale() {
        let map = map();
        let entity = map.create().await.unwrap();
        map.set(entity.id(), locale("fr"), attr("title"), "Titre")
            .await
            .unwrap();
        map.set(entity.id(), locale("en"), attr("title"), "Title")
            .await
            .unwrap();

        map.remove(entity.id(), locale("fr"), attr("title"))
            .await
            .unwrap();
        assert_eq!(map.locales(entity.id()).await.unwrap(), vec![locale("en")]);

        map.remove_locale(entity.id(), locale("en")).await.unwrap();
        assert!(map.locales(entity.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fallback_uses_the_default_locale() {
        let map = map();
        let entity = map.create().await.unwrap();
        map.set(entity.id(), locale("en"), attr("title"), "Savoy")
            .await
            .unwrap();
        map.set(entity.id(), locale("fr"), attr("title"), "Savoie")
            .await
            .unwrap();

        let fr = map
            .get_with_fallback(entity.id(), &locale("fr"), &attr("title"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fr.locale, locale("fr"));
        assert_eq!(fr.value, "Savoie");

        let de = map
            .get_with_fallback(entity.id(), &locale("de"), &attr("title"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(de.locale, locale("en"));
        assert_eq!(de.value, "Savoy");

        let regional = map
            .get_with_fallback(entity.id(), &locale("fr-CA"), &attr("title"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(regional.locale, locale("fr"));
        assert_eq!(regional.value, "Savoie");

        let missing = map
            .get_with_fallback(entity.id(), &locale("de"), &attr("body"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn concurrent_locales_both_survive() {
        let map = Arc::new(map());
        let entity = map.create().await.unwrap();
        let id = entity.id();

        let tasks: Vec<_> = ["fr", "de", "it", "es"]
            .into_iter()
            .map(|code| {
                let map = map.clone();
                tokio::spawn(async move {
                    map.set(id, locale(code), attr("title"), code.to_uppercase())
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(map.locales(id).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn find_by_attribute_value_is_exact() {
        let map = map();
        let a = map.create().await.unwrap();
        let b = map.create().await.unwrap();
        map.set(a.id(), locale("fr"), attr("title"), "Savoie")
            .await
            .unwrap();
        map.set(b.id(), locale("fr"), attr("title"), "savoie")
            .await
            .unwrap();

        let hits = map
            .find_by_attribute_value(&locale("fr"), &attr("title"), "Savoie")
            .await
            .unwrap();
        assert_eq!(hits, vec![a.id()]);
    }

    #[tokio::test]
    async fn repo_errors_are_propagated() {
        let mut repo = MockTranslationRepo::new();
        repo.expect_modify()
            .returning(|_, _, _| Err(RepoError::database("modify", "connection reset")));

        let map = TranslationMap::new(
            Arc::new(repo),
            Arc::new(FixedClock(Utc::now())),
            locale("en"),
        );
        let err = map
            .set(EntityId::new(), locale("fr"), attr("title"), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::Repo(_)));
    }
}
