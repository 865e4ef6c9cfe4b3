//! Translated entity - a record carrying its localized text inline
//!
//! All locales live in one map on the record instead of one row per locale,
//! so creating or updating a translation is a single mutation of a single
//! record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AttributeName, Locale};
use bridge_domain::EntityId;

/// locale -> attribute -> value
pub type Translations = BTreeMap<Locale, BTreeMap<AttributeName, String>>;

/// One change to an entity's translations.
///
/// Storage backends apply a mutation as one atomic read-modify-write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TranslationMutation {
    Set {
        locale: Locale,
        attribute: AttributeName,
        value: String,
    },
    Remove {
        locale: Locale,
        attribute: AttributeName,
    },
    RemoveLocale { locale: Locale },
}

impl TranslationMutation {
    /// The only locale a mutation can touch.
    pub fn locale(&self) -> &Locale {
        match self {
            Self::Set { locale, .. } | Self::Remove { locale, .. } | Self::RemoveLocale { locale } => {
                locale
            }
        }
    }
}

/// A record with inline multi-locale attributes.
///
/// # Invariants
///
/// - A locale key is present only while it holds at least one attribute
/// - A missing locale or attribute means "not translated"; an empty string is
///   a real value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedEntity {
    id: EntityId,
    translations: Translations,
    updated_at: DateTime<Utc>,
}

impl TranslatedEntity {
    /// Create an entity with no translations.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: EntityId::new(),
            translations: Translations::new(),
            updated_at: now,
        }
    }

    /// Set the ID (used when loading from storage).
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn get(&self, locale: &Locale, attribute: &AttributeName) -> Option<&str> {
        self.translations
            .get(locale)
            .and_then(|attrs| attrs.get(attribute))
            .map(String::as_str)
    }

    pub fn has_locale(&self, locale: &Locale) -> bool {
        self.translations.contains_key(locale)
    }

    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.translations.keys()
    }

    pub fn attributes(&self, locale: &Locale) -> Option<&BTreeMap<AttributeName, String>> {
        self.translations.get(locale)
    }

    /// Apply one mutation. Returns whether anything changed.
    ///
    /// `updated_at` only moves when the record actually changes.
    pub fn apply(&mut self, mutation: TranslationMutation, now: DateTime<Utc>) -> bool {
        let changed = match mutation {
            TranslationMutation::Set {
                locale,
                attribute,
                value,
            } => {
                let attrs = self.translations.entry(locale).or_default();
                attrs.insert(attribute, value.clone()).as_ref() != Some(&value)
            }
            TranslationMutation::Remove { locale, attribute } => {
                let removed = self
                    .translations
                    .get_mut(&locale)
                    .and_then(|attrs| attrs.remove(&attribute))
                    .is_some();
                if self
                    .translations
                    .get(&locale)
                    .is_some_and(|attrs| attrs.is_empty())
                {
                    self.translations.remove(&locale);
                }
                removed
            }
            TranslationMutation::RemoveLocale { locale } => {
                self.translations.remove(&locale).is_some()
            }
        };
        if changed {
            self.updated_at = now;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fr() -> Locale {
        Locale::new("fr").unwrap()
    }

    fn title() -> AttributeName {
        AttributeName::new("title").unwrap()
    }

    fn set(locale: Locale, attribute: AttributeName, value: &str) -> TranslationMutation {
        TranslationMutation::Set {
            locale,
            attribute,
            value: value.to_string(),
        }
    }

    #[test]
    fn set_then_get() {
        let mut entity = TranslatedEntity::new(Utc::now());
        assert!(entity.apply(set(fr(), title(), "Titre"), Utc::now()));

        assert_eq!(entity.get(&fr(), &title()), Some("Titre"));
        assert!(entity.has_locale(&fr()));
        assert_eq!(entity.get(&Locale::new("en").unwrap(), &title()), None);
    }

    #[test]
    fn empty_string_is_a_value() {
        let mut entity = TranslatedEntity::new(Utc::now());
        entity.apply(set(fr(), title(), ""), Utc::now());
        assert_eq!(entity.get(&fr(), &title()), Some(""));
    }

    #[test]
    fn setting_one_attribute_leaves_others_alone() {
        let mut entity = TranslatedEntity::new(Utc::now());
        let body = AttributeName::new("body").unwrap();
        let en = Locale::new("en").unwrap();
        entity.apply(set(fr(), title(), "Titre"), Utc::now());
        entity.apply(set(en.clone(), title(), "Title"), Utc::now());
        entity.apply(set(fr(), body.clone(), "Corps"), Utc::now());
        entity.apply(set(fr(), title(), "Nouveau titre"), Utc::now());

        assert_eq!(entity.get(&fr(), &title()), Some("Nouveau titre"));
        assert_eq!(entity.get(&fr(), &body), Some("Corps"));
        assert_eq!(entity.get(&en, &title()), Some("Title"));
        assert_eq!(entity.locales().count(), 2);
    }

    #[test]
    fn unchanged_set_keeps_timestamp() {
        let t0 = Utc::now();
        let t1 = t0 + Duration::seconds(10);
        let mut entity = TranslatedEntity::new(t0);
        entity.apply(set(fr(), title(), "Titre"), t0);

        assert!(!entity.apply(set(fr(), title(), "Titre"), t1));
        assert_eq!(entity.updated_at(), t0);
    }

    #[test]
    fn removing_last_attribute_drops_the_locale() {
        let mut entity = TranslatedEntity::new(Utc::now());
        entity.apply(set(fr(), title(), "Titre"), Utc::now());

        let removed = entity.apply(
            TranslationMutation::Remove {
                locale: fr(),
                attribute: title(),
            },
            Utc::now(),
        );
        assert!(removed);
        assert!(!entity.has_locale(&fr()));
    }

    #[test]
    fn removing_missing_values_is_a_no_op() {
        let mut entity = TranslatedEntity::new(Utc::now());
        assert!(!entity.apply(
            TranslationMutation::Remove {
                locale: fr(),
                attribute: title(),
            },
            Utc::now(),
        ));
        assert!(!entity.apply(TranslationMutation::RemoveLocale { locale: fr() }, Utc::now()));
        assert!(entity.translations().is_empty());
    }

    #[test]
    fn mutation_serde_is_tagged() {
        let json = serde_json::to_value(set(fr(), title(), "Titre")).unwrap();
        assert_eq!(json["op"], "set");
        assert_eq!(json["locale"], "fr");
    }
}
