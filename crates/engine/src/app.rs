//! Application state and composition.

use std::sync::Arc;

use crate::entities::{HierarchyStore, TranslationMap};
use crate::infrastructure::{
    clock::SystemClock,
    memory::{InMemoryNodeRepo, InMemoryTranslationRepo},
    ports::{ClockPort, NodeRepo, TranslationRepo},
    settings::EngineSettings,
};
use crate::use_cases::{PointOfInterestBinder, QueryPlanner};

/// Main application state.
///
/// Holds the storage ports, the entity modules built on them, and the use
/// cases. Everything is behind `Arc` so callers can share one `App` across
/// tasks.
pub struct App {
    pub settings: EngineSettings,
    pub repositories: Repositories,
    pub hierarchy: Arc<HierarchyStore>,
    pub translations: Arc<TranslationMap>,
    pub use_cases: UseCases,
}

/// Storage ports, injected directly.
pub struct Repositories {
    pub node: Arc<dyn NodeRepo>,
    pub translation: Arc<dyn TranslationRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub planner: Arc<QueryPlanner>,
    pub binder: Arc<PointOfInterestBinder>,
}

impl App {
    /// Wire the app over arbitrary storage ports and clock.
    pub fn new(
        settings: EngineSettings,
        node_repo: Arc<dyn NodeRepo>,
        translation_repo: Arc<dyn TranslationRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let hierarchy = Arc::new(HierarchyStore::new(node_repo.clone(), clock.clone()));
        let translations = Arc::new(TranslationMap::new(
            translation_repo.clone(),
            clock,
            settings.default_locale.clone(),
        ));

        let use_cases = UseCases {
            planner: Arc::new(QueryPlanner::new(
                hierarchy.clone(),
                settings.shortfall_policy,
            )),
            binder: Arc::new(PointOfInterestBinder::new(hierarchy.clone())),
        };

        Self {
            settings,
            repositories: Repositories {
                node: node_repo,
                translation: translation_repo,
            },
            hierarchy,
            translations,
            use_cases,
        }
    }

    /// App backed by the in-memory storage and the system clock.
    pub fn in_memory(settings: EngineSettings) -> Self {
        Self::new(
            settings,
            Arc::new(InMemoryNodeRepo::new()),
            Arc::new(InMemoryTranslationRepo::new()),
            Arc::new(SystemClock::new()),
        )
    }
}
