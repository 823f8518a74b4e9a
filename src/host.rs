//! Host platform interface and an in-memory registry implementing it.

use crate::sensors::JqSensor;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;

/// Entity id domain for sensors.
pub const SENSOR_DOMAIN: &str = "sensor";

/// What the platform setup needs from the host.
pub trait EntityHost {
    /// Turn a suggested name into an entity id unique within the host.
    fn generate_entity_id(&mut self, suggested: &str) -> String;

    /// Register a batch of entities.
    fn add_entities(&mut self, entities: Vec<Arc<JqSensor>>);
}

/// Lowercase `text` and collapse every run of non-alphanumerics into `_`.
///
/// Alphanumerics outside ASCII are kept so non-Latin device names survive.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("unknown");
    }
    slug
}

/// In-memory entity registry keyed by entity id.
#[derive(Default)]
pub struct EntityRegistry {
    entities: BTreeMap<String, Arc<JqSensor>>,
    reserved: HashSet<String>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, entity_id: &str) -> Option<Arc<JqSensor>> {
        self.entities.get(entity_id).cloned()
    }

    /// All registered entities, ordered by entity id.
    pub fn entities(&self) -> Vec<Arc<JqSensor>> {
        self.entities.values().cloned().collect()
    }

    /// Poll every registered entity once.
    pub fn poll_all(&self) {
        for entity in self.entities.values() {
            entity.poll();
        }
    }
}

impl EntityHost for EntityRegistry {
    fn generate_entity_id(&mut self, suggested: &str) -> String {
        let base = format!("{}.{}", SENSOR_DOMAIN, slugify(suggested));
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.reserved.contains(&candidate) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        self.reserved.insert(candidate.clone());
        candidate
    }

    fn add_entities(&mut self, entities: Vec<Arc<JqSensor>>) {
        info!("[Host] Registering {} entities", entities.len());
        for entity in entities {
            self.reserved.insert(entity.entity_id().to_string());
            debug!("[Host] Added {} ({})", entity.entity_id(), entity.unique_id());
            self.entities.insert(entity.entity_id().to_string(), entity);
        }
    }
}

/// Spawn a task that polls every registered entity on a fixed interval.
///
/// # Returns
///
/// A `JoinHandle` that can be used to abort the polling task.
pub fn spawn_poller(registry: Arc<RwLock<EntityRegistry>>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval(every);
        loop {
            interval.tick().await;
            let entities = registry.read().entities();
            for entity in &entities {
                entity.poll();
            }
            debug!("[Host] Polled {} entities", entities.len());
        }
    })
}
