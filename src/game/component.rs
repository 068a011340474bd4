//! Component Storage
//!
//! `ComponentStorage<T>` is a sparse array indexed by entity slot. Each
//! occupied slot also remembers the full handle it was inserted with, so
//! iteration hands back live `Entity` values instead of bare indices and a
//! lookup with a stale handle misses.

use super::entity::Entity;

pub struct ComponentStorage<T> {
    data: Vec<Option<(Entity, T)>>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
    }

    /// Insert a component for an entity, replacing any existing one.
    pub fn insert(&mut self, entity: Entity, component: T) {
        let idx = entity.index() as usize;
        self.ensure_capacity(idx);
        self.data[idx] = Some((entity, component));
    }

    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.data.get_mut(entity.index() as usize)?;
        match slot {
            Some((owner, _)) if *owner == entity => slot.take().map(|(_, c)| c),
            _ => None,
        }
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        match self.data.get(entity.index() as usize)? {
            Some((owner, c)) if *owner == entity => Some(c),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        match self.data.get_mut(entity.index() as usize)? {
            Some((owner, c)) if *owner == entity => Some(c),
            _ => None,
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.data
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(e, c)| (*e, c)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.data
            .iter_mut()
            .filter_map(|slot| slot.as_mut().map(|(e, c)| (*e, c)))
    }

    /// Handles of every entity that has this component.
    pub fn entities(&self) -> Vec<Entity> {
        self.iter().map(|(e, _)| e).collect()
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|slot| slot.is_some()).count()
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut storage: ComponentStorage<i32> = ComponentStorage::new();
        let entity = Entity::new(5, 0);

        storage.insert(entity, 42);
        assert_eq!(storage.get(entity), Some(&42));
        assert!(storage.contains(entity));
        assert!(!storage.contains(Entity::new(2, 0)));
    }

    #[test]
    fn test_stale_handle_misses() {
        let mut storage: ComponentStorage<i32> = ComponentStorage::new();
        storage.insert(Entity::new(3, 1), 7);

        assert_eq!(storage.get(Entity::new(3, 0)), None);
        assert_eq!(storage.remove(Entity::new(3, 0)), None);
        assert_eq!(storage.remove(Entity::new(3, 1)), Some(7));
    }

    #[test]
    fn test_iteration_yields_handles() {
        let mut storage: ComponentStorage<&str> = ComponentStorage::new();
        storage.insert(Entity::new(0, 0), "zero");
        storage.insert(Entity::new(2, 3), "two");

        let items: Vec<_> = storage.iter().collect();
        assert_eq!(items.len(), 2);
        assert!(items.contains(&(Entity::new(2, 3), &"two")));
        assert_eq!(storage.count(), 2);
    }
}
