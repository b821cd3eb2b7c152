//! TargetRegistry — multi-target tracking с relationship и decay таймерами
//!
//! Counters (ally/enemy) обновляются инкрементально на каждом insert/remove,
//! пересчёта по таблице нет. Инвариант: ally + enemy + others == len.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum Relationship {
    #[default]
    Unset,
    Ally,
    Enemy,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedTarget {
    pub relationship: Relationship,
    /// Выше = срочнее
    pub priority: f32,
    /// Секунды до удаления (сбрасывается на каждом track/refresh)
    pub lost_timer: f32,
}

#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    /// Сколько держим цель без подтверждения от perception
    pub lost_timeout: f32,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self { lost_timeout: 5.0 }
    }
}

impl TargetingConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.lost_timeout >= 0.0) {
            return Err(ConfigurationError::NegativeValue {
                what: "target lost timeout",
                value: self.lost_timeout,
            });
        }
        Ok(())
    }
}

#[derive(Component, Debug, Clone)]
pub struct TargetRegistry {
    targets: HashMap<Entity, TrackedTarget>,
    ally_count: usize,
    enemy_count: usize,
    lost_timeout: f32,
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self {
            targets: HashMap::new(),
            ally_count: 0,
            enemy_count: 0,
            lost_timeout: TargetingConfig::default().lost_timeout,
        }
    }
}

impl TargetRegistry {
    pub fn from_config(config: &TargetingConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            lost_timeout: config.lost_timeout,
            ..Default::default()
        })
    }

    /// Insert или update. Lost timer → lost_timeout
    pub fn track(&mut self, id: Entity, relationship: Relationship, priority: f32) {
        // NaN ломает сравнение в select
        let priority = if priority.is_nan() { 0.0 } else { priority };

        let entry = TrackedTarget {
            relationship,
            priority,
            lost_timer: self.lost_timeout,
        };
        if let Some(previous) = self.targets.insert(id, entry) {
            self.count(previous.relationship, false);
        }
        self.count(relationship, true);
    }

    pub fn untrack(&mut self, id: Entity) -> Option<TrackedTarget> {
        let removed = self.targets.remove(&id)?;
        self.count(removed.relationship, false);
        Some(removed)
    }

    /// Подтверждение без смены relationship/priority. false если не трекаем
    pub fn refresh(&mut self, id: Entity) -> bool {
        match self.targets.get_mut(&id) {
            Some(target) => {
                target.lost_timer = self.lost_timeout;
                true
            }
            None => false,
        }
    }

    /// Decay всех таймеров. Возвращает удалённые (отсортированы по Entity)
    pub fn tick(&mut self, delta: f32) -> Vec<Entity> {
        let mut expired = Vec::new();
        for (id, target) in self.targets.iter_mut() {
            target.lost_timer = (target.lost_timer - delta).max(0.0);
            if target.lost_timer <= 0.0 {
                expired.push(*id);
            }
        }

        // HashMap order недетерминирован
        expired.sort();
        for id in &expired {
            self.untrack(*id);
        }
        expired
    }

    /// Наибольший priority среди tracked candidates, tie → меньший Entity
    ///
    /// Не-tracked candidates игнорируются; результат не зависит от порядка.
    pub fn select_highest_priority(
        &self,
        candidates: impl IntoIterator<Item = Entity>,
    ) -> Option<Entity> {
        Self::best(
            candidates
                .into_iter()
                .filter_map(|id| self.targets.get(&id).map(|t| (id, t.priority))),
        )
    }

    pub fn highest_priority_enemy(&self) -> Option<Entity> {
        Self::best(
            self.targets
                .iter()
                .filter(|(_, t)| t.relationship == Relationship::Enemy)
                .map(|(id, t)| (*id, t.priority)),
        )
    }

    fn best(entries: impl Iterator<Item = (Entity, f32)>) -> Option<Entity> {
        entries
            .fold(None, |best: Option<(Entity, f32)>, (id, priority)| match best {
                Some((best_id, best_priority))
                    if best_priority > priority
                        || (best_priority == priority && best_id <= id) =>
                {
                    Some((best_id, best_priority))
                }
                _ => Some((id, priority)),
            })
            .map(|(id, _)| id)
    }

    fn count(&mut self, relationship: Relationship, added: bool) {
        let counter = match relationship {
            Relationship::Ally => &mut self.ally_count,
            Relationship::Enemy => &mut self.enemy_count,
            Relationship::Unset | Relationship::Neutral => return,
        };
        if added {
            *counter += 1;
        } else {
            *counter = counter.saturating_sub(1);
        }
    }

    pub fn get(&self, id: Entity) -> Option<&TrackedTarget> {
        self.targets.get(&id)
    }

    pub fn contains(&self, id: Entity) -> bool {
        self.targets.contains_key(&id)
    }

    pub fn relationship_of(&self, id: Entity) -> Relationship {
        self.targets
            .get(&id)
            .map(|t| t.relationship)
            .unwrap_or_default()
    }

    /// Tracked entities в детерминированном порядке
    pub fn tracked(&self) -> Vec<Entity> {
        let mut ids: Vec<Entity> = self.targets.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn ally_count(&self) -> usize {
        self.ally_count
    }

    pub fn enemy_count(&self) -> usize {
        self.enemy_count
    }

    /// Unset + Neutral
    pub fn other_count(&self) -> usize {
        self.targets.len() - self.ally_count - self.enemy_count
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
