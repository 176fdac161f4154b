use std::collections::HashMap;

use crate::actions::ActionInstance;

/// Live action instances grouped by deck. Instances are attached when a
/// button is placed on a deck and detached when it is removed; state
/// mutation goes through the reconciler.
#[derive(Default)]
pub struct DeckRegistry {
    decks: HashMap<String, Vec<ActionInstance>>,
}

impl DeckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, deck_id: &str, instance: ActionInstance) {
        self.decks
            .entry(deck_id.to_string())
            .or_default()
            .push(instance);
    }

    /// Drops every instance with the given id from one deck.
    pub fn detach(&mut self, deck_id: &str, action_id: &str) {
        if let Some(instances) = self.decks.get_mut(deck_id) {
            instances.retain(|i| i.action_id() != action_id);
        }
    }

    /// Applies `is_on` to every instance across all decks whose identifier
    /// ends with the given action name. Returns how many instances matched.
    pub fn update_matching(&mut self, action_name: &str, is_on: bool) -> usize {
        let mut matched = 0;
        for instance in self.decks.values_mut().flatten() {
            if instance.action_id().ends_with(action_name) {
                instance.update_state(is_on);
                matched += 1;
            }
        }
        matched
    }

    pub fn instances(&self) -> impl Iterator<Item = &ActionInstance> {
        self.decks.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.decks.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::RecordingSurface;
    use crate::actions::{descriptor_for, TriState};
    use meet_ipc::MeetAction;

    fn attach(registry: &mut DeckRegistry, deck: &str, action: MeetAction) -> RecordingSurface {
        let surface = RecordingSurface::default();
        let descriptor = descriptor_for(action).unwrap();
        registry.attach(
            deck,
            ActionInstance::attach(
                format!("com.meetdeck.Controller.{}", action),
                descriptor,
                Box::new(surface.clone()),
            ),
        );
        surface
    }

    #[test]
    fn updates_reach_matching_instances_on_every_deck() {
        let mut registry = DeckRegistry::new();
        attach(&mut registry, "deck-0", MeetAction::ToggleCamera);
        attach(&mut registry, "deck-1", MeetAction::ToggleCamera);
        attach(&mut registry, "deck-0", MeetAction::ToggleMute);

        let matched = registry.update_matching("toggle_camera", true);

        assert_eq!(matched, 2);
        let camera_states: Vec<TriState> = registry
            .instances()
            .filter(|i| i.action() == MeetAction::ToggleCamera)
            .map(|i| i.state())
            .collect();
        assert_eq!(camera_states, vec![TriState::On, TriState::On]);
        let mute = registry
            .instances()
            .find(|i| i.action() == MeetAction::ToggleMute)
            .unwrap();
        assert_eq!(mute.state(), TriState::Unknown);
    }

    #[test]
    fn detach_removes_only_the_named_instance() {
        let mut registry = DeckRegistry::new();
        attach(&mut registry, "deck-0", MeetAction::ToggleCamera);
        attach(&mut registry, "deck-0", MeetAction::HangUp);

        registry.detach("deck-0", "com.meetdeck.Controller.toggle_camera");

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.instances().next().unwrap().action(),
            MeetAction::HangUp
        );
    }
}
