use meet_ipc::MeetAction;

/// On/off state of a deck button. `Unknown` until the extension reports,
/// rendered with a dedicated icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    On,
    Off,
    Unknown,
}

/// Receives icon changes for one deck button. Implemented by the host
/// application's rendering layer; implementations whose toolkit requires a
/// single UI thread must marshal internally, since calls arrive on the
/// socket reader task.
pub trait IconSurface: Send {
    fn set_icon(&self, icon: &str);
}

/// How an action presents and persists state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Mirrors an on/off control, swapping icons as status updates arrive.
    Stateful {
        icon_on: &'static str,
        icon_off: &'static str,
        icon_unknown: &'static str,
    },
    /// Fire-and-forget button with a single static icon.
    Stateless { icon: &'static str },
}

/// One catalog entry: an action the controller can place on a deck key.
#[derive(Debug, Clone, Copy)]
pub struct ActionDescriptor {
    pub action: MeetAction,
    pub display_name: &'static str,
    pub kind: ActionKind,
}

/// The deck-exposable actions.
pub const CATALOG: [ActionDescriptor; 9] = [
    ActionDescriptor {
        action: MeetAction::ToggleMute,
        display_name: "Toggle Mute",
        kind: ActionKind::Stateful {
            icon_on: "mic_on.png",
            icon_off: "mic_off.png",
            icon_unknown: "mic_unknown.png",
        },
    },
    ActionDescriptor {
        action: MeetAction::ToggleCamera,
        display_name: "Toggle Camera",
        kind: ActionKind::Stateful {
            icon_on: "camera_on.png",
            icon_off: "camera_off.png",
            icon_unknown: "camera_unknown.png",
        },
    },
    ActionDescriptor {
        action: MeetAction::RaiseHand,
        display_name: "Raise Hand",
        kind: ActionKind::Stateful {
            icon_on: "hand_raised.png",
            icon_off: "hand_lowered.png",
            icon_unknown: "hand_unknown.png",
        },
    },
    ActionDescriptor {
        action: MeetAction::HangUp,
        display_name: "Hang Up",
        kind: ActionKind::Stateless {
            icon: "hang_up.png",
        },
    },
    ActionDescriptor {
        action: MeetAction::TogglePresent,
        display_name: "Toggle Present",
        kind: ActionKind::Stateful {
            icon_on: "present_on.png",
            icon_off: "present_off.png",
            icon_unknown: "present_unknown.png",
        },
    },
    ActionDescriptor {
        action: MeetAction::ToggleChatPanel,
        display_name: "Toggle Chat Panel",
        kind: ActionKind::Stateful {
            icon_on: "chat_on.png",
            icon_off: "chat_off.png",
            icon_unknown: "chat_unknown.png",
        },
    },
    ActionDescriptor {
        action: MeetAction::ToggleParticipantsPanel,
        display_name: "Toggle Participants Panel",
        kind: ActionKind::Stateful {
            icon_on: "participants_on.png",
            icon_off: "participants_off.png",
            icon_unknown: "participants_unknown.png",
        },
    },
    ActionDescriptor {
        action: MeetAction::SendReactionHeart,
        display_name: "Send Heart",
        kind: ActionKind::Stateless {
            icon: "reaction_heart.png",
        },
    },
    ActionDescriptor {
        action: MeetAction::SendReactionThumbUp,
        display_name: "Send Thumb Up",
        kind: ActionKind::Stateless {
            icon: "reaction_thumb_up.png",
        },
    },
];

/// Looks up the catalog entry for an action, if it is deck-exposable.
pub fn descriptor_for(action: MeetAction) -> Option<&'static ActionDescriptor> {
    CATALOG.iter().find(|d| d.action == action)
}

/// A catalog action placed on one deck key.
pub struct ActionInstance {
    action: MeetAction,
    action_id: String,
    kind: ActionKind,
    state: TriState,
    surface: Box<dyn IconSurface>,
}

impl ActionInstance {
    /// Binds a descriptor to a deck key and shows the initial icon: the
    /// dedicated unknown icon for stateful actions, the static icon
    /// otherwise.
    pub fn attach(
        action_id: String,
        descriptor: &ActionDescriptor,
        surface: Box<dyn IconSurface>,
    ) -> Self {
        match descriptor.kind {
            ActionKind::Stateful { icon_unknown, .. } => surface.set_icon(icon_unknown),
            ActionKind::Stateless { icon } => surface.set_icon(icon),
        }
        Self {
            action: descriptor.action,
            action_id,
            kind: descriptor.kind,
            state: TriState::Unknown,
            surface,
        }
    }

    pub fn action(&self) -> MeetAction {
        self.action
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn state(&self) -> TriState {
        self.state
    }

    /// Applies a reported on/off state. Stateless actions ignore this
    /// entirely; stateful ones only touch the surface when the state
    /// actually changes, so repeated identical reports are free.
    pub fn update_state(&mut self, is_on: bool) {
        let ActionKind::Stateful {
            icon_on, icon_off, ..
        } = self.kind
        else {
            return;
        };
        let next = if is_on { TriState::On } else { TriState::Off };
        if self.state == next {
            return;
        }
        self.state = next;
        self.surface.set_icon(if is_on { icon_on } else { icon_off });
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::IconSurface;
    use std::sync::{Arc, Mutex};

    /// Records every icon pushed to it, standing in for the renderer.
    #[derive(Clone, Default)]
    pub struct RecordingSurface {
        icons: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingSurface {
        pub fn icons(&self) -> Vec<String> {
            self.icons.lock().unwrap().clone()
        }
    }

    impl IconSurface for RecordingSurface {
        fn set_icon(&self, icon: &str) {
            self.icons.lock().unwrap().push(icon.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingSurface;
    use super::*;

    fn stateful_instance(surface: &RecordingSurface) -> ActionInstance {
        let descriptor = descriptor_for(MeetAction::ToggleCamera).unwrap();
        ActionInstance::attach(
            "com.meetdeck.Controller.toggle_camera".to_string(),
            descriptor,
            Box::new(surface.clone()),
        )
    }

    #[test]
    fn attach_shows_the_unknown_icon() {
        let surface = RecordingSurface::default();
        let instance = stateful_instance(&surface);
        assert_eq!(instance.state(), TriState::Unknown);
        assert_eq!(surface.icons(), vec!["camera_unknown.png"]);
    }

    #[test]
    fn update_state_is_idempotent() {
        let surface = RecordingSurface::default();
        let mut instance = stateful_instance(&surface);

        instance.update_state(true);
        instance.update_state(true);

        assert_eq!(instance.state(), TriState::On);
        // One icon for attach, exactly one for the state change.
        assert_eq!(surface.icons(), vec!["camera_unknown.png", "camera_on.png"]);
    }

    #[test]
    fn state_flips_select_the_matching_icon() {
        let surface = RecordingSurface::default();
        let mut instance = stateful_instance(&surface);

        instance.update_state(false);
        instance.update_state(true);

        assert_eq!(
            surface.icons(),
            vec!["camera_unknown.png", "camera_off.png", "camera_on.png"]
        );
    }

    #[test]
    fn stateless_actions_ignore_state_updates() {
        let surface = RecordingSurface::default();
        let descriptor = descriptor_for(MeetAction::SendReactionHeart).unwrap();
        let mut instance = ActionInstance::attach(
            "com.meetdeck.Controller.send_reaction_heart".to_string(),
            descriptor,
            Box::new(surface.clone()),
        );

        instance.update_state(true);
        instance.update_state(false);

        assert_eq!(instance.state(), TriState::Unknown);
        assert_eq!(surface.icons(), vec!["reaction_heart.png"]);
    }
}
