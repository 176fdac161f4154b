use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use meet_ipc::{
    validate_command, validate_status, ActionCommand, Control, ControlState, MeetAction,
    StatusUpdate, ValidationError,
};

use crate::actions::{ActionDescriptor, ActionInstance, IconSurface};
use crate::registry::DeckRegistry;

/// Prefix of every action identifier this plugin registers.
pub const ACTION_ID_PREFIX: &str = "com.meetdeck.Controller";

/// Actions whose instances revert to off when the call ends. Stateless
/// actions (hang up itself, reaction senders) have no persisted state and
/// are never part of the cascade.
const RESETTABLE_ACTIONS: [MeetAction; 6] = [
    MeetAction::ToggleMute,
    MeetAction::ToggleCamera,
    MeetAction::RaiseHand,
    MeetAction::TogglePresent,
    MeetAction::ToggleChatPanel,
    MeetAction::ToggleParticipantsPanel,
];

/// Maps a reported control to the action whose instances mirror it.
/// `reactions` has no persistent on/off action and stays unmapped; `call`
/// is consumed by the hang-up cascade before this mapping is consulted.
fn control_action(control: Control) -> Option<MeetAction> {
    match control {
        Control::Microphone => Some(MeetAction::ToggleMute),
        Control::Camera => Some(MeetAction::ToggleCamera),
        Control::Hand => Some(MeetAction::RaiseHand),
        Control::Presenting => Some(MeetAction::TogglePresent),
        Control::ChatPanel => Some(MeetAction::ToggleChatPanel),
        Control::ParticipantsPanel => Some(MeetAction::ToggleParticipantsPanel),
        Control::Reactions | Control::Call => None,
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command failed validation: {0}")]
    Invalid(#[from] ValidationError),
    #[error("command could not be serialized: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("command queue is closed")]
    QueueClosed,
}

/// The state reconciler: owns the deck registry, consumes inbound status
/// updates, and emits outbound commands from key presses.
pub struct MeetPlugin {
    registry: Arc<Mutex<DeckRegistry>>,
    commands: mpsc::UnboundedSender<ActionCommand>,
}

impl MeetPlugin {
    /// Returns the plugin and the receiving end of its outbound command
    /// queue; the caller drains the queue into the socket endpoint.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ActionCommand>) {
        let (commands, rx) = mpsc::unbounded_channel();
        (
            Self {
                registry: Arc::new(Mutex::new(DeckRegistry::new())),
                commands,
            },
            rx,
        )
    }

    /// Shared handle to the registry, for UI-side reads.
    pub fn registry_handle(&self) -> Arc<Mutex<DeckRegistry>> {
        Arc::clone(&self.registry)
    }

    fn registry(&self) -> MutexGuard<'_, DeckRegistry> {
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Places a catalog action on a deck and returns its identifier.
    pub fn attach(
        &self,
        deck_id: &str,
        descriptor: &ActionDescriptor,
        surface: Box<dyn IconSurface>,
    ) -> String {
        let action_id = format!("{}.{}", ACTION_ID_PREFIX, descriptor.action);
        self.registry().attach(
            deck_id,
            ActionInstance::attach(action_id.clone(), descriptor, surface),
        );
        action_id
    }

    /// Removes an action from a deck.
    pub fn detach(&self, deck_id: &str, action_id: &str) {
        self.registry().detach(deck_id, action_id);
    }

    /// Callback for the socket endpoint: one decoded object per inbound
    /// frame. Invalid messages are logged and ignored; state self-corrects
    /// on the next update.
    pub fn handle_status_update(&self, message: &Value) {
        match validate_status(message) {
            Ok(update) => self.apply_status(update),
            Err(e) => warn!(error = %e, "Received invalid status message, ignoring"),
        }
    }

    /// Applies a validated status update to the registry.
    pub fn apply_status(&self, update: StatusUpdate) {
        if update.control == Control::Call && update.state == ControlState::Off {
            self.handle_hang_up();
            return;
        }

        let Some(action) = control_action(update.control) else {
            debug!(control = %update.control, "No stateful action for control, ignoring");
            return;
        };

        let matched = self
            .registry()
            .update_matching(action.as_str(), update.state.is_on());
        debug!(
            control = %update.control,
            state = %update.state,
            matched,
            "Applied status update"
        );
    }

    /// The call ended: every resettable instance reverts to off, whatever
    /// it showed before.
    fn handle_hang_up(&self) {
        info!("Call ended, resetting stateful actions");
        let mut registry = self.registry();
        for action in RESETTABLE_ACTIONS {
            registry.update_matching(action.as_str(), false);
        }
    }

    /// Queues a command for the browser extension. The serialized command
    /// is checked against the schema before it leaves the process, so an
    /// unsupported action fails here rather than at the far end.
    pub fn send_command(&self, action: MeetAction) -> Result<(), CommandError> {
        let command = ActionCommand { action };
        let encoded = serde_json::to_value(command)?;
        validate_command(&encoded)?;
        self.commands
            .send(command)
            .map_err(|_| CommandError::QueueClosed)?;
        debug!(action = %action, "Queued command");
        Ok(())
    }
}
