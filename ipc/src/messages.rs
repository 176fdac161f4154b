use serde::{Deserialize, Serialize};

/// Every action the browser extension knows how to perform. The wire names
/// mirror the selector table in the extension's content script; anything
/// outside this set is rejected at the validation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetAction {
    ToggleMute,
    ToggleCamera,
    RaiseHand,
    HangUp,
    ToggleReactions,
    TogglePresent,
    ToggleCaptions,
    LeaveCall,
    ToggleFullscreen,
    ToggleChatPanel,
    ToggleParticipantsPanel,
    StopSharing,
    SendReactionHeart,
    SendReactionThumbUp,
    SendReactionCelebrate,
    SendReactionClap,
    SendReactionLaugh,
    SendReactionSurprised,
    SendReactionSad,
    SendReactionThinking,
    SendReactionThumbDown,
    SendReactionPlus,
    SendReactionCrab,
}

impl MeetAction {
    pub const ALL: [MeetAction; 23] = [
        MeetAction::ToggleMute,
        MeetAction::ToggleCamera,
        MeetAction::RaiseHand,
        MeetAction::HangUp,
        MeetAction::ToggleReactions,
        MeetAction::TogglePresent,
        MeetAction::ToggleCaptions,
        MeetAction::LeaveCall,
        MeetAction::ToggleFullscreen,
        MeetAction::ToggleChatPanel,
        MeetAction::ToggleParticipantsPanel,
        MeetAction::StopSharing,
        MeetAction::SendReactionHeart,
        MeetAction::SendReactionThumbUp,
        MeetAction::SendReactionCelebrate,
        MeetAction::SendReactionClap,
        MeetAction::SendReactionLaugh,
        MeetAction::SendReactionSurprised,
        MeetAction::SendReactionSad,
        MeetAction::SendReactionThinking,
        MeetAction::SendReactionThumbDown,
        MeetAction::SendReactionPlus,
        MeetAction::SendReactionCrab,
    ];

    /// Wire name of the action, e.g. `toggle_mute`.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetAction::ToggleMute => "toggle_mute",
            MeetAction::ToggleCamera => "toggle_camera",
            MeetAction::RaiseHand => "raise_hand",
            MeetAction::HangUp => "hang_up",
            MeetAction::ToggleReactions => "toggle_reactions",
            MeetAction::TogglePresent => "toggle_present",
            MeetAction::ToggleCaptions => "toggle_captions",
            MeetAction::LeaveCall => "leave_call",
            MeetAction::ToggleFullscreen => "toggle_fullscreen",
            MeetAction::ToggleChatPanel => "toggle_chat_panel",
            MeetAction::ToggleParticipantsPanel => "toggle_participants_panel",
            MeetAction::StopSharing => "stop_sharing",
            MeetAction::SendReactionHeart => "send_reaction_heart",
            MeetAction::SendReactionThumbUp => "send_reaction_thumb_up",
            MeetAction::SendReactionCelebrate => "send_reaction_celebrate",
            MeetAction::SendReactionClap => "send_reaction_clap",
            MeetAction::SendReactionLaugh => "send_reaction_laugh",
            MeetAction::SendReactionSurprised => "send_reaction_surprised",
            MeetAction::SendReactionSad => "send_reaction_sad",
            MeetAction::SendReactionThinking => "send_reaction_thinking",
            MeetAction::SendReactionThumbDown => "send_reaction_thumb_down",
            MeetAction::SendReactionPlus => "send_reaction_plus",
            MeetAction::SendReactionCrab => "send_reaction_crab",
        }
    }

    /// Parses a wire name, rejecting anything outside the closed set.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.as_str() == name)
    }
}

impl std::fmt::Display for MeetAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The UI controls whose status the extension reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Microphone,
    Camera,
    Hand,
    Reactions,
    Call,
    Presenting,
    ChatPanel,
    ParticipantsPanel,
}

impl Control {
    pub const ALL: [Control; 8] = [
        Control::Microphone,
        Control::Camera,
        Control::Hand,
        Control::Reactions,
        Control::Call,
        Control::Presenting,
        Control::ChatPanel,
        Control::ParticipantsPanel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Control::Microphone => "microphone",
            Control::Camera => "camera",
            Control::Hand => "hand",
            Control::Reactions => "reactions",
            Control::Call => "call",
            Control::Presenting => "presenting",
            Control::ChatPanel => "chat_panel",
            Control::ParticipantsPanel => "participants_panel",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On/off state of a control. Exactly the strings "on" and "off"; truthy
/// values are not coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    On,
    Off,
}

impl ControlState {
    pub fn is_on(&self) -> bool {
        matches!(self, ControlState::On)
    }
}

impl std::fmt::Display for ControlState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ControlState::On => "on",
            ControlState::Off => "off",
        })
    }
}

/// The literal `"update"` discriminant carried by every status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTag {
    Update,
}

/// A command sent from the controller to the browser extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCommand {
    pub action: MeetAction,
}

/// A status update sent from the browser extension to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: StatusTag,
    pub control: Control,
    pub state: ControlState,
}

impl StatusUpdate {
    pub fn new(control: Control, state: ControlState) -> Self {
        Self {
            status: StatusTag::Update,
            control,
            state,
        }
    }
}
