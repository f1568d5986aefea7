//! In-memory per-chat store: dialogue state, in-flight training, history
//!
//! Nothing here survives a restart.

mod entry;

use std::fmt;

use dashmap::DashMap;
use tracing::{debug, info};

use crate::error::StoreError;

pub use entry::{DraftEntry, TrainingEntry};

/// Opaque conversation id (one per chat or group)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChatIdentity(pub i64);

impl fmt::Display for ChatIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ChatIdentity {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Step of the guided training-entry flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogueState {
    #[default]
    Idle,
    AwaitingMuscleGroup,
    AwaitingDuration,
    AwaitingWeight,
}

/// Everything the bot remembers about one chat
#[derive(Debug, Clone)]
pub struct ChatSession {
    chat: ChatIdentity,
    state: DialogueState,
    draft: Option<DraftEntry>,
    history: Vec<TrainingEntry>,
}

impl ChatSession {
    pub fn new(chat: ChatIdentity) -> Self {
        Self {
            chat,
            state: DialogueState::Idle,
            draft: None,
            history: Vec::new(),
        }
    }

    pub fn chat(&self) -> ChatIdentity {
        self.chat
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    /// Entering `AwaitingMuscleGroup` starts a fresh draft, dropping any
    /// unfinished one
    pub fn set_state(&mut self, state: DialogueState) {
        if state == DialogueState::AwaitingMuscleGroup {
            if self.draft.is_some() {
                debug!("Chat {} abandoned an unfinished training", self.chat);
            }
            self.draft = Some(DraftEntry::new());
        }
        debug!("Chat {}: {:?} -> {:?}", self.chat, self.state, state);
        self.state = state;
    }

    pub fn in_flight(&self) -> Option<&DraftEntry> {
        self.draft.as_ref()
    }

    fn draft_mut(&mut self) -> Result<&mut DraftEntry, StoreError> {
        let chat = self.chat;
        self.draft.as_mut().ok_or(StoreError::NoActiveEntry(chat))
    }

    pub fn save_muscle_group(&mut self, group: &str) -> Result<(), StoreError> {
        self.draft_mut()?.muscle_group = Some(group.to_string());
        Ok(())
    }

    pub fn save_duration(&mut self, hours: f64) -> Result<(), StoreError> {
        self.draft_mut()?.duration_hours = Some(hours);
        Ok(())
    }

    pub fn save_weight(&mut self, kg: f64) -> Result<(), StoreError> {
        self.draft_mut()?.weight = Some(kg);
        Ok(())
    }

    /// Move the draft into history. Returns `false` when there was nothing
    /// to finish; an incomplete draft is refused and kept.
    pub fn finish_training(&mut self) -> Result<bool, StoreError> {
        let Some(draft) = &self.draft else {
            return Ok(false);
        };

        let entry = draft.finalize(self.chat)?;
        info!(
            "Chat {} finished training: {} ({} h)",
            self.chat, entry.muscle_group, entry.duration_hours
        );
        self.history.push(entry);
        self.draft = None;
        Ok(true)
    }

    pub fn history(&self) -> &[TrainingEntry] {
        &self.history
    }
}

/// Concurrent map of chat sessions.
///
/// Backed by a sharded `DashMap`: chats in different shards never contend,
/// and a single chat is only ever touched by one caller at a time.
#[derive(Debug, Default)]
pub struct UserStore {
    chats: DashMap<ChatIdentity, ChatSession>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access to the chat's session, creating it on
    /// first contact. `f` must not call back into the store.
    pub fn with_session<R>(&self, chat: ChatIdentity, f: impl FnOnce(&mut ChatSession) -> R) -> R {
        let mut session = self
            .chats
            .entry(chat)
            .or_insert_with(|| ChatSession::new(chat));
        f(session.value_mut())
    }

    pub fn get_state(&self, chat: ChatIdentity) -> DialogueState {
        self.chats
            .get(&chat)
            .map(|session| session.state())
            .unwrap_or_default()
    }

    pub fn set_state(&self, chat: ChatIdentity, state: DialogueState) {
        self.with_session(chat, |session| session.set_state(state));
    }

    pub fn save_muscle_group(&self, chat: ChatIdentity, group: &str) -> Result<(), StoreError> {
        self.existing(chat, |session| session.save_muscle_group(group))
    }

    pub fn save_duration(&self, chat: ChatIdentity, hours: f64) -> Result<(), StoreError> {
        self.existing(chat, |session| session.save_duration(hours))
    }

    pub fn save_weight(&self, chat: ChatIdentity, kg: f64) -> Result<(), StoreError> {
        self.existing(chat, |session| session.save_weight(kg))
    }

    pub fn finish_training(&self, chat: ChatIdentity) -> Result<bool, StoreError> {
        match self.chats.get_mut(&chat) {
            Some(mut session) => session.finish_training(),
            None => Ok(false),
        }
    }

    /// Snapshot of the chat's finalized trainings, oldest first
    pub fn history(&self, chat: ChatIdentity) -> Vec<TrainingEntry> {
        self.chats
            .get(&chat)
            .map(|session| session.history().to_vec())
            .unwrap_or_default()
    }

    pub fn in_flight(&self, chat: ChatIdentity) -> Option<DraftEntry> {
        self.chats
            .get(&chat)
            .and_then(|session| session.in_flight().cloned())
    }

    /// Number of chats seen since start
    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }

    // Saves on an unseen chat must not create a session as a side effect
    fn existing(
        &self,
        chat: ChatIdentity,
        f: impl FnOnce(&mut ChatSession) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        match self.chats.get_mut(&chat) {
            Some(mut session) => f(session.value_mut()),
            None => Err(StoreError::NoActiveEntry(chat)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT: ChatIdentity = ChatIdentity(100);

    #[test]
    fn test_chat_identity_from_raw_id() {
        let chat: ChatIdentity = (-42_i64).into();
        assert_eq!(chat, ChatIdentity(-42));
        assert_eq!(chat.to_string(), "-42");
    }

    #[test]
    fn test_unseen_chat_is_idle_with_empty_history() {
        let store = UserStore::new();
        assert_eq!(store.get_state(CHAT), DialogueState::Idle);
        assert!(store.history(CHAT).is_empty());
        assert!(store.in_flight(CHAT).is_none());
        assert_eq!(store.chat_count(), 0);
    }

    #[test]
    fn test_save_without_entry_fails() {
        let store = UserStore::new();
        assert_eq!(
            store.save_muscle_group(CHAT, "Ноги"),
            Err(StoreError::NoActiveEntry(CHAT))
        );
        assert_eq!(store.save_duration(CHAT, 1.0), Err(StoreError::NoActiveEntry(CHAT)));
        assert_eq!(store.save_weight(CHAT, 50.0), Err(StoreError::NoActiveEntry(CHAT)));
        assert_eq!(store.chat_count(), 0);

        // Known chat, but no training started
        store.set_state(CHAT, DialogueState::AwaitingDuration);
        assert_eq!(store.save_duration(CHAT, 1.0), Err(StoreError::NoActiveEntry(CHAT)));
    }

    #[test]
    fn test_full_training_cycle() {
        let store = UserStore::new();
        store.set_state(CHAT, DialogueState::AwaitingMuscleGroup);
        store.save_muscle_group(CHAT, "Legs").unwrap();
        store.save_duration(CHAT, 1.5).unwrap();
        store.save_weight(CHAT, 80.0).unwrap();
        assert_eq!(store.finish_training(CHAT), Ok(true));

        let history = store.history(CHAT);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].muscle_group, "Legs");
        assert_eq!(history[0].duration_hours, 1.5);
        assert_eq!(history[0].weight, Some(80.0));
        assert!(store.in_flight(CHAT).is_none());
    }

    #[test]
    fn test_new_training_discards_abandoned_one() {
        let store = UserStore::new();
        store.set_state(CHAT, DialogueState::AwaitingMuscleGroup);
        store.save_muscle_group(CHAT, "Грудь").unwrap();
        store.save_duration(CHAT, 3.0).unwrap();
        store.save_weight(CHAT, 10.0).unwrap();

        store.set_state(CHAT, DialogueState::AwaitingMuscleGroup);
        store.save_muscle_group(CHAT, "Спина").unwrap();
        store.save_duration(CHAT, 0.5).unwrap();
        store.finish_training(CHAT).unwrap();

        let history = store.history(CHAT);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].muscle_group, "Спина");
        assert_eq!(history[0].duration_hours, 0.5);
        assert_eq!(history[0].weight, None);
    }

    #[test]
    fn test_finish_without_entry_is_noop() {
        let store = UserStore::new();
        assert_eq!(store.finish_training(CHAT), Ok(false));
        store.set_state(CHAT, DialogueState::Idle);
        assert_eq!(store.finish_training(CHAT), Ok(false));
        assert!(store.history(CHAT).is_empty());
    }

    #[test]
    fn test_finish_incomplete_entry_is_refused() {
        let store = UserStore::new();
        store.set_state(CHAT, DialogueState::AwaitingMuscleGroup);
        store.save_muscle_group(CHAT, "Плечи").unwrap();

        assert_eq!(
            store.finish_training(CHAT),
            Err(StoreError::IncompleteEntry {
                chat: CHAT,
                field: "duration"
            })
        );
        assert!(store.history(CHAT).is_empty());
        assert!(store.in_flight(CHAT).is_some());
    }

    #[test]
    fn test_history_is_append_only_in_order() {
        let store = UserStore::new();
        for (i, group) in ["A", "B", "C"].iter().enumerate() {
            store.set_state(CHAT, DialogueState::AwaitingMuscleGroup);
            store.save_muscle_group(CHAT, group).unwrap();
            store.save_duration(CHAT, i as f64).unwrap();
            store.finish_training(CHAT).unwrap();
        }

        let groups: Vec<_> = store
            .history(CHAT)
            .iter()
            .map(|e| e.muscle_group.clone())
            .collect();
        assert_eq!(groups, ["A", "B", "C"]);
    }

    #[test]
    fn test_chats_are_isolated() {
        let store = UserStore::new();
        let other = ChatIdentity(-5);

        store.set_state(CHAT, DialogueState::AwaitingMuscleGroup);
        store.save_muscle_group(CHAT, "Ноги").unwrap();

        assert_eq!(store.get_state(other), DialogueState::Idle);
        assert!(store.in_flight(other).is_none());
        assert_eq!(store.save_duration(other, 1.0), Err(StoreError::NoActiveEntry(other)));
        assert_eq!(store.get_state(CHAT), DialogueState::AwaitingMuscleGroup);
    }

    #[test]
    fn test_with_session_creates_session_once() {
        let store = UserStore::new();
        let chat = store.with_session(CHAT, |session| session.chat());
        assert_eq!(chat, CHAT);
        store.with_session(CHAT, |session| session.set_state(DialogueState::AwaitingWeight));
        assert_eq!(store.chat_count(), 1);
        assert_eq!(store.get_state(CHAT), DialogueState::AwaitingWeight);
    }
}
