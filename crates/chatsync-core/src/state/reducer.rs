//! The replica's transition function.

use super::action::{Action, PageMerge};
use super::model::{LoadingState, ReplicaState};
use crate::conversation::Conversation;
use std::collections::HashSet;

/// Applies one action to the replica and returns the next replica.
///
/// The function is total and performs no I/O. It owns its input, so no
/// earlier snapshot can observe the edits made here. Actions whose
/// preconditions do not hold (renaming when history was never fetched,
/// `Success` without a healthy store and a list) leave the state unchanged.
pub fn reduce(mut state: ReplicaState, action: Action) -> ReplicaState {
    match action {
        Action::ToggleHistoryPanel => {
            state.history_panel_open = !state.history_panel_open;
        }
        Action::SetHealth(health) => {
            if !health.available && state.loading == LoadingState::Success {
                state.loading = LoadingState::Fail;
            }
            state.health = health;
        }
        Action::SetLoadingState(loading) => {
            let success_allowed = state.health.available && state.history.is_some();
            if loading != LoadingState::Success || success_allowed {
                state.loading = loading;
            }
        }
        Action::SelectConversation(conversation) => {
            state.selected = conversation;
        }
        Action::ReplaceFilteredHistory(filtered) => {
            state.filtered_history = filtered;
        }
        Action::AppendOrReplaceConversation(conversation) => {
            if let Some(history) = state.history.as_mut() {
                match history.iter_mut().find(|c| c.id == conversation.id) {
                    Some(existing) => *existing = conversation,
                    None => history.push(conversation),
                }
            }
        }
        Action::RenameConversation {
            conversation_id,
            title,
        } => {
            if state.history.is_none() {
                return state;
            }
            for list in [state.history.as_mut(), state.filtered_history.as_mut()]
                .into_iter()
                .flatten()
            {
                list.iter_mut()
                    .filter(|c| c.id == conversation_id)
                    .for_each(|c| c.title = title.clone());
            }
            if let Some(selected) = state.selected.as_mut()
                && selected.id == conversation_id
            {
                selected.title = title;
            }
        }
        Action::DeleteConversation { conversation_id } => {
            for list in [state.history.as_mut(), state.filtered_history.as_mut()]
                .into_iter()
                .flatten()
            {
                list.retain(|c| c.id != conversation_id);
            }
            if state.selected_id() == Some(conversation_id.as_str()) {
                state.selected = None;
            }
        }
        Action::DeleteAll => {
            state.history = Some(Vec::new());
            state.filtered_history = Some(Vec::new());
            state.selected = None;
        }
        Action::ClearCurrentMessages { conversation_id } => {
            if state.selected_id() != Some(conversation_id.as_str()) {
                return state;
            }
            if let Some(selected) = state.selected.as_mut() {
                selected.messages.clear();
            }
            if let Some(entry) = state
                .history
                .as_mut()
                .and_then(|history| history.iter_mut().find(|c| c.id == conversation_id))
            {
                entry.messages.clear();
            }
        }
        Action::CommitReply {
            conversation_id,
            messages,
        } => {
            let listed = state.find_conversation(&conversation_id).is_some();
            let is_selected = state.selected_id() == Some(conversation_id.as_str());
            if !listed && !is_selected {
                tracing::debug!(
                    "[reduce] reply for {} dropped: conversation no longer known",
                    conversation_id
                );
                return state;
            }
            for list in [state.history.as_mut(), state.filtered_history.as_mut()]
                .into_iter()
                .flatten()
            {
                list.iter_mut()
                    .filter(|c| c.id == conversation_id)
                    .for_each(|c| c.messages.extend(messages.iter().cloned()));
            }
            if listed {
                state.selected = state.find_conversation(&conversation_id).cloned();
            } else if let Some(current) = state.selected.as_mut() {
                current.messages.extend(messages);
            }
        }
        Action::ReplaceHistoryPage { page, merge } => {
            let existing = match merge {
                PageMerge::Replace => Vec::new(),
                PageMerge::Append => state.history.take().unwrap_or_default(),
            };
            state.history = Some(merge_page(existing, page));
        }
        Action::ReplaceSettings(settings) => {
            state.settings = settings;
            state.ready = true;
        }
        Action::SetFeedback { message_id, tag } => {
            state.feedback.insert(message_id, tag);
        }
        Action::SetExecResult { message_id, result } => {
            state.exec_results.insert(message_id, result);
        }
    }

    state
}

/// Concatenates `page` after `existing`, keeping the first entry seen for
/// each conversation id. Order is otherwise preserved.
fn merge_page(mut existing: Vec<Conversation>, page: Vec<Conversation>) -> Vec<Conversation> {
    let mut seen: HashSet<String> = existing.iter().map(|c| c.id.clone()).collect();
    let incoming = page.len();
    let before = existing.len();
    existing.extend(page.into_iter().filter(|c| seen.insert(c.id.clone())));

    let dropped = incoming - (existing.len() - before);
    if dropped > 0 {
        tracing::debug!("[reduce] dropped {} duplicate conversation(s) from page", dropped);
    }
    existing
}
