use tracing::warn;

use backend_domain::{ChatMessage, CycleReport};

use crate::AppState;

pub async fn persist_chat(state: &AppState, messages: &[ChatMessage], report: &mut CycleReport) {
    report.chat_seen += messages.len();
    for message in messages {
        match state.chat_repo.insert_chat_message_if_absent(message).await {
            Ok(true) => report.chat_inserted += 1,
            Ok(false) => {}
            Err(err) => {
                warn!(hash = %message.hash, "failed to insert chat message: {}", err);
                report.persistence_errors += 1;
            }
        }
    }
}
