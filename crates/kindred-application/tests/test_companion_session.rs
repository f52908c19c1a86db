//! End-to-end conversation tests over the file-backed session store.

use kindred_application::{CompanionConversation, ResponseGenerator};
use kindred_core::dialogue::{ConversationStage, SeededSelector};
use kindred_core::session::{ScopedStore, SessionContext, session_key};
use kindred_infrastructure::JsonDirScopedStore;
use std::sync::Arc;
use tempfile::TempDir;

fn seeded_generator() -> ResponseGenerator {
    ResponseGenerator::with_selector(Box::new(SeededSelector::new(42)))
}

#[test]
fn test_multi_turn_conversation_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(JsonDirScopedStore::new(temp_dir.path()));

    let mut conversation =
        CompanionConversation::start("evening", seeded_generator(), backend.clone());
    let turns = [
        "hi, I feel anxious about work",
        "my boss keeps piling things on",
        "I can't sleep",
        "what can I do to cope with this?",
    ];
    let stages: Vec<ConversationStage> = turns
        .iter()
        .map(|turn| conversation.respond(turn).stage)
        .collect();

    assert_eq!(
        &stages[..3],
        &[ConversationStage::Intake; 3],
        "first three exchanges stay in intake"
    );
    assert_eq!(stages[3], ConversationStage::Coping);
    assert_eq!(conversation.context().exchange_count, 4);
    assert!(conversation.context().themes.contains(&"anxious".to_string()));
    assert!(!conversation.is_storage_degraded());

    // The stored payload is the camelCase JSON form of the context
    let payload = backend.get(&session_key("evening")).unwrap().unwrap();
    let stored: SessionContext = serde_json::from_str(&payload).unwrap();
    assert_eq!(&stored, conversation.context());
    assert!(payload.contains("\"exchangeCount\":4"));

    // A new process picks the conversation up where it stopped
    let reopened = Arc::new(JsonDirScopedStore::new(temp_dir.path()));
    let mut resumed = CompanionConversation::resume("evening", seeded_generator(), reopened);
    assert_eq!(resumed.context().exchange_count, 4);

    let response = resumed.respond("I'm feeling a bit better this week");
    assert_eq!(response.stage, ConversationStage::Progress);
    assert_eq!(resumed.context().exchange_count, 5);
}

#[test]
fn test_leave_removes_session_file() {
    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(JsonDirScopedStore::new(temp_dir.path()));

    let mut conversation = CompanionConversation::start("short", seeded_generator(), backend.clone());
    conversation.respond("hello");
    assert!(backend.get(&session_key("short")).unwrap().is_some());

    conversation.leave();

    assert!(backend.get(&session_key("short")).unwrap().is_none());
    let resumed = CompanionConversation::resume("short", seeded_generator(), backend);
    assert_eq!(resumed.context().exchange_count, 0);
}

#[test]
fn test_similar_session_ids_do_not_share_context() {
    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(JsonDirScopedStore::new(temp_dir.path()));

    let mut team = CompanionConversation::start("team/a", seeded_generator(), backend.clone());
    for turn in ["I'm stressed", "work is a lot", "deadlines everywhere", "I can't cope"] {
        team.respond(turn);
    }
    assert_eq!(team.context().exchange_count, 4);

    let other = CompanionConversation::resume("team_a", seeded_generator(), backend.clone());
    assert_eq!(other.context().exchange_count, 0);
    assert!(other.context().themes.is_empty());

    let team_again = CompanionConversation::resume("team/a", seeded_generator(), backend);
    assert_eq!(team_again.context().exchange_count, 4);
}

#[test]
fn test_corrupt_session_file_starts_fresh() {
    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(JsonDirScopedStore::new(temp_dir.path()));
    std::fs::write(backend.path_for(&session_key("broken")).unwrap(), "not json").unwrap();

    let mut conversation = CompanionConversation::resume("broken", seeded_generator(), backend);
    assert_eq!(conversation.context().exchange_count, 0);

    conversation.respond("hello again");
    assert_eq!(conversation.context().exchange_count, 1);
}

#[test]
fn test_every_response_passes_constraints() {
    use kindred_core::dialogue::{ConstraintSet, validate};

    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(JsonDirScopedStore::new(temp_dir.path()));
    let mut conversation = CompanionConversation::start("safety", seeded_generator(), backend);

    let turns = [
        "hello",
        "I've been so lonely lately",
        "nothing helps",
        "why do I feel like this?",
        "I want to get my life back on track",
        "I'm so overwhelmed I can't breathe",
        "should I see a therapist?",
        "I don't want to be here anymore, I want to die",
    ];

    for turn in turns {
        let response = conversation.respond(turn);
        let constraints = ConstraintSet::for_stage(response.stage);
        assert!(
            validate(&response.message, &constraints),
            "response for {turn:?} violates constraints: {}",
            response.message
        );
    }
}
