//! The conversation engine: bridges the durable turn log and a live remote
//! conversation, and generates the document summary.

use folio_llm::{Conversation, DocumentChatProvider, DocumentHandle, Role, SeedMessage, SeedPart, Turn};

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL_ID: &str = "gemini-1.5-flash";

/// Canned first assistant turn of every seed.
pub const ACKNOWLEDGEMENT: &str =
    "I have analyzed the paper based on your instructions. What would you like to know?";

/// Fixed instruction used to generate the document summary.
pub const SUMMARY_INSTRUCTION: &str =
    "Summarize this paper in a detailed, engaging blog post format. Use markdown for formatting.";

/// Build the seed history for a conversation: the document and instructions
/// as the opening user turn, the canned acknowledgement as the first
/// assistant turn, then every prior turn in original order. For N prior
/// turns the seed has length 2 + N.
pub fn seed_history(
    document: &DocumentHandle,
    instructions: &str,
    prior_turns: &[Turn],
) -> Vec<SeedMessage> {
    let mut seed = Vec::with_capacity(prior_turns.len() + 2);
    seed.push(SeedMessage {
        role: Role::User,
        parts: vec![
            SeedPart::Document(document.clone()),
            SeedPart::Text(instructions.to_string()),
        ],
    });
    seed.push(SeedMessage::assistant(ACKNOWLEDGEMENT));
    seed.extend(prior_turns.iter().map(SeedMessage::from));
    seed
}

/// Reconstruct a live conversation from the durable log.
///
/// A pure function of its inputs: remote conversation state is never
/// durable, so after a session load or process restart this is how the
/// context comes back. Replaying turns seeds context only — it does not
/// invoke the model.
pub fn rehydrate(
    provider: &DocumentChatProvider,
    model_id: &str,
    document: &DocumentHandle,
    instructions: &str,
    prior_turns: &[Turn],
) -> Conversation {
    provider.start_conversation(model_id, seed_history(document, instructions, prior_turns))
}

/// Generate the document summary as a one-off turn.
///
/// Callers must not invoke this when the record already carries a summary;
/// the summary is produced at most once per document.
pub async fn summarize(conversation: &mut Conversation) -> Result<String, folio_llm::Error> {
    conversation.send(SUMMARY_INSTRUCTION).await
}

#[cfg(test)]
mod tests {
    use folio_llm::{DocumentHandle, DocumentState, Role, SeedPart, Turn};

    use super::{ACKNOWLEDGEMENT, seed_history};

    fn handle() -> DocumentHandle {
        DocumentHandle {
            name: "files/abc".into(),
            uri: "https://files/abc".into(),
            mime_type: "application/pdf".into(),
            state: DocumentState::Ready,
        }
    }

    #[test]
    fn empty_log_seeds_instructions_pair() {
        let seed = seed_history(&handle(), "Analyze this paper.", &[]);
        assert_eq!(seed.len(), 2);

        assert_eq!(seed[0].role, Role::User);
        assert_eq!(seed[0].parts.len(), 2);
        assert!(matches!(seed[0].parts[0], SeedPart::Document(_)));
        assert!(matches!(&seed[0].parts[1], SeedPart::Text(t) if t == "Analyze this paper."));

        assert_eq!(seed[1].role, Role::Assistant);
        assert!(matches!(&seed[1].parts[0], SeedPart::Text(t) if t == ACKNOWLEDGEMENT));
    }

    #[test]
    fn prior_turns_replay_in_order_after_the_pair() {
        let turns = vec![
            Turn::user("q1"),
            Turn::assistant("a1"),
            Turn::user("q2"),
            Turn::assistant("a2"),
        ];
        let seed = seed_history(&handle(), "inst", &turns);
        assert_eq!(seed.len(), 2 + turns.len());

        // Alternation: user, assistant, user, assistant, ...
        for (i, message) in seed.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(message.role, expected, "seed entry {i}");
        }

        for (message, turn) in seed[2..].iter().zip(&turns) {
            assert!(matches!(&message.parts[0], SeedPart::Text(t) if *t == turn.content));
        }
    }
}
