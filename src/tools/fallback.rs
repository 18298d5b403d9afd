//! Local placeholder generators
//!
//! Used when the content service is unreachable. Output is deterministic:
//! wherever a choice has to be made it is derived from a stable hash of the
//! input rather than from randomness, so the same input always yields the
//! same placeholder.

use crate::error::Result;
use crate::tools::ChatMessage;
use regex::Regex;

/// Texts shorter than this are not summarized
pub const MIN_SUMMARY_WORDS: usize = 50;

pub const CONCISE_TEXT_MESSAGE: &str =
    "This text is already quite concise and doesn't need much summarization.";

const IDEA_TEMPLATES: [&str; 12] = [
    "The Ultimate Guide to {}",
    "10 Common Mistakes People Make with {}",
    "How {} Can Transform Your Daily Life",
    "The Future of {}: Trends and Predictions",
    "{} for Beginners: A Step-by-Step Approach",
    "Expert Tips for Mastering {}",
    "The Hidden Benefits of {}",
    "{} vs Alternatives: A Comprehensive Comparison",
    "Case Studies: Success Stories with {}",
    "Troubleshooting Common {} Problems",
    "The Science Behind {}",
    "{} on a Budget: Cost-Effective Solutions",
];

const DEFAULT_CHAT_REPLIES: [&str; 5] = [
    "That's an interesting point! Could you tell me more about what you're thinking?",
    "I understand what you're saying. How can I help you with that?",
    "Thanks for sharing that with me. What would you like to explore further?",
    "That's a great question! Let me think about how I can best assist you with that.",
    "I appreciate you bringing that up. What specific aspect would you like to focus on?",
];

/// FNV-1a, stable across runs and platforms
fn stable_hash(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Non-empty pieces between `.`, `!` and `?`
fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// First, middle and last sentence of texts with at least 50 words
pub fn summary(text: &str) -> String {
    if text.split_whitespace().count() < MIN_SUMMARY_WORDS {
        return CONCISE_TEXT_MESSAGE.to_string();
    }

    let sentences = sentences(text);
    let mut picked = Vec::new();
    if let Some(first) = sentences.first() {
        picked.push(first.trim());
    }
    if sentences.len() > 2 {
        picked.push(sentences[sentences.len() / 2].trim());
    }
    if sentences.len() > 1 {
        picked.push(sentences[sentences.len() - 1].trim());
    }

    format!("{}.", picked.join(". "))
}

/// Six to eight title ideas built from templates
pub fn ideas(topic: &str) -> Vec<String> {
    let hash = stable_hash(topic);
    let count = 6 + (hash % 3) as usize;
    let offset = ((hash / 3) % IDEA_TEMPLATES.len() as u64) as usize;

    IDEA_TEMPLATES
        .iter()
        .cycle()
        .skip(offset)
        .take(count)
        .map(|template| template.replacen("{}", topic, 1))
        .collect()
}

fn replace_words(text: &str, pairs: &[(&str, &str)]) -> Result<String> {
    let mut out = text.to_string();
    for (from, to) in pairs {
        let re = Regex::new(&format!(r"\b{}\b", regex::escape(from)))?;
        out = re.replace_all(&out, *to).into_owned();
    }
    Ok(out)
}

/// Rewrite `text` following keywords in `instruction`
pub fn refinement(text: &str, instruction: &str) -> Result<String> {
    let instruction_lower = instruction.to_lowercase();

    if instruction_lower.contains("formal") {
        return replace_words(
            text,
            &[
                ("can't", "cannot"),
                ("won't", "will not"),
                ("don't", "do not"),
                ("isn't", "is not"),
                ("aren't", "are not"),
                ("you", "one"),
                ("your", "one's"),
            ],
        );
    }

    if instruction_lower.contains("casual") {
        return replace_words(
            text,
            &[
                ("cannot", "can't"),
                ("will not", "won't"),
                ("do not", "don't"),
                ("is not", "isn't"),
                ("are not", "aren't"),
            ],
        );
    }

    if instruction_lower.contains("concise") {
        let sentences = sentences(text);
        let keep = (sentences.len() * 7).div_ceil(10);
        return Ok(format!("{}.", sentences[..keep].join(". ")));
    }

    if instruction_lower.contains("enthusiastic") {
        return Ok(format!("{} This is truly exciting and amazing!", text));
    }

    if instruction_lower.contains("professional") {
        return Ok(format!("In a professional context, {}", text.to_lowercase()));
    }

    Ok(format!("[Refined based on \"{}\"] {}", instruction, text))
}

/// Keyword-driven chat reply
///
/// `history` is accepted for parity with the live endpoint; the placeholder
/// replies do not depend on it.
pub fn chat_reply(message: &str, _history: &[ChatMessage]) -> String {
    let lower = message.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    let reply = if has("hello") || has("hi") {
        "Hello! I'm your AI assistant. How can I help you today?"
    } else if has("help") {
        "I'm here to help! I can assist you with content creation, brainstorming ideas, answering questions, and more. What would you like to work on?"
    } else if has("what") && has("do") {
        "I can help you with various tasks like summarizing text, generating creative ideas, refining content, answering questions, and having conversations. What specific task interests you?"
    } else if has("thank") {
        "You're welcome! I'm glad I could help. Is there anything else you'd like to work on?"
    } else if has("bye") || has("goodbye") {
        "Goodbye! Feel free to come back anytime you need assistance with your content creation tasks."
    } else if has("idea") || has("brainstorm") {
        "I'd love to help you brainstorm! Could you tell me more about the topic or project you're working on? The more context you provide, the better ideas I can suggest."
    } else if has("write") || has("content") {
        "I can definitely help with writing and content creation! What type of content are you looking to create? Blog posts, social media content, emails, or something else?"
    } else {
        let index = (stable_hash(&lower) % DEFAULT_CHAT_REPLIES.len() as u64) as usize;
        DEFAULT_CHAT_REPLIES[index]
    };

    reply.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_text() -> String {
        let mut text = String::new();
        for i in 0..12 {
            text.push_str(&format!("Sentence number {} has a few more words. ", i));
        }
        text
    }

    #[test]
    fn test_summary_short_text() {
        assert_eq!(summary("Just a few words."), CONCISE_TEXT_MESSAGE);
    }

    #[test]
    fn test_summary_picks_first_middle_last() {
        let summary = summary(&long_text());
        assert_eq!(
            summary,
            "Sentence number 0 has a few more words. Sentence number 6 has a few more words. Sentence number 11 has a few more words."
        );
    }

    #[test]
    fn test_ideas_are_deterministic_and_bounded() {
        let first = ideas("Rust");
        let second = ideas("Rust");
        assert_eq!(first, second);
        assert!((6..=8).contains(&first.len()));
        assert!(first.iter().all(|idea| idea.contains("Rust")));

        let unique: std::collections::HashSet<_> = first.iter().collect();
        assert_eq!(unique.len(), first.len());
    }

    #[test]
    fn test_refine_formal() {
        let out = refinement("You can't stop your work", "make it formal").unwrap();
        // capital "You" is left alone, word boundaries respected
        assert_eq!(out, "You cannot stop one's work");
    }

    #[test]
    fn test_refine_casual() {
        let out = refinement("We cannot go and do not care", "more Casual").unwrap();
        assert_eq!(out, "We can't go and don't care");
    }

    #[test]
    fn test_refine_concise() {
        let out = refinement("One. Two. Three. Four.", "be concise").unwrap();
        // ceil(4 * 0.7) = 3
        assert_eq!(out, "One.  Two.  Three.");
    }

    #[test]
    fn test_refine_other_modes() {
        assert_eq!(
            refinement("Great", "enthusiastic").unwrap(),
            "Great This is truly exciting and amazing!"
        );
        assert_eq!(
            refinement("Hello World", "professional").unwrap(),
            "In a professional context, hello world"
        );
        assert_eq!(
            refinement("text", "shorter").unwrap(),
            "[Refined based on \"shorter\"] text"
        );
    }

    #[test]
    fn test_chat_reply_keywords() {
        assert!(chat_reply("Hello there", &[]).starts_with("Hello!"));
        assert!(chat_reply("please HELP", &[]).starts_with("I'm here to help"));
        assert!(chat_reply("thanks a lot", &[]).starts_with("You're welcome"));
        assert!(chat_reply("goodbye", &[]).starts_with("Goodbye"));
    }

    #[test]
    fn test_chat_reply_default_is_stable() {
        let a = chat_reply("Quantum pancakes?", &[]);
        let b = chat_reply("Quantum pancakes?", &[]);
        assert_eq!(a, b);
        assert!(DEFAULT_CHAT_REPLIES.contains(&a.as_str()));
    }
}
