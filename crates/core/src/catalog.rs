//! Stock question banks shipped with the app.

use std::collections::BTreeMap;

use crate::model::{BankError, DEFAULT_BANK_KEY, Difficulty, QuestionBank, QuestionDraft, QuestionId};

fn draft(
    id: u64,
    prompt: &str,
    kind: &str,
    difficulty: Difficulty,
    time_limit: u32,
    category: &str,
    hints: [&str; 3],
) -> QuestionDraft {
    QuestionDraft {
        id: QuestionId::new(id),
        prompt: prompt.to_string(),
        kind: kind.to_string(),
        category: category.to_string(),
        difficulty,
        time_limit,
        hints: hints.iter().map(|h| (*h).to_string()).collect(),
    }
}

fn technical() -> Vec<QuestionDraft> {
    use Difficulty::{Advanced, Beginner, Intermediate};
    vec![
        draft(
            1,
            "Explain the difference between var, let, and const in JavaScript. When would you use each?",
            "coding",
            Intermediate,
            180,
            "JavaScript",
            ["Think about scope", "Consider reassignment", "Think about hoisting"],
        ),
        draft(
            2,
            "Write a function to find the longest common subsequence between two strings.",
            "algorithm",
            Advanced,
            300,
            "Algorithms",
            ["Use dynamic programming", "Consider a 2D table", "Think about the base case"],
        ),
        draft(
            3,
            "How would you design a URL shortening service? Discuss the architecture and scalability considerations.",
            "system-design",
            Advanced,
            600,
            "System Design",
            ["Consider database design", "Think about hash functions", "Plan for high traffic"],
        ),
        draft(
            4,
            "Explain the concept of closures in JavaScript with a practical example.",
            "concept",
            Intermediate,
            180,
            "JavaScript",
            ["Think about scope", "Consider function scope", "Think about data privacy"],
        ),
        draft(
            5,
            "Implement a basic stack data structure with push, pop, and peek operations.",
            "coding",
            Beginner,
            120,
            "Data Structures",
            ["Use an array", "Consider LIFO principle", "Handle edge cases"],
        ),
    ]
}

fn behavioral() -> Vec<QuestionDraft> {
    use Difficulty::{Advanced, Beginner, Intermediate};
    vec![
        draft(
            1,
            "Tell me about a time when you had to work with a difficult team member. How did you handle the situation?",
            "situational",
            Intermediate,
            240,
            "Teamwork",
            ["Use STAR method", "Focus on resolution", "Show empathy"],
        ),
        draft(
            2,
            "Describe a project where you had to learn a new technology quickly. What was your approach?",
            "experience",
            Intermediate,
            240,
            "Learning",
            ["Show adaptability", "Mention resources used", "Highlight results"],
        ),
        draft(
            3,
            "Give me an example of when you had to make a decision without all the information you needed.",
            "situational",
            Advanced,
            300,
            "Decision Making",
            ["Show analytical thinking", "Mention risk assessment", "Explain your process"],
        ),
        draft(
            4,
            "Tell me about a time you failed at something. What did you learn from it?",
            "experience",
            Beginner,
            180,
            "Resilience",
            ["Be honest", "Focus on learning", "Show growth mindset"],
        ),
        draft(
            5,
            "Describe a situation where you had to lead a team through a challenging project.",
            "leadership",
            Advanced,
            300,
            "Leadership",
            ["Show leadership style", "Mention team dynamics", "Highlight outcomes"],
        ),
    ]
}

fn general() -> Vec<QuestionDraft> {
    use Difficulty::{Beginner, Intermediate};
    vec![
        draft(
            1,
            "Why are you interested in this role and company?",
            "motivation",
            Beginner,
            120,
            "Motivation",
            ["Research the company", "Connect to your goals", "Show enthusiasm"],
        ),
        draft(
            2,
            "Where do you see yourself in 5 years?",
            "career",
            Beginner,
            120,
            "Career Goals",
            ["Be realistic", "Show ambition", "Connect to the role"],
        ),
        draft(
            3,
            "What are your greatest strengths and weaknesses?",
            "self-assessment",
            Intermediate,
            180,
            "Self-Awareness",
            ["Be honest", "Show self-awareness", "Connect to the role"],
        ),
    ]
}

/// The technical, behavioral and general banks, with "general" as the default.
///
/// # Errors
///
/// Returns `BankError` only if the stock content fails validation.
pub fn builtin_bank() -> Result<QuestionBank, BankError> {
    let mut drafts = BTreeMap::new();
    drafts.insert("technical".to_string(), technical());
    drafts.insert("behavioral".to_string(), behavioral());
    drafts.insert(DEFAULT_BANK_KEY.to_string(), general());
    QuestionBank::from_drafts(drafts, DEFAULT_BANK_KEY)
}
