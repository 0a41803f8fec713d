use crate::models::FaqEntry;
use crate::vector_db::VectorDB;

pub const NO_CONTEXT: &str = "No relevant information was found in the knowledge base.";

const TOP_K: usize = 3;
const MIN_SIMILARITY: f32 = 0.1;

/// Ranks FAQ entries against a question. Built once at startup and shared
/// read-only between requests.
pub struct Retriever {
    faqs: Vec<FaqEntry>,
    vector_db: VectorDB,
}

impl Retriever {
    pub fn new(faqs: Vec<FaqEntry>) -> Self {
        let documents: Vec<String> = faqs
            .iter()
            .map(|faq| format!("{} {}", faq.question, faq.answer).to_lowercase())
            .collect();

        Retriever {
            vector_db: VectorDB::fit(&documents),
            faqs,
        }
    }

    pub fn faq_count(&self) -> usize {
        self.faqs.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vector_db.vocabulary_size()
    }

    /// Up to three entries scoring above the similarity floor, best first.
    pub fn top_matches(&self, question: &str) -> Vec<(&FaqEntry, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .vector_db
            .similarities(&question.to_lowercase())
            .into_iter()
            .enumerate()
            .collect();

        // stable: equal scores keep corpus order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
            .into_iter()
            .take(TOP_K)
            .filter(|(_, score)| *score > MIN_SIMILARITY)
            .map(|(i, score)| (&self.faqs[i], score))
            .collect()
    }

    /// Formats the best matches as prompt context, or [`NO_CONTEXT`].
    pub fn retrieve(&self, question: &str) -> String {
        let matches = self.top_matches(question);
        if matches.is_empty() {
            return NO_CONTEXT.to_string();
        }

        matches
            .iter()
            .map(|(faq, _)| format!("Question: {}\nAnswer: {}", faq.question, faq.answer))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
