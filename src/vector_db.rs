use lazy_static::lazy_static;
use ndarray::Array1;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use unicode_normalization::UnicodeNormalization;

/// TF-IDF index fitted once over a fixed corpus.
///
/// Weighting uses raw term counts, smoothed idf `ln((1 + n) / (1 + df)) + 1`
/// and L2-normalised vectors. Terms not seen while fitting are ignored when
/// transforming a query.
pub struct VectorDB {
    vocabulary: FxHashMap<String, usize>,
    idf: Array1<f32>,
    embeddings: Vec<Array1<f32>>,
}

impl VectorDB {
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| tokenize(doc.as_ref()))
            .collect();

        let mut terms: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<FxHashSet<_>>()
            .into_iter()
            .collect();
        terms.sort();

        let vocabulary: FxHashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(i, term)| (term, i))
            .collect();

        let mut doc_freq = vec![0.0f32; vocabulary.len()];
        for tokens in &tokenized {
            let unique: FxHashSet<&String> = tokens.iter().collect();
            for token in unique {
                if let Some(&i) = vocabulary.get(token) {
                    doc_freq[i] += 1.0;
                }
            }
        }

        let doc_count = documents.len() as f32;
        let idf = Array1::from(
            doc_freq
                .into_iter()
                .map(|df| ((1.0 + doc_count) / (1.0 + df)).ln() + 1.0)
                .collect::<Vec<_>>(),
        );

        let mut db = VectorDB {
            vocabulary,
            idf,
            embeddings: Vec::with_capacity(tokenized.len()),
        };
        let embeddings = tokenized.iter().map(|tokens| db.weigh(tokens)).collect();
        db.embeddings = embeddings;
        db
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Projects arbitrary text onto the fitted vocabulary.
    pub fn transform(&self, text: &str) -> Array1<f32> {
        self.weigh(&tokenize(text))
    }

    /// Cosine similarity of `query` against every fitted document, in corpus order.
    pub fn similarities(&self, query: &str) -> Vec<f32> {
        let query_embedding = self.transform(query);
        self.embeddings
            .iter()
            .map(|embedding| cosine_similarity(embedding, &query_embedding))
            .collect()
    }

    fn weigh(&self, tokens: &[String]) -> Array1<f32> {
        let mut tfidf = Array1::<f32>::zeros(self.vocabulary.len());
        for token in tokens {
            if let Some(&i) = self.vocabulary.get(token) {
                tfidf[i] += 1.0;
            }
        }
        tfidf *= &self.idf;

        let norm = tfidf.dot(&tfidf).sqrt();
        if norm > 0.0 {
            tfidf /= norm;
        }
        tfidf
    }
}

/// Lower-cases and splits text into runs of two or more word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    lazy_static! {
        static ref TOKEN: Regex = Regex::new(r"\b\w\w+\b").expect("token pattern is valid");
    }

    let text = text.nfc().collect::<String>().to_lowercase();
    TOKEN
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn cosine_similarity(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    let dot_product = a.dot(b);
    let norm_a = a.dot(a).sqrt();
    let norm_b = b.dot(b).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
