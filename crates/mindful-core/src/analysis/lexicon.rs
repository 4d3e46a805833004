//! Embedded lexicon-based analyzer
//!
//! Polarity and subjectivity are averaged over the words found in a small
//! sentiment lexicon. A preceding intensifier scales a word, a nearby
//! negation flips and dampens it, and an exclamation mark strengthens the
//! last scored word. Keywords are runs of content words (noun-phrase chunks).

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;

use super::Analyzer;
use crate::error::{Error, Result};
use crate::models::AnalysisResult;

/// (word, polarity, subjectivity)
const SENTIMENT_WORDS: &[(&str, f64, f64)] = &[
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("glad", 0.5, 1.0),
    ("nice", 0.6, 1.0),
    ("wonderful", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("excellent", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("beautiful", 0.85, 1.0),
    ("lovely", 0.5, 0.75),
    ("fun", 0.3, 0.2),
    ("calm", 0.3, 0.75),
    ("peaceful", 0.25, 0.5),
    ("relaxed", 0.3, 0.6),
    ("content", 0.2, 0.5),
    ("grateful", 0.5, 0.75),
    ("thankful", 0.4, 0.6),
    ("proud", 0.8, 1.0),
    ("hopeful", 0.5, 0.6),
    ("excited", 0.375, 0.75),
    ("energetic", 0.4, 0.6),
    ("productive", 0.3, 0.5),
    ("better", 0.5, 0.5),
    ("best", 1.0, 0.3),
    ("fine", 0.4166, 0.5),
    ("okay", 0.5, 0.5),
    ("ok", 0.5, 0.5),
    ("loved", 0.7, 0.8),
    ("love", 0.5, 0.6),
    ("enjoyed", 0.4, 0.5),
    ("supportive", 0.4, 0.6),
    ("safe", 0.5, 0.5),
    ("strong", 0.4333, 0.7333),
    ("bad", -0.7, 0.6667),
    ("sad", -0.5, 1.0),
    ("terrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("worst", -1.0, 1.0),
    ("worse", -0.4, 0.6),
    ("angry", -0.5, 1.0),
    ("annoyed", -0.4, 0.7),
    ("frustrated", -0.7, 0.4),
    ("frustrating", -0.4, 0.4),
    ("upset", -0.5, 0.8),
    ("anxious", -0.25, 0.75),
    ("nervous", -0.2, 0.7),
    ("worried", -0.4, 0.8),
    ("scared", -0.5, 0.8),
    ("afraid", -0.6, 0.9),
    ("stressed", -0.5, 0.7),
    ("stressful", -0.5, 0.7),
    ("overwhelmed", -0.5, 0.7),
    ("tired", -0.4, 0.7),
    ("exhausted", -0.4, 0.7),
    ("lonely", -0.5, 1.0),
    ("depressed", -0.8, 0.9),
    ("hopeless", -0.7, 0.9),
    ("miserable", -1.0, 1.0),
    ("hurt", -0.5, 0.8),
    ("guilty", -0.5, 0.8),
    ("ashamed", -0.6, 0.9),
    ("difficult", -0.5, 1.0),
    ("hard", -0.2917, 0.5417),
    ("painful", -0.7, 0.9),
    ("sick", -0.7143, 0.8571),
    ("boring", -1.0, 1.0),
    ("bored", -0.5, 1.0),
    ("wrong", -0.5, 0.9),
    ("stupid", -0.8, 1.0),
    ("useless", -0.5, 0.2),
    ("failed", -0.5, 0.3),
    ("hate", -0.8, 0.9),
    ("hated", -0.9, 0.7),
];

/// (word, multiplier applied to the following scored word)
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("so", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("super", 1.4),
    ("truly", 1.2),
    ("totally", 1.3),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("too", 1.2),
    ("slightly", 0.6),
    ("somewhat", 0.7),
    ("little", 0.6),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "nobody", "neither", "nor", "cannot", "without",
    "hardly", "barely",
];

/// How far back a negation reaches
const NEGATION_WINDOW: usize = 3;

/// Polarity multiplier for negated words
const NEGATION_FACTOR: f64 = -0.5;

/// Polarity multiplier for a word followed by `!`
const EXCLAMATION_FACTOR: f64 = 1.25;

/// Function words and common verbs that never start or join a noun phrase
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "so", "because", "as", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "once", "here", "there", "when", "where", "why", "how", "all", "any",
    "both", "each", "few", "more", "most", "other", "some", "such", "only", "own", "same", "than",
    "too", "very", "just", "now", "also", "still", "even", "really", "quite", "pretty", "i", "me",
    "my", "myself", "we", "our", "ours", "you", "your", "he", "him", "his", "she", "her", "it",
    "its", "they", "them", "their", "what", "which", "who", "whom", "this", "that", "these",
    "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "having", "do", "does", "did", "doing", "will", "would", "should", "could", "can", "may",
    "might", "must", "shall", "get", "got", "getting", "go", "went", "going", "gone", "feel",
    "felt", "feeling", "feels", "make", "made", "think", "thought", "know", "knew", "want",
    "wanted", "need", "needed", "seem", "seemed", "keep", "kept", "spent", "today", "yesterday",
    "tomorrow", "tonight", "lot", "lots", "bit", "much", "many", "something", "anything",
    "everything", "someone", "anyone", "everyone", "like", "not", "no", "never", "nothing",
    "cannot", "without", "hardly", "barely", "extremely", "incredibly", "super", "truly",
    "totally", "slightly", "somewhat", "little", "im", "ive", "it's", "i'm", "i've", "didn't",
    "don't", "doesn't", "wasn't", "weren't", "isn't", "aren't", "can't", "couldn't", "won't",
    "wouldn't", "shouldn't",
];

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?|[.!?,;:]").expect("valid regex"))
}

#[derive(Debug, Clone)]
struct Token<'a> {
    text: &'a str,
    lower: String,
    /// First word of a sentence
    sentence_start: bool,
}

impl Token<'_> {
    fn is_punct(&self) -> bool {
        !self.text.starts_with(|c: char| c.is_ascii_alphabetic())
    }

    fn is_boundary(&self) -> bool {
        matches!(self.text, "." | "!" | "?" | ";" | ":")
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut sentence_start = true;
    for m in token_regex().find_iter(text) {
        let token = Token {
            text: m.as_str(),
            lower: m.as_str().to_lowercase(),
            sentence_start,
        };
        sentence_start = token.is_boundary();
        tokens.push(token);
    }
    tokens
}

struct Lexicon {
    words: HashMap<&'static str, (f64, f64)>,
    intensifiers: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
    stopwords: HashSet<&'static str>,
}

impl Lexicon {
    fn build() -> Self {
        Self {
            words: SENTIMENT_WORDS
                .iter()
                .map(|(w, p, s)| (*w, (*p, *s)))
                .collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(word) || word.ends_with("n't")
    }
}

/// Embedded sentiment and keyword analyzer
///
/// Pure computation with no I/O; cloning shares the lexicon tables.
#[derive(Clone)]
pub struct LexiconAnalyzer {
    lexicon: Arc<Lexicon>,
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: Arc::new(Lexicon::build()),
        }
    }

    /// Synchronous scoring, shared by the async trait method and the analysis service
    pub fn analyze_text(&self, text: &str) -> Result<AnalysisResult> {
        if text.trim().is_empty() {
            return Err(Error::InvalidData("cannot analyze empty text".to_string()));
        }

        let tokens = tokenize(text);
        let (sentiment_score, subjectivity) = self.sentiment(&tokens);
        let keywords = self.noun_phrases(&tokens);

        Ok(AnalysisResult {
            sentiment_score,
            subjectivity,
            keywords,
        })
    }

    /// Mean (polarity, subjectivity) over scored words, clamped to range
    fn sentiment(&self, tokens: &[Token<'_>]) -> (f64, f64) {
        let lex = &self.lexicon;
        let mut assessments: Vec<(f64, f64)> = Vec::new();
        // Index into `assessments` of the last score in the current sentence
        let mut last_in_sentence: Option<usize> = None;

        for (i, token) in tokens.iter().enumerate() {
            if token.text == "!" {
                if let Some(idx) = last_in_sentence {
                    assessments[idx].0 =
                        (assessments[idx].0 * EXCLAMATION_FACTOR).clamp(-1.0, 1.0);
                }
            }
            if token.is_boundary() {
                last_in_sentence = None;
                continue;
            }

            let Some(&(mut polarity, mut subjectivity)) = lex.words.get(token.lower.as_str())
            else {
                continue;
            };

            if i > 0 {
                if let Some(weight) = lex.intensifiers.get(tokens[i - 1].lower.as_str()) {
                    polarity *= weight;
                    subjectivity *= weight;
                }
            }

            let negated = tokens[i.saturating_sub(NEGATION_WINDOW)..i]
                .iter()
                .rev()
                .take_while(|t| !t.is_punct())
                .any(|t| lex.is_negation(&t.lower));
            if negated {
                polarity *= NEGATION_FACTOR;
            }

            assessments.push((polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0)));
            last_in_sentence = Some(assessments.len() - 1);
        }

        if assessments.is_empty() {
            return (0.0, 0.0);
        }

        let n = assessments.len() as f64;
        let polarity = assessments.iter().map(|(p, _)| p).sum::<f64>() / n;
        let subjectivity = assessments.iter().map(|(_, s)| s).sum::<f64>() / n;

        (polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0))
    }

    /// Lowercased, deduplicated noun-phrase chunks
    ///
    /// A chunk is a run of content words between stopwords or punctuation.
    /// Multi-word chunks are kept; single words only when capitalized
    /// mid-sentence (likely a proper noun).
    fn noun_phrases(&self, tokens: &[Token<'_>]) -> Vec<String> {
        let lex = &self.lexicon;
        let mut phrases = BTreeSet::new();
        let mut chunk: Vec<&Token<'_>> = Vec::new();

        let mut flush = |chunk: &mut Vec<&Token<'_>>| {
            let keep = match chunk.as_slice() {
                [] => false,
                [only] => {
                    !only.sentence_start
                        && only.text.starts_with(|c: char| c.is_ascii_uppercase())
                        && only.text.len() > 1
                }
                _ => true,
            };
            if keep {
                let phrase = chunk
                    .iter()
                    .map(|t| t.lower.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                phrases.insert(phrase);
            }
            chunk.clear();
        };

        for token in tokens {
            let is_content = !token.is_punct()
                && !lex.stopwords.contains(token.lower.as_str())
                && !lex.is_negation(&token.lower)
                && token.lower.len() > 1;

            if is_content {
                chunk.push(token);
            } else {
                flush(&mut chunk);
            }
        }
        flush(&mut chunk);

        phrases.into_iter().collect()
    }
}

#[async_trait]
impl Analyzer for LexiconAnalyzer {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        self.analyze_text(text)
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}
