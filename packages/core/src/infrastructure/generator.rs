//! 組み込みの課題文ジェネレーター
//!
//! よく使われる英単語をランダムに選びます。句読点ありでは大文字で始まる文に
//! まとめて時々カンマを入れ、数字ありでは一部の単語を小さな整数に置き換えます。

use std::sync::Mutex;

use async_trait::async_trait;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::domain::{GeneratorError, ParagraphGenerator, ParagraphRequest};

const WORDS: &[&str] = &[
    "the", "be", "of", "and", "a", "to", "in", "he", "have", "it", "that", "for", "they", "with",
    "as", "not", "on", "she", "at", "by", "this", "we", "you", "do", "but", "from", "or", "which",
    "one", "would", "all", "will", "there", "say", "who", "make", "when", "can", "more", "if",
    "no", "man", "out", "other", "so", "what", "time", "up", "go", "about", "than", "into",
    "could", "state", "only", "new", "year", "some", "take", "come", "these", "know", "see",
    "use", "get", "like", "then", "first", "any", "work", "now", "may", "such", "give", "over",
    "think", "most", "even", "find", "day", "also", "after", "way", "many", "must", "look",
    "before", "great", "back", "through", "long", "where", "much", "should", "well", "people",
    "down", "own", "just", "because", "good", "each", "those", "feel", "seem", "how", "high",
    "too", "place", "little", "world", "very", "still", "nation", "hand", "old", "life", "tell",
    "write", "become", "here", "show", "house", "both", "between", "need", "mean", "call",
    "develop", "under", "last", "right", "move", "thing", "general", "school", "never", "same",
    "another", "begin", "while", "number", "part", "turn", "real", "leave", "might", "want",
    "point", "form", "off", "child", "few", "small", "since", "against", "ask", "late", "home",
    "interest", "large", "person", "end", "open", "public", "follow", "during", "present",
    "without", "again", "hold", "govern", "around", "possible", "head", "consider", "word",
    "program", "problem", "however", "lead", "system", "set", "order", "eye", "plan", "run",
    "keep", "face", "fact", "group", "play", "stand", "increase", "early", "course", "change",
    "help", "line",
];

const MIN_SENTENCE_WORDS: usize = 6;
const MAX_SENTENCE_WORDS: usize = 14;
const COMMA_CHANCE: f64 = 0.08;
const NUMBER_CHANCE: f64 = 0.1;

/// 単語リストからランダムに生成する [`ParagraphGenerator`]
pub struct WordListGenerator {
    rng: Mutex<StdRng>,
}

impl Default for WordListGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl WordListGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// 乱数のシードを固定したジェネレーター（テスト・再現用）
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn compose<R: Rng>(rng: &mut R, request: &ParagraphRequest) -> Result<String, GeneratorError> {
        let count = request.word_count.words() as usize;
        let mut words = Vec::with_capacity(count);
        let mut sentence_left = rng.gen_range(MIN_SENTENCE_WORDS..=MAX_SENTENCE_WORDS);
        let mut sentence_start = true;

        for index in 0..count {
            let mut word = if request.include_numbers && rng.gen_bool(NUMBER_CHANCE) {
                rng.gen_range(0..1000).to_string()
            } else {
                WORDS.choose(rng).ok_or(GeneratorError::Empty)?.to_string()
            };

            if request.include_punctuation {
                if sentence_start {
                    word = capitalize(&word);
                    sentence_start = false;
                }
                sentence_left -= 1;
                let last = index + 1 == count;
                if sentence_left == 0 || last {
                    word.push('.');
                    sentence_start = true;
                    sentence_left = rng.gen_range(MIN_SENTENCE_WORDS..=MAX_SENTENCE_WORDS);
                } else if sentence_left > 1 && rng.gen_bool(COMMA_CHANCE) {
                    word.push(',');
                }
            }
            words.push(word);
        }

        if words.is_empty() {
            return Err(GeneratorError::Empty);
        }
        Ok(words.join(" "))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl ParagraphGenerator for WordListGenerator {
    async fn generate(&self, request: ParagraphRequest) -> Result<String, GeneratorError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| GeneratorError::Failed("random source poisoned".to_string()))?;
        Self::compose(&mut *rng, &request)
    }
}
