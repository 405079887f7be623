//! Porter stemmer
//!
//! Porter, M.F. "An algorithm for suffix stripping." Program 14.3 (1980): 130-137,
//! following the reference C implementation published alongside the paper
//! (which adds the `bli -> ble` and `logi -> log` rules to step 2). This is the
//! same variant shipped by OpenNLP and NLTK's "ORIGINAL_ALGORITHM" mode, so
//! vocabularies built here match theirs term for term.
//!
//! Only lowercase ASCII words are stemmed. Words of two bytes or fewer and
//! words containing non-ASCII characters are returned unchanged.

/// Stem a word using the Porter algorithm.
///
/// # Examples
///
/// ```
/// use okapi_engine::search::stemmer::stem;
///
/// assert_eq!(stem("running"), "run");
/// assert_eq!(stem("feline"), "felin");
/// assert_eq!(stem("play"), "plai");
/// ```
pub fn stem(word: &str) -> String {
    if word.len() <= 2 || !word.is_ascii() {
        return word.to_string();
    }

    let mut w = Word::new(word);
    w.step1a();
    w.step1b();
    w.step1c();
    w.step2();
    w.step3();
    w.step4();
    w.step5();
    w.into_string()
}

// ==========================================================================
// Step 2 / 3 / 4 suffix tables
// ==========================================================================

// Longest suffix first where two share an ending; the first match decides.
const STEP2_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("logi", "log"),
];

const STEP3_RULES: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4_SUFFIXES: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

// ==========================================================================
// Word buffer
// ==========================================================================

/// Mutable ASCII buffer the steps operate on.
///
/// Every predicate takes `end`, the length of the prefix it inspects, so a
/// rule can test the stem left after removing a suffix without copying.
struct Word {
    b: Vec<u8>,
}

impl Word {
    fn new(word: &str) -> Self {
        Word {
            b: word.as_bytes().to_vec(),
        }
    }

    fn into_string(self) -> String {
        // Only ASCII bytes are ever written into the buffer.
        self.b.into_iter().map(char::from).collect()
    }

    fn len(&self) -> usize {
        self.b.len()
    }

    fn is_consonant(&self, i: usize) -> bool {
        match self.b[i] {
            b'a' | b'e' | b'i' | b'o' | b'u' => false,
            b'y' => i == 0 || !self.is_consonant(i - 1),
            _ => true,
        }
    }

    /// Number of VC sequences in `b[..end]`, the word being `[C](VC)^m[V]`.
    fn measure(&self, end: usize) -> usize {
        let mut i = 0;
        let mut m = 0;
        while i < end && self.is_consonant(i) {
            i += 1;
        }
        loop {
            while i < end && !self.is_consonant(i) {
                i += 1;
            }
            if i >= end {
                return m;
            }
            while i < end && self.is_consonant(i) {
                i += 1;
            }
            m += 1;
        }
    }

    fn has_vowel(&self, end: usize) -> bool {
        (0..end).any(|i| !self.is_consonant(i))
    }

    fn ends_double_consonant(&self, end: usize) -> bool {
        end >= 2 && self.b[end - 1] == self.b[end - 2] && self.is_consonant(end - 1)
    }

    /// consonant-vowel-consonant, the final consonant not w, x or y
    fn ends_cvc(&self, end: usize) -> bool {
        end >= 3
            && self.is_consonant(end - 3)
            && !self.is_consonant(end - 2)
            && self.is_consonant(end - 1)
            && !matches!(self.b[end - 1], b'w' | b'x' | b'y')
    }

    fn ends(&self, suffix: &str) -> bool {
        self.b.ends_with(suffix.as_bytes())
    }

    fn last(&self) -> u8 {
        self.b[self.len() - 1]
    }

    fn replace_suffix(&mut self, suffix_len: usize, replacement: &str) {
        let keep = self.len() - suffix_len;
        self.b.truncate(keep);
        self.b.extend_from_slice(replacement.as_bytes());
    }

    /// Apply the first table rule whose suffix matches, if the remaining
    /// stem has measure above `min_measure`.
    fn apply_rules(&mut self, rules: &[(&str, &str)], min_measure: usize) {
        if let Some(&(suffix, replacement)) = rules.iter().find(|(s, _)| self.ends(s)) {
            if self.measure(self.len() - suffix.len()) > min_measure {
                self.replace_suffix(suffix.len(), replacement);
            }
        }
    }

    // ----------------------------------------------------------------------
    // Steps
    // ----------------------------------------------------------------------

    /// Plurals: sses → ss, ies → i, ss → ss, s → ""
    fn step1a(&mut self) {
        if self.ends("sses") || self.ends("ies") {
            self.b.truncate(self.len() - 2);
        } else if !self.ends("ss") && self.ends("s") {
            self.b.pop();
        }
    }

    /// Past tense and gerunds, with the cleanup that restores a trailing e
    /// or undoubles a consonant.
    fn step1b(&mut self) {
        if self.ends("eed") {
            if self.measure(self.len() - 3) > 0 {
                self.b.pop();
            }
            return;
        }

        let suffix_len = if self.ends("ed") {
            2
        } else if self.ends("ing") {
            3
        } else {
            return;
        };
        let stem_len = self.len() - suffix_len;
        if !self.has_vowel(stem_len) {
            return;
        }
        self.b.truncate(stem_len);

        let end = self.len();
        if self.ends("at") || self.ends("bl") || self.ends("iz") {
            self.b.push(b'e');
        } else if self.ends_double_consonant(end) && !matches!(self.last(), b'l' | b's' | b'z') {
            self.b.pop();
        } else if self.measure(end) == 1 && self.ends_cvc(end) {
            self.b.push(b'e');
        }
    }

    /// Terminal y → i when the stem contains a vowel
    fn step1c(&mut self) {
        let end = self.len() - 1;
        if self.ends("y") && self.has_vowel(end) {
            self.b[end] = b'i';
        }
    }

    fn step2(&mut self) {
        self.apply_rules(STEP2_RULES, 0);
    }

    fn step3(&mut self) {
        self.apply_rules(STEP3_RULES, 0);
    }

    /// Strip residual suffixes where m > 1; -ion also needs a preceding s or t.
    fn step4(&mut self) {
        let Some(suffix) = STEP4_SUFFIXES.iter().find(|s| self.ends(s)) else {
            return;
        };
        let stem_len = self.len() - suffix.len();
        if self.measure(stem_len) <= 1 {
            return;
        }
        if *suffix == "ion" && !(stem_len > 0 && matches!(self.b[stem_len - 1], b's' | b't')) {
            return;
        }
        self.b.truncate(stem_len);
    }

    /// Remove a final -e (m > 1, or m == 1 without cvc) and reduce -ll to -l
    /// when m > 1.
    fn step5(&mut self) {
        if self.ends("e") {
            let stem_len = self.len() - 1;
            let m = self.measure(stem_len);
            if m > 1 || (m == 1 && !self.ends_cvc(stem_len)) {
                self.b.pop();
            }
        }
        if self.ends("ll") && self.measure(self.len()) > 1 {
            self.b.pop();
        }
    }
}

// ==========================================================================
// Tests
// ==========================================================================
