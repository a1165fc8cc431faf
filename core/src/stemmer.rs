//! Porter stemmer.
//!
//! A direct port of Martin Porter's reference implementation, including the two
//! departures the reference code makes from the 1980 paper (`-bli` -> `-ble` and
//! `-logi` -> `-log` in step 2) and the rule that words of one or two letters
//! are left alone. Output matches the canonical vocabulary at
//! <https://tartarus.org/martin/PorterStemmer/>.
//!
//! The algorithm is defined on lowercase ASCII. Words containing anything else
//! are returned unchanged; digits behave as consonants.

use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer as SnowballStemmer};
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref SNOWBALL: SnowballStemmer = SnowballStemmer::create(Algorithm::English);
}

/// Which stemming algorithm the tokenizer applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemAlgorithm {
    /// Original Porter (1980), reference behaviour.
    #[default]
    Porter,
    /// English Snowball (Porter2).
    Snowball,
}

impl StemAlgorithm {
    pub fn stem(&self, word: &str) -> String {
        match self {
            StemAlgorithm::Porter => stem(word),
            StemAlgorithm::Snowball => SNOWBALL.stem(word).into_owned(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StemAlgorithm::Porter => "porter",
            StemAlgorithm::Snowball => "snowball",
        }
    }
}

impl std::str::FromStr for StemAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "porter" => Ok(StemAlgorithm::Porter),
            "snowball" | "porter2" => Ok(StemAlgorithm::Snowball),
            other => Err(format!("unknown stemmer `{other}` (expected porter or snowball)")),
        }
    }
}

/// Stem a single lowercase word with the Porter algorithm.
///
/// ```
/// use shelfscan_core::stemmer::stem;
///
/// assert_eq!(stem("caresses"), "caress");
/// assert_eq!(stem("generalization"), "gener");
/// assert_eq!(stem("this"), "thi");
/// ```
pub fn stem(word: &str) -> String {
    if word.len() <= 2 || !word.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()) {
        return word.to_string();
    }
    let mut s = Porter::new(word);
    s.step1ab();
    if s.k > 0 {
        s.step1c();
        s.step2();
        s.step3();
        s.step4();
        s.step5();
    }
    s.finish()
}

/// Working buffer. `k` is the index of the last byte of the current word and
/// `stem_len` is the length of the stem left after the last suffix matched
/// by `ends`.
struct Porter {
    b: Vec<u8>,
    k: usize,
    stem_len: usize,
}

impl Porter {
    fn new(word: &str) -> Self {
        let b = word.as_bytes().to_vec();
        let k = b.len() - 1;
        Self { b, k, stem_len: 0 }
    }

    fn finish(mut self) -> String {
        self.b.truncate(self.k + 1);
        // Only ASCII bytes ever enter the buffer.
        String::from_utf8(self.b).unwrap_or_default()
    }

    fn cons(&self, i: usize) -> bool {
        match self.b[i] {
            b'a' | b'e' | b'i' | b'o' | b'u' => false,
            b'y' => i == 0 || !self.cons(i - 1),
            _ => true,
        }
    }

    /// Number of VC sequences in the stem.
    fn m(&self) -> usize {
        let mut n = 0;
        let mut i = 0;
        loop {
            if i >= self.stem_len {
                return n;
            }
            if !self.cons(i) {
                break;
            }
            i += 1;
        }
        i += 1;
        loop {
            loop {
                if i >= self.stem_len {
                    return n;
                }
                if self.cons(i) {
                    break;
                }
                i += 1;
            }
            i += 1;
            n += 1;
            loop {
                if i >= self.stem_len {
                    return n;
                }
                if !self.cons(i) {
                    break;
                }
                i += 1;
            }
            i += 1;
        }
    }

    fn vowel_in_stem(&self) -> bool {
        (0..self.stem_len).any(|i| !self.cons(i))
    }

    fn double_c(&self, j: usize) -> bool {
        j >= 1 && self.b[j] == self.b[j - 1] && self.cons(j)
    }

    /// consonant-vowel-consonant ending at `i`, final consonant not w, x or y.
    fn cvc(&self, i: usize) -> bool {
        if i < 2 || !self.cons(i) || self.cons(i - 1) || !self.cons(i - 2) {
            return false;
        }
        !matches!(self.b[i], b'w' | b'x' | b'y')
    }

    fn ends(&mut self, s: &str) -> bool {
        let s = s.as_bytes();
        let len = s.len();
        if len > self.k + 1 {
            return false;
        }
        if &self.b[self.k + 1 - len..=self.k] != s {
            return false;
        }
        self.stem_len = self.k + 1 - len;
        true
    }

    fn set_to(&mut self, s: &str) {
        // Callers guarantee a non-empty result.
        self.b.truncate(self.stem_len);
        self.b.extend_from_slice(s.as_bytes());
        self.k = self.b.len() - 1;
    }

    fn r(&mut self, s: &str) {
        if self.m() > 0 {
            self.set_to(s);
        }
    }

    fn step1ab(&mut self) {
        if self.b[self.k] == b's' {
            if self.ends("sses") {
                self.k -= 2;
            } else if self.ends("ies") {
                self.set_to("i");
            } else if self.b[self.k - 1] != b's' {
                self.k -= 1;
            }
        }
        if self.ends("eed") {
            if self.m() > 0 {
                self.k -= 1;
            }
        } else if (self.ends("ed") || self.ends("ing")) && self.vowel_in_stem() {
            self.k = self.stem_len - 1;
            if self.ends("at") {
                self.set_to("ate");
            } else if self.ends("bl") {
                self.set_to("ble");
            } else if self.ends("iz") {
                self.set_to("ize");
            } else if self.double_c(self.k) {
                self.k -= 1;
                if matches!(self.b[self.k], b'l' | b's' | b'z') {
                    self.k += 1;
                }
            } else if self.m() == 1 && self.cvc(self.k) {
                self.set_to("e");
            }
        }
        self.b.truncate(self.k + 1);
    }

    fn step1c(&mut self) {
        if self.ends("y") && self.vowel_in_stem() {
            self.b[self.k] = b'i';
        }
    }

    fn step2(&mut self) {
        const RULES: &[(u8, &[(&str, &str)])] = &[
            (b'a', &[("ational", "ate"), ("tional", "tion")]),
            (b'c', &[("enci", "ence"), ("anci", "ance")]),
            (b'e', &[("izer", "ize")]),
            (
                b'l',
                &[("bli", "ble"), ("alli", "al"), ("entli", "ent"), ("eli", "e"), ("ousli", "ous")],
            ),
            (b'o', &[("ization", "ize"), ("ation", "ate"), ("ator", "ate")]),
            (
                b's',
                &[("alism", "al"), ("iveness", "ive"), ("fulness", "ful"), ("ousness", "ous")],
            ),
            (b't', &[("aliti", "al"), ("iviti", "ive"), ("biliti", "ble")]),
            (b'g', &[("logi", "log")]),
        ];
        let key = self.b[self.k - 1];
        self.replace_first(RULES, key);
    }

    fn step3(&mut self) {
        const RULES: &[(u8, &[(&str, &str)])] = &[
            (b'e', &[("icate", "ic"), ("ative", ""), ("alize", "al")]),
            (b'i', &[("iciti", "ic")]),
            (b'l', &[("ical", "ic"), ("ful", "")]),
            (b's', &[("ness", "")]),
        ];
        let key = self.b[self.k];
        self.replace_first(RULES, key);
    }

    /// Applies the first suffix in the bucket for `key` that the word ends with.
    fn replace_first(&mut self, rules: &[(u8, &[(&str, &str)])], key: u8) {
        let Some((_, bucket)) = rules.iter().find(|(c, _)| *c == key) else {
            return;
        };
        for (suffix, replacement) in bucket.iter() {
            if self.ends(suffix) {
                self.r(replacement);
                return;
            }
        }
    }

    fn step4(&mut self) {
        let matched = match self.b[self.k - 1] {
            b'a' => self.ends("al"),
            b'c' => self.ends("ance") || self.ends("ence"),
            b'e' => self.ends("er"),
            b'i' => self.ends("ic"),
            b'l' => self.ends("able") || self.ends("ible"),
            b'n' => self.ends("ant") || self.ends("ement") || self.ends("ment") || self.ends("ent"),
            b'o' => {
                (self.ends("ion")
                    && self.stem_len > 0
                    && matches!(self.b[self.stem_len - 1], b's' | b't'))
                    || self.ends("ou")
            }
            b's' => self.ends("ism"),
            b't' => self.ends("ate") || self.ends("iti"),
            b'u' => self.ends("ous"),
            b'v' => self.ends("ive"),
            b'z' => self.ends("ize"),
            _ => false,
        };
        if matched && self.m() > 1 {
            self.k = self.stem_len - 1;
        }
    }

    fn step5(&mut self) {
        self.stem_len = self.k + 1;
        if self.b[self.k] == b'e' {
            let a = self.m();
            if a > 1 || (a == 1 && !self.cvc(self.k - 1)) {
                self.k -= 1;
            }
        }
        if self.b[self.k] == b'l' && self.double_c(self.k) && self.m() > 1 {
            self.k -= 1;
        }
    }
}
