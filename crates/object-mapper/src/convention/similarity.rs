//! Deterministic string-similarity primitives for convention discovery.
//!
//! Two independent signals feed the confidence score: Levenshtein edit
//! distance scaled to [0,1], and a Soundex phonetic code match worth a flat
//! 0.7. Both are pure functions of their inputs.

/// Phonetic-match score when two Soundex codes agree.
pub const PHONETIC_MATCH_SCORE: f64 = 0.7;

/// Levenshtein edit distance between two strings, by character.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    prev[b.len()]
}

/// Edit-distance similarity: `1 - levenshtein(a,b) / max(len(a), len(b))`.
///
/// Two empty strings are identical (1.0).
#[must_use]
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

fn soundex_digit(c: char) -> Option<char> {
    match c {
        'B' | 'F' | 'P' | 'V' => Some('1'),
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
        'D' | 'T' => Some('3'),
        'L' => Some('4'),
        'M' | 'N' => Some('5'),
        'R' => Some('6'),
        _ => None,
    }
}

/// Classic four-character Soundex code.
///
/// Non-alphabetic characters are stripped first; an input with no letters
/// yields an empty code. Adjacent letters sharing a digit collapse, `h` and
/// `w` do not separate a run, and vowels do.
#[must_use]
pub fn soundex(name: &str) -> String {
    let mut letters = name
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase());

    let Some(first) = letters.next() else {
        return String::new();
    };

    let mut code = String::with_capacity(4);
    code.push(first);
    let mut last_digit = soundex_digit(first);

    for c in letters {
        match soundex_digit(c) {
            Some(digit) => {
                if last_digit != Some(digit) {
                    code.push(digit);
                    if code.len() == 4 {
                        break;
                    }
                }
                last_digit = Some(digit);
            }
            None => {
                // Vowels break a run of equal digits; H and W do not.
                if c != 'H' && c != 'W' {
                    last_digit = None;
                }
            }
        }
    }

    while code.len() < 4 {
        code.push('0');
    }
    code
}

/// Phonetic similarity: [`PHONETIC_MATCH_SCORE`] when the Soundex codes of
/// both names match, 0.0 otherwise.
#[must_use]
pub fn phonetic_similarity(a: &str, b: &str) -> f64 {
    let code_a = soundex(a);
    if code_a.is_empty() {
        return 0.0;
    }
    if code_a == soundex(b) {
        PHONETIC_MATCH_SCORE
    } else {
        0.0
    }
}
