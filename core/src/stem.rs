//! Porter stemmer: reduces English words to their stems through five
//! ordered suffix-rewrite stages sharing a small set of measure primitives.

/// Stems a lowercase word. Words of two characters or fewer are returned
/// unchanged. Total over its input; never fails.
pub fn stem(word: &str) -> String {
    if word.len() <= 2 {
        return word.to_string();
    }
    let mut p = Porter {
        b: word.as_bytes().to_vec(),
        k: word.len(),
        j: 0,
    };
    p.step1ab();
    p.step1c();
    p.step2();
    p.step3();
    p.step4();
    p.step5();
    String::from_utf8_lossy(&p.b[..p.k]).into_owned()
}

/// Working buffer for one word. `k` is the current word length; `j` marks
/// the stem boundary set by the most recent successful suffix match, as a
/// length. Rewrite rules replace everything at and beyond `j`.
struct Porter {
    b: Vec<u8>,
    k: usize,
    j: usize,
}

impl Porter {
    /// True when b[i] is a consonant. `y` counts as a consonant at the word
    /// start or after a vowel; otherwise it plays the vowel.
    fn is_consonant(&self, i: usize) -> bool {
        match self.b[i] {
            b'a' | b'e' | b'i' | b'o' | b'u' => false,
            b'y' => i == 0 || !self.is_consonant(i - 1),
            _ => true,
        }
    }

    /// The measure m(): number of vowel-run/consonant-run alternations in
    /// b[0..j]. "tr" -> 0, "oat" -> 1, "private" -> 2.
    fn measure(&self) -> usize {
        let mut n = 0;
        let mut i = 0;
        loop {
            if i >= self.j {
                return n;
            }
            if !self.is_consonant(i) {
                break;
            }
            i += 1;
        }
        i += 1;
        loop {
            loop {
                if i >= self.j {
                    return n;
                }
                if self.is_consonant(i) {
                    break;
                }
                i += 1;
            }
            i += 1;
            n += 1;
            loop {
                if i >= self.j {
                    return n;
                }
                if !self.is_consonant(i) {
                    break;
                }
                i += 1;
            }
            i += 1;
        }
    }

    fn vowel_in_stem(&self) -> bool {
        (0..self.j).any(|i| !self.is_consonant(i))
    }

    /// True when b[i-1..=i] is a doubled consonant.
    fn double_consonant(&self, i: usize) -> bool {
        i >= 1 && self.b[i] == self.b[i - 1] && self.is_consonant(i)
    }

    /// True when b[i-2..=i] is consonant-vowel-consonant and the final
    /// consonant is not w, x or y. Guards restoring a trailing e, as in
    /// cav(e), lov(e), hop(e) but not snow, box, tray.
    fn cvc(&self, i: usize) -> bool {
        if i < 2 || !self.is_consonant(i) || self.is_consonant(i - 1) || !self.is_consonant(i - 2) {
            return false;
        }
        !matches!(self.b[i], b'w' | b'x' | b'y')
    }

    /// True when b[0..k] ends with `s`; on a match, sets j to the stem length.
    fn ends(&mut self, s: &[u8]) -> bool {
        let len = s.len();
        if len > self.k {
            return false;
        }
        if s[len - 1] != self.b[self.k - 1] {
            return false;
        }
        if &self.b[self.k - len..self.k] != s {
            return false;
        }
        self.j = self.k - len;
        true
    }

    /// Replaces the suffix beyond j with `s`.
    fn set_to(&mut self, s: &[u8]) {
        self.b.truncate(self.j);
        self.b.extend_from_slice(s);
        self.k = self.j + s.len();
    }

    /// set_to gated by m() > 0 over the stem.
    fn replace(&mut self, s: &[u8]) {
        if self.measure() > 0 {
            self.set_to(s);
        }
    }

    /// Plurals and -ed/-ing. caresses -> caress, ponies -> poni, ties -> ti,
    /// feed -> feed, agreed -> agree, matting -> mat, mating -> mate.
    fn step1ab(&mut self) {
        if self.b[self.k - 1] == b's' {
            if self.ends(b"sses") {
                self.k -= 2;
            } else if self.ends(b"ies") {
                self.set_to(b"i");
            } else if self.b[self.k - 2] != b's' {
                self.k -= 1;
            }
        }
        if self.ends(b"eed") {
            if self.measure() > 0 {
                self.k -= 1;
            }
        } else if (self.ends(b"ed") || self.ends(b"ing")) && self.vowel_in_stem() {
            self.k = self.j;
            if self.ends(b"at") {
                self.set_to(b"ate");
            } else if self.ends(b"bl") {
                self.set_to(b"ble");
            } else if self.ends(b"iz") {
                self.set_to(b"ize");
            } else if self.double_consonant(self.k - 1) {
                self.k -= 1;
                if matches!(self.b[self.k - 1], b'l' | b's' | b'z') {
                    self.k += 1;
                }
            } else if self.measure() == 1 && self.cvc(self.k - 1) {
                self.set_to(b"e");
            }
        }
    }

    /// Terminal y -> i when the stem holds a vowel. happy -> happi, sky -> sky.
    fn step1c(&mut self) {
        if self.ends(b"y") && self.vowel_in_stem() {
            self.b[self.k - 1] = b'i';
        }
    }

    /// Double suffixes to single ones, keyed on the penultimate letter.
    /// The -bli and -logi rows follow the maintained revision of the
    /// algorithm rather than the originally published table.
    fn step2(&mut self) {
        if self.k < 2 {
            return;
        }
        match self.b[self.k - 2] {
            b'a' => {
                if self.ends(b"ational") {
                    self.replace(b"ate");
                } else if self.ends(b"tional") {
                    self.replace(b"tion");
                }
            }
            b'c' => {
                if self.ends(b"enci") {
                    self.replace(b"ence");
                } else if self.ends(b"anci") {
                    self.replace(b"ance");
                }
            }
            b'e' => {
                if self.ends(b"izer") {
                    self.replace(b"ize");
                }
            }
            b'l' => {
                if self.ends(b"bli") {
                    self.replace(b"ble");
                } else if self.ends(b"alli") {
                    self.replace(b"al");
                } else if self.ends(b"entli") {
                    self.replace(b"ent");
                } else if self.ends(b"eli") {
                    self.replace(b"e");
                } else if self.ends(b"ousli") {
                    self.replace(b"ous");
                }
            }
            b'o' => {
                if self.ends(b"ization") {
                    self.replace(b"ize");
                } else if self.ends(b"ation") {
                    self.replace(b"ate");
                } else if self.ends(b"ator") {
                    self.replace(b"ate");
                }
            }
            b's' => {
                if self.ends(b"alism") {
                    self.replace(b"al");
                } else if self.ends(b"iveness") {
                    self.replace(b"ive");
                } else if self.ends(b"fulness") {
                    self.replace(b"ful");
                } else if self.ends(b"ousness") {
                    self.replace(b"ous");
                }
            }
            b't' => {
                if self.ends(b"aliti") {
                    self.replace(b"al");
                } else if self.ends(b"iviti") {
                    self.replace(b"ive");
                } else if self.ends(b"biliti") {
                    self.replace(b"ble");
                }
            }
            b'g' => {
                if self.ends(b"logi") {
                    self.replace(b"log");
                }
            }
            _ => {}
        }
    }

    /// -ic-, -full, -ness and friends, keyed on the final letter.
    fn step3(&mut self) {
        match self.b[self.k - 1] {
            b'e' => {
                if self.ends(b"icate") {
                    self.replace(b"ic");
                } else if self.ends(b"ative") {
                    self.replace(b"");
                } else if self.ends(b"alize") {
                    self.replace(b"al");
                }
            }
            b'i' => {
                if self.ends(b"iciti") {
                    self.replace(b"ic");
                }
            }
            b'l' => {
                if self.ends(b"ical") {
                    self.replace(b"ic");
                } else if self.ends(b"ful") {
                    self.replace(b"");
                }
            }
            b's' => {
                if self.ends(b"ness") {
                    self.replace(b"");
                }
            }
            _ => {}
        }
    }

    /// Strips -ant, -ence and the rest of the derivational endings when the
    /// remaining stem measures more than 1. -ion only drops after s or t.
    fn step4(&mut self) {
        if self.k < 2 {
            return;
        }
        let matched = match self.b[self.k - 2] {
            b'a' => self.ends(b"al"),
            b'c' => self.ends(b"ance") || self.ends(b"ence"),
            b'e' => self.ends(b"er"),
            b'i' => self.ends(b"ic"),
            b'l' => self.ends(b"able") || self.ends(b"ible"),
            b'n' => {
                self.ends(b"ant")
                    || self.ends(b"ement")
                    || self.ends(b"ment")
                    || self.ends(b"ent")
            }
            b'o' => {
                (self.ends(b"ion") && self.j >= 1 && matches!(self.b[self.j - 1], b's' | b't'))
                    || self.ends(b"ou")
            }
            b's' => self.ends(b"ism"),
            b't' => self.ends(b"ate") || self.ends(b"iti"),
            b'u' => self.ends(b"ous"),
            b'v' => self.ends(b"ive"),
            b'z' => self.ends(b"ize"),
            _ => false,
        };
        if matched && self.measure() > 1 {
            self.k = self.j;
        }
    }

    /// Final cleanup: drop a trailing e unless the stem is short or ends in
    /// a protected CVC window, and undouble a trailing ll on long stems.
    fn step5(&mut self) {
        self.j = self.k;
        if self.b[self.k - 1] == b'e' {
            let a = self.measure();
            if a > 1 || (a == 1 && !self.cvc(self.k - 2)) {
                self.k -= 1;
            }
        }
        if self.b[self.k - 1] == b'l' && self.double_consonant(self.k - 1) && self.measure() > 1 {
            self.k -= 1;
        }
    }
}
