//! Pattern-directed string generation
//!
//! Parses a regular expression into `regex-syntax`'s HIR and walks it with a
//! random source, producing a string the pattern accepts. Generated strings
//! are re-checked against the compiled pattern; generation retries a bounded
//! number of times when look-arounds such as `\b` reject a candidate.

use crate::error::{Error, Result};
use rand::Rng;
use regex::Regex;
use regex_syntax::hir::{
    Class, ClassBytes, ClassBytesRange, ClassUnicode, ClassUnicodeRange, Hir, HirKind,
};

const MAX_ATTEMPTS: usize = 32;

/// A compiled pattern ready to produce matching strings
#[derive(Debug, Clone)]
pub struct PatternGenerator {
    hir: Hir,
    matcher: Regex,
    max_repeat: u32,
}

impl PatternGenerator {
    /// Compile `pattern`; unbounded repetitions produce at most `max_repeat`
    /// extra items beyond their minimum
    pub fn new(pattern: &str, max_repeat: u32) -> Result<Self> {
        let hir = regex_syntax::Parser::new()
            .parse(pattern)
            .map_err(|e| Error::Pattern(format!("{}: {}", pattern, e)))?;
        let matcher = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| Error::Pattern(format!("{}: {}", pattern, e)))?;
        Ok(Self {
            hir,
            matcher,
            max_repeat,
        })
    }

    /// Whether `s` matches the whole pattern
    pub fn is_match(&self, s: &str) -> bool {
        self.matcher.is_match(s)
    }

    /// Produce one string accepted by the pattern
    pub fn generate(&self, rng: &mut impl Rng) -> Result<String> {
        for _ in 0..MAX_ATTEMPTS {
            let mut out = Vec::new();
            self.emit(&self.hir, rng, &mut out)?;
            if let Ok(s) = String::from_utf8(out) {
                if self.is_match(&s) {
                    return Ok(s);
                }
            }
        }
        Err(Error::Pattern(format!(
            "{}: no matching string after {} attempts",
            self.matcher.as_str(),
            MAX_ATTEMPTS
        )))
    }

    fn emit(&self, hir: &Hir, rng: &mut impl Rng, out: &mut Vec<u8>) -> Result<()> {
        match hir.kind() {
            HirKind::Empty | HirKind::Look(_) => {}
            HirKind::Literal(lit) => out.extend_from_slice(&lit.0),
            HirKind::Class(Class::Unicode(class)) => {
                let c = pick_char(class, rng)
                    .ok_or_else(|| Error::Pattern("empty character class".into()))?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            HirKind::Class(Class::Bytes(class)) => {
                let b = pick_byte(class, rng)
                    .ok_or_else(|| Error::Pattern("empty byte class".into()))?;
                out.push(b);
            }
            HirKind::Repetition(rep) => {
                let upper = match rep.max {
                    Some(max) => max.min(rep.min.saturating_add(self.max_repeat)),
                    None => rep.min.saturating_add(self.max_repeat),
                };
                let count = rng.gen_range(rep.min..=upper.max(rep.min));
                for _ in 0..count {
                    self.emit(&rep.sub, rng, out)?;
                }
            }
            HirKind::Capture(cap) => self.emit(&cap.sub, rng, out)?,
            HirKind::Concat(parts) => {
                for part in parts {
                    self.emit(part, rng, out)?;
                }
            }
            HirKind::Alternation(branches) => {
                if !branches.is_empty() {
                    let branch = &branches[rng.gen_range(0..branches.len())];
                    self.emit(branch, rng, out)?;
                }
            }
        }
        Ok(())
    }
}

/// Pick a class member, printable ASCII when the class has any
fn pick_char(class: &ClassUnicode, rng: &mut impl Rng) -> Option<char> {
    let mut printable = class.clone();
    printable.intersect(&ClassUnicode::new([ClassUnicodeRange::new(' ', '~')]));
    let class = if printable.ranges().is_empty() {
        class
    } else {
        &printable
    };

    let total: u32 = class
        .ranges()
        .iter()
        .map(|r| r.end() as u32 - r.start() as u32 + 1)
        .sum();
    if total == 0 {
        return None;
    }

    let mut idx = rng.gen_range(0..total);
    for r in class.ranges() {
        let width = r.end() as u32 - r.start() as u32 + 1;
        if idx < width {
            return char::from_u32(r.start() as u32 + idx).or(Some(r.start()));
        }
        idx -= width;
    }
    None
}

fn pick_byte(class: &ClassBytes, rng: &mut impl Rng) -> Option<u8> {
    let mut printable = class.clone();
    printable.intersect(&ClassBytes::new([ClassBytesRange::new(b' ', b'~')]));
    let class = if printable.ranges().is_empty() {
        class
    } else {
        &printable
    };

    let total: u32 = class
        .ranges()
        .iter()
        .map(|r| r.end() as u32 - r.start() as u32 + 1)
        .sum();
    if total == 0 {
        return None;
    }

    let mut idx = rng.gen_range(0..total);
    for r in class.ranges() {
        let width = r.end() as u32 - r.start() as u32 + 1;
        if idx < width {
            return Some(r.start() + idx as u8);
        }
        idx -= width;
    }
    None
}
