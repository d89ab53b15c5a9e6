//! LaTeX-to-Unicode substitution for literal text

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Replacement for characters outside Latin-1
pub const LATIN1_PLACEHOLDER: u8 = b'?';

/// Command name (without backslash) to Unicode symbol
const SYMBOL_TABLE: &[(&str, &str)] = &[
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("epsilon", "ε"),
    ("varepsilon", "ε"),
    ("theta", "θ"),
    ("lambda", "λ"),
    ("mu", "μ"),
    ("pi", "π"),
    ("rho", "ρ"),
    ("sigma", "σ"),
    ("tau", "τ"),
    ("phi", "φ"),
    ("chi", "χ"),
    ("omega", "ω"),
    ("Gamma", "Γ"),
    ("Delta", "Δ"),
    ("Theta", "Θ"),
    ("Lambda", "Λ"),
    ("Pi", "Π"),
    ("Sigma", "Σ"),
    ("Phi", "Φ"),
    ("Omega", "Ω"),
    ("sum", "∑"),
    ("prod", "∏"),
    ("int", "∫"),
    ("partial", "∂"),
    ("infty", "∞"),
    ("sqrt", "√"),
    ("times", "×"),
    ("cdot", "·"),
    ("div", "÷"),
    ("pm", "±"),
    ("leq", "≤"),
    ("le", "≤"),
    ("geq", "≥"),
    ("ge", "≥"),
    ("neq", "≠"),
    ("ne", "≠"),
    ("approx", "≈"),
    ("equiv", "≡"),
    ("in", "∈"),
    ("notin", "∉"),
    ("subset", "⊂"),
    ("cup", "∪"),
    ("cap", "∩"),
    ("forall", "∀"),
    ("exists", "∃"),
    ("rightarrow", "→"),
    ("to", "→"),
    ("leftarrow", "←"),
    ("Rightarrow", "⇒"),
    ("Leftrightarrow", "⇔"),
    ("degree", "°"),
];

const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
const SUBSCRIPT_DIGITS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];

lazy_static! {
    static ref COMMAND_RE: Regex = Regex::new(r"\\([A-Za-z]+)").unwrap();
    static ref BRACED_SUPERSCRIPT_RE: Regex = Regex::new(r"\^\{([0-9]+)\}").unwrap();
    static ref SUPERSCRIPT_RE: Regex = Regex::new(r"\^([0-9])").unwrap();
    static ref BRACED_SUBSCRIPT_RE: Regex = Regex::new(r"_\{([0-9]+)\}").unwrap();
    static ref SYMBOLS: HashMap<&'static str, &'static str> =
        SYMBOL_TABLE.iter().copied().collect();
}

fn map_digits(digits: &str, table: &[char; 10]) -> String {
    digits
        .chars()
        .map(|c| c.to_digit(10).map(|d| table[d as usize]).unwrap_or(c))
        .collect()
}

/// Replace known LaTeX commands and digit scripts with Unicode symbols.
///
/// Unknown commands are left untouched. No replacement contains a backslash,
/// a caret or an underscore, so a second pass changes nothing.
pub fn substitute_symbols(text: &str) -> String {
    let replaced = COMMAND_RE.replace_all(text, |caps: &Captures| {
        let name = &caps[1];
        match SYMBOLS.get(name) {
            Some(symbol) => symbol.to_string(),
            None => caps[0].to_string(),
        }
    });
    let replaced = BRACED_SUPERSCRIPT_RE.replace_all(&replaced, |caps: &Captures| {
        map_digits(&caps[1], &SUPERSCRIPT_DIGITS)
    });
    let replaced = SUPERSCRIPT_RE.replace_all(&replaced, |caps: &Captures| {
        map_digits(&caps[1], &SUPERSCRIPT_DIGITS)
    });
    let replaced = BRACED_SUBSCRIPT_RE.replace_all(&replaced, |caps: &Captures| {
        map_digits(&caps[1], &SUBSCRIPT_DIGITS)
    });
    replaced.into_owned()
}

/// Transliterate to Latin-1 bytes for the PDF core fonts.
///
/// Typographic punctuation folds to ASCII; anything else outside Latin-1
/// (and the C1 control range) becomes [`LATIN1_PLACEHOLDER`].
pub fn to_latin1(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push(b'\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push(b'"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' | '\u{2022}' => out.push(b'-'),
            '\u{2026}' => out.extend_from_slice(b"..."),
            '\u{20AC}' => out.extend_from_slice(b"EUR"),
            '\u{2192}' => out.extend_from_slice(b"->"),
            '\u{2264}' => out.extend_from_slice(b"<="),
            '\u{2265}' => out.extend_from_slice(b">="),
            '\u{2260}' => out.extend_from_slice(b"!="),
            '\t' => out.extend_from_slice(b"    "),
            '\u{0080}'..='\u{009F}' => out.push(LATIN1_PLACEHOLDER),
            c if (c as u32) <= 0xFF => out.push(c as u32 as u8),
            _ => out.push(LATIN1_PLACEHOLDER),
        }
    }
    out
}
