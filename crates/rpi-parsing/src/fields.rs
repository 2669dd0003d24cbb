//! Field extraction inside one record block.
//!
//! Every extractor returns `None` when its label is missing, so absent fields
//! stay distinguishable from fields that were printed empty.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::blocks::PROCESSO_RE;

static TITULAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)titular:\s*([^\n\r]+)").unwrap());

static NCL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)ncl\(12\):\s*([^\n\r]+)").unwrap());

static ESPECIFICACAO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)especificação:\s*(.+?)(?:\n|$)").unwrap());

/// First nine-digit run of the block.
pub fn processo(block: &str) -> Option<String> {
    PROCESSO_RE.find(block).map(|m| m.as_str().to_string())
}

/// Rest of the line after `Titular:`.
pub fn titular(block: &str) -> Option<String> {
    rest_of_line(&TITULAR_RE, block)
}

/// Rest of the line after `NCL(12):`.
pub fn ncl(block: &str) -> Option<String> {
    rest_of_line(&NCL_RE, block)
}

/// Rest of the line after `Especificação:`, cut before any process number
/// that leaked in from the next record.
pub fn especificacao(block: &str) -> Option<String> {
    let caps = ESPECIFICACAO_RE.captures(block)?;
    let text = caps[1].trim();
    let text = match PROCESSO_RE.find(text) {
        Some(m) => text[..m.start()].trim(),
        None => text,
    };
    Some(text.to_string())
}

fn rest_of_line(re: &Regex, block: &str) -> Option<String> {
    re.captures(block).map(|caps| caps[1].trim().to_string())
}
