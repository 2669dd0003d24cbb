use once_cell::sync::Lazy;
use regex::Regex;

/// A process number: nine consecutive digits.
pub(crate) static PROCESSO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{9}").unwrap());

/// Dispatch text marking a granted application.
const GRANT_MARKER: &str = "deferimento do pedido";
/// Field label present when an attorney represents the holder.
const ATTORNEY_MARKER: &str = "procurador:";

/// Split gazette text into candidate blocks.
///
/// Each block starts at a nine-digit run and extends to the next one, or to
/// the end of the text. Text before the first run is discarded.
pub fn split_blocks(text: &str) -> Vec<&str> {
    let starts: Vec<usize> = PROCESSO_RE.find_iter(text).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect()
}

/// Whether the block announces a grant ("Deferimento do pedido").
pub fn is_granted(block: &str) -> bool {
    block.to_lowercase().contains(GRANT_MARKER)
}

/// Lowercase, line breaks turned into spaces, one pass of double-space
/// collapsing, trimmed.
pub fn normalize(block: &str) -> String {
    block
        .to_lowercase()
        .replace(['\n', '\r'], " ")
        .replace("  ", " ")
        .trim()
        .to_string()
}

/// Whether the block names an attorney ("Procurador:").
pub fn has_attorney(block: &str) -> bool {
    normalize(block).contains(ATTORNEY_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_blocks_at_process_numbers() {
        let text = "Cabeçalho RPI 2790\n912345678 Deferimento do pedido\n923456789 Arquivamento\n";
        let blocks = split_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("912345678"));
        assert!(blocks[0].ends_with("pedido\n"));
        assert!(blocks[1].starts_with("923456789"));
    }

    #[test]
    fn test_split_blocks_without_numbers() {
        assert!(split_blocks("sem processos aqui").is_empty());
    }

    #[test]
    fn test_longer_digit_runs_split_every_nine() {
        // eighteen digits are two adjacent matches
        let blocks = split_blocks("912345678923456789 x");
        assert_eq!(blocks, vec!["912345678", "923456789 x"]);
    }

    #[test]
    fn test_is_granted_ignores_case() {
        assert!(is_granted("912345678\nDEFERIMENTO DO PEDIDO"));
        assert!(!is_granted("912345678\nIndeferimento"));
    }

    #[test]
    fn test_has_attorney_across_line_breaks() {
        assert!(has_attorney("912345678\nTitular: X\nProcurador: Fulano"));
        assert!(has_attorney("912345678\r\nPROCURADOR:\r\nFulano"));
        assert!(!has_attorney("912345678\nTitular: Procuradoria Geral"));
    }

    #[test]
    fn test_normalize_collapses_line_breaks() {
        assert_eq!(normalize("  A\r\nB  "), "a b");
    }
}
