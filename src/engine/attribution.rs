// Readtrack Engine — Attribution
//
// Decides, from free-form chat text, which roster member an acknowledgement
// belongs to. Acknowledgements come from non-technical users ("XiaoMing
// read", "read", "I have read"), so the default rules favor recall:
// attribution can credit names that are not on the roster at all. The
// `roster_gated` flag flips that tradeoff, crediting roster members only.
//
// The function is pure — the caller passes the roster snapshot in and commits
// the resulting upsert itself.
//
// Ordered checks, first match wins:
//   1. text equals the keyword              → sender
//   2. "<roster name><keyword>" substring   → that name (roster order)
//   3. token before the keyword in the text → that token as a name
//   4. keyword anywhere                     → sender
// Step 3 deliberately runs before the sender fallback: a message that names
// its subject ("Bob read it") should credit Bob, not whoever typed it.

use crate::engine::roster::Roster;

/// Who, if anyone, this message credits with an acknowledgement.
pub fn attribute(
    text: &str,
    sender: &str,
    roster: &Roster,
    keyword: &str,
    roster_gated: bool,
) -> Option<String> {
    if keyword.is_empty() || text.is_empty() {
        return None;
    }

    let credit_sender = |ok: bool| -> Option<String> {
        if ok && (!roster_gated || roster.contains(sender)) {
            Some(sender.to_string())
        } else {
            None
        }
    };

    // 1. Bare keyword: the sender speaks for themselves.
    if text == keyword {
        return credit_sender(true);
    }

    let keyword_idx = text.find(keyword)?;

    // 2. "<name><keyword>" for each roster name, first roster match wins.
    for name in roster.names() {
        let pattern = format!("{}{}", name, keyword);
        if text.contains(&pattern) {
            return Some(name.to_string());
        }
    }

    // 3. Loose token scan: strip the keyword, split on whitespace, and take
    // the first token (longer than one char) that occurs strictly before the
    // keyword in the original text. Single chars are skipped as noise.
    let stripped = text.replace(keyword, " ");
    for token in stripped.split_whitespace() {
        if token.chars().count() <= 1 {
            continue;
        }
        if roster_gated && !roster.contains(token) {
            continue;
        }
        if let Some(idx) = text.find(token) {
            if idx < keyword_idx {
                return Some(token.to_string());
            }
        }
    }

    // 4. Keyword present but nobody named: credit the sender.
    credit_sender(true)
}
