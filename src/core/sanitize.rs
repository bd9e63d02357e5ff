// src/core/sanitize.rs

use crate::config::leagues::League;

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Merge key for a player without a profile id: "J. Doe" → "j._doe".
pub fn name_key(name: &str) -> String {
    normalize_ws(name).to_lowercase().replace(' ', "_")
}

/// Explicit accent table. Anything not listed is later dropped by `slugify`.
fn fold_accent(ch: char) -> Option<&'static str> {
    Some(match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => "a",
        'é' | 'è' | 'ê' | 'ë' => "e",
        'í' | 'ì' | 'î' | 'ï' => "i",
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' => "o",
        'ú' | 'ù' | 'û' | 'ü' => "u",
        'ñ' => "n",
        'ç' => "c",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        _ => return None,
    })
}

/// Lowercase `[a-z0-9-]` slug with single hyphens and none at the ends.
pub fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_dash = true; // swallows leading separators
    for ch in raw.chars().flat_map(char::to_lowercase) {
        let piece: &str;
        let mut buf = [0u8; 4];
        if let Some(folded) = fold_accent(ch) {
            piece = folded;
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            piece = ch.encode_utf8(&mut buf);
        } else if ch.is_whitespace() || matches!(ch, '-' | '/' | '.' | '_') {
            if !last_dash { out.push('-'); last_dash = true; }
            continue;
        } else {
            continue;
        }
        out.push_str(piece);
        last_dash = false;
    }
    while out.ends_with('-') { out.pop(); }
    out
}

/// Canonical team id: slug, then the league's token rewrites, then leading
/// and trailing club-type tokens stripped until none are left to strip.
/// Never strips down to nothing; idempotent.
pub fn canonical_team_id(raw: &str, league: &League) -> String {
    let slug = slugify(raw);
    if slug.is_empty() {
        return slug;
    }

    let mut tokens: Vec<&str> = slug
        .split('-')
        .map(|t| {
            league.rewrites
                .iter()
                .find(|(from, _)| *from == t)
                .map(|(_, to)| *to)
                .unwrap_or(t)
        })
        .collect();
    let rewritten = tokens.join("-");

    loop {
        let before = tokens.len();
        while tokens.len() > 1 && league.prefixes.contains(&tokens[0]) {
            tokens.remove(0);
        }
        while tokens.len() > 1 && league.suffixes.contains(&tokens[tokens.len() - 1]) {
            tokens.pop();
        }
        if tokens.len() == before { break; }
    }

    // A lone club-type token ("FC") would otherwise survive as itself.
    if tokens.len() == 1
        && (league.prefixes.contains(&tokens[0]) || league.suffixes.contains(&tokens[0]))
    {
        return rewritten;
    }
    tokens.join("-")
}
