// src/specs/roster.rs
//! Scraping *spec* for a club squad page (`/kader/verein/{id}/saison_id/{season}`).
//!
//! Every field is read through an ordered list of strategies; the first one
//! that yields a non-empty value wins. The markup drifts between clubs and
//! seasons, so no single selector is trusted.
//!
//! Column layout of a squad row (direct `td` children):
//! `0` shirt number, `1` name block, `2` age, `3` nationality flags,
//! `4` contract, `5` market value.
//!
//! Extraction never fails. Rows with neither a name nor a link are skipped,
//! as are rows that are plainly not player rows (headers, spacers).

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::core::html::{attr, cell_text, child_cells, first, img_src, non_empty, text_of};
use crate::data::PlayerRecord;

static PROFILE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/profil/spieler/(?:.*?-)?(\d+)").expect("profile id regex"));

static RAW_FLAG_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+(?:flagge|flaggenrahmen|images/flagge|tmssl)[^>]+title\s*=\s*"([^"]+)""#)
        .expect("flag title regex")
});

static RAW_FLAG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+(?:flagge|flaggenrahmen|images/flagge|tmssl)[^>]+src\s*=\s*"([^"]+)""#)
        .expect("flag src regex")
});

const COL_NUMBER: usize = 0;
const COL_AGE: usize = 2;
const COL_FLAGS: usize = 3;
const COL_CONTRACT: usize = 4;
const COL_MARKET: usize = 5;

type Strategy = fn(ElementRef<'_>) -> Option<String>;

const NAME: &[Strategy] = &[name_from_name_cell, name_from_first_anchor];
const LINK: &[Strategy] = &[link_from_name_link, link_from_first_anchor];

fn first_hit(row: ElementRef<'_>, strategies: &[Strategy]) -> Option<String> {
    strategies.iter().find_map(|s| s(row))
}

fn name_from_name_cell(row: ElementRef<'_>) -> Option<String> {
    row.select(selector!("td.posrela a"))
        .map(text_of)
        .find(|t| !t.is_empty())
}

fn name_from_first_anchor(row: ElementRef<'_>) -> Option<String> {
    first(row, selector!("a")).map(text_of).and_then(non_empty)
}

fn link_from_name_link(row: ElementRef<'_>) -> Option<String> {
    first(row, selector!("td.hauptlink a[href]")).and_then(|a| attr(a, "href"))
}

fn link_from_first_anchor(row: ElementRef<'_>) -> Option<String> {
    first(row, selector!("a[href]")).and_then(|a| attr(a, "href"))
}

/// Numeric profile id from a player link.
pub fn profile_id(href: &str) -> Option<String> {
    PROFILE_ID.captures(href).map(|c| c[1].to_string())
}

fn photo(row: ElementRef<'_>) -> Option<String> {
    first(row, selector!("img.bilderrahmen-fixed")).and_then(img_src)
}

// Nationality + flag

#[derive(Default)]
struct FlagHit {
    nationalities: Vec<String>,
    flag_url: Option<String>,
}

type FlagLayer = fn(ElementRef<'_>, &[ElementRef<'_>]) -> FlagHit;

/// Tried in order until one yields at least one nationality.
/// A flag URL from an earlier layer is never replaced.
const FLAG_LAYERS: &[FlagLayer] = &[flags_from_flag_cell, flags_from_row_images, flags_from_raw_markup];

fn looks_like_flag(src: &str) -> bool {
    let src = src.to_ascii_lowercase();
    src.contains("flagge") || src.contains("tmssl") || src.contains("flag")
}

fn push_unique(out: &mut Vec<String>, v: String) {
    if !v.is_empty() && !out.contains(&v) {
        out.push(v);
    }
}

fn flags_from_flag_cell(_row: ElementRef<'_>, cells: &[ElementRef<'_>]) -> FlagHit {
    let Some(img) = cells.get(COL_FLAGS).and_then(|c| first(*c, selector!("img"))) else {
        return FlagHit::default();
    };

    let from_filename = || {
        attr(img, "src")
            .filter(|src| looks_like_flag(src))
            .and_then(|src| {
                src.to_ascii_lowercase()
                    .rsplit('/')
                    .next()
                    .map(str::to_string)
            })
            .and_then(non_empty)
    };

    let mut nationalities = Vec::new();
    if let Some(n) = attr(img, "alt").or_else(|| attr(img, "title")).or_else(from_filename) {
        nationalities.push(n);
    }
    FlagHit { nationalities, flag_url: img_src(img) }
}

fn flags_from_row_images(row: ElementRef<'_>, _cells: &[ElementRef<'_>]) -> FlagHit {
    let mut hit = FlagHit::default();
    for img in row.select(selector!("img")) {
        let class = attr(img, "class").unwrap_or_default().to_ascii_lowercase();
        if class.contains("bilderrahmen") {
            continue; // portrait
        }
        let src_flag = attr(img, "src").is_some_and(|s| looks_like_flag(&s))
            || attr(img, "data-src").is_some_and(|s| looks_like_flag(&s));
        if !class.contains("flag") && !src_flag {
            continue;
        }
        if hit.flag_url.is_none() {
            hit.flag_url = img_src(img);
        }
        if let Some(n) = attr(img, "title").or_else(|| attr(img, "alt")) {
            push_unique(&mut hit.nationalities, n);
        }
    }
    hit
}

fn flags_from_raw_markup(row: ElementRef<'_>, _cells: &[ElementRef<'_>]) -> FlagHit {
    let markup = row.html();
    let grab = |re: &Regex| {
        re.captures(&markup)
            .map(|c| c[1].trim().to_string())
            .and_then(non_empty)
    };
    FlagHit {
        nationalities: grab(&RAW_FLAG_TITLE).into_iter().collect(),
        flag_url: grab(&RAW_FLAG_SRC),
    }
}

fn nationality_and_flag(row: ElementRef<'_>, cells: &[ElementRef<'_>]) -> FlagHit {
    let mut acc = FlagHit::default();
    for layer in FLAG_LAYERS {
        let hit = layer(row, cells);
        if acc.flag_url.is_none() {
            acc.flag_url = hit.flag_url;
        }
        for n in hit.nationalities {
            push_unique(&mut acc.nationalities, n);
        }
        if !acc.nationalities.is_empty() {
            break;
        }
    }
    acc
}

// Rows

fn extract_row(row: ElementRef<'_>) -> Option<PlayerRecord> {
    let name = first_hit(row, NAME).unwrap_or_default();
    let href = first_hit(row, LINK).unwrap_or_default();
    if name.is_empty() && href.is_empty() {
        return None;
    }

    let cells = child_cells(row);
    let flags = nationality_and_flag(row, &cells);

    Some(PlayerRecord {
        id: profile_id(&href).unwrap_or_default(),
        name,
        number: cell_text(&cells, COL_NUMBER),
        age: cell_text(&cells, COL_AGE),
        nationalities: flags.nationalities,
        contract: cell_text(&cells, COL_CONTRACT),
        market_value: cell_text(&cells, COL_MARKET),
        flag_url: flags.flag_url,
        photo_url: photo(row),
        href,
    })
}

/// Raw (unmerged) player records from a squad page, in row order.
pub fn extract(html: &str) -> Vec<PlayerRecord> {
    let doc = Html::parse_document(html);

    let mut rows: Vec<ElementRef<'_>> = doc.select(selector!("table.items tbody tr")).collect();
    if rows.is_empty() {
        rows = doc.select(selector!("tr")).collect();
    }

    rows.into_iter().filter_map(extract_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &str) -> String {
        format!(r#"<html><body><table class="items"><tbody>{rows}</tbody></table></body></html>"#)
    }

    #[test]
    fn profile_id_variants() {
        assert_eq!(profile_id("/lamine-yamal/profil/spieler/937958").as_deref(), Some("937958"));
        assert_eq!(profile_id("/profil/spieler/123-j-doe").as_deref(), Some("123"));
        assert_eq!(profile_id("/x/leistungsdaten/spieler/5"), None);
    }

    #[test]
    fn name_cell_beats_first_anchor() {
        let html = table(
            r#"<tr><td><a href="/club">Club</a></td>
               <td class="posrela"><a href="/p/profil/spieler/42">Pedri</a></td></tr>"#,
        );
        let players = extract(&html);
        assert_eq!(players[0].name, "Pedri");
    }

    #[test]
    fn hauptlink_beats_first_anchor_for_id() {
        let html = table(
            r#"<tr><td><a href="/p/profil/spieler/1">A</a></td>
               <td class="hauptlink"><a href="/p/profil/spieler/2">B</a></td></tr>"#,
        );
        assert_eq!(extract(&html)[0].id, "2");
    }

    #[test]
    fn flag_cell_prefers_alt_over_title() {
        let html = table(
            r#"<tr><td>1</td><td><a href="/a/profil/spieler/9">A</a></td><td>20</td>
               <td><img alt="Spain" title="España" data-src="/flagge/es.png" src="data:x"></td></tr>"#,
        );
        let p = &extract(&html)[0];
        assert_eq!(p.nationalities, ["Spain"]);
        assert_eq!(p.flag_url.as_deref(), Some("/flagge/es.png"));
    }

    #[test]
    fn flag_cell_falls_back_to_filename() {
        let html = table(
            r#"<tr><td>1</td><td><a href="/a/profil/spieler/9">A</a></td><td>20</td>
               <td><img src="https://tmssl.example/Flagge/Tiny/157.PNG"></td></tr>"#,
        );
        assert_eq!(extract(&html)[0].nationalities, ["157.png"]);
    }

    #[test]
    fn row_images_collect_every_flag_title() {
        let html = table(
            r#"<tr><td><a href="/a/profil/spieler/9">A</a>
               <img class="bilderrahmen-fixed" data-src="/portrait/9.jpg" title="A">
               <img class="flaggenrahmen" src="/flagge/ma.png" title="Morocco">
               <img class="flaggenrahmen" src="/flagge/es.png" alt="Spain"></td></tr>"#,
        );
        let p = &extract(&html)[0];
        assert_eq!(p.nationalities, ["Morocco", "Spain"]);
        assert_eq!(p.flag_url.as_deref(), Some("/flagge/ma.png"));
        assert_eq!(p.photo_url.as_deref(), Some("/portrait/9.jpg"));
    }

    #[test]
    fn raw_markup_is_the_last_flag_source() {
        let html = table(
            r#"<tr><td><a href="/a/profil/spieler/9">A</a>
               <img data-original="/images/flagge/es.png" src="x.png" title="Spain"></td></tr>"#,
        );
        let p = &extract(&html)[0];
        assert_eq!(p.nationalities, ["Spain"]);
        assert_eq!(p.flag_url.as_deref(), Some("x.png"));
    }

    #[test]
    fn falls_back_to_every_row_without_items_table() {
        let html = r#"<table><tr><th>#</th></tr>
            <tr><td>3</td><td><a href="/x/profil/spieler/77">X</a></td></tr></table>"#;
        let players = extract(html);
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, "77");
        assert_eq!(players[0].number, "3");
    }

    #[test]
    fn rows_without_name_or_link_are_dropped() {
        let html = table("<tr><td>1</td><td></td></tr><tr><td>spacer</td></tr>");
        assert!(extract(&html).is_empty());
    }
}
