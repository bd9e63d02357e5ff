// src/core/html.rs
//
// Small helpers over `scraper` element refs. Everything returns owned,
// whitespace-normalized strings and treats blank values as missing.

use scraper::{ElementRef, Selector};

use super::sanitize::normalize_ws;

/// Visible text of the element, whitespace collapsed.
pub fn text_of(el: ElementRef<'_>) -> String {
    let raw: String = el.text().collect();
    normalize_ws(&raw)
}

/// Trimmed attribute value; `None` when absent or blank.
pub fn attr(el: ElementRef<'_>, name: &str) -> Option<String> {
    el.value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Lazy-loaded images keep the real URL in `data-src`.
pub fn img_src(img: ElementRef<'_>) -> Option<String> {
    attr(img, "data-src").or_else(|| attr(img, "src"))
}

/// First match of `sel` under `el`.
pub fn first<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    el.select(sel).next()
}

/// Direct element children (the row's own cells, not nested-table cells).
pub fn child_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children().filter_map(ElementRef::wrap).collect()
}

/// Text of the `idx`-th direct child, empty when out of range.
pub fn cell_text(cells: &[ElementRef<'_>], idx: usize) -> String {
    cells.get(idx).map(|c| text_of(*c)).unwrap_or_default()
}

pub fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn row_of(html: &str) -> Html {
        Html::parse_fragment(&format!("<table><tbody>{html}</tbody></table>"))
    }

    #[test]
    fn text_is_normalized() {
        let doc = row_of("<tr><td>  J.\n   Doe </td></tr>");
        let td = doc.select(selector!("td")).next().unwrap();
        assert_eq!(text_of(td), "J. Doe");
    }

    #[test]
    fn img_src_prefers_data_src() {
        let doc = Html::parse_fragment(r#"<img data-src=" a.png " src="b.png"><img data-src="" src="c.png">"#);
        let imgs: Vec<_> = doc.select(selector!("img")).collect();
        assert_eq!(img_src(imgs[0]).as_deref(), Some("a.png"));
        assert_eq!(img_src(imgs[1]).as_deref(), Some("c.png"));
    }

    #[test]
    fn child_cells_skip_nested_tables() {
        let doc = row_of(
            "<tr><td>7</td><td><table><tr><td>x</td><td>y</td></tr></table></td><td>24</td></tr>",
        );
        let tr = doc.select(selector!("tbody > tr")).next().unwrap();
        let cells = child_cells(tr);
        assert_eq!(cells.len(), 3);
        assert_eq!(cell_text(&cells, 2), "24");
        assert_eq!(cell_text(&cells, 9), "");
    }
}
