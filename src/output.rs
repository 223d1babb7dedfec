//! Output formatting for batch search results

use crate::index::types::SearchHit;
use crate::query::snippet::{normalize_snippet, split_highlights};
use crate::utils::app_data::SnippetStyle;
use std::io::{self, IsTerminal};
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print hits grouped by document, followed by a result count.
///
/// Hits are expected in path/page order, as returned by
/// [`QueryEngine::search`](crate::query::QueryEngine::search).
pub fn print_search_results(query: &str, hits: &[SearchHit], style: &SnippetStyle) -> io::Result<()> {
    let choice = if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    write_search_results(&mut stdout, query, hits, style)
}

/// Render to any colour-capable writer. The result count is the number of
/// distinct documents, not pages.
pub fn write_search_results<W: WriteColor>(
    out: &mut W,
    query: &str,
    hits: &[SearchHit],
    style: &SnippetStyle,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(out, "Search Results")?;
    out.reset()?;
    write!(out, " for ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    writeln!(out, "'{}'", query)?;
    out.reset()?;
    writeln!(out)?;

    let mut current: Option<&str> = None;
    let mut documents = 0;
    for hit in hits {
        if current != Some(hit.path.as_str()) {
            if current.is_some() {
                writeln!(out)?;
            }
            print_document_header(out, &hit.path)?;
            current = Some(&hit.path);
            documents += 1;
        }
        print_hit_line(out, hit, style)?;
    }

    if documents == 0 {
        writeln!(out, "No results found.")?;
    } else {
        writeln!(out)?;
        writeln!(out, "Found {} result(s).", documents)?;
    }
    Ok(())
}

/// File name in bold, its directory dimmed next to it
fn print_document_header<W: WriteColor>(out: &mut W, path: &str) -> io::Result<()> {
    let path = Path::new(path);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());

    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    write!(out, "{}", name)?;
    out.reset()?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(out, "  ({})", dir.display())?;
        out.reset()?;
    }
    writeln!(out)
}

fn print_hit_line<W: WriteColor>(out: &mut W, hit: &SearchHit, style: &SnippetStyle) -> io::Result<()> {
    write!(out, "  ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "p.{}", hit.page_num)?;
    out.reset()?;
    write!(out, "  ")?;

    let snippet = normalize_snippet(&hit.snippet);
    for segment in split_highlights(&snippet, style) {
        if segment.highlighted {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(out, "{}", segment.text)?;
            out.reset()?;
        } else {
            write!(out, "{}", segment.text)?;
        }
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use termcolor::{Ansi, NoColor};

    fn hit(path: &str, page_num: u32, snippet: &str) -> SearchHit {
        SearchHit {
            path: path.to_string(),
            page_num,
            snippet: snippet.to_string(),
            last_scanned: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn render(hits: &[SearchHit]) -> String {
        let mut out = NoColor::new(Vec::new());
        write_search_results(&mut out, "bar", hits, &SnippetStyle::batch()).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_no_results() {
        assert_eq!(render(&[]), "Search Results for 'bar'\n\nNo results found.\n");
    }

    #[test]
    fn test_grouped_by_document() {
        let hits = vec![
            hit("docs/a.pdf", 1, "foo [HL]bar[/HL]"),
            hit("docs/a.pdf", 3, "[HL]bar[/HL]\nbaz"),
            hit("b.pdf", 2, "x [HL]bar[/HL]"),
        ];
        let text = render(&hits);

        assert_eq!(text.matches("a.pdf").count(), 1);
        assert!(text.contains("a.pdf  (docs)"));
        assert!(text.contains("p.1  foo bar\n"));
        assert!(text.contains("p.3  bar baz\n"));
        assert!(text.contains("b.pdf\n"));
        assert!(text.starts_with("Search Results for 'bar'\n"));
        assert!(text.ends_with("Found 2 result(s).\n"));
        assert!(!text.contains("[HL]"));
    }

    #[test]
    fn test_colored_highlight() {
        let mut out = Ansi::new(Vec::new());
        write_search_results(&mut out, "bar", &[hit("a.pdf", 1, "[HL]bar[/HL]")], &SnippetStyle::batch())
            .unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("\x1b["));
        assert!(text.contains("bar"));
    }
}
