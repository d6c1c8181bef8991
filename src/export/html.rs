//! Word-compatible HTML rendering of a [`Document`]

use super::document::{Align, Block, Cell, Document, Inline, Table};
use std::fmt::Write;

const STYLESHEET: &str = "\
body { font-family: 'Arial', sans-serif; font-size: 11pt; line-height: 1.3; margin: 0.5in; }
h1 { text-align: center; font-size: 14pt; font-weight: bold; margin: 10pt 0; }
table { width: 100%; border-collapse: collapse; margin: 5pt 0; }
th, td { border: 1px solid #000; padding: 5pt; vertical-align: top; }
th { font-weight: bold; }
.section-title { font-weight: bold; font-size: 11pt; margin-top: 15pt; }
p { margin: 5pt 0; }
";

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render the document as HTML that Word opens as a `.doc`
pub fn render_html(doc: &Document) -> String {
    let mut body = String::new();
    for block in &doc.blocks {
        render_block(block, &mut body);
    }
    let mut html = String::new();
    // Writing to a String cannot fail
    let _ = write!(
        html,
        "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
xmlns:w='urn:schemas-microsoft-com:office:word' \
xmlns='http://www.w3.org/TR/REC-html40'>
<head>
<meta charset='utf-8'>
<title>{}</title>
<style>
{}</style>
</head>
<body>
{}</body>
</html>
",
        escape_html(&doc.title),
        STYLESHEET,
        body
    );
    html
}

fn render_block(block: &Block, out: &mut String) {
    match block {
        Block::Title(text) => {
            let _ = writeln!(out, "<h1>{}</h1>", escape_html(text));
        }
        Block::SectionTitle(text) => {
            let _ = writeln!(out, "<p class=\"section-title\">{}</p>", escape_html(text));
        }
        Block::Note(text) => {
            let _ = writeln!(out, "<p><em>{}</em></p>", escape_html(text));
        }
        Block::Paragraph(inlines) => {
            out.push_str("<p>");
            render_inlines(inlines, out);
            out.push_str("</p>\n");
        }
        Block::Inline(inlines) => render_inlines(inlines, out),
        Block::Table(table) => render_table(table, out),
    }
}

fn render_table(table: &Table, out: &mut String) {
    out.push_str("<table>\n");
    if let Some(head) = &table.head {
        out.push_str("<thead><tr>");
        for cell in head {
            render_cell(cell, out);
        }
        out.push_str("</tr></thead>\n");
    }
    out.push_str("<tbody>\n");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            render_cell(cell, out);
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn render_cell(cell: &Cell, out: &mut String) {
    let tag = if cell.header { "th" } else { "td" };
    out.push('<');
    out.push_str(tag);
    if cell.colspan > 1 {
        let _ = write!(out, " colspan=\"{}\"", cell.colspan);
    }
    if cell.align == Align::Center {
        out.push_str(" style=\"text-align: center;\"");
    }
    out.push('>');
    for block in &cell.blocks {
        render_block(block, out);
    }
    let _ = write!(out, "</{tag}>");
}

fn render_inlines(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(s) => out.push_str(&escape_html(s)),
            Inline::Strong(s) => {
                let _ = write!(out, "<strong>{}</strong>", escape_html(s));
            }
            Inline::Emphasis(s) => {
                let _ = write!(out, "<em>{}</em>", escape_html(s));
            }
            Inline::Value(s) => {
                let lines: Vec<String> = s.split('\n').map(escape_html).collect();
                out.push_str(&lines.join("<br>"));
            }
            Inline::Checkbox(true) => out.push('☑'),
            Inline::Checkbox(false) => out.push('☐'),
            Inline::Break => out.push_str("<br>"),
            Inline::Gap => out.push_str("&nbsp;&nbsp;&nbsp;"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"St. Mary's" & Co.</b>"#),
            "&lt;b&gt;&quot;St. Mary&#39;s&quot; &amp; Co.&lt;/b&gt;"
        );
    }

    #[test]
    fn test_user_values_are_escaped() {
        let mut doc = Document::new("Report");
        doc.push(Block::Paragraph(vec![Inline::value("<script>alert(1)</script>")]));
        let html = render_html(&doc);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_value_line_breaks_become_br() {
        let mut out = String::new();
        render_inlines(&[Inline::value("first\nsecond")], &mut out);
        assert_eq!(out, "first<br>second");
    }

    #[test]
    fn test_trailing_blank_lines_are_kept() {
        let mut out = String::new();
        render_inlines(&[Inline::value("finding\n\n")], &mut out);
        assert_eq!(out, "finding<br><br>");
    }

    #[test]
    fn test_office_namespaces_and_stylesheet() {
        let html = render_html(&Document::new("DepEd Monitoring Tool"));
        assert!(html.starts_with("<html xmlns:o='urn:schemas-microsoft-com:office:office'"));
        assert!(html.contains("xmlns:w='urn:schemas-microsoft-com:office:word'"));
        assert!(html.contains("<meta charset='utf-8'>"));
        assert!(html.contains("border-collapse: collapse"));
        assert!(html.contains("<title>DepEd Monitoring Tool</title>"));
    }

    #[test]
    fn test_table_markup() {
        let table = Table::new(vec![vec![
            Cell::new(vec![Inline::Checkbox(true)]).centered(),
            Cell::new(vec![Inline::text("Remarks")]).span(2),
        ]])
        .with_head(vec![Cell::header("Evident")]);
        let mut out = String::new();
        render_table(&table, &mut out);
        assert_eq!(
            out,
            "<table>\n<thead><tr><th>Evident</th></tr></thead>\n<tbody>\n\
<tr><td style=\"text-align: center;\">☑</td><td colspan=\"2\">Remarks</td></tr>\n\
</tbody>\n</table>\n"
        );
    }
}
