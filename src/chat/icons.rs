//! Source path -> display icon resolution.

use serde::{Deserialize, Serialize};

/// Icon identifier sent to the UI shell alongside each citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconId {
    Pdf,
    Word,
    Excel,
    Csv,
    Text,
    Link,
    File,
}

/// Resolve the icon for a source path or formatted citation string.
///
/// Total over any input: unknown extensions and non-path strings resolve
/// to `IconId::File`. Inquiry citations carry a trailing page annotation
/// (`"a.pdf (ページNo.3)"`); the annotation is stripped before the
/// extension is read.
pub fn resolve(source: &str) -> IconId {
    let path = strip_page_annotation(source);

    if path.starts_with("http://") || path.starts_with("https://") {
        return IconId::Link;
    }

    match extension(path).as_deref() {
        Some("pdf") => IconId::Pdf,
        Some("doc") | Some("docx") => IconId::Word,
        Some("xls") | Some("xlsx") => IconId::Excel,
        Some("csv") => IconId::Csv,
        Some("txt") | Some("md") => IconId::Text,
        _ => IconId::File,
    }
}

fn strip_page_annotation(source: &str) -> &str {
    match source.find("(ページNo.") {
        Some(idx) => source[..idx].trim_end(),
        None => source,
    }
}

fn extension(path: &str) -> Option<String> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_resolve() {
        assert_eq!(resolve("hr/policy.pdf"), IconId::Pdf);
        assert_eq!(resolve("minutes.DOCX"), IconId::Word);
        assert_eq!(resolve("roster.csv"), IconId::Csv);
        assert_eq!(resolve("notes.txt"), IconId::Text);
        assert_eq!(resolve("readme.md"), IconId::Text);
    }

    #[test]
    fn urls_resolve_to_link() {
        assert_eq!(resolve("https://wiki.example.co.jp/page"), IconId::Link);
        assert_eq!(resolve("http://intranet/doc.pdf"), IconId::Link);
    }

    #[test]
    fn unknown_input_falls_back_to_file() {
        assert_eq!(resolve(""), IconId::File);
        assert_eq!(resolve("no_extension"), IconId::File);
        assert_eq!(resolve(".hidden"), IconId::File);
        assert_eq!(resolve("archive."), IconId::File);
        assert_eq!(resolve("weird.zzz"), IconId::File);
    }

    #[test]
    fn page_annotation_is_ignored() {
        assert_eq!(resolve("hr/policy.pdf (ページNo.3)"), IconId::Pdf);
        assert_eq!(resolve("roster.csv (ページNo.1)"), IconId::Csv);
    }
}
