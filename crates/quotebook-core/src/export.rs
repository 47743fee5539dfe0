//! Plain-text quote export shared by every list that offers bulk export.

use crate::models::Quote;

/// Document name used when the caller does not supply one.
pub const DEFAULT_EXPORT_NAME: &str = "Exported Quotes";

const EXPORT_EXTENSION: &str = "txt";

/// A rendered export, ready to be handed to a share sheet or written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub name: String,
    pub contents: String,
}

impl ExportDocument {
    /// File name to offer when saving the document.
    #[must_use]
    pub fn suggested_file_name(&self) -> String {
        format!("{}.{EXPORT_EXTENSION}", self.name)
    }
}

/// One `"<text> ——<author>"` line per quote, in the order given.
#[must_use]
pub fn render_plain_text(quotes: &[Quote]) -> String {
    quotes
        .iter()
        .map(Quote::export_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Export quotes under the default document name.
#[must_use]
pub fn export_plain_text(quotes: &[Quote]) -> ExportDocument {
    export_plain_text_named(quotes, DEFAULT_EXPORT_NAME)
}

/// Export quotes under `name`; a blank name falls back to the default.
#[must_use]
pub fn export_plain_text_named(quotes: &[Quote], name: &str) -> ExportDocument {
    let name = match name.trim() {
        "" => DEFAULT_EXPORT_NAME,
        trimmed => trimmed,
    };
    tracing::debug!("Exporting {} quotes as {name:?}", quotes.len());

    ExportDocument {
        name: name.to_string(),
        contents: render_plain_text(quotes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CollectionId, DisplayFlags, QuoteDraft};
    use pretty_assertions::assert_eq;

    fn quote(draft: &QuoteDraft) -> Quote {
        Quote::new(CollectionId::new(), draft, DisplayFlags::default())
    }

    #[test]
    fn plain_text_has_one_line_per_quote() {
        let quotes = [
            quote(&QuoteDraft::new("Memento mori").author("Marcus", "Aurelius")),
            quote(&QuoteDraft::new("Amor fati")),
        ];

        let document = export_plain_text(&quotes);
        assert_eq!(
            document.contents,
            "Memento mori \u{2014}\u{2014}Marcus Aurelius\nAmor fati \u{2014}\u{2014}Anonymous"
        );
        assert_eq!(document.name, "Exported Quotes");
        assert_eq!(document.suggested_file_name(), "Exported Quotes.txt");
    }

    #[test]
    fn export_keeps_supplied_order() {
        let quotes = [quote(&QuoteDraft::new("b")), quote(&QuoteDraft::new("a"))];
        let rendered = render_plain_text(&quotes);
        assert!(rendered.starts_with("b "));
    }

    #[test]
    fn empty_export_is_empty_document() {
        assert_eq!(export_plain_text(&[]).contents, "");
    }

    #[test]
    fn custom_name_is_trimmed_and_blank_falls_back() {
        let document = export_plain_text_named(&[], "  Stoics ");
        assert_eq!(document.suggested_file_name(), "Stoics.txt");
        assert_eq!(export_plain_text_named(&[], " ").name, DEFAULT_EXPORT_NAME);
    }
}
