/// A toolbar command.
///
/// Hosts identify commands by a string id (the toolbar button's action).
/// [`Command::from_id`] returns `None` for anything it does not know, and
/// callers treat that as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Bold,
    Italic,
    Link,
    Image,
    Code,
    Header,
    UnorderedList,
    OrderedList,
    Quote,
    HorizontalRule,
    Table,
    Checklist,
    ClearFormatting,
    Save,
    ExportHtml,
    ExportMarkdown,
}

/// Question and default answer for the heading level prompt.
pub const HEADER_PROMPTS: [(&str, &str); 1] = [("Heading level (1-6):", "2")];
/// Questions and default answers for the table size prompts.
pub const TABLE_PROMPTS: [(&str, &str); 2] = [("Rows:", "3"), ("Columns:", "2")];

impl Command {
    /// Toolbar order.
    pub const ALL: [Self; 16] = [
        Self::Bold,
        Self::Italic,
        Self::Link,
        Self::Image,
        Self::Code,
        Self::Header,
        Self::UnorderedList,
        Self::OrderedList,
        Self::Quote,
        Self::HorizontalRule,
        Self::Table,
        Self::Checklist,
        Self::ClearFormatting,
        Self::Save,
        Self::ExportHtml,
        Self::ExportMarkdown,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.id() == id)
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Link => "link",
            Self::Image => "image",
            Self::Code => "code",
            Self::Header => "header",
            Self::UnorderedList => "ulist",
            Self::OrderedList => "olist",
            Self::Quote => "quote",
            Self::HorizontalRule => "hr",
            Self::Table => "table",
            Self::Checklist => "checklist",
            Self::ClearFormatting => "clear",
            Self::Save => "save",
            Self::ExportHtml => "export-html",
            Self::ExportMarkdown => "export-md",
        }
    }

    /// Short button caption.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bold => "B",
            Self::Italic => "I",
            Self::Link => "Link",
            Self::Image => "Img",
            Self::Code => "Code",
            Self::Header => "H",
            Self::UnorderedList => "UL",
            Self::OrderedList => "OL",
            Self::Quote => "Qt",
            Self::HorizontalRule => "HR",
            Self::Table => "Tbl",
            Self::Checklist => "Todo",
            Self::ClearFormatting => "Clr",
            Self::Save => "Save",
            Self::ExportHtml => "HTML",
            Self::ExportMarkdown => "MD",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Link => "Link",
            Self::Image => "Image",
            Self::Code => "Code block",
            Self::Header => "Heading",
            Self::UnorderedList => "Bulleted list",
            Self::OrderedList => "Numbered list",
            Self::Quote => "Quote",
            Self::HorizontalRule => "Horizontal rule",
            Self::Table => "Table",
            Self::Checklist => "Checklist",
            Self::ClearFormatting => "Clear formatting",
            Self::Save => "Save draft",
            Self::ExportHtml => "Export HTML",
            Self::ExportMarkdown => "Export Markdown",
        }
    }

    /// Alt+key shortcut in the terminal host.
    pub const fn shortcut(self) -> char {
        match self {
            Self::Bold => 'b',
            Self::Italic => 'i',
            Self::Link => 'k',
            Self::Image => 'g',
            Self::Code => 'c',
            Self::Header => 'h',
            Self::UnorderedList => 'u',
            Self::OrderedList => 'o',
            Self::Quote => 'q',
            Self::HorizontalRule => 'r',
            Self::Table => 't',
            Self::Checklist => 'x',
            Self::ClearFormatting => 'n',
            Self::Save => 's',
            Self::ExportHtml => 'e',
            Self::ExportMarkdown => 'm',
        }
    }

    pub fn from_shortcut(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.shortcut() == key)
    }

    /// The questions this command asks before it runs, in order.
    pub const fn prompts(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Header => &HEADER_PROMPTS,
            Self::Table => &TABLE_PROMPTS,
            _ => &[],
        }
    }

    /// Whether the command reaches outside the document (storage or files).
    pub const fn is_effect(self) -> bool {
        matches!(self, Self::Save | Self::ExportHtml | Self::ExportMarkdown)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for cmd in Command::ALL {
            assert_eq!(Command::from_id(cmd.id()), Some(cmd));
        }
    }

    #[test]
    fn test_unknown_id_is_none() {
        assert_eq!(Command::from_id("strikethrough"), None);
        assert_eq!(Command::from_id(""), None);
        assert_eq!(Command::from_id("BOLD"), None);
    }

    #[test]
    fn test_shortcuts_are_unique() {
        let mut keys: Vec<char> = Command::ALL.iter().map(|c| c.shortcut()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Command::ALL.len());
    }

    #[test]
    fn test_prompting_commands() {
        assert_eq!(Command::Header.prompts().len(), 1);
        assert_eq!(Command::Table.prompts().len(), 2);
        assert!(Command::Bold.prompts().is_empty());
    }
}
