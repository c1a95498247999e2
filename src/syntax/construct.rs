//! Construct classes for markdown highlighting
//!
//! Each markdown element the highlighter recognizes belongs to a construct
//! class. Themes are keyed by these classes and every emitted span records
//! the class that produced it.

/// Markdown construct classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    /// Plain document text (the base pass)
    Text,
    /// ATX headers (`#` .. `######`)
    Header,
    /// `**bold**`
    Bold,
    /// `*italic*`
    Italic,
    /// `~~strikethrough~~`
    Strikethrough,
    /// `` `inline code` ``
    InlineCode,
    /// Fenced code blocks
    CodeBlock,
    /// Blockquote line body
    Blockquote,
    /// Leading `>` markers of a blockquote line
    BlockquoteMarker,
    /// Table rows, separators and pipes
    Table,
    /// `![alt](target)` images
    Image,
    /// The leading `!` of an image
    ImageMarker,
    /// `[label](target)` links
    Link,
    /// List item markers
    ListMarker,
}

impl Construct {
    /// Get a human-readable name for this construct
    pub fn name(&self) -> &'static str {
        match self {
            Construct::Text => "Text",
            Construct::Header => "Header",
            Construct::Bold => "Bold",
            Construct::Italic => "Italic",
            Construct::Strikethrough => "Strikethrough",
            Construct::InlineCode => "InlineCode",
            Construct::CodeBlock => "CodeBlock",
            Construct::Blockquote => "Blockquote",
            Construct::BlockquoteMarker => "BlockquoteMarker",
            Construct::Table => "Table",
            Construct::Image => "Image",
            Construct::ImageMarker => "ImageMarker",
            Construct::Link => "Link",
            Construct::ListMarker => "ListMarker",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(Construct::Text.name(), "Text");
        assert_eq!(Construct::BlockquoteMarker.name(), "BlockquoteMarker");
        assert_eq!(Construct::ListMarker.name(), "ListMarker");
    }
}
