/// Errors that can occur while loading a glossary
#[derive(Debug, thiserror::Error)]
pub enum GlossaryError {
    /// I/O error reading the glossary file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not well-formed SKOS RDF/XML
    #[error("Parse error at byte {position}: {message}")]
    ParseError {
        /// Byte offset in the input where the problem was detected
        position: u64,
        /// Description of the problem
        message: String,
    },

    /// Two or more concepts share an identifier
    #[error("Duplicate concept identifier(s): {}", .0.join(", "))]
    DuplicateIdentifier(Vec<String>),
}

impl GlossaryError {
    pub(crate) fn parse(position: u64, message: impl Into<String>) -> Self {
        GlossaryError::ParseError {
            position,
            message: message.into(),
        }
    }
}
