//! Diagnostics emitted while rendering
//!
//! Rendering never aborts on a single block. Skipped blocks and failed
//! asset fetches are reported through a [`Diagnostics`] sink instead.

use std::fmt;

/// Something the renderer wants the user to know about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The API itself reported the block as unsupported
    UnsupportedBlock,
    /// The block kind is known to the API but not rendered
    UnhandledBlock { kind: String },
    /// Image could not be stored; the block was rendered with the fallback path
    ImageFailed { url: String, message: String },
    /// Bookmark metadata could not be scraped; the block was rendered with what was found
    BookmarkFailed { url: String, message: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::UnsupportedBlock => write!(f, "Unsupported block type"),
            Notice::UnhandledBlock { kind } => write!(f, "Unimplemented block {}", kind),
            Notice::ImageFailed { url, message } => {
                write!(f, "Getting image `{}`: {}", url, message)
            }
            Notice::BookmarkFailed { url, message } => {
                write!(f, "Error getting bookmark metadata for {}: {}", url, message)
            }
        }
    }
}

/// Receiver of renderer notices
pub trait Diagnostics {
    fn notice(&mut self, notice: Notice);
}

/// Forward notices to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn notice(&mut self, notice: Notice) {
        match notice {
            Notice::UnsupportedBlock | Notice::UnhandledBlock { .. } => log::info!("{}", notice),
            Notice::ImageFailed { .. } | Notice::BookmarkFailed { .. } => {
                log::warn!("{}", notice)
            }
        }
    }
}

/// Keep notices in memory
#[derive(Debug, Default, Clone)]
pub struct CollectDiagnostics {
    pub notices: Vec<Notice>,
}

impl Diagnostics for CollectDiagnostics {
    fn notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Notice::UnsupportedBlock.to_string(), "Unsupported block type");
        assert_eq!(
            Notice::UnhandledBlock {
                kind: "toggle".to_string()
            }
            .to_string(),
            "Unimplemented block toggle"
        );
    }

    #[test]
    fn test_collect() {
        let mut diagnostics = CollectDiagnostics::default();
        diagnostics.notice(Notice::UnsupportedBlock);
        assert_eq!(diagnostics.notices, vec![Notice::UnsupportedBlock]);
    }
}
