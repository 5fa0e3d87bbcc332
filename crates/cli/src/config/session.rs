//! Session Config

use std::path::PathBuf;

use clap::Args;
use loza::i18n::Locale;

/// Session persistence and display settings.
#[derive(Debug, Args)]
pub(crate) struct SessionArgs {
    /// File holding the stored cart id
    #[arg(long, env = "LOZA_SESSION_FILE", default_value = ".loza/session.json")]
    pub session_file: PathBuf,

    /// Display locale (he, en, ar)
    #[arg(long, env = "LOZA_LOCALE", default_value = "he")]
    pub locale: Locale,
}
