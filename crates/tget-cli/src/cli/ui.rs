//! Operator-facing messages around the download: banner, success, warnings, errors.

use tget_core::progress::Theme;

pub struct Ui {
    theme: Theme,
}

impl Ui {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn banner(&self) {
        println!(
            "{} {}",
            self.theme.title.paint("tget"),
            self.theme.highlight.paint(env!("CARGO_PKG_VERSION"))
        );
        println!(
            "{}",
            self.theme
                .subtitle
                .paint("Torrent downloader for magnet links and .torrent files")
        );
        println!();
    }

    pub fn success(&self, msg: &str) {
        println!("{}", self.theme.success.paint(&format!("✔ {msg}")));
    }

    pub fn info(&self, msg: &str) {
        println!("{}", self.theme.info.paint(msg));
    }

    /// `❌ <context>: <cause chain>` on stderr.
    pub fn error(&self, err: &anyhow::Error) {
        eprintln!("{}", self.theme.error.paint(&error_line(err)));
    }
}

fn error_line(err: &anyhow::Error) -> String {
    format!("❌ {:#}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use tget_core::reference::ValidationError;

    #[test]
    fn error_line_carries_the_cause_chain() {
        let err = Err::<(), _>(ValidationError::EmptyReference)
            .context("Invalid link")
            .unwrap_err();
        let line = error_line(&err);
        assert!(line.starts_with("❌ Invalid link: "));
        assert_eq!(line, format!("❌ Invalid link: {}", ValidationError::EmptyReference));
    }
}
