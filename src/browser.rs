//! Opening post links outside the terminal.

use std::io;

/// Hands a link to something that can show it.
pub trait LinkOpener {
    fn open(&self, link: &str) -> io::Result<()>;
}

/// The user's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl LinkOpener for SystemBrowser {
    fn open(&self, link: &str) -> io::Result<()> {
        webbrowser::open(link)
    }
}
