/// Destination for text copied out of the list
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), arboard::Error>;
}

/// The desktop clipboard, opened on first use.
///
/// The handle stays open afterwards: on X11 the copied text is only served
/// while it is alive.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), arboard::Error> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        self.inner.insert(clipboard).set_text(text)
    }
}
