//! Recording [`CallbackWindow`] for unit tests.

use std::cell::RefCell;

use super::context::{CallbackWindow, WindowError};
use super::message::OAuthMessage;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum WindowCall {
    Post { message: OAuthMessage, target_origin: String },
    Close,
    Navigate(String),
}

pub(crate) struct RecordingWindow {
    opener: bool,
    origin: String,
    post_fails: bool,
    calls: RefCell<Vec<WindowCall>>,
}

impl RecordingWindow {
    pub(crate) fn standalone() -> Self {
        Self { opener: false, origin: "https://ecowatch.example".to_owned(), post_fails: false, calls: RefCell::default() }
    }

    pub(crate) fn popup() -> Self {
        Self { opener: true, ..Self::standalone() }
    }

    pub(crate) fn popup_with_failing_post() -> Self {
        Self { post_fails: true, ..Self::popup() }
    }

    pub(crate) fn calls(&self) -> Vec<WindowCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn posts(&self) -> Vec<(OAuthMessage, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                WindowCall::Post { message, target_origin } => Some((message, target_origin)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn navigations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                WindowCall::Navigate(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn closes(&self) -> usize {
        self.calls().iter().filter(|call| **call == WindowCall::Close).count()
    }
}

impl CallbackWindow for RecordingWindow {
    fn has_distinct_opener(&self) -> bool {
        self.opener
    }

    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn post_to_opener(&self, message: &OAuthMessage, target_origin: &str) -> Result<(), WindowError> {
        self.calls
            .borrow_mut()
            .push(WindowCall::Post { message: message.clone(), target_origin: target_origin.to_owned() });
        if self.post_fails { Err(WindowError::Js("DataCloneError".to_owned())) } else { Ok(()) }
    }

    fn close(&self) {
        self.calls.borrow_mut().push(WindowCall::Close);
    }

    fn navigate(&self, url: &str) {
        self.calls.borrow_mut().push(WindowCall::Navigate(url.to_owned()));
    }
}
