// This module is only compiled when running tests
#![cfg(any(test, feature = "testing"))]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::TranslateError;
use crate::providers::Translator;

/// Scripted translator returning queued outcomes in order
///
/// When the script runs dry it echoes the input, so tests only script the
/// interesting calls.
#[derive(Default, Debug)]
pub struct ScriptedTranslator {
    pub script: Arc<Mutex<VecDeque<Result<String, TranslateError>>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTranslator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful translation
    ///
    /// # Panics
    ///
    /// Will panic if the mutex is poisoned
    pub fn push_ok(&self, text: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
    }

    /// Queue a classified failure
    ///
    /// # Panics
    ///
    /// Will panic if the mutex is poisoned
    pub fn push_err(&self, err: TranslateError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    /// Get the segment texts passed to this translator, in call order
    ///
    /// # Panics
    ///
    /// Will panic if the mutex is poisoned
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for ScriptedTranslator {
    async fn translate_segment(&self, text: &str) -> Result<String, TranslateError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(text.to_string()))
    }
}
