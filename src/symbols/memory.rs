//! In-memory symbol provider for library users and tests.

use super::{AnnotationSession, SymbolProvider};
use crate::parser::RawAnnotation;
use crate::utils::error::SymbolProviderError;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

/// Serves a fixed list of annotations, whatever path is opened
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    module: String,
    annotations: Vec<RawAnnotation>,
    failure: Option<(usize, String)>,
    live_sessions: Rc<Cell<usize>>,
}

impl MemoryProvider {
    pub fn new(module: impl Into<String>, annotations: Vec<RawAnnotation>) -> Self {
        Self {
            module: module.into(),
            annotations,
            failure: None,
            live_sessions: Rc::new(Cell::new(0)),
        }
    }

    /// Make sessions fail with `SymbolProviderError::Enumerate` after `count` annotations
    pub fn fail_after(mut self, count: usize, message: impl Into<String>) -> Self {
        self.failure = Some((count, message.into()));
        self
    }

    /// Sessions opened and not yet dropped
    pub fn live_sessions(&self) -> usize {
        self.live_sessions.get()
    }
}

impl SymbolProvider for MemoryProvider {
    type Session = MemorySession;

    fn open(&self, _path: &Path) -> Result<MemorySession, SymbolProviderError> {
        self.live_sessions.set(self.live_sessions.get() + 1);
        Ok(MemorySession {
            module: self.module.clone(),
            annotations: self.annotations.clone().into_iter(),
            failure: self.failure.clone(),
            served: 0,
            live_sessions: Rc::clone(&self.live_sessions),
        })
    }
}

/// Session handed out by [`MemoryProvider`]
#[derive(Debug)]
pub struct MemorySession {
    module: String,
    annotations: std::vec::IntoIter<RawAnnotation>,
    failure: Option<(usize, String)>,
    served: usize,
    live_sessions: Rc<Cell<usize>>,
}

impl AnnotationSession for MemorySession {
    fn module_name(&self) -> &str {
        &self.module
    }

    fn next_annotation(&mut self) -> Option<Result<RawAnnotation, SymbolProviderError>> {
        if let Some((count, message)) = &self.failure {
            if self.served == *count {
                // Report once, then behave as exhausted
                let message = message.clone();
                self.failure = None;
                self.annotations = Vec::new().into_iter();
                return Some(Err(SymbolProviderError::Enumerate(message)));
            }
        }

        let annotation = self.annotations.next()?;
        self.served += 1;
        Some(Ok(annotation))
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.live_sessions.set(self.live_sessions.get().saturating_sub(1));
    }
}
