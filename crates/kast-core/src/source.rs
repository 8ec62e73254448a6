//! # Data Sources
//!
//! The pull interface the runtime consumes low-level frames through.
//!
//! A driver calls `has_more()` then `get_new_information()`, once each per
//! step and in that order. Blocking for the next frame, if any, is the
//! source's business.

use crate::types::{Frame, KastError};
use std::collections::VecDeque;

/// A producer of low-level data frames.
pub trait DataSource {
    /// Names the source knows up front (e.g. a CSV header row).
    fn headers(&self) -> &[String];

    /// Does the source have another frame?
    fn has_more(&mut self) -> bool;

    /// Fetch the next frame.
    fn get_new_information(&mut self) -> Result<Frame, KastError>;
}

/// An in-memory queue of frames, replayed in order.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    headers: Vec<String>,
    frames: VecDeque<Frame>,
}

impl ReplaySource {
    /// Create a replay over `frames` with the given headers.
    pub fn new<I>(headers: I, frames: impl IntoIterator<Item = Frame>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            frames: frames.into_iter().collect(),
        }
    }

    /// Create a replay whose headers are the union of every frame's names.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for frame in &frames {
            for name in frame.keys() {
                if !headers.contains(name) {
                    headers.push(name.clone());
                }
            }
        }
        Self::new(headers, frames)
    }

    /// Frames left to replay.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl DataSource for ReplaySource {
    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn has_more(&mut self) -> bool {
        !self.frames.is_empty()
    }

    fn get_new_information(&mut self) -> Result<Frame, KastError> {
        self.frames
            .pop_front()
            .ok_or_else(|| KastError::Source("replay exhausted".to_string()))
    }
}
