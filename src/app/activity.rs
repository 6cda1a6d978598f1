//! In-flight markers shown while backend calls are pending.

/// Which backend calls are currently outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Activity {
    /// Analysis of an uploaded video
    pub processing_video: bool,
    /// Indexing of an uploaded video
    pub indexing: bool,
    /// A question about the active video
    pub processing_question: bool,
    pub searching: bool,
}

impl Activity {
    pub fn is_busy(&self) -> bool {
        self.processing_video || self.indexing || self.processing_question || self.searching
    }

    /// Clear the markers tied to the active video.
    ///
    /// `searching` is left alone: searches do not belong to a video.
    pub fn clear_video_calls(&mut self) {
        self.processing_video = false;
        self.indexing = false;
        self.processing_question = false;
    }

    /// Human-readable list of what is running, e.g. "analyzing, indexing".
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.processing_video {
            parts.push("analyzing");
        }
        if self.indexing {
            parts.push("indexing");
        }
        if self.processing_question {
            parts.push("answering");
        }
        if self.searching {
            parts.push("searching");
        }
        if parts.is_empty() {
            "idle".to_string()
        } else {
            parts.join(", ")
        }
    }
}
