/// Bookkeeping for one video's caption stream. Owned by the debouncer behind
/// a mutex; transitions happen on caption mutations and play/pause events.
#[derive(Debug, Clone, Default)]
pub struct CaptionState {
    pub paused: bool,
    /// Most recent non-empty caption observed. Caption nodes often clear just
    /// before the pause event lands, so the pause handler replays this.
    pub last_caption: String,
    /// Last text handed to the translator while this pause lasted.
    pub last_submitted: String,
    /// Bumped on every resume. A translation captured under an older epoch
    /// must not reach the overlay, even if the video is paused again by the
    /// time it completes.
    pub pause_epoch: u64,
}

impl CaptionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a caption mutation. Empty text never overwrites the last seen
    /// line.
    pub fn record_caption(&mut self, text: &str) {
        if !text.is_empty() {
            self.last_caption = text.to_string();
        }
    }

    pub fn on_pause(&mut self) {
        self.paused = true;
    }

    pub fn on_play(&mut self) {
        self.paused = false;
        self.last_submitted.clear();
        self.pause_epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_playing_with_no_captions() {
        let state = CaptionState::new();
        assert!(!state.paused);
        assert!(state.last_caption.is_empty());
        assert_eq!(state.pause_epoch, 0);
    }

    #[test]
    fn empty_text_keeps_the_last_caption() {
        let mut state = CaptionState::new();
        state.record_caption("Hello world");
        state.record_caption("");
        assert_eq!(state.last_caption, "Hello world");
    }

    #[test]
    fn resume_clears_submissions_and_bumps_the_epoch() {
        let mut state = CaptionState::new();
        state.on_pause();
        state.last_submitted = "Hello world".to_string();

        state.on_play();
        assert!(!state.paused);
        assert!(state.last_submitted.is_empty());
        assert_eq!(state.pause_epoch, 1);

        // The caption itself survives the resume.
        state.record_caption("Hello world");
        state.on_play();
        assert_eq!(state.last_caption, "Hello world");
        assert_eq!(state.pause_epoch, 2);
    }
}
