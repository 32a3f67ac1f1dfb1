//! Playback controller
//!
//! Owns the session and turns commands and timer ticks into a single
//! authoritative frame index. Everything runs on the caller's thread:
//! decoding blocks, and playback is a chain of deferred ticks that the
//! event loop fires through [`PlaybackController::poll`]. A tick is
//! rescheduled only after its frame has been decoded, so when decoding takes
//! longer than the play interval the effective frame rate drops.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use super::schedule::TickScheduler;
use super::session::Session;
use crate::app::state::PlayState;
use crate::config::ViewerConfig;
use crate::error::{Edge, OpenError, ViewerError};
use crate::render::{Notice, Placement, RenderSink, StatusLine, Viewport};
use crate::video::{save_frame, FrameSource, OutputDirs, VideoBackend};

/// Source of the current time
pub type Clock = Box<dyn Fn() -> Instant>;

/// Frame navigation and playback state machine
pub struct PlaybackController<B: VideoBackend, R: RenderSink> {
    config: ViewerConfig,
    backend: B,
    sink: R,
    /// `None` until a video is opened
    session: Option<Session<B::Source>>,
    scheduler: TickScheduler,
    output_dirs: OutputDirs,
    viewport: Viewport,
    clock: Clock,
}

impl<B: VideoBackend, R: RenderSink> PlaybackController<B, R> {
    /// Create a controller with no video open
    pub fn new(config: ViewerConfig, backend: B, sink: R) -> Self {
        Self::with_clock(config, backend, sink, Box::new(Instant::now))
    }

    /// Create a controller reading time from `clock`
    pub fn with_clock(config: ViewerConfig, backend: B, mut sink: R, clock: Clock) -> Self {
        let (width, height) = config.canvas_size;
        sink.update_status(&StatusLine::NoFile);
        Self {
            output_dirs: OutputDirs::new(config.output_root.clone()),
            viewport: Viewport::new(width, height),
            config,
            backend,
            sink,
            session: None,
            scheduler: TickScheduler::new(),
            clock,
        }
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&Session<B::Source>> {
        self.session.as_ref()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn play_state(&self) -> PlayState {
        match &self.session {
            None => PlayState::NoSession,
            Some(session) if session.is_playing() => PlayState::Playing,
            Some(_) => PlayState::Idle,
        }
    }

    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        self.play_state() == PlayState::Playing
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.current_index())
    }

    /// When the next playback tick is due, if one is scheduled
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// Open `path`, replacing the current video
    ///
    /// The previous session is torn down (playback stopped, decoder
    /// released) before the new file is opened. On failure the controller
    /// is left with no video open.
    pub fn open(&mut self, path: &Path) -> Result<usize, ViewerError> {
        self.close_session();

        let result = self.open_session(path);
        self.report(result)
    }

    fn open_session(&mut self, path: &Path) -> Result<usize, ViewerError> {
        let source = self.backend.open(path)?;
        let total_frames = source.frame_count();
        if total_frames == 0 {
            return Err(OpenError::Empty(path.to_path_buf()).into());
        }

        let output_dir = self.output_dirs.claim(path);
        info!(
            "Session opened: {} ({} frames, output {})",
            path.display(),
            total_frames,
            output_dir.display()
        );
        self.session = Some(Session::new(path, source, output_dir));

        // A first frame that fails to decode still leaves the video open
        let first = self.show_index(0);
        let _ = self.report(first);
        Ok(total_frames)
    }

    /// Stop playback and release the open video, if any
    fn close_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Some(tick) = session.pending_tick.take() {
                self.scheduler.cancel(tick);
            }
            info!("Session closed: {}", session.source_path().display());
            drop(session);
            self.sink.clear_frame();
            self.sink.update_status(&StatusLine::NoFile);
        }
    }

    /// Release everything before the application exits
    pub fn shutdown(&mut self) {
        self.close_session();
        info!("Playback controller shut down");
    }

    pub fn next_frame(&mut self) -> Result<usize, ViewerError> {
        let result = self.move_by(1);
        self.report(result)
    }

    pub fn prev_frame(&mut self) -> Result<usize, ViewerError> {
        let result = self.move_by(-1);
        self.report(result)
    }

    /// Move `count` frames, clamped to the video
    ///
    /// Landing on the first or last frame from elsewhere is a normal skip;
    /// only a skip that cannot move at all is a boundary.
    pub fn skip(&mut self, count: i64) -> Result<usize, ViewerError> {
        let result = self.move_by(count);
        if result.is_ok() && count != 0 {
            let text = if count > 0 {
                format!("Skipped forward {} frames", count)
            } else {
                format!("Skipped back {} frames", count.unsigned_abs())
            };
            self.sink.notify(Notice::info(text));
        }
        self.report(result)
    }

    /// Jump straight to `index`, clamped to the last frame
    pub fn seek_to(&mut self, index: usize) -> Result<usize, ViewerError> {
        let result = match self.session.as_ref().map(|s| s.last_index()) {
            None => Err(ViewerError::NoSession),
            Some(last) => {
                self.pause_for_navigation();
                self.show_index(index.min(last))
            }
        };
        self.report(result)
    }

    fn move_by(&mut self, delta: i64) -> Result<usize, ViewerError> {
        let session = self.session.as_ref().ok_or(ViewerError::NoSession)?;
        let current = session.current_index();
        let target = session.clamped_target(delta);

        self.pause_for_navigation();

        if delta == 0 {
            return Ok(current);
        }
        if target == current {
            let edge = if delta < 0 { Edge::First } else { Edge::Last };
            return Err(ViewerError::Boundary(edge));
        }
        self.show_index(target)
    }

    /// Manual navigation always leaves playback paused
    fn pause_for_navigation(&mut self) {
        if let Some(tick) = self.session.as_mut().and_then(|s| s.pending_tick.take()) {
            self.scheduler.cancel(tick);
            info!("Playback paused by navigation");
            self.sink.notify(Notice::info("Playback paused"));
        }
    }

    /// Start or pause playback; returns whether playback is now running
    pub fn toggle_play(&mut self) -> Result<bool, ViewerError> {
        let now = (self.clock)();
        let result = match self.session.as_mut() {
            None => Err(ViewerError::NoSession),
            Some(session) => match session.pending_tick.take() {
                Some(tick) => {
                    self.scheduler.cancel(tick);
                    info!("Playback paused at frame {}", session.current_index());
                    self.sink.notify(Notice::info("Playback paused"));
                    Ok(false)
                }
                None => {
                    let tick = self.scheduler.schedule(now, self.config.play_interval);
                    session.pending_tick = Some(tick);
                    info!("Playback started at frame {}", session.current_index());
                    self.sink.notify(Notice::info("Playback started"));
                    Ok(true)
                }
            },
        };
        self.report(result)
    }

    /// Fire the pending tick if it is due; returns whether one ran
    pub fn poll(&mut self) -> bool {
        let now = (self.clock)();
        let Some(handle) = self.scheduler.fire_due(now) else {
            return false;
        };

        let owned = self
            .session
            .as_ref()
            .is_some_and(|s| s.pending_tick == Some(handle));
        if !owned {
            debug!("Dropping stale tick {:?}", handle);
            return false;
        }

        self.tick();
        true
    }

    /// One playback step: advance, or stop at the end of the video
    fn tick(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.pending_tick = None;
        let current = session.current_index();

        if current < session.last_index() {
            match self.show_index(current + 1) {
                Ok(_) => {
                    let now = (self.clock)();
                    let tick = self.scheduler.schedule(now, self.config.play_interval);
                    if let Some(session) = self.session.as_mut() {
                        session.pending_tick = Some(tick);
                    }
                }
                Err(err) => {
                    info!("Playback stopped at frame {}", current);
                    let _ = self.report::<()>(Err(err));
                }
            }
        } else {
            info!("End of video reached, rewinding");
            // The rewind holds even when frame 0 fails to decode
            session.current_index = 0;
            let status = session.status_line(self.config.filename_max_len);
            self.sink.update_status(&status);
            let rewind = self.show_index(0);
            let _ = self.report(rewind);
            self.sink.notify(Notice::info("End of video reached"));
        }
    }

    /// Canvas size changed; redraw the current frame to fit
    pub fn resize_viewport(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport {
            return;
        }
        debug!("Viewport resized to {}x{}", width, height);
        self.viewport = viewport;

        if let Some(index) = self.current_index() {
            let result = self.show_index(index);
            let _ = self.report(result);
        }
    }

    /// Export the current frame to the session's output directory
    pub fn save_current_frame(&mut self) -> Result<PathBuf, ViewerError> {
        let result = self.export_current();
        if let Ok(path) = &result {
            self.sink
                .notify(Notice::info(format!("Frame saved to {}", path.display())));
        }
        self.report(result)
    }

    fn export_current(&mut self) -> Result<PathBuf, ViewerError> {
        let session = self.session.as_mut().ok_or(ViewerError::NoSession)?;
        let frame = session.source.decode(session.current_index)?;
        save_frame(&session.output_dir, &frame, self.config.export_format)
    }

    /// Decode `index`, make it current and render it
    ///
    /// On failure the current index is left unchanged.
    fn show_index(&mut self, index: usize) -> Result<usize, ViewerError> {
        let session = self.session.as_mut().ok_or(ViewerError::NoSession)?;
        let frame = session.source.decode(index)?;
        session.current_index = index;

        let placement = Placement::fit(frame.width(), frame.height(), self.viewport);
        self.sink.present_frame(&frame, placement);
        self.sink
            .update_status(&session.status_line(self.config.filename_max_len));
        Ok(index)
    }

    /// Log a failure and surface it as a notice
    fn report<T>(&mut self, result: Result<T, ViewerError>) -> Result<T, ViewerError> {
        if let Err(err) = &result {
            if err.is_boundary() {
                debug!("{}", err);
            } else {
                warn!("{}", err);
            }
            self.sink.notify(Notice::from(err));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::render::NoticeKind;
    use crate::video::Frame;
    use image::RgbImage;
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;
    use std::time::Duration;
    use tempfile::TempDir;

    const INTERVAL: Duration = Duration::from_millis(100);

    /// Live decoder handles, shared between the backend and its sources
    #[derive(Default)]
    struct Handles {
        open: Cell<usize>,
        max_open: Cell<usize>,
        released: RefCell<Vec<PathBuf>>,
    }

    struct FakeSource {
        path: PathBuf,
        total: usize,
        corrupt: HashSet<usize>,
        decodes: Rc<Cell<usize>>,
        handles: Rc<Handles>,
    }

    impl FrameSource for FakeSource {
        fn frame_count(&self) -> usize {
            self.total
        }

        fn decode(&mut self, index: usize) -> Result<Frame, DecodeError> {
            crate::video::check_index(index, self.total)?;
            self.decodes.set(self.decodes.get() + 1);
            if self.corrupt.contains(&index) {
                return Err(DecodeError::Unavailable {
                    index,
                    reason: "truncated packet".to_string(),
                });
            }
            Ok(Frame::new(index, RgbImage::new(320, 240)))
        }
    }

    impl Drop for FakeSource {
        fn drop(&mut self) {
            self.handles.open.set(self.handles.open.get() - 1);
            self.handles.released.borrow_mut().push(self.path.clone());
        }
    }

    /// Videos by path: frame count and undecodable indices
    #[derive(Default)]
    struct FakeBackend {
        videos: HashMap<PathBuf, (usize, HashSet<usize>)>,
        decodes: Rc<Cell<usize>>,
        handles: Rc<Handles>,
    }

    impl FakeBackend {
        fn with_video(mut self, path: &str, total: usize) -> Self {
            self.videos.insert(PathBuf::from(path), (total, HashSet::new()));
            self
        }

        fn with_corrupt_video(mut self, path: &str, total: usize, corrupt: &[usize]) -> Self {
            self.videos
                .insert(PathBuf::from(path), (total, corrupt.iter().copied().collect()));
            self
        }
    }

    impl VideoBackend for FakeBackend {
        type Source = FakeSource;

        fn open(&mut self, path: &Path) -> Result<FakeSource, OpenError> {
            let (total, corrupt) = self
                .videos
                .get(path)
                .cloned()
                .ok_or_else(|| OpenError::Unsupported {
                    path: path.to_path_buf(),
                    reason: "not a video".to_string(),
                })?;
            let open = self.handles.open.get() + 1;
            self.handles.open.set(open);
            self.handles.max_open.set(self.handles.max_open.get().max(open));
            Ok(FakeSource {
                path: path.to_path_buf(),
                total,
                corrupt,
                decodes: self.decodes.clone(),
                handles: self.handles.clone(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<(usize, Placement)>,
        statuses: Vec<StatusLine>,
        notices: Vec<Notice>,
        cleared: usize,
    }

    impl RecordingSink {
        fn last_notice(&self) -> Option<&str> {
            self.notices.last().map(|n| n.text.as_str())
        }

        fn last_status(&self) -> Option<String> {
            self.statuses.last().map(|s| s.to_string())
        }
    }

    impl RenderSink for RecordingSink {
        fn present_frame(&mut self, frame: &Frame, placement: Placement) {
            self.frames.push((frame.index, placement));
        }

        fn clear_frame(&mut self) {
            self.cleared += 1;
        }

        fn update_status(&mut self, status: &StatusLine) {
            self.statuses.push(status.clone());
        }

        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
    }

    /// Hand-advanced clock
    #[derive(Clone)]
    struct ManualClock(Rc<Cell<Instant>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Rc::new(Cell::new(Instant::now())))
        }

        fn advance(&self, by: Duration) {
            self.0.set(self.0.get() + by);
        }

        fn boxed(&self) -> Clock {
            let now = self.0.clone();
            Box::new(move || now.get())
        }
    }

    struct Fixture {
        controller: PlaybackController<FakeBackend, RecordingSink>,
        clock: ManualClock,
        decodes: Rc<Cell<usize>>,
        handles: Rc<Handles>,
        _output: TempDir,
    }

    fn fixture(backend: FakeBackend) -> Fixture {
        let output = tempfile::tempdir().unwrap();
        let config = ViewerConfig {
            output_root: output.path().to_path_buf(),
            ..ViewerConfig::default()
        };
        let clock = ManualClock::new();
        let decodes = backend.decodes.clone();
        let handles = backend.handles.clone();
        let controller =
            PlaybackController::with_clock(config, backend, RecordingSink::default(), clock.boxed());
        Fixture {
            controller,
            clock,
            decodes,
            handles,
            _output: output,
        }
    }

    fn opened(total: usize) -> Fixture {
        let mut fx = fixture(FakeBackend::default().with_video("/videos/clip.mp4", total));
        fx.controller.open(Path::new("/videos/clip.mp4")).unwrap();
        fx
    }

    #[test]
    fn test_starts_without_session() {
        let fx = fixture(FakeBackend::default());
        assert_eq!(fx.controller.play_state(), PlayState::NoSession);
        assert_eq!(fx.controller.current_index(), None);
        assert_eq!(fx.controller.sink().last_status().as_deref(), Some("No file loaded"));
    }

    #[test]
    fn test_open_shows_first_frame() {
        let fx = opened(30);
        assert_eq!(fx.controller.play_state(), PlayState::Idle);
        assert_eq!(fx.controller.current_index(), Some(0));

        let sink = fx.controller.sink();
        assert_eq!(sink.frames.len(), 1);
        assert_eq!(
            sink.frames[0].1,
            Placement { x: 33, y: 0, width: 933, height: 700 }
        );
        assert_eq!(sink.last_status().as_deref(), Some("File: clip.mp4 | Frame: 0/29"));

        let session = fx.controller.session().unwrap();
        assert_eq!(session.total_frames(), 30);
        assert!(session.output_dir().ends_with("clip"));
        assert!(session.output_dir().is_dir());
    }

    #[test]
    fn test_open_failure_leaves_no_session() {
        let mut fx = fixture(FakeBackend::default());
        let result = fx.controller.open(Path::new("/videos/notes.txt"));

        assert!(matches!(result, Err(ViewerError::Open(_))));
        assert_eq!(fx.controller.play_state(), PlayState::NoSession);
        assert_eq!(fx.controller.sink().notices.last().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_open_empty_video_is_rejected() {
        let mut fx = fixture(FakeBackend::default().with_video("/videos/empty.mp4", 0));
        let result = fx.controller.open(Path::new("/videos/empty.mp4"));

        assert!(matches!(result, Err(ViewerError::Open(OpenError::Empty(_)))));
        assert_eq!(fx.controller.play_state(), PlayState::NoSession);
        assert_eq!(fx.handles.open.get(), 0);
    }

    #[test]
    fn test_next_and_prev_frame() {
        let mut fx = opened(30);
        assert_eq!(fx.controller.next_frame().unwrap(), 1);
        assert_eq!(fx.controller.next_frame().unwrap(), 2);
        assert_eq!(fx.controller.prev_frame().unwrap(), 1);
        assert_eq!(
            fx.controller.sink().last_status().as_deref(),
            Some("File: clip.mp4 | Frame: 1/29")
        );
    }

    #[test]
    fn test_next_frame_at_last_frame_is_boundary() {
        let mut fx = opened(30);
        fx.controller.seek_to(29).unwrap();
        let frames_before = fx.controller.sink().frames.len();

        let result = fx.controller.next_frame();
        assert!(matches!(result, Err(ViewerError::Boundary(Edge::Last))));
        assert_eq!(fx.controller.current_index(), Some(29));
        assert_eq!(fx.controller.sink().frames.len(), frames_before);

        let notice = fx.controller.sink().notices.last().unwrap();
        assert_eq!(notice.kind, NoticeKind::Boundary);
        assert_eq!(notice.text, "Already at last frame");
    }

    #[test]
    fn test_prev_frame_at_first_frame_is_boundary() {
        let mut fx = opened(30);
        let result = fx.controller.prev_frame();

        assert!(matches!(result, Err(ViewerError::Boundary(Edge::First))));
        assert_eq!(fx.controller.current_index(), Some(0));
        assert_eq!(fx.controller.sink().last_notice(), Some("Already at first frame"));
    }

    #[test]
    fn test_skip_back_clamps_to_zero() {
        let mut fx = opened(30);
        fx.controller.seek_to(5).unwrap();

        assert_eq!(fx.controller.skip(-10).unwrap(), 0);
        assert_eq!(fx.controller.sink().last_notice(), Some("Skipped back 10 frames"));
    }

    #[test]
    fn test_skip_forward_clamps_to_last_frame() {
        let mut fx = opened(30);
        fx.controller.seek_to(27).unwrap();

        assert_eq!(fx.controller.skip(10).unwrap(), 29);
        assert_eq!(fx.controller.current_index(), Some(29));
    }

    #[test]
    fn test_skip_through_thirty_frames() {
        let mut fx = opened(30);

        assert_eq!(fx.controller.skip(10).unwrap(), 10);
        assert_eq!(fx.controller.skip(10).unwrap(), 20);
        // Clamped move, not a boundary
        assert_eq!(fx.controller.skip(10).unwrap(), 29);
        assert!(fx
            .controller
            .sink()
            .notices
            .iter()
            .all(|n| n.kind != NoticeKind::Boundary));
        assert_eq!(fx.controller.sink().last_notice(), Some("Skipped forward 10 frames"));

        // Now the skip cannot move at all
        let result = fx.controller.skip(10);
        assert!(matches!(result, Err(ViewerError::Boundary(Edge::Last))));
        assert_eq!(fx.controller.current_index(), Some(29));
        assert_eq!(fx.controller.sink().last_notice(), Some("Already at last frame"));
    }

    #[test]
    fn test_navigation_without_session() {
        let mut fx = fixture(FakeBackend::default());

        assert!(matches!(fx.controller.next_frame(), Err(ViewerError::NoSession)));
        assert!(matches!(fx.controller.skip(-10), Err(ViewerError::NoSession)));
        assert!(matches!(fx.controller.toggle_play(), Err(ViewerError::NoSession)));
        assert!(matches!(fx.controller.save_current_frame(), Err(ViewerError::NoSession)));
        assert_eq!(fx.controller.play_state(), PlayState::NoSession);
        assert_eq!(fx.controller.sink().last_notice(), Some("No video loaded"));
    }

    #[test]
    fn test_decode_failure_keeps_index() {
        let mut fx = fixture(
            FakeBackend::default().with_corrupt_video("/videos/broken.mp4", 30, &[3]),
        );
        fx.controller.open(Path::new("/videos/broken.mp4")).unwrap();
        fx.controller.seek_to(2).unwrap();

        let result = fx.controller.next_frame();
        assert!(matches!(result, Err(ViewerError::Decode(_))));
        assert_eq!(fx.controller.current_index(), Some(2));
        assert_eq!(fx.controller.sink().notices.last().unwrap().kind, NoticeKind::Error);

        // Frames beyond the bad one are still reachable
        assert_eq!(fx.controller.skip(5).unwrap(), 7);
    }

    #[test]
    fn test_toggle_play_then_pause_before_tick() {
        let mut fx = opened(30);

        assert!(fx.controller.toggle_play().unwrap());
        assert_eq!(fx.controller.play_state(), PlayState::Playing);
        assert!(!fx.controller.toggle_play().unwrap());
        assert_eq!(fx.controller.play_state(), PlayState::Idle);
        assert_eq!(fx.controller.current_index(), Some(0));

        // The cancelled tick never fires
        fx.clock.advance(INTERVAL * 5);
        assert!(!fx.controller.poll());
        assert_eq!(fx.controller.current_index(), Some(0));
        assert_eq!(fx.controller.next_deadline(), None);
    }

    #[test]
    fn test_playback_advances_one_frame_per_interval() {
        let mut fx = opened(30);
        fx.controller.toggle_play().unwrap();

        fx.clock.advance(Duration::from_millis(50));
        assert!(!fx.controller.poll());
        assert_eq!(fx.controller.current_index(), Some(0));

        fx.clock.advance(Duration::from_millis(50));
        assert!(fx.controller.poll());
        assert_eq!(fx.controller.current_index(), Some(1));
        // Only one tick per deadline
        assert!(!fx.controller.poll());

        fx.clock.advance(INTERVAL);
        assert!(fx.controller.poll());
        assert_eq!(fx.controller.current_index(), Some(2));
        assert!(fx.controller.is_playing());
        assert_eq!(
            fx.controller.sink().last_status().as_deref(),
            Some("File: clip.mp4 | Frame: 2/29")
        );
    }

    #[test]
    fn test_playback_auto_stops_and_rewinds() {
        let mut fx = opened(3);
        fx.controller.toggle_play().unwrap();

        for expected in [1, 2] {
            fx.clock.advance(INTERVAL);
            assert!(fx.controller.poll());
            assert_eq!(fx.controller.current_index(), Some(expected));
        }

        // Tick at the last frame ends playback
        fx.clock.advance(INTERVAL);
        assert!(fx.controller.poll());
        assert_eq!(fx.controller.current_index(), Some(0));
        assert!(!fx.controller.is_playing());
        assert_eq!(fx.controller.next_deadline(), None);
        assert_eq!(fx.controller.sink().last_notice(), Some("End of video reached"));

        fx.clock.advance(INTERVAL * 3);
        assert!(!fx.controller.poll());
        assert_eq!(fx.controller.current_index(), Some(0));
    }

    #[test]
    fn test_auto_stop_rewinds_even_if_first_frame_fails() {
        let mut fx = fixture(
            FakeBackend::default().with_corrupt_video("/videos/broken.mp4", 5, &[0]),
        );
        // Frame 0 cannot be shown, but the session still opens
        let _ = fx.controller.open(Path::new("/videos/broken.mp4"));
        fx.controller.seek_to(3).unwrap();
        fx.controller.toggle_play().unwrap();

        fx.clock.advance(INTERVAL);
        assert!(fx.controller.poll());
        assert_eq!(fx.controller.current_index(), Some(4));

        fx.clock.advance(INTERVAL);
        assert!(fx.controller.poll());
        assert_eq!(fx.controller.current_index(), Some(0));
        assert!(!fx.controller.is_playing());
        assert_eq!(
            fx.controller.sink().last_status().as_deref(),
            Some("File: broken.mp4 | Frame: 0/4")
        );
        assert!(fx
            .controller
            .sink()
            .notices
            .iter()
            .any(|n| n.kind == NoticeKind::Error));
        assert_eq!(fx.controller.sink().last_notice(), Some("End of video reached"));
    }

    #[test]
    fn test_skip_huge_count_clamps() {
        let mut fx = opened(30);
        fx.controller.seek_to(5).unwrap();

        assert_eq!(fx.controller.skip(i64::MAX).unwrap(), 29);
        assert_eq!(fx.controller.skip(i64::MIN).unwrap(), 0);
    }

    #[test]
    fn test_navigation_pauses_playback() {
        let mut fx = opened(30);
        fx.controller.toggle_play().unwrap();

        assert_eq!(fx.controller.next_frame().unwrap(), 1);
        assert_eq!(fx.controller.play_state(), PlayState::Idle);
        assert!(fx
            .controller
            .sink()
            .notices
            .iter()
            .any(|n| n.text == "Playback paused"));

        fx.clock.advance(INTERVAL * 3);
        assert!(!fx.controller.poll());
        assert_eq!(fx.controller.current_index(), Some(1));
    }

    #[test]
    fn test_boundary_navigation_still_pauses() {
        let mut fx = opened(30);
        fx.controller.toggle_play().unwrap();

        assert!(fx.controller.prev_frame().is_err());
        assert!(!fx.controller.is_playing());
    }

    #[test]
    fn test_decode_failure_during_playback_stops() {
        let mut fx = fixture(
            FakeBackend::default().with_corrupt_video("/videos/broken.mp4", 30, &[2]),
        );
        fx.controller.open(Path::new("/videos/broken.mp4")).unwrap();
        fx.controller.toggle_play().unwrap();

        fx.clock.advance(INTERVAL);
        assert!(fx.controller.poll());
        assert_eq!(fx.controller.current_index(), Some(1));

        fx.clock.advance(INTERVAL);
        assert!(fx.controller.poll());
        assert_eq!(fx.controller.current_index(), Some(1));
        assert!(!fx.controller.is_playing());
    }

    #[test]
    fn test_open_second_video_while_playing() {
        let backend = FakeBackend::default()
            .with_video("/videos/first.mp4", 30)
            .with_video("/videos/second.mp4", 12);
        let mut fx = fixture(backend);

        fx.controller.open(Path::new("/videos/first.mp4")).unwrap();
        fx.controller.toggle_play().unwrap();
        fx.clock.advance(INTERVAL);
        fx.controller.poll();
        assert_eq!(fx.controller.current_index(), Some(1));

        assert_eq!(fx.controller.open(Path::new("/videos/second.mp4")).unwrap(), 12);

        assert_eq!(fx.controller.play_state(), PlayState::Idle);
        assert_eq!(fx.controller.current_index(), Some(0));
        assert_eq!(
            fx.handles.released.borrow().as_slice(),
            &[PathBuf::from("/videos/first.mp4")]
        );
        assert_eq!(fx.handles.open.get(), 1);
        assert_eq!(fx.handles.max_open.get(), 1);

        // The first video's tick is gone
        fx.clock.advance(INTERVAL * 3);
        assert!(!fx.controller.poll());
        assert_eq!(fx.controller.current_index(), Some(0));
    }

    #[test]
    fn test_failed_open_releases_previous_video() {
        let mut fx = opened(30);
        assert!(fx.controller.open(Path::new("/videos/missing.mp4")).is_err());

        assert_eq!(fx.controller.play_state(), PlayState::NoSession);
        assert_eq!(fx.handles.open.get(), 0);
        assert_eq!(fx.controller.sink().cleared, 1);
        assert_eq!(fx.controller.sink().last_status().as_deref(), Some("No file loaded"));
    }

    #[test]
    fn test_resize_rerenders_current_frame() {
        let mut fx = opened(30);
        fx.controller.seek_to(4).unwrap();
        let decodes = fx.decodes.get();

        fx.controller.resize_viewport(640, 480);
        let sink = fx.controller.sink();
        assert_eq!(
            sink.frames.last(),
            Some(&(4, Placement { x: 0, y: 0, width: 640, height: 480 }))
        );
        assert_eq!(fx.decodes.get(), decodes + 1);

        // Same size again is a no-op
        fx.controller.resize_viewport(640, 480);
        assert_eq!(fx.decodes.get(), decodes + 1);
    }

    #[test]
    fn test_seek_to_clamps() {
        let mut fx = opened(30);
        assert_eq!(fx.controller.seek_to(100).unwrap(), 29);
        assert_eq!(fx.controller.seek_to(0).unwrap(), 0);
    }

    #[test]
    fn test_save_current_frame() {
        let mut fx = opened(30);
        fx.controller.skip(10).unwrap();

        let path = fx.controller.save_current_frame().unwrap();
        assert!(path.ends_with("clip/frame_10.png"));
        assert!(path.is_file());
        assert_eq!(
            fx.controller.sink().last_notice(),
            Some(format!("Frame saved to {}", path.display()).as_str())
        );
    }

    #[test]
    fn test_shutdown_releases_decoder() {
        let mut fx = opened(30);
        fx.controller.toggle_play().unwrap();
        fx.controller.shutdown();

        assert_eq!(fx.controller.play_state(), PlayState::NoSession);
        assert_eq!(fx.handles.open.get(), 0);
        assert_eq!(fx.controller.next_deadline(), None);
    }
}
