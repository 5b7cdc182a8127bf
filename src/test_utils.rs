//! Recording doubles for [`Backend`] and [`Canvas`].
//!
//! Every call and every resource release is appended to a shared [`Journal`],
//! so tests can assert on ordering across the backend, the context and the
//! font texture.

use crate::config::{Config, GlyphGeometry};
use crate::error::{InitError, InitResult};
use crate::renderer::backend::{Backend, Canvas, Color, InputEvent, Rect};
use crate::renderer::font_atlas::FontAtlas;
use crate::renderer::text::LoadedFont;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Shared log of backend activity.
pub type Journal = Rc<RefCell<Vec<Call>>>;

/// One recorded glyph copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyCall {
    pub texture: u32,
    pub src: Rect,
    pub dst: Rect,
}

/// Everything the doubles record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Init,
    CreateDisplay,
    CreateContext,
    CreateTexture { width: u32, height: u32 },
    Poll,
    Clear(Color),
    Copy(CopyCall),
    Present,
    Delay(u32),
    Release(&'static str),
    Shutdown,
}

/// Startup step that should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Init,
    Display,
    Context,
    Texture,
}

/// Texture handle that records its release.
#[derive(Debug)]
pub struct MockTexture {
    pub id: u32,
    journal: Journal,
}

impl Drop for MockTexture {
    fn drop(&mut self) {
        self.journal.borrow_mut().push(Call::Release("texture"));
    }
}

/// Window handle that records its release.
#[derive(Debug)]
pub struct MockDisplay {
    journal: Journal,
}

impl Drop for MockDisplay {
    fn drop(&mut self) {
        self.journal.borrow_mut().push(Call::Release("display"));
    }
}

/// Canvas that records draw calls instead of rendering.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    journal: Journal,
    fail_texture: bool,
    next_texture: u32,
}

impl RecordingCanvas {
    /// Glyph copies recorded so far, in order.
    pub fn copies(&self) -> Vec<CopyCall> {
        copies_in(&self.journal)
    }
}

impl Drop for RecordingCanvas {
    fn drop(&mut self) {
        self.journal.borrow_mut().push(Call::Release("context"));
    }
}

impl Canvas for RecordingCanvas {
    type Texture = MockTexture;

    fn create_texture(&mut self, atlas: &FontAtlas) -> InitResult<MockTexture> {
        if self.fail_texture {
            return Err(InitError::FontConversion("mock texture failure".to_string()));
        }
        self.journal.borrow_mut().push(Call::CreateTexture {
            width: atlas.width(),
            height: atlas.height(),
        });
        self.next_texture += 1;
        Ok(MockTexture {
            id: self.next_texture,
            journal: self.journal.clone(),
        })
    }

    fn clear(&mut self, color: Color) {
        self.journal.borrow_mut().push(Call::Clear(color));
    }

    fn copy(&mut self, texture: &MockTexture, src: Rect, dst: Rect) {
        self.journal.borrow_mut().push(Call::Copy(CopyCall {
            texture: texture.id,
            src,
            dst,
        }));
    }

    fn present(&mut self) {
        self.journal.borrow_mut().push(Call::Present);
    }
}

/// Backend with scripted input and clock.
///
/// Each poll pops the next batch of events; once the script runs out every
/// poll reports [`InputEvent::Quit`]. Each `ticks` call pops the next scripted
/// value, repeating the last one when the script is empty.
#[derive(Debug, Default)]
pub struct MockBackend {
    pub journal: Journal,
    fail_at: Option<FailAt>,
    polls: VecDeque<Vec<InputEvent>>,
    ticks: RefCell<VecDeque<u32>>,
    last_tick: RefCell<u32>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(mut self, step: FailAt) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn with_polls(mut self, polls: Vec<Vec<InputEvent>>) -> Self {
        self.polls = polls.into();
        self
    }

    pub fn with_ticks(self, ticks: Vec<u32>) -> Self {
        *self.ticks.borrow_mut() = ticks.into();
        self
    }

    fn record(&self, call: Call) {
        self.journal.borrow_mut().push(call);
    }

    fn fails_at(&self, step: FailAt) -> bool {
        self.fail_at == Some(step)
    }
}

impl Backend for MockBackend {
    type Display = MockDisplay;
    type Context = RecordingCanvas;

    fn init(&mut self) -> InitResult<()> {
        if self.fails_at(FailAt::Init) {
            return Err(InitError::GraphicsSubsystem("mock init failure".to_string()));
        }
        self.record(Call::Init);
        Ok(())
    }

    fn create_display(&mut self, _config: &Config) -> InitResult<MockDisplay> {
        if self.fails_at(FailAt::Display) {
            return Err(InitError::SurfaceOrContext("mock window failure".to_string()));
        }
        self.record(Call::CreateDisplay);
        Ok(MockDisplay {
            journal: self.journal.clone(),
        })
    }

    fn create_context(
        &mut self,
        _display: &MockDisplay,
        _config: &Config,
    ) -> InitResult<RecordingCanvas> {
        if self.fails_at(FailAt::Context) {
            return Err(InitError::SurfaceOrContext("mock context failure".to_string()));
        }
        self.record(Call::CreateContext);
        Ok(RecordingCanvas {
            journal: self.journal.clone(),
            fail_texture: self.fails_at(FailAt::Texture),
            next_texture: 0,
        })
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.record(Call::Poll);
        self.polls
            .pop_front()
            .unwrap_or_else(|| vec![InputEvent::Quit])
    }

    fn ticks(&self) -> u32 {
        if let Some(tick) = self.ticks.borrow_mut().pop_front() {
            *self.last_tick.borrow_mut() = tick;
        }
        *self.last_tick.borrow()
    }

    fn delay(&mut self, ms: u32) {
        self.record(Call::Delay(ms));
    }

    fn shutdown(&mut self) {
        self.record(Call::Shutdown);
    }
}

/// Glyph copies in `journal`, in order.
pub fn copies_in(journal: &Journal) -> Vec<CopyCall> {
    journal
        .borrow()
        .iter()
        .filter_map(|call| match call {
            Call::Copy(copy) => Some(*copy),
            _ => None,
        })
        .collect()
}

/// A font handle for text tests, backed by a texture that records into its own journal.
pub fn font_of(id: u32, width: u32, height: u32) -> LoadedFont<MockTexture> {
    let atlas = FontAtlas::from_image(
        DynamicImage::new_rgba8(width, height),
        Color::rgb(255, 0, 255),
        GlyphGeometry::default(),
    );
    LoadedFont::new(mock_texture(id), &atlas)
}

/// A texture recording into its own journal, for fonts built outside a backend.
pub fn mock_texture(id: u32) -> MockTexture {
    MockTexture {
        id,
        journal: Journal::default(),
    }
}

/// Writes a 192x192 magenta-keyed BMP atlas into `dir` and returns its path.
pub fn write_test_font(dir: &Path) -> PathBuf {
    let path = dir.join("font.bmp");
    RgbImage::from_pixel(192, 192, Rgb([255, 0, 255]))
        .save_with_format(&path, ImageFormat::Bmp)
        .expect("write test font");
    path
}
