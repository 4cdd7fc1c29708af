use std::{cell::RefCell, rc::Rc};

use crate::{
    foundation::{
        core::{Point, Rgba8},
        error::{SceneError, SceneResult},
    },
    render::surface::{DrawSurface, FrameRGBA, SurfaceFactory},
};

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear {
        color: Rgba8,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Rgba8,
    },
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Rgba8,
    },
}

/// Counters shared between a [`RecordingSurfaceFactory`] and every surface it hands out.
#[derive(Clone, Debug, Default)]
pub struct RecordingLog {
    /// Commands since the most recent `clear`.
    pub current: Vec<DrawCommand>,
    /// Commands of the most recently presented frame.
    pub last_frame: Vec<DrawCommand>,
    pub draw_calls: u64,
    pub clears: u64,
    pub presents: u64,
    pub resizes: Vec<(u32, u32)>,
    /// Sizes requested from the factory, one per surface handed out.
    pub acquisitions: Vec<(u32, u32)>,
    pub pixel_ratio: f64,
}

/// Pixel-less surface recording every call; the test double for renderers.
pub struct RecordingSurface {
    width: u32,
    height: u32,
    log: Rc<RefCell<RecordingLog>>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32, log: Rc<RefCell<RecordingLog>>) -> Self {
        Self { width, height, log }
    }

    fn record(&mut self, cmd: DrawCommand) {
        let mut log = self.log.borrow_mut();
        log.draw_calls += 1;
        log.current.push(cmd);
    }
}

impl DrawSurface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) -> SceneResult<()> {
        if width == 0 || height == 0 {
            return Err(SceneError::surface("recording surface needs a non-zero size"));
        }
        self.width = width;
        self.height = height;
        self.log.borrow_mut().resizes.push((width, height));
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.log.borrow_mut().pixel_ratio = ratio;
    }

    fn clear(&mut self, color: Rgba8) {
        let mut log = self.log.borrow_mut();
        log.clears += 1;
        log.current.clear();
        log.current.push(DrawCommand::Clear { color });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.record(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8) {
        self.record(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn present(&mut self) -> SceneResult<()> {
        let mut log = self.log.borrow_mut();
        log.presents += 1;
        log.last_frame = std::mem::take(&mut log.current);
        Ok(())
    }

    fn readback(&self) -> Option<FrameRGBA> {
        None
    }
}

/// Hands out [`RecordingSurface`]s that all report into one shared log.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurfaceFactory {
    log: Rc<RefCell<RecordingLog>>,
}

impl RecordingSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Rc<RefCell<RecordingLog>> {
        Rc::clone(&self.log)
    }
}

impl SurfaceFactory for RecordingSurfaceFactory {
    fn acquire_2d(&self, width: u32, height: u32) -> Option<Box<dyn DrawSurface>> {
        self.log.borrow_mut().acquisitions.push((width, height));
        Some(Box::new(RecordingSurface::new(
            width,
            height,
            Rc::clone(&self.log),
        )))
    }
}
