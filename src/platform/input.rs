//! Input mapping
//!
//! Pointer and touch positions arrive in client (page) coordinates. The
//! drawing surface may be scaled by layout, so positions go through the
//! surface's on-screen rect before becoming a movement target in field units.

use glam::Vec2;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::{Engine, EventSink, FrameTicket};

/// On-screen placement of the drawing surface, in client pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Client coordinates → field coordinates
#[derive(Debug, Clone, Copy)]
pub struct PointerMapper {
    rect: SurfaceRect,
    field: Vec2,
}

impl PointerMapper {
    pub fn new(rect: SurfaceRect) -> Self {
        Self {
            rect,
            field: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
        }
    }

    /// Surface moved or was resized
    pub fn set_rect(&mut self, rect: SurfaceRect) {
        self.rect = rect;
    }

    pub fn to_field(&self, client_x: f32, client_y: f32) -> Vec2 {
        // Collapsed rect (hidden surface): keep the raw offset
        let sx = if self.rect.width > 0.0 {
            self.field.x / self.rect.width
        } else {
            1.0
        };
        let sy = if self.rect.height > 0.0 {
            self.field.y / self.rect.height
        } else {
            1.0
        };
        Vec2::new((client_x - self.rect.left) * sx, (client_y - self.rect.top) * sy)
    }
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

impl Key {
    /// From a DOM-style key name
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse move or first touch point, client coordinates
    PointerMove { x: f32, y: f32 },
    KeyDown(Key),
}

/// Feed one input event to the engine. Returns the frame ticket to schedule
/// when the event resumed the run.
pub fn dispatch<S: EventSink>(
    engine: &mut Engine<S>,
    mapper: &PointerMapper,
    event: InputEvent,
) -> Option<FrameTicket> {
    match event {
        InputEvent::PointerMove { x, y } => {
            engine.set_target(mapper.to_field(x, y));
            None
        }
        InputEvent::KeyDown(Key::Escape) => {
            if engine.toggle_pause() {
                None
            } else {
                engine.pending_frame()
            }
        }
        InputEvent::KeyDown(Key::Other) => None,
    }
}
