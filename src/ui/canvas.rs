use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Pixels, Point, Rectangle, Renderer, Size, Theme, Vector};

use crate::state::edit::{CropRect, Dimensions};
use crate::Message;

/// Length of the resize handle arms in screen pixels
const HANDLE_SIZE: f32 = 20.0;

/// Crop selection drawn on top of the displayed image
///
/// The selection is kept in image pixel coordinates; this program only maps
/// it onto the screen and turns drags into `Message::CropChanged`.
pub struct CropOverlay {
    /// Size of the displayed image in pixels
    pub image: Dimensions,
    /// Current selection in image pixels
    pub rect: CropRect,
}

impl CropOverlay {
    pub fn new(image: Dimensions, rect: CropRect) -> Self {
        Self { image, rect }
    }
}

impl Program<Message> for CropOverlay {
    type State = DragState;

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let fit = Fit::new(bounds.size(), self.image);
        let image = fit.image_bounds();
        let crop = fit.to_screen(self.rect);

        // Dim everything outside the selection
        let shade = Color::from_rgba(0.0, 0.0, 0.0, 0.5);
        let shaded = [
            Rectangle::new(image.position(), Size::new(image.width, crop.y - image.y)),
            Rectangle::new(
                Point::new(image.x, crop.y + crop.height),
                Size::new(image.width, image.y + image.height - crop.y - crop.height),
            ),
            Rectangle::new(Point::new(image.x, crop.y), Size::new(crop.x - image.x, crop.height)),
            Rectangle::new(
                Point::new(crop.x + crop.width, crop.y),
                Size::new(image.x + image.width - crop.x - crop.width, crop.height),
            ),
        ];
        for area in shaded {
            if area.width > 0.0 && area.height > 0.0 {
                frame.fill_rectangle(area.position(), area.size(), shade);
            }
        }

        frame.stroke(
            &Path::rectangle(crop.position(), crop.size()),
            Stroke::default().with_color(Color::WHITE).with_width(1.0),
        );

        // Resize handle in the bottom-right corner
        let corner = Point::new(crop.x + crop.width, crop.y + crop.height);
        let handle = Path::new(|builder| {
            builder.move_to(corner - Vector::new(HANDLE_SIZE, 0.0));
            builder.line_to(corner);
            builder.line_to(corner - Vector::new(0.0, HANDLE_SIZE));
        });
        frame.stroke(
            &handle,
            Stroke::default().with_color(Color::WHITE).with_width(4.0),
        );

        // Show the selection size while dragging
        if state.drag.is_some() {
            frame.fill_text(canvas::Text {
                content: format!("{} x {}", self.rect.width, self.rect.height),
                position: Point::new(crop.x + 6.0, crop.y + 6.0),
                color: Color::WHITE,
                size: Pixels(14.0),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Mouse button press - start moving or resizing
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let Some(position) = cursor.position_in(bounds) else {
                    return (canvas::event::Status::Ignored, None);
                };
                let fit = Fit::new(bounds.size(), self.image);
                if let Some(mode) = hit_test(fit.to_screen(self.rect), position) {
                    state.drag = Some(Drag {
                        mode,
                        anchor: position,
                        start: self.rect,
                    });
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse button release - stop dragging
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.drag.take().is_some() {
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse move - update the selection if dragging
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if let (Some(drag), Some(position)) = (&state.drag, cursor.position()) {
                    // position_in() is None once the cursor leaves the canvas,
                    // so work with window coordinates here
                    let position = position - Vector::new(bounds.x, bounds.y);
                    let fit = Fit::new(bounds.size(), self.image);
                    let delta = (position - drag.anchor) * (1.0 / fit.scale);
                    let rect = drag_rect(drag.mode, drag.start, delta, self.image);

                    let message = (rect != self.rect).then_some(Message::CropChanged(rect));
                    return (canvas::event::Status::Captured, message);
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.drag.is_some() {
            return mouse::Interaction::Grabbing;
        }

        let fit = Fit::new(bounds.size(), self.image);
        match cursor
            .position_in(bounds)
            .and_then(|position| hit_test(fit.to_screen(self.rect), position))
        {
            Some(DragMode::Resize) => mouse::Interaction::Crosshair,
            Some(DragMode::Move) => mouse::Interaction::Grab,
            None => mouse::Interaction::default(),
        }
    }
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    drag: Option<Drag>,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    mode: DragMode,
    /// Where the drag started, relative to the canvas
    anchor: Point,
    /// Selection when the drag started
    start: CropRect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Move,
    Resize,
}

/// Placement of an image drawn with `ContentFit::Contain` inside the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fit {
    /// Top-left corner of the image relative to the canvas
    origin: Point,
    /// Screen pixels per image pixel
    scale: f32,
    size: Size,
}

impl Fit {
    fn new(bounds: Size, (width, height): Dimensions) -> Self {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        let scale = (bounds.width / width).min(bounds.height / height).max(f32::EPSILON);
        let size = Size::new(width * scale, height * scale);

        Self {
            origin: Point::new(
                (bounds.width - size.width) / 2.0,
                (bounds.height - size.height) / 2.0,
            ),
            scale,
            size,
        }
    }

    fn image_bounds(&self) -> Rectangle {
        Rectangle::new(self.origin, self.size)
    }

    fn to_screen(&self, rect: CropRect) -> Rectangle {
        Rectangle {
            x: self.origin.x + rect.x as f32 * self.scale,
            y: self.origin.y + rect.y as f32 * self.scale,
            width: rect.width as f32 * self.scale,
            height: rect.height as f32 * self.scale,
        }
    }
}

/// Which part of the selection (if any) is under `position`
fn hit_test(selection: Rectangle, position: Point) -> Option<DragMode> {
    let corner = Point::new(selection.x + selection.width, selection.y + selection.height);
    let handle = Rectangle::new(
        corner - Vector::new(HANDLE_SIZE, HANDLE_SIZE),
        Size::new(HANDLE_SIZE * 1.5, HANDLE_SIZE * 1.5),
    );

    if handle.contains(position) {
        Some(DragMode::Resize)
    } else if selection.contains(position) {
        Some(DragMode::Move)
    } else {
        None
    }
}

/// Selection after dragging by `delta` image pixels, clamped to the image.
///
/// `start` may come from before a rotation, so it is fitted to the current
/// image first.
fn drag_rect(mode: DragMode, start: CropRect, delta: Vector, (width, height): Dimensions) -> CropRect {
    let width = width.max(1);
    let height = height.max(1);
    let start = CropRect {
        x: start.x.min(width - 1),
        y: start.y.min(height - 1),
        width: start.width.clamp(1, width),
        height: start.height.clamp(1, height),
    };

    match mode {
        DragMode::Move => {
            let max_x = (width - start.width) as f32;
            let max_y = (height - start.height) as f32;
            CropRect {
                x: (start.x as f32 + delta.x).round().clamp(0.0, max_x) as u32,
                y: (start.y as f32 + delta.y).round().clamp(0.0, max_y) as u32,
                ..start
            }
        }
        DragMode::Resize => {
            let max_width = (width - start.x) as f32;
            let max_height = (height - start.y) as f32;
            CropRect {
                width: (start.width as f32 + delta.x).round().clamp(1.0, max_width) as u32,
                height: (start.height as f32 + delta.y).round().clamp(1.0, max_height) as u32,
                ..start
            }
        }
    }
}
