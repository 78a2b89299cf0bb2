use swipedeck_graphics::Point;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// A single pointer sample delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub position: Point,
    /// Host timestamp in milliseconds. Only differences matter.
    pub time_millis: i64,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point, time_millis: i64) -> Self {
        Self {
            id: 0,
            kind,
            position,
            time_millis,
        }
    }

    pub fn down(position: Point, time_millis: i64) -> Self {
        Self::new(PointerEventKind::Down, position, time_millis)
    }

    pub fn moved(position: Point, time_millis: i64) -> Self {
        Self::new(PointerEventKind::Move, position, time_millis)
    }

    pub fn up(position: Point, time_millis: i64) -> Self {
        Self::new(PointerEventKind::Up, position, time_millis)
    }

    pub fn cancel(position: Point, time_millis: i64) -> Self {
        Self::new(PointerEventKind::Cancel, position, time_millis)
    }

    pub fn with_id(mut self, id: PointerId) -> Self {
        self.id = id;
        self
    }
}
