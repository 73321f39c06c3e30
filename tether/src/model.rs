use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }

    #[inline]
    pub fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }

    #[inline]
    pub fn scale(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }

    #[inline]
    pub fn len(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn dist(self, o: Vec2) -> f32 {
        self.sub(o).len()
    }

    #[inline]
    pub fn midpoint(self, o: Vec2) -> Vec2 {
        Vec2::new(0.5 * (self.x + o.x), 0.5 * (self.y + o.y))
    }
}

/// Item rectangle in board pixels relative to the board origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectBounds {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectBounds {
    pub fn new(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self { center_x, center_y, width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x, self.center_y)
    }

    /// Finite center and strictly positive finite size.
    pub fn is_usable(&self) -> bool {
        self.center_x.is_finite()
            && self.center_y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRef {
    pub item_id: String,
    pub item_type: String,
}

impl ItemRef {
    pub fn new(item_id: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self { item_id: item_id.into(), item_type: item_type.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedEnd {
    #[serde(flatten)]
    pub item: ItemRef,
    // Last free position of this side, used when the item disappears.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_point: Option<Vec2>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    Attached(AttachedEnd),
    Free(Vec2),
}

impl Endpoint {
    pub fn attached(item_id: impl Into<String>, item_type: impl Into<String>) -> Self {
        Endpoint::Attached(AttachedEnd { item: ItemRef::new(item_id, item_type), last_point: None })
    }

    pub fn free(x: f32, y: f32) -> Self {
        Endpoint::Free(Vec2::new(x, y))
    }

    pub fn with_last_point(self, x: f32, y: f32) -> Self {
        match self {
            Endpoint::Attached(end) => Endpoint::Attached(AttachedEnd { last_point: Some(Vec2::new(x, y)), ..end }),
            free => free,
        }
    }

    pub fn item(&self) -> Option<&ItemRef> {
        match self {
            Endpoint::Attached(end) => Some(&end.item),
            Endpoint::Free(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowHead {
    None,
    Line,
    Hollow,
    #[default]
    Filled,
}

impl ArrowHead {
    pub fn as_str(self) -> &'static str {
        match self {
            ArrowHead::None => "none",
            ArrowHead::Line => "line",
            ArrowHead::Hollow => "hollow",
            ArrowHead::Filled => "filled",
        }
    }
}

fn default_color() -> String {
    "black".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: String,
    pub origin: Endpoint,
    pub destination: Endpoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve_control_point: Option<Vec2>,
    #[serde(default)]
    pub arrow_head: ArrowHead,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub z_index: i32,
}

impl Connector {
    pub fn new(id: impl Into<String>, origin: Endpoint, destination: Endpoint) -> Self {
        Self {
            id: id.into(),
            origin,
            destination,
            curve_control_point: None,
            arrow_head: ArrowHead::default(),
            color: default_color(),
            z_index: 0,
        }
    }

    pub fn with_control_point(mut self, x: f32, y: f32) -> Self {
        self.curve_control_point = Some(Vec2::new(x, y));
        self
    }

    pub fn with_arrow_head(mut self, arrow_head: ArrowHead) -> Self {
        self.arrow_head = arrow_head;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Both ends attached to the same item. Derived on every call, never stored.
    pub fn references_same_item(&self) -> bool {
        match (self.origin.item(), self.destination.item()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Origin,
    Destination,
}
