pub mod atlas;
pub mod buffer;
pub mod color;
pub mod curve;
pub mod error;
pub mod extrude;
pub mod fill;
pub mod geometry;
pub mod logging;
pub mod source;
pub mod trace;
pub mod trail;

pub use buffer::PixelBuffer;
pub use color::Color;
pub use curve::{Keyframe, ResponseCurve};
pub use error::TrailError;
pub use geometry::{Direction, EdgePoint, PixelRect};
pub use source::{Sprite, Texture};
pub use trail::{MeleeWeaponTrail, TrailConfig, TrailSprite};
