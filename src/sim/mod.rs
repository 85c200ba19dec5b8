//! Deterministic simulation module
//!
//! All show logic lives here. This module must stay pure and deterministic:
//! - Host-supplied timestamps only, dt clamped per frame
//! - Seeded RNG only
//! - Stable iteration order (spawn order, by body ID)
//! - No rendering or platform dependencies

pub mod arcade;
pub mod body;
pub mod boundary;
pub mod collision;
pub mod deform;
pub mod integrate;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use arcade::Arcade;
pub use body::{Body, BodyId, BodyTransform, Variant};
pub use boundary::{FloorMode, PlayBounds, Viewport, WallHits, reclamp, resolve_walls};
pub use collision::{Contact, PairContact, resolve_all, resolve_pair};
pub use deform::Deformation;
pub use integrate::integrate;
pub use scheduler::{Phase, Scheduler};
pub use state::Show;
pub use tick::{Frame, FrameInput, ShowEvent, ShowObserver};
