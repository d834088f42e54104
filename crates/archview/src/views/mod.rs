//! Views over the architecture graph
//!
//! [`ModelView`] is the membership engine for every model-backed view type;
//! its per-type behavior is selected by [`ViewKind`]. [`FilteredView`] and
//! [`ImageView`] sit alongside it in the [`ViewSet`].

mod animation;
mod containment;
mod deployment;
mod dynamic;
mod element_view;
mod filtered;
mod image;
pub mod layout_merge;
mod relationship_view;
mod static_views;
mod view;
mod view_set;

pub use animation::*;
pub use element_view::*;
pub use filtered::*;
pub use image::*;
pub use layout_merge::*;
pub use relationship_view::*;
pub use view::*;
pub use view_set::*;
