//! Archview - view composition for architecture models
//!
//! Given a graph of people, software systems, containers, components and
//! deployment elements, archview builds and maintains the membership of the
//! views drawn over it: which elements and relationships each diagram shows,
//! under the structural rules of its view type.
//!
//! # Quick Start
//!
//! ```rust
//! use archview::prelude::*;
//!
//! let mut model = Model::new();
//! let user = model.add_person("Customer", "A bank customer").unwrap();
//! let bank = model.add_software_system("Internet Banking", "").unwrap();
//! model.add_relationship_between(&user, &bank, "Uses", None).unwrap();
//!
//! let mut views = ViewSet::new();
//! let context = views
//!     .create_system_context_view(&model, &bank, "Context", "")
//!     .unwrap();
//! context.add_default_elements(&model).unwrap();
//!
//! assert_eq!(context.element_count(), 2);
//! assert_eq!(context.relationship_count(), 1);
//! ```
//!
//! # Dynamic Views
//!
//! ```rust
//! use archview::prelude::*;
//!
//! let mut model = Model::new();
//! let user = model.add_person("Customer", "").unwrap();
//! let bank = model.add_software_system("Internet Banking", "").unwrap();
//! model.add_relationship_between(&user, &bank, "Signs in", None).unwrap();
//!
//! let mut views = ViewSet::new();
//! let dynamic = views.create_dynamic_view(&model, None, "SignIn", "").unwrap();
//! let step = dynamic
//!     .add_dynamic_relationship(&model, &user, "Signs in", None, &bank)
//!     .unwrap();
//! assert_eq!(step.order(), "1");
//! ```

pub mod core;
pub mod views;
pub mod workspace;

pub use self::core::*;
pub use self::views::*;
pub use self::workspace::Workspace;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        AutomaticLayout, ElementKind, FilterMode, Model, PaperSize, RankDirection, ViewError,
        ViewResult, ViewType,
    };
    pub use crate::views::{
        DefaultLayoutMergeStrategy, FilteredView, ImageView, LayoutMergeStrategy, ModelView,
        ViewKind, ViewRef, ViewSet,
    };
    pub use crate::workspace::Workspace;
}
