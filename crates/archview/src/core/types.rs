//! Core type definitions for view composition
//!
//! This module contains the small value types shared by the model and the
//! views: element kinds, view types, paper sizes, automatic layout settings
//! and relationship routing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime kind of an architecture element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Person,
    SoftwareSystem,
    Container,
    Component,
    DeploymentNode,
    InfrastructureNode,
    SoftwareSystemInstance,
    ContainerInstance,
    CustomElement,
}

impl ElementKind {
    /// Returns true for elements that live inside a deployment environment
    pub fn is_deployment_element(&self) -> bool {
        matches!(
            self,
            ElementKind::DeploymentNode
                | ElementKind::InfrastructureNode
                | ElementKind::SoftwareSystemInstance
                | ElementKind::ContainerInstance
        )
    }

    /// Returns true for people, software systems, containers and components
    pub fn is_static_structure(&self) -> bool {
        matches!(
            self,
            ElementKind::Person
                | ElementKind::SoftwareSystem
                | ElementKind::Container
                | ElementKind::Component
        )
    }

    /// Returns true for software system and container instances
    pub fn is_instance(&self) -> bool {
        matches!(
            self,
            ElementKind::SoftwareSystemInstance | ElementKind::ContainerInstance
        )
    }

    /// The tag every element of this kind carries by default
    pub fn default_tag(&self) -> &'static str {
        match self {
            ElementKind::Person => "Person",
            ElementKind::SoftwareSystem => "Software System",
            ElementKind::Container => "Container",
            ElementKind::Component => "Component",
            ElementKind::DeploymentNode => "Deployment Node",
            ElementKind::InfrastructureNode => "Infrastructure Node",
            ElementKind::SoftwareSystemInstance => "Software System Instance",
            ElementKind::ContainerInstance => "Container Instance",
            ElementKind::CustomElement => "Custom Element",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default_tag())
    }
}

/// The type of a view, without any per-type data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewType {
    Custom,
    SystemLandscape,
    SystemContext,
    Container,
    Component,
    Dynamic,
    Deployment,
    Filtered,
    Image,
}

impl ViewType {
    /// Prefix used when generating a key for a view of this type
    pub fn key_prefix(&self) -> &'static str {
        match self {
            ViewType::Custom => "Custom",
            ViewType::SystemLandscape => "SystemLandscape",
            ViewType::SystemContext => "SystemContext",
            ViewType::Container => "Container",
            ViewType::Component => "Component",
            ViewType::Dynamic => "Dynamic",
            ViewType::Deployment => "Deployment",
            ViewType::Filtered => "Filtered",
            ViewType::Image => "Image",
        }
    }

    /// Returns true for the view types a filtered view may be based on
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            ViewType::Custom
                | ViewType::SystemLandscape
                | ViewType::SystemContext
                | ViewType::Container
                | ViewType::Component
        )
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key_prefix())
    }
}

/// Paper sizes, in pixels at 300 dpi
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperSize {
    A6Portrait,
    A6Landscape,
    A5Portrait,
    A5Landscape,
    A4Portrait,
    A4Landscape,
    A3Portrait,
    A3Landscape,
    A2Portrait,
    A2Landscape,
    A1Portrait,
    A1Landscape,
    A0Portrait,
    A0Landscape,
    LetterPortrait,
    LetterLandscape,
    LegalPortrait,
    LegalLandscape,
    Slide4x3,
    Slide16x9,
    Slide16x10,
}

impl PaperSize {
    /// Width and height in pixels
    pub fn size(&self) -> (u32, u32) {
        match self {
            PaperSize::A6Portrait => (1240, 1748),
            PaperSize::A6Landscape => (1748, 1240),
            PaperSize::A5Portrait => (1748, 2480),
            PaperSize::A5Landscape => (2480, 1748),
            PaperSize::A4Portrait => (2480, 3508),
            PaperSize::A4Landscape => (3508, 2480),
            PaperSize::A3Portrait => (3508, 4961),
            PaperSize::A3Landscape => (4961, 3508),
            PaperSize::A2Portrait => (4961, 7016),
            PaperSize::A2Landscape => (7016, 4961),
            PaperSize::A1Portrait => (7016, 9933),
            PaperSize::A1Landscape => (9933, 7016),
            PaperSize::A0Portrait => (9933, 14043),
            PaperSize::A0Landscape => (14043, 9933),
            PaperSize::LetterPortrait => (2550, 3300),
            PaperSize::LetterLandscape => (3300, 2550),
            PaperSize::LegalPortrait => (2550, 4200),
            PaperSize::LegalLandscape => (4200, 2550),
            PaperSize::Slide4x3 => (3306, 2480),
            PaperSize::Slide16x9 => (3508, 1973),
            PaperSize::Slide16x10 => (3508, 2193),
        }
    }

    pub fn width(&self) -> u32 {
        self.size().0
    }

    pub fn height(&self) -> u32 {
        self.size().1
    }

    pub fn is_landscape(&self) -> bool {
        self.width() > self.height()
    }
}

/// Explicit diagram dimensions, overriding the paper size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Rank direction for automatic layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum RankDirection {
    #[default]
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

impl fmt::Display for RankDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankDirection::TopBottom => write!(f, "TB"),
            RankDirection::BottomTop => write!(f, "BT"),
            RankDirection::LeftRight => write!(f, "LR"),
            RankDirection::RightLeft => write!(f, "RL"),
        }
    }
}

/// Automatic layout settings for a view
///
/// A view with automatic layout enabled is laid out by the renderer, so
/// layout merging skips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomaticLayout {
    pub rank_direction: RankDirection,
    pub rank_separation: u32,
    pub node_separation: u32,
    pub edge_separation: u32,
    pub vertices: bool,
}

impl Default for AutomaticLayout {
    fn default() -> Self {
        Self {
            rank_direction: RankDirection::TopBottom,
            rank_separation: 300,
            node_separation: 300,
            edge_separation: 0,
            vertices: false,
        }
    }
}

impl AutomaticLayout {
    /// Create layout settings with the given direction and default spacing
    pub fn with_direction(rank_direction: RankDirection) -> Self {
        Self {
            rank_direction,
            ..Default::default()
        }
    }
}

/// Relationship line routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Routing {
    #[default]
    Direct,
    Curved,
    Orthogonal,
}

/// A bend point on a relationship line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Vertex {
    x: i32,
    y: i32,
}

impl Vertex {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Whether a filtered view includes or excludes tagged elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    Include,
    Exclude,
}
