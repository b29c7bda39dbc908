//! Showroom Core - scene controller for the rotating car viewer
//!
//! Renderer-agnostic pieces of the showroom:
//! - palette of model names and body colors
//! - box-based vehicle blueprint
//! - flat scene graph with lights and meshes
//! - perspective camera and damped orbit controls
//! - the controller tying them together behind the animate/resize/change/reset calls

pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod palette;
pub mod scene;
pub mod vehicle;

pub use glam;

pub use camera::{OrbitControls, PerspectiveCamera};
pub use config::ShowroomConfig;
pub use controller::{CurrentVehicle, RenderSurface, Renderer, SceneController, VehicleChange};
pub use error::{Result, ShowroomError};
pub use palette::{BodyColor, Color, ModelName, BODY_COLORS};
pub use scene::{Light, Material, Node, NodeId, NodeKind, Scene, Shape, Transform};
pub use vehicle::{VehicleBlueprint, VehicleHandles, WheelCorner};
