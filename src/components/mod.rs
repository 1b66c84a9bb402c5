// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Component registry and the built-in components.

mod exposed;
mod gateway;
mod node;
mod registry;
mod socket;

pub use exposed::{exposed_input_name, exposed_output_name, exposed_sockets_package};
pub use gateway::{Pairings, SceneGateway, PAIRING_ATTRIBUTE, SCENE_GATEWAY};
pub use node::NodeComponent;
pub use registry::ComponentRegistry;
pub use socket::{Direction, SocketDecl, SIGNAL_TYPE};
