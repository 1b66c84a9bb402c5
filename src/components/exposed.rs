// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::components::{NodeComponent, SocketDecl};

pub const EXPOSED_INPUT_PREFIX: &str = "EXPOSED.IN.";
pub const EXPOSED_OUTPUT_PREFIX: &str = "EXPOSED.OUT.";

/// Name of the pass-through component entering a scene with values of `type_tag`.
pub fn exposed_input_name(type_tag: &str) -> String {
    format!("{}{}", EXPOSED_INPUT_PREFIX, type_tag.to_uppercase())
}

/// Name of the pass-through component leaving a scene with values of `type_tag`.
pub fn exposed_output_name(type_tag: &str) -> String {
    format!("{}{}", EXPOSED_OUTPUT_PREFIX, type_tag.to_uppercase())
}

/// Scene boundary components for each type tag.
///
/// `EXPOSED.IN.<TYPE>` has one exposed output `output`, its value comes from
/// the enclosing scope's value provider. `EXPOSED.OUT.<TYPE>` has one exposed
/// input `input` which it exposes back to the caller. With the `Signal` tag
/// these become trigger sources and signal sinks.
pub fn exposed_sockets_package<I, S>(type_tags: I) -> Vec<NodeComponent>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    type_tags
        .into_iter()
        .flat_map(|type_tag| {
            let type_tag = type_tag.as_ref();
            [
                NodeComponent::new(
                    exposed_input_name(type_tag),
                    vec![SocketDecl::output("output", type_tag).exposed()],
                ),
                NodeComponent::new(
                    exposed_output_name(type_tag),
                    vec![SocketDecl::input("input", type_tag).exposed()],
                ),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Direction, SIGNAL_TYPE};
    use crate::traits::Component;

    #[test]
    fn test_package_shape() {
        let package = exposed_sockets_package([SIGNAL_TYPE, "Number"]);
        assert_eq!(package.len(), 4);

        let signal_in = &package[0];
        assert_eq!(signal_in.name(), "EXPOSED.IN.SIGNAL");
        let output = signal_in.output_socket("output").unwrap();
        assert!(output.is_exposed() && output.is_signal());
        assert_eq!(output.direction(), Direction::Output);

        let number_out = &package[3];
        assert_eq!(number_out.name(), exposed_output_name("Number"));
        assert!(number_out.input_socket("input").unwrap().is_exposed());
        assert!(number_out.output_socket("input").is_none());
    }
}
