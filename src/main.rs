// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{anyhow, bail, Context, Result};
use sceneflow::components::{exposed_sockets_package, ComponentRegistry, SceneGateway, SIGNAL_TYPE};
use sceneflow::config::{load_and_validate_config, EngineConfig};
use sceneflow::data::{FileData, Value, ValueMap};
use sceneflow::engine::Engine;
use sceneflow::traits::ValueProvider;
use std::env;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: sceneflow [--config engine.yaml] <tables.{yaml,json,toml}> <command> [node.socket=value ...]

Commands:
  request <node> <socket>                         pull the value of an exposed socket
  update <node>                                   evaluate a node, print what it exposed
  trigger <socket> (--node <id> | --component <name>)   fire a signal

Example: sceneflow scene.yaml request out input in.output=42";

/// Component types every scene can use from the command line.
const BASIC_TYPES: [&str; 4] = ["Any", "Number", "String", SIGNAL_TYPE];

enum Command {
    Request { node: String, socket: String },
    Update { node: String },
    Trigger { socket: String, node: Option<String>, component: Option<String> },
}

struct Invocation {
    config: Option<String>,
    tables: String,
    command: Command,
    assignments: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("❌ {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(invocation) {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut rest = args.iter().map(String::as_str).peekable();

    let mut config = None;
    if rest.peek() == Some(&"--config") {
        rest.next();
        config = Some(rest.next().ok_or_else(|| anyhow!("--config needs a path"))?.to_string());
    }

    let tables = rest.next().ok_or_else(|| anyhow!("missing tables file"))?.to_string();
    let mut next = |what: &str| {
        rest.next()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("missing {}", what))
    };

    let command = match next("command")?.as_str() {
        "request" => Command::Request {
            node: next("node")?,
            socket: next("socket")?,
        },
        "update" => Command::Update { node: next("node")? },
        "trigger" => {
            let socket = next("socket")?;
            let (node, component) = match next("--node or --component")?.as_str() {
                "--node" => (Some(next("node id")?), None),
                "--component" => (None, Some(next("component name")?)),
                other => bail!("expected --node or --component, got '{}'", other),
            };
            Command::Trigger { socket, node, component }
        }
        other => bail!("unknown command '{}'", other),
    };

    let assignments = rest.map(str::to_string).collect();
    Ok(Invocation {
        config,
        tables,
        command,
        assignments,
    })
}

/// Parse `node.socket=value` pairs. Values are JSON when they parse as JSON,
/// plain strings otherwise.
fn parse_assignments(assignments: &[String]) -> Result<ValueMap> {
    let mut values = ValueMap::new();
    for assignment in assignments {
        let (target, raw) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("expected node.socket=value, got '{}'", assignment))?;
        let (node, socket) = target
            .rsplit_once('.')
            .ok_or_else(|| anyhow!("expected node.socket before '=', got '{}'", target))?;

        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        values.add_value(value, socket, node);
    }
    Ok(values)
}

fn registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry
        .register(SceneGateway)
        .register_package(exposed_sockets_package(BASIC_TYPES));
    registry
}

fn run(invocation: Invocation) -> Result<()> {
    let start_time = Instant::now();

    let config = match &invocation.config {
        Some(path) => load_and_validate_config(path).with_context(|| format!("loading {}", path))?,
        None => EngineConfig::default(),
    };
    let values = parse_assignments(&invocation.assignments)?;
    let provider = if values.is_empty() {
        None
    } else {
        Some(Arc::new(values) as Arc<dyn ValueProvider>)
    };

    let source = FileData::new(&invocation.tables).with_context(|| format!("opening {}", invocation.tables))?;
    let mut engine = Engine::with_config(registry(), config);
    engine.bind_data(source)?;
    engine.activate()?;

    match invocation.command {
        Command::Request { node, socket } => {
            let value = engine.request_value(node.as_str(), &socket, provider)?;
            match value {
                Some(value) => println!("{}.{} = {}", node, socket, value),
                None => println!("{}.{} has no value", node, socket),
            }
        }
        Command::Update { node } => {
            let exposed = engine.update_node(node.as_str(), provider)?;
            println!("{}", serde_json::to_string_pretty(&exposed)?);
        }
        Command::Trigger { socket, node, component } => {
            let result = engine.trigger_signal(&socket, component.as_deref(), node.as_deref(), provider)?;

            println!("📡 Exposed signals:");
            for (node, signal) in result.exposed_signals() {
                println!("  • {}.{}", node, signal);
            }
            println!("📦 Exposed values:");
            for (node, values) in result.exposed_values() {
                for (socket, value) in values {
                    println!("  • {}.{} = {}", node, socket, value);
                }
            }
            if !result.is_success() {
                println!("⚠️  {} signal handler(s) failed:", result.errors().len());
                for error in result.errors() {
                    println!("  • {}", error);
                }
            }
        }
    }

    engine.terminate()?;
    tracing::debug!(elapsed = ?start_time.elapsed(), "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sceneflow::data::NodeId;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_parse_commands() {
        let invocation = parse_args(&args("--config e.yaml scene.yaml request out input in.output=4")).unwrap();
        assert_eq!(invocation.config.as_deref(), Some("e.yaml"));
        assert_eq!(invocation.tables, "scene.yaml");
        assert!(matches!(invocation.command, Command::Request { ref node, ref socket } if node == "out" && socket == "input"));
        assert_eq!(invocation.assignments, vec!["in.output=4"]);

        let invocation = parse_args(&args("scene.json trigger signal --component IN")).unwrap();
        assert!(matches!(
            invocation.command,
            Command::Trigger { node: None, component: Some(ref c), .. } if c == "IN"
        ));
    }

    #[test]
    fn test_parse_errors() {
        struct TestCase {
            name: &'static str,
            line: &'static str,
        }

        let test_cases = vec![
            TestCase { name: "no tables", line: "" },
            TestCase { name: "no command", line: "scene.yaml" },
            TestCase { name: "unknown command", line: "scene.yaml explode" },
            TestCase { name: "trigger without source", line: "scene.yaml trigger signal --everywhere" },
            TestCase { name: "config without path", line: "--config" },
        ];

        for case in test_cases {
            assert!(parse_args(&args(case.line)).is_err(), "case: {}", case.name);
        }
    }

    #[test]
    fn test_assignments_parse_json_with_string_fallback() {
        let values = parse_assignments(&args("a.x=42 b.name=hello c.list=[1,2] scene.in.output=true")).unwrap();

        assert_eq!(values.get_value("x", &NodeId::from("a")), Some(json!(42)));
        assert_eq!(values.get_value("name", &NodeId::from("b")), Some(json!("hello")));
        assert_eq!(values.get_value("list", &NodeId::from("c")), Some(json!([1, 2])));
        assert_eq!(values.get_value("output", &NodeId::from("scene.in")), Some(json!(true)));
        assert!(parse_assignments(&args("novalue")).is_err());
    }
}
