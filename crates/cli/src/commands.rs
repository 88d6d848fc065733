//! Subcommands.
//!
//! Each command renders its report into a `String`; `CliConfig::run` prints
//! it. Keeping output off stdout until the end lets tests inspect it.

use anyhow::Context;
use clap::{Args, Subcommand, ValueEnum};
use corelib::ring::{HashRing, RingBuilder, DEFAULT_VNODES};
use corelib::{HashAlgorithm, Node, NodeId, Topology};
use replication::ReplicatedRing;
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;

/// Rendered command output.
pub type CommandResult = anyhow::Result<String>;

const DEMO_NODES: [&str; 3] = ["server-1", "server-2", "server-3"];
const DEMO_KEYS: [&str; 5] = [
    "user:1001",
    "user:1002",
    "user:1003",
    "cache:session:abc",
    "cache:session:xyz",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HashArg {
    Fnv1a,
    Sip13,
    Xxh3,
    Blake3,
}

impl From<HashArg> for HashAlgorithm {
    fn from(arg: HashArg) -> Self {
        match arg {
            HashArg::Fnv1a => HashAlgorithm::Fnv1a,
            HashArg::Sip13 => HashAlgorithm::Sip13,
            HashArg::Xxh3 => HashAlgorithm::Xxh3,
            HashArg::Blake3 => HashAlgorithm::Blake3,
        }
    }
}

/// Options describing an ad-hoc ring.
#[derive(Debug, Args)]
pub struct RingArgs {
    /// Comma-separated members, each `id` or `id@address`.
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub nodes: Vec<String>,

    /// Virtual nodes per member.
    #[arg(long, default_value_t = DEFAULT_VNODES)]
    pub vnodes: usize,

    /// Hash function placing members and keys.
    #[arg(long, value_enum, default_value_t = HashArg::Fnv1a)]
    pub hash: HashArg,
}

impl RingArgs {
    fn members(&self) -> Vec<Arc<Node>> {
        self.nodes
            .iter()
            .map(|entry| match entry.split_once('@') {
                Some((id, address)) => Arc::new(Node::with_address(id, address)),
                None => Arc::new(Node::new(entry.as_str())),
            })
            .collect()
    }

    fn ring_builder(&self, verbose: bool) -> RingBuilder {
        RingBuilder::new()
            .with_vnodes(self.vnodes)
            .with_hash_algorithm(self.hash.into())
            .verbose_logs(verbose)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Walk through basic, virtual-node and replicated rings on a fixed cluster.
    Demo,

    /// Show which members own the given keys.
    Lookup {
        #[command(flatten)]
        ring: RingArgs,

        /// Distinct members to report per key, primary first.
        #[arg(short, long, default_value_t = 1)]
        replicas: usize,

        /// Keys to look up.
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Print ring positions and each member's share of the key space.
    Topology {
        #[command(flatten)]
        ring: RingArgs,

        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

impl Command {
    pub fn execute(&self, verbose: bool) -> CommandResult {
        match self {
            Command::Demo => demo(verbose),
            Command::Lookup {
                ring,
                replicas,
                keys,
            } => lookup(ring, *replicas, keys, verbose),
            Command::Topology { ring, json } => topology(ring, *json, verbose),
        }
    }
}

fn demo(verbose: bool) -> CommandResult {
    let mut out = String::new();
    writeln!(out, "=== Consistent Hashing Demo ===")?;

    writeln!(out, "\n--- 1. Basic Consistent Hashing ---")?;
    let basic: HashRing<Node> = RingBuilder::new()
        .with_vnodes(1)
        .verbose_logs(verbose)
        .build();
    demo_single_owner(&mut out, &basic)?;

    writeln!(out, "\n--- 2. Consistent Hashing with Virtual Nodes ---")?;
    let virtual_nodes: HashRing<Node> = RingBuilder::new()
        .with_vnodes(3)
        .verbose_logs(verbose)
        .build();
    demo_single_owner(&mut out, &virtual_nodes)?;

    writeln!(out, "\n--- 3. Consistent Hashing with Redundancy ---")?;
    let replicated: ReplicatedRing<Node> = ReplicatedRing::builder()
        .with_vnodes(3)
        .with_replication_factor(2)
        .verbose_logs(verbose)
        .build();
    demo_replicated(&mut out, &replicated)?;

    Ok(out)
}

fn demo_single_owner(out: &mut String, ring: &HashRing<Node>) -> anyhow::Result<()> {
    writeln!(
        out,
        "Adding servers with {} virtual node(s) each...",
        ring.config().vnodes()
    )?;
    for id in DEMO_NODES {
        ring.add_node(Arc::new(Node::new(id)))
            .with_context(|| format!("adding {id}"))?;
        writeln!(out, "  added: {id}")?;
    }

    writeln!(out, "\nMapping keys to servers:")?;
    for key in DEMO_KEYS {
        writeln!(out, "  {key} -> {}", ring.get_server(key)?)?;
    }

    writeln!(out, "\nRemoving server-2...")?;
    ring.remove_node_by_id("server-2")?;
    info!(node = "server-2", "removed from demo ring");

    writeln!(out, "\nKeys after removing server-2:")?;
    for key in DEMO_KEYS {
        writeln!(out, "  {key} -> {}", ring.get_server(key)?)?;
    }
    Ok(())
}

fn demo_replicated(out: &mut String, ring: &ReplicatedRing<Node>) -> anyhow::Result<()> {
    writeln!(
        out,
        "Adding servers with {} virtual nodes and replication factor {}...",
        ring.ring().config().vnodes(),
        ring.replication_factor()
    )?;
    for id in DEMO_NODES {
        ring.add_node(Arc::new(Node::new(id)))
            .with_context(|| format!("adding {id}"))?;
        writeln!(out, "  added: {id}")?;
    }

    writeln!(out, "\nMapping keys to servers (with replicas):")?;
    for key in DEMO_KEYS {
        writeln!(out, "  {key} -> [{}]", join(&ring.get_nodes_for_key(key)?))?;
    }

    writeln!(out, "\nPrimary nodes only:")?;
    for key in DEMO_KEYS {
        writeln!(out, "  {key} -> {} (primary)", ring.get_primary_node(key)?)?;
    }

    writeln!(out, "\nRemoving server-2...")?;
    ring.remove_node_by_id("server-2")?;

    writeln!(out, "\nKeys after removing server-2 (replicas):")?;
    for key in DEMO_KEYS {
        writeln!(out, "  {key} -> [{}]", join(&ring.get_nodes_for_key(key)?))?;
    }
    Ok(())
}

fn lookup(args: &RingArgs, replicas: usize, keys: &[String], verbose: bool) -> CommandResult {
    let ring: ReplicatedRing<Node> = ReplicatedRing::from_parts(
        args.ring_builder(verbose).build(),
        replication::SimpleStrategy::new(replicas),
    );
    for node in args.members() {
        let id = node.id().clone();
        ring.add_node(node)
            .with_context(|| format!("adding {id}"))?;
    }

    let mut out = String::new();
    for key in keys {
        let owners = ring
            .get_nodes_for_key(key)
            .with_context(|| format!("looking up {key:?}"))?;
        writeln!(out, "{key} -> {}", join(&owners))?;
    }
    Ok(out)
}

#[derive(Serialize)]
struct TopologyReport<'a> {
    partitioner: &'static str,
    topology: &'a Topology,
    ownership: Vec<(NodeId, f64)>,
}

fn topology(args: &RingArgs, json: bool, verbose: bool) -> CommandResult {
    let ring: HashRing<Node> = args.ring_builder(verbose).build();
    for node in args.members() {
        let id = node.id().clone();
        ring.add_node(node)
            .with_context(|| format!("adding {id}"))?;
    }

    let topology = ring.topology();
    let ownership = topology.ownership();

    if json {
        let report = TopologyReport {
            partitioner: ring.partitioner_name(),
            topology: &topology,
            ownership,
        };
        let mut rendered = serde_json::to_string_pretty(&report)?;
        rendered.push('\n');
        return Ok(rendered);
    }

    let mut out = String::new();
    writeln!(out, "partitioner: {}", ring.partitioner_name())?;
    writeln!(out, "\n{:<18}  node", "position")?;
    for vnode in topology.vnodes() {
        writeln!(out, "{:<18}  {}", vnode.token, vnode.node_id)?;
    }
    writeln!(out, "\n{:<18}  {:>6}  share", "node", "vnodes")?;
    for (member, (_, share)) in topology.members().iter().zip(&ownership) {
        writeln!(
            out,
            "{:<18}  {:>6}  {:.2}%",
            member.id.as_str(),
            member.vnodes,
            share * 100.0
        )?;
    }
    Ok(out)
}

fn join(nodes: &[Arc<Node>]) -> String {
    nodes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
