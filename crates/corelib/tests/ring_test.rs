//! Tests for the hash ring implementation.
//!
//! # Test Strategy
//!
//! 1. **Basic functionality**: Empty ring, add/lookup, remove
//! 2. **Multiple nodes**: Distribution, consistency
//! 3. **Edge cases**: Wraparound, single node, duplicate adds and removes
//! 4. **Rebalancing**: Bounded remapping on membership change
//! 5. **Thread safety**: Concurrent membership changes and lookups

use corelib::node::{Node, RingNode};
use corelib::partitioner::{HashAlgorithm, HashError};
use corelib::ring::{HashRing, RingBuilder};
use corelib::{Error, Token};
use std::collections::HashSet;
use std::sync::Arc;

fn node(id: &str) -> Arc<Node> {
    Arc::new(Node::new(id))
}

fn servers(ring: &HashRing<Node>, ids: &[&str]) {
    for id in ids {
        ring.add_node(node(id)).unwrap();
    }
}

fn keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key-{i}")).collect()
}

fn owners(ring: &HashRing<Node>, keys: &[String]) -> Vec<String> {
    keys.iter()
        .map(|k| ring.get_server(k).unwrap().identifier().to_string())
        .collect()
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

#[test]
fn test_empty_ring_lookup() {
    let ring: HashRing<Node> = HashRing::new();
    assert_eq!(ring.get_server("key1").unwrap_err(), Error::NoConnectedNodes);
    assert_eq!(ring.node_count(), 0);
    assert_eq!(ring.vnode_count(), 0);
    assert!(ring.is_empty());
}

#[test]
fn test_add_node_and_lookup() {
    let ring: HashRing<Node> = HashRing::new();
    ring.add_node(node("node1")).unwrap();

    assert_eq!(ring.node_count(), 1);
    assert_eq!(ring.vnode_count(), 3);

    let owner = ring.get_server("test-key").unwrap();
    assert_eq!(owner.identifier(), "node1");

    let retrieved = ring.get_node("node1").expect("node1 is a member");
    assert!(Arc::ptr_eq(&retrieved, &owner));
}

#[test]
fn test_remove_node() {
    let ring: HashRing<Node> = HashRing::new();
    servers(&ring, &["node1", "node2"]);
    assert_eq!(ring.vnode_count(), 6);

    ring.remove_node(&Node::new("node1")).unwrap();

    assert_eq!(ring.node_count(), 1);
    assert_eq!(ring.vnode_count(), 3);
    assert_eq!(ring.get_server("some-key").unwrap().identifier(), "node2");
    assert!(ring.get_node("node1").is_none());
    assert!(ring.get_node("node2").is_some());
}

#[test]
fn test_remove_twice_fails_second_time() {
    let ring: HashRing<Node> = HashRing::new();
    servers(&ring, &["node1", "node2"]);

    ring.remove_node_by_id("node1").unwrap();
    let before = ring.topology();
    let err = ring.remove_node_by_id("node1").unwrap_err();
    assert_eq!(err, Error::NodeNotFound("node1".into()));
    assert_eq!(ring.topology(), before);
}

#[test]
fn test_duplicate_add_is_rejected() {
    let ring: HashRing<Node> = HashRing::new();
    ring.add_node(node("node1")).unwrap();
    let before = ring.topology();

    let err = ring.add_node(node("node1")).unwrap_err();
    assert_eq!(err, Error::NodeExists("node1".into()));
    assert_eq!(ring.topology(), before);
    assert_eq!(ring.vnode_count(), 3);
}

// ============================================================================
// Known Placements (FNV-1a, 3 vnodes)
// ============================================================================

fn three_servers() -> HashRing<Node> {
    let ring: HashRing<Node> = HashRing::new();
    servers(&ring, &["server-1", "server-2", "server-3"]);
    ring
}

#[test]
fn test_known_positions() {
    let ring = three_servers();
    let topology = ring.topology();
    let tokens: Vec<(u64, &str)> = topology
        .vnodes()
        .iter()
        .map(|v| (v.token.value(), v.node_id.as_str()))
        .collect();
    assert_eq!(
        tokens,
        vec![
            (10878048331193662240, "server-1"),
            (10878049430705290451, "server-1"),
            (10878051629728546873, "server-1"),
            (12114828488301683735, "server-3"),
            (12114829587813311946, "server-3"),
            (12114830687324940157, "server-3"),
            (12641493458557799724, "server-2"),
            (12641495657581056146, "server-2"),
            (12641496757092684357, "server-2"),
        ]
    );
}

#[test]
fn test_key_maps_to_nearest_clockwise_position() {
    let ring = three_servers();

    // 11567303347029728138 falls between server-1's last position and
    // server-3's first.
    assert_eq!(
        ring.read().position_of("cache:session:xyz").unwrap(),
        Token(11567303347029728138)
    );
    assert_eq!(ring.get_server("cache:session:xyz").unwrap().identifier(), "server-3");

    // 5312262665563488470 is below every position.
    assert_eq!(ring.get_server("user:1001").unwrap().identifier(), "server-1");
    assert_eq!(ring.get_server("cache:session:abc").unwrap().identifier(), "server-1");
}

#[test]
fn test_wraparound_to_lowest_position() {
    let ring = three_servers();
    // "user:0" hashes to 17869607853862951736, above the highest position.
    let view = ring.read();
    let token = view.position_of("user:0").unwrap();
    assert!(token > Token(12641496757092684357));
    drop(view);
    assert_eq!(ring.get_server("user:0").unwrap().identifier(), "server-1");
}

#[test]
fn test_exact_position_belongs_to_that_vnode() {
    let ring: HashRing<String> = RingBuilder::new()
        .with_vnodes(1)
        .with_hash_fn(|key: &[u8]| match key {
            b"low_0" => Ok(100),
            b"high_0" => Ok(200),
            b"k-100" => Ok(100),
            b"k-150" => Ok(150),
            b"k-200" => Ok(200),
            b"k-max" => Ok(u64::MAX),
            b"k-zero" => Ok(0),
            other => Err(HashError::new(format!("unexpected key {other:?}"))),
        })
        .build();
    ring.add_node(Arc::new("low".to_string())).unwrap();
    ring.add_node(Arc::new("high".to_string())).unwrap();

    let owner = |k: &str| ring.get_server(k).unwrap().as_str().to_string();
    assert_eq!(owner("k-zero"), "low");
    assert_eq!(owner("k-100"), "low");
    assert_eq!(owner("k-150"), "high");
    assert_eq!(owner("k-200"), "high");
    assert_eq!(owner("k-max"), "low");

    let err = ring.get_server("unknown").unwrap_err();
    assert!(matches!(err, Error::Hashing { .. }));
}

// ============================================================================
// Multiple Nodes Tests
// ============================================================================

#[test]
fn test_multiple_nodes() {
    let ring: HashRing<Node> = HashRing::new();
    servers(&ring, &["node1", "node2", "node3"]);

    assert_eq!(ring.node_count(), 3);
    assert_eq!(ring.vnode_count(), 9);

    let valid: HashSet<&str> = ["node1", "node2", "node3"].into_iter().collect();
    for key in ["key1", "key2", "key3"] {
        let owner = ring.get_server(key).unwrap();
        assert!(valid.contains(owner.identifier()), "{key} mapped to {}", owner.identifier());
    }
}

#[test]
fn test_consistent_lookup() {
    let ring = three_servers();
    let first = ring.get_server("consistent-key").unwrap();
    for _ in 0..100 {
        assert!(Arc::ptr_eq(&first, &ring.get_server("consistent-key").unwrap()));
    }
}

#[test]
fn test_same_membership_same_mapping() {
    let a: HashRing<Node> = HashRing::new();
    let b: HashRing<Node> = HashRing::new();
    servers(&a, &["x", "y", "z"]);
    servers(&b, &["z", "x", "y"]);

    let keys = keys(1_000);
    assert_eq!(owners(&a, &keys), owners(&b, &keys));
    assert_eq!(a.topology(), b.topology());
}

// ============================================================================
// Ring Builder Tests
// ============================================================================

#[test]
fn test_ring_builder_custom_vnodes() {
    let ring: HashRing<Node> = RingBuilder::new().with_vnodes(8).build();
    servers(&ring, &["node1", "node2"]);
    assert_eq!(ring.node_count(), 2);
    assert_eq!(ring.vnode_count(), 16);
}

#[test]
fn test_ring_builder_mixed_vnodes() {
    let ring: HashRing<Node> = RingBuilder::new().with_vnodes(4).build();
    ring.add_node(node("node1")).unwrap();
    ring.add_node_with_vnodes(node("node2"), 8).unwrap();

    assert_eq!(ring.node_count(), 2);
    assert_eq!(ring.vnode_count(), 12);
    let members = ring.topology().members().to_vec();
    assert_eq!(members[0].vnodes, 4);
    assert_eq!(members[1].vnodes, 8);
}

#[test]
fn test_partitioner_name() {
    let ring: HashRing<Node> = HashRing::new();
    assert_eq!(ring.partitioner_name(), "Fnv1aPartitioner");

    let ring: HashRing<Node> = RingBuilder::new()
        .with_hash_algorithm(HashAlgorithm::Sip13)
        .build();
    assert_eq!(ring.partitioner_name(), "SipPartitioner");
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_single_node() {
    let ring: HashRing<Node> = HashRing::new();
    ring.add_node(node("node1")).unwrap();

    for key in ["key1", "key2", "key3", "very-long-key-name", ""] {
        assert_eq!(ring.get_server(key).unwrap().identifier(), "node1");
    }
}

#[test]
fn test_add_remove_restores_state() {
    let ring = three_servers();
    let before = ring.topology();
    let keys = keys(500);
    let owners_before = owners(&ring, &keys);

    ring.add_node(node("server-4")).unwrap();
    assert_ne!(ring.topology(), before);
    ring.remove_node_by_id("server-4").unwrap();

    assert_eq!(ring.topology(), before);
    assert_eq!(owners(&ring, &keys), owners_before);
}

#[test]
fn test_add_remove_add() {
    let ring: HashRing<Node> = HashRing::new();
    ring.add_node(node("node1")).unwrap();
    ring.remove_node_by_id("node1").unwrap();
    assert!(ring.is_empty());
    assert_eq!(ring.get_server("key").unwrap_err(), Error::NoConnectedNodes);

    ring.add_node(node("node1")).unwrap();
    assert_eq!(ring.node_count(), 1);
    assert!(ring.get_server("key").is_ok());
}

#[test]
fn test_mixed_node_types() {
    struct Shard {
        name: String,
    }

    impl RingNode for Shard {
        fn identifier(&self) -> &str {
            &self.name
        }
    }

    let ring: HashRing = HashRing::new();
    ring.add_node(Arc::new(Node::new("cache-1"))).unwrap();
    ring
        .add_node(Arc::new(Shard {
            name: "shard-0".to_string(),
        }))
        .unwrap();
    ring.add_node(Arc::new("literal")).unwrap();

    let ids: HashSet<String> = ring
        .nodes()
        .iter()
        .map(|n| n.identifier().to_string())
        .collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.contains("shard-0"));
}

// ============================================================================
// Rebalancing Tests
// ============================================================================

#[test]
fn test_adding_node_moves_keys_only_to_it() {
    for vnodes in [3, 64] {
        let ring: HashRing<Node> = RingBuilder::new().with_vnodes(vnodes).build();
        servers(&ring, &["node-0", "node-1", "node-2", "node-3"]);

        let keys = keys(10_000);
        let before = owners(&ring, &keys);
        ring.add_node(node("node-4")).unwrap();
        let after = owners(&ring, &keys);

        let mut moved = 0;
        for (b, a) in before.iter().zip(&after) {
            if b != a {
                moved += 1;
                assert_eq!(a, "node-4", "key moved from {b} to {a}");
            }
        }
        let ratio = moved as f64 / keys.len() as f64;
        assert!(ratio < 0.5, "vnodes={vnodes}: {moved} keys moved ({ratio:.2})");
    }
}

#[test]
fn test_removing_node_only_moves_its_keys() {
    let ring: HashRing<Node> = RingBuilder::new()
        .with_vnodes(32)
        .with_hash_algorithm(HashAlgorithm::Blake3)
        .build();
    servers(&ring, &["n1", "n2", "n3"]);

    let keys = keys(10_000);
    let before = owners(&ring, &keys);
    assert!(before.iter().any(|o| o == "n2"));

    ring.remove_node_by_id("n2").unwrap();
    let after = owners(&ring, &keys);

    for (i, (b, a)) in before.iter().zip(&after).enumerate() {
        if b != "n2" {
            assert_eq!(b, a, "key {i} was on {b} but moved to {a}");
        } else {
            assert_ne!(a, "n2");
        }
    }
}

#[test]
fn test_ownership_covers_ring() {
    let ring: HashRing<Node> = RingBuilder::new()
        .with_vnodes(128)
        .with_hash_algorithm(HashAlgorithm::Xxh3)
        .build();
    servers(&ring, &["a", "b", "c", "d"]);

    let shares = ring.topology().ownership();
    assert_eq!(shares.len(), 4);
    let total: f64 = shares.iter().map(|(_, s)| s).sum();
    assert!((total - 1.0).abs() < 1e-9);
    for (id, share) in shares {
        assert!(share > 0.1 && share < 0.4, "{id} owns {share:.3}");
    }
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[test]
fn test_concurrent_membership_and_lookups() {
    let ring: HashRing<Node> = RingBuilder::new().with_vnodes(16).build();
    servers(&ring, &["stable-1", "stable-2"]);
    let keys = keys(200);

    crossbeam::scope(|s| {
        for w in 0..4 {
            let ring = &ring;
            s.spawn(move |_| {
                let id = format!("churn-{w}");
                for _ in 0..50 {
                    ring.add_node(node(&id)).unwrap();
                    ring.remove_node_by_id(&id).unwrap();
                }
            });
        }
        for _ in 0..4 {
            let ring = &ring;
            let keys = &keys;
            s.spawn(move |_| {
                for _ in 0..20 {
                    {
                        let view = ring.read();
                        assert_eq!(view.vnode_count(), view.member_count() * 16);
                    }
                    for key in keys {
                        ring.get_server(key).expect("stable members never leave");
                    }
                }
            });
        }
    })
    .unwrap();

    assert_eq!(ring.node_count(), 2);
    assert_eq!(ring.vnode_count(), 32);
}

#[test]
fn test_concurrent_duplicate_adds_admit_one() {
    let ring: HashRing<Node> = HashRing::new();
    let results: Vec<bool> = crossbeam::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ring = &ring;
                s.spawn(move |_| ring.add_node(node("contended")).is_ok())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(results.iter().filter(|ok| **ok).count(), 1);
    assert_eq!(ring.vnode_count(), 3);
}
