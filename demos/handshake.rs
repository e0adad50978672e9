//! Protocol Handshake
//!
//! This example demonstrates named transitions gated by handlers.
//!
//! Key concepts:
//! - Handlers veto transitions by returning an error
//! - A vetoed transition leaves the state untouched and fires no hooks
//! - Handlers inspect the machine through a read-only context
//! - Error kinds let callers tell failures apart
//!
//! Run with: cargo run --example handshake

use keyfsm::builder::FsmBuilder;
use keyfsm::engine::{ErrorKind, MismatchPolicy};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() {
    println!("=== Handshake State Machine ===\n");

    let peer_ready = Arc::new(AtomicBool::new(false));
    let ready = Arc::clone(&peer_ready);

    let conn = FsmBuilder::new()
        .states(["closed", "syn-sent", "established"])
        .initial("closed")
        .on_mismatch(MismatchPolicy::Reject)
        .on_enter(|ctx| println!("  entered {} via {}", ctx.to, ctx.name))
        .transition("connect", "closed", "syn-sent")
        .guarded("ack", "syn-sent", "established", move |ctx| {
            println!("  checking peer before leaving {}", ctx.current_state().key());
            if ready.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err("peer not ready".into())
            }
        })
        .transition("close", "established", "closed")
        .build()
        .unwrap();

    conn.initialize().unwrap();

    println!("connect:");
    conn.transition(&"connect").unwrap();

    println!("ack (peer not ready):");
    if let Err(err) = conn.transition(&"ack") {
        assert_eq!(err.kind(), ErrorKind::Handler);
        println!("  vetoed: {}", err);
    }
    println!("  state: {:?}", conn.current_state());

    peer_ready.store(true, Ordering::SeqCst);
    println!("ack (peer ready):");
    conn.transition(&"ack").unwrap();

    println!("connect while established:");
    if let Err(err) = conn.transition(&"connect") {
        assert_eq!(err.kind(), ErrorKind::Lifecycle);
        println!("  rejected: {}", err);
    }

    println!("close:");
    conn.transition(&"close").unwrap();
    println!("  state: {:?}", conn.current_state());

    println!("\n=== Example Complete ===");
}
