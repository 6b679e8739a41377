//! End-to-end lifecycle tests for the inheritance engine.
//!
//! Walks the full protocol: setup → silence → heirs claim frozen shares →
//! auto-completion purges the configuration, plus the graceful-failure and
//! pause safety-feature scenarios.

use heirloom_engine::{
    AssetId, ClaimOutcome, EngineError, EngineEvent, InheritanceEngine, Ledger, MemoryLedger,
    Wallet,
};

const DAY: u64 = 86_400;

fn w(s: &str) -> Wallet {
    Wallet::new(s)
}

fn a(s: &str) -> AssetId {
    AssetId::new(s)
}

#[test]
fn test_full_inheritance_lifecycle() {
    let owner = w("owner");
    let h1 = w("heir-1");
    let h2 = w("heir-2");
    let asset_x = a("asset-x");

    let mut ledger = MemoryLedger::new();
    ledger.set_balance(&owner, &asset_x, 10_000);
    ledger.authorize(&owner, &asset_x);

    let mut engine = InheritanceEngine::new(ledger);

    // ── Setup: 180 days, heirs 60/40, one watched asset ──
    engine
        .setup_inheritance(
            &owner,
            180 * DAY,
            &[h1.clone(), h2.clone()],
            &[60, 40],
            &[asset_x.clone()],
            0,
        )
        .unwrap();
    assert!(engine.config(&owner).unwrap().is_active);

    // Heartbeats during the owner's lifetime keep pushing the deadline.
    engine.update_activity(&owner, 30 * DAY).unwrap();
    engine.update_activity(&owner, 90 * DAY).unwrap();
    assert!(!engine.is_available(&owner, 180 * DAY));

    // ── Silence: 180 days after the last heartbeat ──
    let after = 90 * DAY + 180 * DAY + 1;
    assert!(engine.is_available(&owner, after));

    // ── First heir claims 60% of the balance at claim time ──
    let outcome = engine.claim_asset(&h1, &owner, &asset_x, after).unwrap();
    assert_eq!(
        outcome,
        ClaimOutcome::Transferred {
            amount: 6_000,
            completed: false
        }
    );
    assert_eq!(engine.snapshot_balance(&owner, &asset_x), Some(10_000));

    // ── Second heir claims 40% of the same frozen snapshot ──
    let outcome = engine
        .claim_asset(&h2, &owner, &asset_x, after + DAY)
        .unwrap();
    assert_eq!(
        outcome,
        ClaimOutcome::Transferred {
            amount: 4_000,
            completed: true
        }
    );

    // ── Auto-completion: config cleared, lists read back empty ──
    assert!(engine.config(&owner).is_none());
    assert!(engine.heirs(&owner).is_empty());
    assert!(engine.selected_assets(&owner).is_empty());

    // Funds actually moved.
    assert_eq!(engine.ledger().balance_of(&h1, &asset_x), 6_000);
    assert_eq!(engine.ledger().balance_of(&h2, &asset_x), 4_000);
    assert_eq!(engine.ledger().balance_of(&owner, &asset_x), 0);

    // The notification trail tells the full story, in order.
    let events = engine.drain_events();
    let completed_at = events
        .iter()
        .position(|e| matches!(e, EngineEvent::InheritanceCompleted { .. }))
        .unwrap();
    let second_claim_at = events
        .iter()
        .position(
            |e| matches!(e, EngineEvent::AssetInherited { heir, .. } if heir == &h2),
        )
        .unwrap();
    assert!(second_claim_at < completed_at);
}

#[test]
fn test_bad_asset_fails_gracefully_good_asset_still_claimable() {
    let owner = w("owner");
    let h1 = w("heir-1");
    let good = a("good-token");
    let bad = a("bad-token");

    let mut ledger = MemoryLedger::new();
    ledger.set_balance(&owner, &good, 1_000);
    ledger.set_balance(&owner, &bad, 1_000);
    ledger.authorize(&owner, &good);
    ledger.authorize(&owner, &bad);
    ledger.fail_asset(&bad);

    let mut engine = InheritanceEngine::new(ledger);
    engine
        .setup_inheritance(
            &owner,
            180 * DAY,
            &[h1.clone()],
            &[100],
            &[good.clone(), bad.clone()],
            0,
        )
        .unwrap();

    let after = 180 * DAY + 1;

    // The bad asset's transfer is refused but the claim call itself
    // completes at the protocol level.
    let outcome = engine.claim_asset(&h1, &owner, &bad, after).unwrap();
    assert!(matches!(outcome, ClaimOutcome::Failed { .. }));
    assert!(!engine.has_claimed(&owner, &h1, &bad));

    let events = engine.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::ClaimFailed { asset, .. } if asset == &bad
    )));

    // The good asset is unaffected by the earlier failure.
    let outcome = engine.claim_asset(&h1, &owner, &good, after).unwrap();
    assert!(matches!(
        outcome,
        ClaimOutcome::Transferred { amount: 1_000, .. }
    ));
    assert!(engine.has_claimed(&owner, &h1, &good));

    // Completion never triggers while the bad asset stays unclaimed.
    assert!(engine.config(&owner).is_some());
}

#[test]
fn test_pause_is_a_panic_button() {
    let owner = w("owner");
    let h1 = w("heir-1");

    let mut engine = InheritanceEngine::new(MemoryLedger::new());
    engine
        .setup_inheritance(&owner, DAY, &[h1.clone()], &[100], &[], 0)
        .unwrap();

    // 100 seconds before the deadline the owner notices suspicious activity.
    let panic_at = DAY - 100;
    assert_eq!(engine.time_until_available(&owner, panic_at), Some(100));
    engine.pause_inheritance(&owner, panic_at).unwrap();

    // Investigation takes thirty days; nothing becomes claimable.
    let resume_at = panic_at + 30 * DAY;
    assert!(!engine.is_available(&owner, resume_at));
    assert_eq!(engine.time_until_available(&owner, resume_at), None);

    // All clear: unpausing grants the complete period again.
    engine.unpause_inheritance(&owner, resume_at).unwrap();
    assert_eq!(engine.time_until_available(&owner, resume_at), Some(DAY));
    assert!(!engine.is_available(&owner, resume_at + DAY - 1));
    assert!(engine.is_available(&owner, resume_at + DAY));
}

#[test]
fn test_same_heir_for_multiple_owners() {
    let alice = w("alice");
    let bob = w("bob");
    let heir = w("shared-heir");
    let usdc = a("usdc");

    let mut ledger = MemoryLedger::new();
    ledger.set_balance(&alice, &usdc, 300);
    ledger.set_balance(&bob, &usdc, 700);
    ledger.authorize(&alice, &usdc);
    ledger.authorize(&bob, &usdc);

    let mut engine = InheritanceEngine::new(ledger);
    engine
        .setup_inheritance(&alice, DAY, &[heir.clone()], &[100], &[usdc.clone()], 0)
        .unwrap();
    engine
        .setup_inheritance(&bob, DAY, &[heir.clone()], &[100], &[usdc.clone()], 0)
        .unwrap();

    let after = DAY + 1;
    engine.claim_asset(&heir, &alice, &usdc, after).unwrap();
    engine.claim_asset(&heir, &bob, &usdc, after).unwrap();

    // One claim per owner, snapshots independent.
    assert_eq!(engine.ledger().balance_of(&heir, &usdc), 1_000);
    assert!(engine.config(&alice).is_none());
    assert!(engine.config(&bob).is_none());
}

#[test]
fn test_deactivation_cycles() {
    let owner = w("owner");
    let mut engine = InheritanceEngine::new(MemoryLedger::new());

    // Cycle 1: set up, deactivate.
    engine
        .setup_inheritance(&owner, 180 * DAY, &[w("h1")], &[100], &[a("usdc")], 0)
        .unwrap();
    engine.deactivate_inheritance(&owner).unwrap();
    assert!(!engine.is_heir(&owner, &w("h1")));
    assert!(!engine.is_asset_selected(&owner, &a("usdc")));

    // Cycle 2: different shape entirely.
    engine
        .setup_inheritance(&owner, 90 * DAY, &[w("h2"), w("h1")], &[70, 30], &[], 100)
        .unwrap();
    let heirs = engine.heirs(&owner);
    assert_eq!(heirs[0].wallet, w("h2"));
    assert_eq!(heirs[0].percentage, 70);
    assert_eq!(heirs[1].wallet, w("h1"));
    assert_eq!(heirs[1].percentage, 30);
    engine.deactivate_inheritance(&owner).unwrap();

    // Cycle 3: still works.
    engine
        .setup_inheritance(&owner, 30 * DAY, &[w("h1"), w("h2")], &[50, 50], &[], 200)
        .unwrap();
    assert_eq!(engine.heirs(&owner).len(), 2);
}

#[test]
fn test_multiple_assets_complete_only_when_all_claimed() {
    let owner = w("owner");
    let h1 = w("heir-1");
    let h2 = w("heir-2");
    let usdc = a("usdc");
    let usdt = a("usdt");

    let mut ledger = MemoryLedger::new();
    ledger.set_balance(&owner, &usdc, 1_000);
    ledger.set_balance(&owner, &usdt, 2_000);
    ledger.authorize(&owner, &usdc);
    ledger.authorize(&owner, &usdt);

    let mut engine = InheritanceEngine::new(ledger);
    engine
        .setup_inheritance(
            &owner,
            DAY,
            &[h1.clone(), h2.clone()],
            &[60, 40],
            &[usdc.clone(), usdt.clone()],
            0,
        )
        .unwrap();

    let after = DAY + 1;

    // Both heirs finish the first asset; the config must survive.
    engine.claim_asset(&h1, &owner, &usdc, after).unwrap();
    engine.claim_asset(&h2, &owner, &usdc, after).unwrap();
    assert!(engine.config(&owner).is_some());

    // Second asset: completion lands exactly on the last open pair.
    engine.claim_asset(&h1, &owner, &usdt, after).unwrap();
    let outcome = engine.claim_asset(&h2, &owner, &usdt, after).unwrap();
    assert_eq!(
        outcome,
        ClaimOutcome::Transferred {
            amount: 800,
            completed: true
        }
    );
    assert!(engine.config(&owner).is_none());
}

#[test]
fn test_claim_attempt_before_deadline_has_no_side_effects() {
    let owner = w("owner");
    let h1 = w("heir-1");
    let usdc = a("usdc");

    let mut ledger = MemoryLedger::new();
    ledger.set_balance(&owner, &usdc, 1_000);
    ledger.authorize(&owner, &usdc);

    let mut engine = InheritanceEngine::new(ledger);
    engine
        .setup_inheritance(&owner, DAY, &[h1.clone()], &[100], &[usdc.clone()], 0)
        .unwrap();
    engine.drain_events();

    let err = engine
        .claim_asset(&h1, &owner, &usdc, DAY / 2)
        .unwrap_err();
    assert!(matches!(err, EngineError::NotYetAvailable { .. }));

    // Fail closed: no snapshot, no flag, no event, no transfer.
    assert_eq!(engine.snapshot_balance(&owner, &usdc), None);
    assert!(!engine.has_claimed(&owner, &h1, &usdc));
    assert!(engine.drain_events().is_empty());
    assert_eq!(engine.ledger().balance_of(&h1, &usdc), 0);
}
