use freshness::mock::{MockCollectionManager, Operation, PendingCall};
use freshness::{Collection, CollectionError, FreshnessController, Identity, SessionPhase};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

fn idx(collection: Collection) -> usize {
    match collection {
        Collection::Users => 0,
        Collection::Companies => 1,
        Collection::Projects => 2,
    }
}

/// Three scripted mocks wired into a running controller.
fn scripted_controller() -> (
    [Arc<MockCollectionManager>; 3],
    freshness::ControllerHandle,
    tokio::task::JoinHandle<()>,
) {
    let managers = [
        Arc::new(MockCollectionManager::new(Collection::Users)),
        Arc::new(MockCollectionManager::new(Collection::Companies)),
        Arc::new(MockCollectionManager::new(Collection::Projects)),
    ];
    let (controller, handle) = FreshnessController::new(
        managers[0].clone(),
        managers[1].clone(),
        managers[2].clone(),
        16,
    );
    let task = tokio::spawn(controller.run());
    (managers, handle, task)
}

/// Three manual mocks wired into a running controller, plus the receivers on
/// which their parked calls arrive.
fn manual_controller() -> (
    [Arc<MockCollectionManager>; 3],
    [mpsc::UnboundedReceiver<PendingCall>; 3],
    freshness::ControllerHandle,
    tokio::task::JoinHandle<()>,
) {
    let (users, users_rx) = MockCollectionManager::manual(Collection::Users);
    let (companies, companies_rx) = MockCollectionManager::manual(Collection::Companies);
    let (projects, projects_rx) = MockCollectionManager::manual(Collection::Projects);
    let managers = [Arc::new(users), Arc::new(companies), Arc::new(projects)];
    let (controller, handle) = FreshnessController::new(
        managers[0].clone(),
        managers[1].clone(),
        managers[2].clone(),
        16,
    );
    let task = tokio::spawn(controller.run());
    (managers, [users_rx, companies_rx, projects_rx], handle, task)
}

async fn wait_for(
    phases: &mut watch::Receiver<SessionPhase>,
    pred: impl Fn(&SessionPhase) -> bool,
) -> SessionPhase {
    timeout(WAIT, async {
        loop {
            let current = phases.borrow_and_update().clone();
            if pred(&current) {
                return current;
            }
            phases.changed().await.expect("phase channel closed");
        }
    })
    .await
    .expect("timed out waiting for session phase")
}

async fn recv_call(rx: &mut mpsc::UnboundedReceiver<PendingCall>) -> PendingCall {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for manager call")
        .expect("mock call channel closed")
}

/// No collection is ever loaded while the identity is absent, and visibility
/// regains before authentication resolve are ignored.
#[tokio::test]
async fn no_loads_while_signed_out() {
    let (managers, handle, task) = scripted_controller();

    handle.auth_observed(None).await.unwrap();
    handle.visibility_regained().await.unwrap();
    handle.auth_observed(None).await.unwrap();

    // The event channel is FIFO, so once shutdown completes everything
    // queued above has been processed.
    handle.shutdown().await.unwrap();
    task.await.unwrap();

    assert_eq!(handle.phase(), SessionPhase::Unresolved);
    for manager in &managers {
        assert_eq!(manager.ensure_loaded_calls(), 0);
        assert_eq!(manager.refresh_calls(), 0);
    }
}

/// Re-observing the same signed-in identity must not start a second load
/// sequence.
#[tokio::test]
async fn reobserved_identity_does_not_reload() {
    let (managers, handle, task) = scripted_controller();
    let mut phases = handle.phase_watch();

    handle
        .auth_observed(Some(Identity::new("ada")))
        .await
        .unwrap();
    wait_for(&mut phases, SessionPhase::is_ready).await;

    handle
        .auth_observed(Some(Identity::new("ada")))
        .await
        .unwrap();
    handle.shutdown().await.unwrap();
    task.await.unwrap();

    assert_eq!(handle.phase(), SessionPhase::Ready);
    for manager in &managers {
        assert_eq!(manager.ensure_loaded_calls(), 1);
    }
}

/// All three loads succeeding yields Ready for every settlement order.
#[tokio::test]
async fn ready_regardless_of_settlement_order() {
    for order in settlement_orders() {
        let (_managers, mut receivers, handle, task) = manual_controller();
        let mut phases = handle.phase_watch();

        handle
            .auth_observed(Some(Identity::new("ada")))
            .await
            .unwrap();

        // One parked ensure_loaded per collection, received in manager order.
        let mut calls: [Option<PendingCall>; 3] = Default::default();
        for (slot, rx) in calls.iter_mut().zip(receivers.iter_mut()) {
            *slot = Some(recv_call(rx).await);
        }

        for collection in order {
            calls[idx(collection)].take().unwrap().succeed();
        }

        let phase = wait_for(&mut phases, SessionPhase::is_ready).await;
        assert_eq!(phase, SessionPhase::Ready, "order {order:?}");

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }
}

/// A single failing load yields Failed for every settlement order, including
/// the ones where successes settle after the failure.
#[tokio::test]
async fn failed_regardless_of_settlement_order() {
    for order in settlement_orders() {
        let (_managers, mut receivers, handle, task) = manual_controller();
        let mut phases = handle.phase_watch();

        handle
            .auth_observed(Some(Identity::new("ada")))
            .await
            .unwrap();

        let mut calls: [Option<PendingCall>; 3] = Default::default();
        for (slot, rx) in calls.iter_mut().zip(receivers.iter_mut()) {
            *slot = Some(recv_call(rx).await);
        }

        for collection in order {
            let call = calls[idx(collection)].take().unwrap();
            if collection == Collection::Companies {
                call.fail(CollectionError::RemoteUnavailable("backend down".into()));
            } else {
                call.succeed();
            }
        }

        let phase = wait_for(&mut phases, |p| matches!(p, SessionPhase::Failed(_))).await;
        assert!(
            matches!(phase, SessionPhase::Failed(_)),
            "order {order:?} ended in {phase:?}"
        );

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }
}

/// A visibility regain in Ready refreshes every collection exactly once, and
/// a second regain while those refreshes are still in flight is dropped.
#[tokio::test]
async fn overlapping_visibility_regains_do_not_stack_refreshes() {
    let (managers, mut receivers, handle, task) = manual_controller();
    let mut phases = handle.phase_watch();

    handle
        .auth_observed(Some(Identity::new("ada")))
        .await
        .unwrap();
    for rx in receivers.iter_mut() {
        recv_call(rx).await.succeed();
    }
    wait_for(&mut phases, SessionPhase::is_ready).await;

    handle.visibility_regained().await.unwrap();
    // Hold the calls unsettled so the refreshes stay in flight across the
    // second trigger.
    let mut in_flight = Vec::new();
    for rx in receivers.iter_mut() {
        let call = recv_call(rx).await;
        assert_eq!(call.operation(), Operation::RefreshFromRemote);
        in_flight.push(call);
    }

    handle.visibility_regained().await.unwrap();
    handle.shutdown().await.unwrap();
    task.await.unwrap();
    drop(in_flight);

    for manager in &managers {
        assert_eq!(manager.ensure_loaded_calls(), 1);
        assert_eq!(manager.refresh_calls(), 1, "second trigger must be dropped");
    }
}

/// Once an in-flight refresh settles, the next visibility regain triggers a
/// new one.
#[tokio::test]
async fn refresh_retriggers_after_settlement() {
    let (managers, mut receivers, handle, task) = manual_controller();
    let mut phases = handle.phase_watch();

    handle
        .auth_observed(Some(Identity::new("ada")))
        .await
        .unwrap();
    for rx in receivers.iter_mut() {
        recv_call(rx).await.succeed();
    }
    wait_for(&mut phases, SessionPhase::is_ready).await;

    handle.visibility_regained().await.unwrap();
    for rx in receivers.iter_mut() {
        recv_call(rx).await.succeed();
    }

    // The refresh settlements and the next trigger race through the event
    // channel, so retry the trigger until a fresh call shows up.
    timeout(WAIT, async {
        loop {
            handle.visibility_regained().await.unwrap();
            if let Ok(Some(call)) =
                timeout(Duration::from_millis(50), receivers[0].recv()).await
            {
                call.succeed();
                break;
            }
        }
    })
    .await
    .expect("refresh never re-triggered after settlement");

    handle.shutdown().await.unwrap();
    task.await.unwrap();

    assert!(managers[0].refresh_calls() >= 2);
}

/// A sign-out followed by a new sign-in before the first load sequence
/// settles: the old generation's settlements must not leak into the new
/// session.
#[tokio::test]
async fn stale_generation_results_are_discarded() {
    let (managers, mut receivers, handle, task) = manual_controller();
    let mut phases = handle.phase_watch();

    handle
        .auth_observed(Some(Identity::new("ada")))
        .await
        .unwrap();
    let mut old_calls = Vec::new();
    for rx in receivers.iter_mut() {
        old_calls.push(recv_call(rx).await);
    }

    handle.auth_observed(None).await.unwrap();
    handle
        .auth_observed(Some(Identity::new("grace")))
        .await
        .unwrap();

    let mut new_calls = Vec::new();
    for rx in receivers.iter_mut() {
        new_calls.push(recv_call(rx).await);
    }

    // Settle the abandoned session's calls with failures. If generation
    // tagging were missing this would flip the new session to Failed.
    for call in old_calls {
        call.fail(CollectionError::RemoteError("stale failure".into()));
    }
    for call in new_calls {
        call.succeed();
    }

    let phase = wait_for(&mut phases, SessionPhase::is_ready).await;
    assert_eq!(phase, SessionPhase::Ready);

    handle.shutdown().await.unwrap();
    task.await.unwrap();

    for manager in &managers {
        assert_eq!(manager.ensure_loaded_calls(), 2);
    }
}

/// Users and Companies load, Projects is rejected over quota: the session
/// fails with the quota reason surfaced and no refresh is ever issued.
#[tokio::test]
async fn quota_rejection_fails_the_session() {
    let (managers, handle, task) = scripted_controller();
    let mut phases = handle.phase_watch();

    managers[idx(Collection::Projects)]
        .push_err(CollectionError::RemoteError("quota exceeded".into()));

    handle
        .auth_observed(Some(Identity::new("ada")))
        .await
        .unwrap();
    let phase = wait_for(&mut phases, |p| matches!(p, SessionPhase::Failed(_))).await;
    match &phase {
        SessionPhase::Failed(reason) => assert!(reason.contains("quota"), "reason: {reason}"),
        other => panic!("expected Failed, got {other:?}"),
    }

    // Failed is terminal for the session: neither visibility regains nor a
    // re-observed identity may start anything.
    handle.visibility_regained().await.unwrap();
    handle
        .auth_observed(Some(Identity::new("ada")))
        .await
        .unwrap();
    handle.shutdown().await.unwrap();
    task.await.unwrap();

    assert!(matches!(handle.phase(), SessionPhase::Failed(_)));
    for manager in &managers {
        assert_eq!(manager.refresh_calls(), 0);
        assert_eq!(manager.ensure_loaded_calls(), 1);
    }
}

/// A sign-out while Ready returns the surface to the sign-in prompt and a
/// following sign-in runs a full new load sequence.
#[tokio::test]
async fn sign_out_resets_and_allows_new_session() {
    let (managers, handle, task) = scripted_controller();
    let mut phases = handle.phase_watch();

    handle
        .auth_observed(Some(Identity::new("ada")))
        .await
        .unwrap();
    wait_for(&mut phases, SessionPhase::is_ready).await;

    handle.auth_observed(None).await.unwrap();
    wait_for(&mut phases, |p| matches!(p, SessionPhase::Unresolved)).await;

    handle
        .auth_observed(Some(Identity::new("grace")))
        .await
        .unwrap();
    wait_for(&mut phases, SessionPhase::is_ready).await;

    handle.shutdown().await.unwrap();
    task.await.unwrap();

    for manager in &managers {
        assert_eq!(manager.ensure_loaded_calls(), 2);
    }
}

fn settlement_orders() -> [[Collection; 3]; 6] {
    use Collection::{Companies, Projects, Users};
    [
        [Users, Companies, Projects],
        [Users, Projects, Companies],
        [Companies, Users, Projects],
        [Companies, Projects, Users],
        [Projects, Users, Companies],
        [Projects, Companies, Users],
    ]
}
