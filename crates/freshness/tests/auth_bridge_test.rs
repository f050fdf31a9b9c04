use freshness::mock::MockCollectionManager;
use freshness::{
    AuthBridge, AuthObserver, Collection, FreshnessController, Identity, SessionPhase,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;

/// Minimal auth source for bridge tests: a watch channel the test flips.
struct TestGateway {
    state: watch::Sender<Option<Identity>>,
}

impl TestGateway {
    fn new(initial: Option<Identity>) -> Self {
        let (state, _) = watch::channel(initial);
        Self { state }
    }

    fn sign_in(&self, uid: &str) {
        self.state.send_replace(Some(Identity::new(uid)));
    }

    fn sign_out(&self) {
        self.state.send_replace(None);
    }
}

impl AuthObserver for TestGateway {
    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.state.subscribe()
    }
}

fn spawn_controller() -> (freshness::ControllerHandle, tokio::task::JoinHandle<()>) {
    let (controller, handle) = FreshnessController::new(
        Arc::new(MockCollectionManager::new(Collection::Users)),
        Arc::new(MockCollectionManager::new(Collection::Companies)),
        Arc::new(MockCollectionManager::new(Collection::Projects)),
        16,
    );
    let task = tokio::spawn(controller.run());
    (handle, task)
}

async fn wait_for(
    phases: &mut watch::Receiver<SessionPhase>,
    pred: impl Fn(&SessionPhase) -> bool,
) -> SessionPhase {
    timeout(Duration::from_secs(2), async {
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

/// The state current at subscription time is delivered immediately: a
/// controller attached to an already-signed-in gateway resolves without any
/// further auth event.
#[tokio::test]
async fn bridge_delivers_current_state_on_subscribe() {
    let gateway = TestGateway::new(Some(Identity::new("ada")));
    let (handle, task) = spawn_controller();
    let mut phases = handle.phase_watch();

    let _bridge = AuthBridge::spawn(&gateway, handle.clone());
    wait_for(&mut phases, SessionPhase::is_ready).await;

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

/// Sign-in and sign-out transitions flow through the bridge.
#[tokio::test]
async fn bridge_forwards_transitions() {
    let gateway = TestGateway::new(None);
    let (handle, task) = spawn_controller();
    let mut phases = handle.phase_watch();

    let _bridge = AuthBridge::spawn(&gateway, handle.clone());

    gateway.sign_in("ada");
    wait_for(&mut phases, SessionPhase::is_ready).await;

    gateway.sign_out();
    wait_for(&mut phases, |p| matches!(p, SessionPhase::Unresolved)).await;

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

/// Dropping the bridge unsubscribes: later auth events never reach the
/// controller.
#[tokio::test]
async fn dropped_bridge_stops_forwarding() {
    let gateway = TestGateway::new(None);
    let (handle, task) = spawn_controller();
    let mut phases = handle.phase_watch();

    let bridge = AuthBridge::spawn(&gateway, handle.clone());
    gateway.sign_in("ada");
    wait_for(&mut phases, SessionPhase::is_ready).await;

    drop(bridge);
    gateway.sign_out();

    // Give an erroneously alive forwarding task every chance to act.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(handle.phase(), SessionPhase::Ready);

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}
