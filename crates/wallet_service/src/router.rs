//! SessionRouter - maps inbound chat events onto live sessions.
//!
//! Owns the identity -> session registry with its lifecycle: creation on
//! the entry command, removal at terminal states, eviction of stale
//! sessions. Each handled event produces exactly one outbound reply.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::timeout;

use wallet_core::{AddressValidator, Config, Identity};
use wallet_state::SessionEvent;
use wallet_store::{RegistrationStore, StorageError};

use crate::replies;
use crate::session::Session;
use crate::transport::{ChatEvent, ReplyFormat, ReplySink};

pub struct SessionRouter {
    validator: AddressValidator,
    store: Arc<dyn RegistrationStore>,
    sink: Arc<dyn ReplySink>,
    sessions: DashMap<Identity, Arc<Mutex<Session>>>,
    session_ttl: Duration,
    store_timeout: Duration,
}

impl SessionRouter {
    pub fn new(
        config: &Config,
        store: Arc<dyn RegistrationStore>,
        sink: Arc<dyn ReplySink>,
    ) -> Self {
        Self {
            validator: AddressValidator::new(config.strict_checksum),
            store,
            sink,
            sessions: DashMap::new(),
            session_ttl: config.session_ttl(),
            store_timeout: config.store_timeout(),
        }
    }

    /// Number of live sessions, for diagnostics.
    pub fn live_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Dispatch one inbound event. The transport already serializes events
    /// per identity; the per-session mutex backstops that guarantee.
    pub async fn dispatch(&self, event: ChatEvent) {
        match event {
            ChatEvent::EntryCommand {
                identity,
                display_name,
            } => self.handle_entry(identity, display_name).await,
            ChatEvent::TextMessage { identity, text } => self.handle_text(identity, text).await,
            ChatEvent::CancelCommand { identity } => self.handle_cancel(identity).await,
        }
    }

    async fn handle_entry(&self, identity: Identity, display_name: String) {
        let session = {
            let entry = self.sessions.entry(identity).or_insert_with(|| {
                Arc::new(Mutex::new(Session::new(identity, display_name.clone())))
            });
            Arc::clone(&entry)
        };

        let mut session = session.lock().await;
        session.restart(display_name.clone());
        drop(session);

        log::info!("session started for {identity}");
        self.reply(identity, &replies::greeting(&display_name), ReplyFormat::Plain)
            .await;
    }

    async fn handle_text(&self, identity: Identity, text: String) {
        let Some(session) = self.live_session(identity) else {
            self.reply(identity, replies::no_active_session(), ReplyFormat::Plain)
                .await;
            return;
        };

        let mut session = session.lock().await;
        let candidate = text.trim();

        let (event, reply, format) = match self.validator.validate(candidate) {
            Err(reason) => {
                log::debug!("rejected address from {identity}: {reason}");
                (
                    SessionEvent::AddressRejected { reason },
                    replies::invalid_address().to_string(),
                    ReplyFormat::Plain,
                )
            }
            Ok(()) => {
                let result = match timeout(
                    self.store_timeout,
                    self.store
                        .upsert(identity, session.display_name(), candidate),
                )
                .await
                {
                    Ok(result) => result,
                    Err(_) => Err(StorageError::Timeout),
                };

                match result {
                    Ok(()) => {
                        log::info!("registered wallet for {identity}");
                        (
                            SessionEvent::AddressAccepted,
                            replies::registered(candidate),
                            ReplyFormat::Markdown,
                        )
                    }
                    Err(error) => {
                        log::error!("upsert for {identity} failed: {error}");
                        (
                            SessionEvent::StoreFailed,
                            replies::store_failure().to_string(),
                            ReplyFormat::Plain,
                        )
                    }
                }
            }
        };

        let transition = session.apply(event);
        log::debug!(
            "session {identity}: {:?} -> {:?}",
            transition.from,
            transition.to
        );
        let terminal = session.is_terminal();
        drop(session);

        if terminal {
            self.sessions.remove(&identity);
        }
        self.reply(identity, &reply, format).await;
    }

    async fn handle_cancel(&self, identity: Identity) {
        let Some(session) = self.live_session(identity) else {
            self.reply(identity, replies::no_active_session(), ReplyFormat::Plain)
                .await;
            return;
        };

        let mut session = session.lock().await;
        session.apply(SessionEvent::CancelReceived);
        drop(session);

        self.sessions.remove(&identity);
        log::info!("session cancelled for {identity}");
        self.reply(identity, replies::cancelled(), ReplyFormat::Plain)
            .await;
    }

    /// Drop sessions idle longer than the ttl. Called from the binary on an
    /// interval. A session currently handling an event holds its lock and
    /// is skipped.
    pub fn evict_stale(&self) -> usize {
        let mut evicted = 0;
        self.sessions.retain(|identity, session| match session.try_lock() {
            Ok(guard) if guard.idle_for() >= self.session_ttl => {
                log::info!("evicting stale session for {identity}");
                evicted += 1;
                false
            }
            _ => true,
        });
        evicted
    }

    fn live_session(&self, identity: Identity) -> Option<Arc<Mutex<Session>>> {
        self.sessions
            .get(&identity)
            .map(|session| Arc::clone(&session))
    }

    async fn reply(&self, identity: Identity, text: &str, format: ReplyFormat) {
        if let Err(error) = self.sink.send_reply(identity, text, format).await {
            log::warn!("reply delivery to {identity} failed: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use wallet_store::StoreResult;

    const GOOD_ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[derive(Default)]
    struct RecordingSink {
        replies: StdMutex<Vec<(Identity, String, ReplyFormat)>>,
    }

    impl RecordingSink {
        fn replies(&self) -> Vec<(Identity, String, ReplyFormat)> {
            self.replies.lock().expect("sink lock").clone()
        }
    }

    #[async_trait]
    impl ReplySink for RecordingSink {
        async fn send_reply(
            &self,
            identity: Identity,
            text: &str,
            format: ReplyFormat,
        ) -> Result<(), crate::transport::TransportError> {
            self.replies
                .lock()
                .expect("sink lock")
                .push((identity, text.to_string(), format));
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockStore {
        upserts: StdMutex<Vec<(Identity, String, String)>>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockStore {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RegistrationStore for MockStore {
        async fn init(&self) -> StoreResult<()> {
            Ok(())
        }

        async fn upsert(
            &self,
            identity: Identity,
            display_name: &str,
            address: &str,
        ) -> StoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StorageError::Task("mock store down".into()));
            }
            self.upserts.lock().expect("store lock").push((
                identity,
                display_name.to_string(),
                address.to_string(),
            ));
            Ok(())
        }

        async fn fetch(
            &self,
            _identity: Identity,
        ) -> StoreResult<Option<wallet_core::RegistrationRecord>> {
            Ok(None)
        }
    }

    fn router_with(
        store: Arc<MockStore>,
        sink: Arc<RecordingSink>,
    ) -> SessionRouter {
        SessionRouter::new(&Config::default(), store, sink)
    }

    #[tokio::test]
    async fn invalid_text_reprompts_without_store_call() {
        let store = Arc::new(MockStore::default());
        let sink = Arc::new(RecordingSink::default());
        let router = router_with(Arc::clone(&store), Arc::clone(&sink));

        router
            .dispatch(ChatEvent::EntryCommand {
                identity: Identity(1),
                display_name: "Alice".into(),
            })
            .await;
        router
            .dispatch(ChatEvent::TextMessage {
                identity: Identity(1),
                text: "not-an-address".into(),
            })
            .await;

        assert_eq!(store.call_count(), 0);
        assert_eq!(router.live_sessions(), 1);

        let replies = sink.replies();
        assert_eq!(replies.len(), 2);
        assert!(replies[1].1.contains("doesn't look like a valid"));
    }

    #[tokio::test]
    async fn valid_text_registers_and_terminates() {
        let store = Arc::new(MockStore::default());
        let sink = Arc::new(RecordingSink::default());
        let router = router_with(Arc::clone(&store), Arc::clone(&sink));

        router
            .dispatch(ChatEvent::EntryCommand {
                identity: Identity(2),
                display_name: "bob".into(),
            })
            .await;
        router
            .dispatch(ChatEvent::TextMessage {
                identity: Identity(2),
                // The driver trims surrounding whitespace before validating.
                text: format!("  {GOOD_ADDRESS}\n"),
            })
            .await;

        assert_eq!(store.call_count(), 1);
        assert_eq!(router.live_sessions(), 0);

        let upserts = store.upserts.lock().expect("store lock").clone();
        assert_eq!(
            upserts,
            vec![(Identity(2), "bob".to_string(), GOOD_ADDRESS.to_string())]
        );

        let replies = sink.replies();
        assert_eq!(replies.len(), 2);
        assert!(replies[1].1.contains("successfully recorded"));
        assert_eq!(replies[1].2, ReplyFormat::Markdown);
    }

    #[tokio::test]
    async fn cancel_terminates_without_store_call() {
        let store = Arc::new(MockStore::default());
        let sink = Arc::new(RecordingSink::default());
        let router = router_with(Arc::clone(&store), Arc::clone(&sink));

        router
            .dispatch(ChatEvent::EntryCommand {
                identity: Identity(3),
                display_name: String::new(),
            })
            .await;
        router
            .dispatch(ChatEvent::CancelCommand {
                identity: Identity(3),
            })
            .await;

        assert_eq!(store.call_count(), 0);
        assert_eq!(router.live_sessions(), 0);

        let replies = sink.replies();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[1].1, replies::cancelled());
    }

    #[tokio::test]
    async fn store_failure_terminates_with_generic_reply() {
        let store = Arc::new(MockStore::failing());
        let sink = Arc::new(RecordingSink::default());
        let router = router_with(Arc::clone(&store), Arc::clone(&sink));

        router
            .dispatch(ChatEvent::EntryCommand {
                identity: Identity(4),
                display_name: "carol".into(),
            })
            .await;
        router
            .dispatch(ChatEvent::TextMessage {
                identity: Identity(4),
                text: GOOD_ADDRESS.into(),
            })
            .await;

        assert_eq!(store.call_count(), 1);
        assert_eq!(router.live_sessions(), 0);

        let replies = sink.replies();
        assert_eq!(replies[1].1, replies::store_failure());
    }

    #[tokio::test]
    async fn text_without_session_gets_a_nudge() {
        let store = Arc::new(MockStore::default());
        let sink = Arc::new(RecordingSink::default());
        let router = router_with(Arc::clone(&store), Arc::clone(&sink));

        router
            .dispatch(ChatEvent::TextMessage {
                identity: Identity(5),
                text: GOOD_ADDRESS.into(),
            })
            .await;

        assert_eq!(store.call_count(), 0);
        let replies = sink.replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].1, replies::no_active_session());
    }

    #[tokio::test]
    async fn reentry_after_terminal_starts_fresh() {
        let store = Arc::new(MockStore::default());
        let sink = Arc::new(RecordingSink::default());
        let router = router_with(Arc::clone(&store), Arc::clone(&sink));

        let identity = Identity(6);
        router
            .dispatch(ChatEvent::EntryCommand {
                identity,
                display_name: "dave".into(),
            })
            .await;
        router.dispatch(ChatEvent::CancelCommand { identity }).await;
        assert_eq!(router.live_sessions(), 0);

        router
            .dispatch(ChatEvent::EntryCommand {
                identity,
                display_name: "dave".into(),
            })
            .await;
        router
            .dispatch(ChatEvent::TextMessage {
                identity,
                text: GOOD_ADDRESS.into(),
            })
            .await;

        assert_eq!(store.call_count(), 1);
        assert_eq!(router.live_sessions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_sessions_are_evicted_after_ttl() {
        let store = Arc::new(MockStore::default());
        let sink = Arc::new(RecordingSink::default());
        let router = router_with(Arc::clone(&store), Arc::clone(&sink));

        router
            .dispatch(ChatEvent::EntryCommand {
                identity: Identity(7),
                display_name: "erin".into(),
            })
            .await;
        assert_eq!(router.evict_stale(), 0);

        tokio::time::advance(Config::default().session_ttl() + Duration::from_secs(1)).await;
        assert_eq!(router.evict_stale(), 1);
        assert_eq!(router.live_sessions(), 0);
    }
}
