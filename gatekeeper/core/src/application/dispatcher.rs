// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Command Dispatcher
//!
//! Mediates operator `whitelist ...` commands against the membership
//! store and the identity-verification provider. Capability checks run
//! before any side effect; verb bodies that touch the store or the
//! network are offloaded with `tokio::spawn` so command delivery never
//! blocks, and results flow back to the issuer via `CommandIssuer::reply`.
//!
//! No cross-command mutual exclusion: concurrent `add`/`remove` on the
//! same target race exactly like concurrent gate decisions, and the
//! store's unique constraint plus last-write-wins keeps that benign.

use crate::domain::command::{Verb, WhitelistCommand};
use crate::domain::config::SharedConfig;
use crate::domain::identity::{IdentityProfile, IdentityResolver};
use crate::domain::repository::{MembershipRepository, StoreError};
use crate::domain::session::{Capability, CommandIssuer, SessionDirectory};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Command-preprocess hook implemented by `CommandDispatcher` and
/// invoked by the host's command-delivery collaborator. Returns whether
/// the line was consumed; unconsumed lines fall through to the host's
/// own command handling.
pub trait CommandSink: Send + Sync {
    fn submit(&self, issuer: Arc<dyn CommandIssuer>, line: &str) -> bool;
}

#[derive(Clone)]
pub struct CommandDispatcher {
    store: Arc<dyn MembershipRepository>,
    resolver: Arc<dyn IdentityResolver>,
    sessions: Arc<dyn SessionDirectory>,
    config: SharedConfig,
}

impl CommandDispatcher {
    pub fn new(
        store: Arc<dyn MembershipRepository>,
        resolver: Arc<dyn IdentityResolver>,
        sessions: Arc<dyn SessionDirectory>,
        config: SharedConfig,
    ) -> Self {
        Self {
            store,
            resolver,
            sessions,
            config,
        }
    }

    fn authorized(&self, issuer: &dyn CommandIssuer, capability: Capability) -> bool {
        issuer.is_operator()
            || issuer.has_capability(capability)
            || issuer.has_capability(Capability::All)
    }

    /// Run one parsed command to completion. Hosts embedding the
    /// dispatcher in an already-async context may call this directly;
    /// `submit` wraps it in a spawned task.
    pub async fn execute(&self, issuer: Arc<dyn CommandIssuer>, command: WhitelistCommand) {
        let target = match (&command.target, command.verb.requires_target()) {
            (Some(t), _) => t.clone(),
            (None, true) => {
                issuer.reply(&format!("Usage: /{}", command.verb.usage()));
                return;
            }
            (None, false) => String::new(),
        };

        match command.verb {
            Verb::Add => self.handle_add(&issuer, &target).await,
            Verb::Remove => self.handle_remove(&issuer, &target).await,
            Verb::List => self.handle_list(&issuer).await,
            Verb::On => self.handle_toggle(&issuer, true),
            Verb::Off => self.handle_toggle(&issuer, false),
            Verb::Reload => self.handle_reload(&issuer),
            Verb::Info => self.handle_info(&issuer, &target).await,
        }
    }

    async fn handle_add(&self, issuer: &Arc<dyn CommandIssuer>, target: &str) {
        if let Some(client) = self.sessions.find_by_name(target) {
            // Connected: the live session already carries a verified id.
            match self.store.upsert_resolved(client.id, &client.name).await {
                Ok(()) => {
                    info!(id = %client.id, name = %client.name, "whitelisted connected client");
                    issuer.reply(&format!("{} is now whitelisted!", client.name));
                    let notice = self.config.snapshot().messages.whitelisted_notice;
                    self.sessions.notify(client.id, &notice);
                }
                Err(err) => {
                    error!(name = %client.name, %err, "failed to whitelist connected client");
                    issuer.reply("Error while whitelisting player. Check the server log.");
                }
            }
            return;
        }

        // Not connected: verify the name against the identity provider
        // first, so typos never provision unverifiable entries.
        match self.resolver.resolve(target).await {
            Some(profile) => match self.bind_verified(&profile).await {
                Ok(()) => {
                    info!(id = %profile.id, name = %profile.name, "whitelisted verified account");
                    issuer.reply(&format!(
                        "{} is now whitelisted ({}).",
                        profile.name,
                        profile.id
                    ));
                }
                Err(err) => {
                    error!(name = %profile.name, %err, "failed to whitelist verified account");
                    issuer.reply("Error while whitelisting player. Check the server log.");
                }
            },
            None => {
                issuer.reply(&format!(
                    "Could not verify account '{target}'. Nothing was added."
                ));
            }
        }
    }

    /// Promote any pending row carrying the verified name before the
    /// upsert. A verified add must not leave a pending row behind: the
    /// name would stay pre-authorized for whichever id next shows up
    /// with it.
    async fn bind_verified(&self, profile: &IdentityProfile) -> Result<(), StoreError> {
        self.store.attach_id(&profile.name, profile.id).await?;
        self.store.upsert_resolved(profile.id, &profile.name).await
    }

    async fn handle_remove(&self, issuer: &Arc<dyn CommandIssuer>, target: &str) {
        let online = self.sessions.find_by_name(target);

        let mut affected = 0;
        if let Some(client) = &online {
            match self.store.delete_by_id(client.id).await {
                Ok(n) => affected = n,
                Err(err) => {
                    error!(name = target, %err, "failed to remove whitelist entry");
                    issuer.reply("Error while removing player. Check the server log.");
                    return;
                }
            }
        }
        if affected == 0 {
            match self.store.delete_by_name(target).await {
                Ok(n) => affected = n,
                Err(err) => {
                    error!(name = target, %err, "failed to remove whitelist entry");
                    issuer.reply("Error while removing player. Check the server log.");
                    return;
                }
            }
        }

        if affected > 0 {
            issuer.reply(&format!(
                "{target} is no longer whitelisted ({affected} entries removed)."
            ));
            if let Some(client) = online {
                let message = self.config.snapshot().messages.removed;
                self.sessions.schedule_disconnect(client.id, &message);
            }
        } else {
            issuer.reply(&format!("No whitelist entry found for {target}."));
        }
    }

    async fn handle_list(&self, issuer: &Arc<dyn CommandIssuer>) {
        match self.store.list_names().await {
            Ok(names) => {
                let online = names
                    .iter()
                    .filter(|name| self.sessions.is_connected(name))
                    .count();
                issuer.reply(&format!(
                    "There are {online} (of {}) whitelisted players online:",
                    names.len()
                ));
                if names.is_empty() {
                    issuer.reply("[]");
                } else {
                    issuer.reply(&names.join(", "));
                }
            }
            Err(err) => {
                error!(%err, "failed to list whitelist");
                issuer.reply("Error while listing whitelist. Check the server log.");
            }
        }
    }

    fn handle_toggle(&self, issuer: &Arc<dyn CommandIssuer>, enabled: bool) {
        match self.config.set_enabled(enabled) {
            Ok(()) => {
                info!(enabled, "whitelist toggled");
                issuer.reply(if enabled {
                    "Whitelist enabled."
                } else {
                    "Whitelist disabled."
                });
            }
            Err(err) => {
                error!(%err, "failed to persist whitelist toggle");
                issuer.reply("Error while saving configuration. Check the server log.");
            }
        }
    }

    fn handle_reload(&self, issuer: &Arc<dyn CommandIssuer>) {
        match self.config.reload() {
            Ok(()) => issuer.reply("Whitelist configuration reloaded."),
            Err(err) => {
                error!(%err, "failed to reload configuration");
                issuer.reply("Error while reloading configuration. Check the server log.");
            }
        }
    }

    /// Diagnostic cross-reference of provider data, store membership and
    /// live connection status. Mutates nothing.
    async fn handle_info(&self, issuer: &Arc<dyn CommandIssuer>, target: &str) {
        let connected = self.sessions.find_by_name(target);
        let pending = self.store.lookup_pending_by_name(target).await;
        let profile = self.resolver.resolve(target).await;

        issuer.reply(&format!("--- Whitelist info: {target} ---"));

        match &profile {
            Some(profile) => {
                issuer.reply(&format!("Account: {} ({})", profile.name, profile.id));
                match profile.created_at {
                    Some(created) => issuer.reply(&format!("Created: {}", created.date_naive())),
                    None => issuer.reply("Created: unknown"),
                }
                if !profile.name_history.is_empty() {
                    issuer.reply(&format!("Name history: {}", profile.name_history.join(" -> ")));
                }
                if let Some(url) = &profile.avatar_url {
                    issuer.reply(&format!("Skin: {url}"));
                }
            }
            None => issuer.reply("Account: not verified by the identity provider"),
        }

        let membership = match pending {
            Err(err) => {
                error!(name = target, %err, "failed to read whitelist entry");
                "unknown (store error)".to_string()
            }
            Ok(true) => "pending (name only, id not yet attached)".to_string(),
            Ok(false) => {
                if let Some(profile) = &profile {
                    match self.store.lookup_resolved(profile.id).await {
                        Ok(Some(_)) => "whitelisted".to_string(),
                        Ok(None) => "not whitelisted".to_string(),
                        Err(err) => {
                            error!(name = target, %err, "failed to read whitelist entry");
                            "unknown (store error)".to_string()
                        }
                    }
                } else {
                    "not whitelisted".to_string()
                }
            }
        };
        issuer.reply(&format!("Whitelist: {membership}"));

        match connected {
            Some(client) => issuer.reply(&format!("Connected: yes, as {}", client.name)),
            None => issuer.reply("Connected: no"),
        }
    }
}

impl CommandSink for CommandDispatcher {
    fn submit(&self, issuer: Arc<dyn CommandIssuer>, line: &str) -> bool {
        let Some(command) = WhitelistCommand::parse(line) else {
            return false;
        };

        // Capability gate before any side effect. Unauthorized issuers
        // get silence, not feedback.
        if !self.authorized(&*issuer, command.verb.capability()) {
            debug!(verb = ?command.verb, "unauthorized whitelist command ignored");
            return true;
        }

        if command.verb.requires_target() && command.target.is_none() {
            issuer.reply(&format!("Usage: /{}", command.verb.usage()));
            return true;
        }

        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.execute(issuer, command).await;
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::GatekeeperConfig;
    use crate::domain::membership::{MembershipRecord, StableId};
    use crate::domain::session::ConnectedClient;
    use crate::infrastructure::repositories::InMemoryMembershipStore;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn id(s: &str) -> StableId {
        StableId::parse(s).unwrap()
    }

    struct RecordingIssuer {
        capabilities: HashSet<Capability>,
        operator: bool,
        replies: Mutex<Vec<String>>,
    }

    impl RecordingIssuer {
        fn with(capabilities: &[Capability]) -> Arc<Self> {
            Arc::new(Self {
                capabilities: capabilities.iter().copied().collect(),
                operator: false,
                replies: Mutex::new(Vec::new()),
            })
        }

        fn operator() -> Arc<Self> {
            Arc::new(Self {
                capabilities: HashSet::new(),
                operator: true,
                replies: Mutex::new(Vec::new()),
            })
        }

        fn replies(&self) -> Vec<String> {
            self.replies.lock().unwrap().clone()
        }
    }

    impl CommandIssuer for RecordingIssuer {
        fn has_capability(&self, capability: Capability) -> bool {
            self.capabilities.contains(&capability)
        }
        fn is_operator(&self) -> bool {
            self.operator
        }
        fn reply(&self, message: &str) {
            self.replies.lock().unwrap().push(message.to_string());
        }
    }

    #[derive(Default)]
    struct FakeSessions {
        clients: Vec<ConnectedClient>,
        disconnects: Mutex<Vec<(StableId, String)>>,
        notices: Mutex<Vec<(StableId, String)>>,
    }

    impl FakeSessions {
        fn with(clients: Vec<ConnectedClient>) -> Arc<Self> {
            Arc::new(Self {
                clients,
                ..Default::default()
            })
        }
    }

    impl SessionDirectory for FakeSessions {
        fn find_by_name(&self, name: &str) -> Option<ConnectedClient> {
            self.clients.iter().find(|c| c.name == name).cloned()
        }
        fn notify(&self, id: StableId, message: &str) {
            self.notices.lock().unwrap().push((id, message.to_string()));
        }
        fn schedule_disconnect(&self, id: StableId, message: &str) {
            self.disconnects
                .lock()
                .unwrap()
                .push((id, message.to_string()));
        }
    }

    struct OutageStore;

    #[async_trait]
    impl MembershipRepository for OutageStore {
        async fn lookup_resolved(
            &self,
            _id: StableId,
        ) -> Result<Option<MembershipRecord>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn lookup_pending_by_name(&self, _name: &str) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn attach_name(&self, _id: StableId, _name: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn attach_id(&self, _name: &str, _id: StableId) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn insert_resolved(&self, _id: StableId, _name: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn insert_pending(&self, _name: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn upsert_resolved(&self, _id: StableId, _name: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn delete_by_id(&self, _id: StableId) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn delete_by_name(&self, _name: &str) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn list_names(&self) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    struct StubResolver(Option<IdentityProfile>);

    #[async_trait]
    impl IdentityResolver for StubResolver {
        async fn resolve(&self, _name: &str) -> Option<IdentityProfile> {
            self.0.clone()
        }
    }

    fn dispatcher(
        store: Arc<InMemoryMembershipStore>,
        resolver: Option<IdentityProfile>,
        sessions: Arc<FakeSessions>,
    ) -> CommandDispatcher {
        CommandDispatcher::new(
            store,
            Arc::new(StubResolver(resolver)),
            sessions,
            SharedConfig::new(GatekeeperConfig::default()),
        )
    }

    fn cmd(line: &str) -> WhitelistCommand {
        WhitelistCommand::parse(line).unwrap()
    }

    #[tokio::test]
    async fn add_connected_client_upserts_and_notifies() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let alice = id("069a79f4-44e9-4726-a5be-fca90e38aaf5");
        let sessions = FakeSessions::with(vec![ConnectedClient {
            id: alice,
            name: "Alice".into(),
        }]);
        let dispatcher = dispatcher(store.clone(), None, sessions.clone());
        let issuer = RecordingIssuer::with(&[Capability::Add]);

        dispatcher.execute(issuer.clone(), cmd("whitelist add Alice")).await;

        let record = store.lookup_resolved(alice).await.unwrap().unwrap();
        assert_eq!(record.display_name.as_deref(), Some("Alice"));
        assert_eq!(issuer.replies(), vec!["Alice is now whitelisted!"]);
        assert_eq!(sessions.notices.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_connected_client_twice_updates_instead_of_failing() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let alice = id("069a79f4-44e9-4726-a5be-fca90e38aaf5");
        store.insert_resolved(alice, "OldName").await.unwrap();
        let sessions = FakeSessions::with(vec![ConnectedClient {
            id: alice,
            name: "Alice".into(),
        }]);
        let dispatcher = dispatcher(store.clone(), None, sessions);
        let issuer = RecordingIssuer::operator();

        dispatcher.execute(issuer.clone(), cmd("whitelist add Alice")).await;

        let record = store.lookup_resolved(alice).await.unwrap().unwrap();
        assert_eq!(record.display_name.as_deref(), Some("Alice"));
        assert_eq!(store.row_count(), 1);
    }

    #[tokio::test]
    async fn add_offline_verified_account_inserts_resolved_record() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let bob = id("11111111-2222-3333-4444-555555555555");
        let profile = IdentityProfile {
            id: bob,
            name: "Bob".into(),
            created_at: None,
            name_history: vec![],
            avatar_url: None,
        };
        let dispatcher = dispatcher(store.clone(), Some(profile), FakeSessions::with(vec![]));
        let issuer = RecordingIssuer::with(&[Capability::Add]);

        dispatcher.execute(issuer.clone(), cmd("whitelist add bob")).await;

        let record = store.lookup_resolved(bob).await.unwrap().unwrap();
        assert_eq!(record.display_name.as_deref(), Some("Bob"));
        assert!(issuer.replies()[0].contains("Bob is now whitelisted"));
    }

    #[tokio::test]
    async fn add_offline_unverified_name_mutates_nothing() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let dispatcher = dispatcher(store.clone(), None, FakeSessions::with(vec![]));
        let issuer = RecordingIssuer::with(&[Capability::Add]);

        dispatcher.execute(issuer.clone(), cmd("whitelist add Ghost")).await;

        assert_eq!(store.row_count(), 0);
        assert!(issuer.replies()[0].contains("Could not verify account 'Ghost'"));
    }

    #[tokio::test]
    async fn add_offline_verified_account_promotes_pending_row() {
        let store = Arc::new(InMemoryMembershipStore::new());
        store.insert_pending("Bob").await.unwrap();
        let bob = id("11111111-2222-3333-4444-555555555555");
        let profile = IdentityProfile {
            id: bob,
            name: "Bob".into(),
            created_at: None,
            name_history: vec![],
            avatar_url: None,
        };
        let dispatcher = dispatcher(store.clone(), Some(profile), FakeSessions::with(vec![]));
        let issuer = RecordingIssuer::with(&[Capability::Add]);

        dispatcher.execute(issuer.clone(), cmd("whitelist add Bob")).await;

        // The pending row is bound to the verified id, not left behind
        // for an arbitrary later id to claim.
        assert_eq!(store.row_count(), 1);
        assert!(!store.lookup_pending_by_name("Bob").await.unwrap());
        let record = store.lookup_resolved(bob).await.unwrap().unwrap();
        assert_eq!(record.display_name.as_deref(), Some("Bob"));
    }

    #[tokio::test]
    async fn remove_connected_client_deletes_and_disconnects() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let carol = id("22222222-3333-4444-5555-666666666666");
        store.insert_resolved(carol, "Carol").await.unwrap();
        let sessions = FakeSessions::with(vec![ConnectedClient {
            id: carol,
            name: "Carol".into(),
        }]);
        let dispatcher = dispatcher(store.clone(), None, sessions.clone());
        let issuer = RecordingIssuer::with(&[Capability::Remove]);

        dispatcher.execute(issuer.clone(), cmd("whitelist remove Carol")).await;

        assert_eq!(store.row_count(), 0);
        assert!(issuer.replies()[0].contains("1 entries removed"));
        let disconnects = sessions.disconnects.lock().unwrap();
        assert_eq!(disconnects.len(), 1);
        assert_eq!(disconnects[0].0, carol);
    }

    #[tokio::test]
    async fn remove_offline_entry_falls_back_to_name() {
        let store = Arc::new(InMemoryMembershipStore::new());
        store.insert_pending("Dave").await.unwrap();
        let sessions = FakeSessions::with(vec![]);
        let dispatcher = dispatcher(store.clone(), None, sessions.clone());
        let issuer = RecordingIssuer::with(&[Capability::Remove]);

        dispatcher.execute(issuer.clone(), cmd("whitelist rm Dave")).await;

        assert_eq!(store.row_count(), 0);
        assert!(sessions.disconnects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_nonexistent_reports_zero_and_no_disconnect() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let sessions = FakeSessions::with(vec![]);
        let dispatcher = dispatcher(store, None, sessions.clone());
        let issuer = RecordingIssuer::with(&[Capability::Remove]);

        dispatcher.execute(issuer.clone(), cmd("whitelist remove Carol")).await;

        assert_eq!(issuer.replies(), vec!["No whitelist entry found for Carol."]);
        assert!(sessions.disconnects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_reports_connected_count() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let alice = id("069a79f4-44e9-4726-a5be-fca90e38aaf5");
        store.insert_resolved(alice, "Alice").await.unwrap();
        store.insert_pending("Bob").await.unwrap();
        let sessions = FakeSessions::with(vec![ConnectedClient {
            id: alice,
            name: "Alice".into(),
        }]);
        let dispatcher = dispatcher(store, None, sessions);
        let issuer = RecordingIssuer::with(&[Capability::List]);

        dispatcher.execute(issuer.clone(), cmd("whitelist list")).await;

        let replies = issuer.replies();
        assert!(replies[0].contains("1 (of 2)"));
        assert!(replies[1].contains("Alice"));
        assert!(replies[1].contains("Bob"));
    }

    #[tokio::test]
    async fn toggle_flips_enabled_flag() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let config = SharedConfig::new(GatekeeperConfig::default());
        let dispatcher = CommandDispatcher::new(
            store,
            Arc::new(StubResolver(None)),
            FakeSessions::with(vec![]),
            config.clone(),
        );
        let issuer = RecordingIssuer::with(&[Capability::Off, Capability::On]);

        dispatcher.execute(issuer.clone(), cmd("whitelist off")).await;
        assert!(!config.enabled());
        dispatcher.execute(issuer.clone(), cmd("whitelist on")).await;
        assert!(config.enabled());
    }

    #[tokio::test]
    async fn info_cross_references_store_provider_and_sessions() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let alice = id("069a79f4-44e9-4726-a5be-fca90e38aaf5");
        store.insert_resolved(alice, "Alice").await.unwrap();
        let profile = IdentityProfile {
            id: alice,
            name: "Alice".into(),
            created_at: None,
            name_history: vec!["Al".into(), "Alice".into()],
            avatar_url: Some("https://textures.example/alice.png".into()),
        };
        let sessions = FakeSessions::with(vec![ConnectedClient {
            id: alice,
            name: "Alice".into(),
        }]);
        let dispatcher = dispatcher(store.clone(), Some(profile), sessions);
        let issuer = RecordingIssuer::with(&[Capability::Info]);

        dispatcher.execute(issuer.clone(), cmd("whitelist info Alice")).await;

        let replies = issuer.replies().join("\n");
        assert!(replies.contains("Account: Alice"));
        assert!(replies.contains("Name history: Al -> Alice"));
        assert!(replies.contains("Whitelist: whitelisted"));
        assert!(replies.contains("Connected: yes"));
        // diagnostics only, nothing changed
        assert_eq!(store.row_count(), 1);
    }

    #[tokio::test]
    async fn info_reports_store_outage_instead_of_not_whitelisted() {
        let alice = id("069a79f4-44e9-4726-a5be-fca90e38aaf5");
        let profile = IdentityProfile {
            id: alice,
            name: "Alice".into(),
            created_at: None,
            name_history: vec![],
            avatar_url: None,
        };
        let dispatcher = CommandDispatcher::new(
            Arc::new(OutageStore),
            Arc::new(StubResolver(Some(profile))),
            FakeSessions::with(vec![]),
            SharedConfig::new(GatekeeperConfig::default()),
        );
        let issuer = RecordingIssuer::with(&[Capability::Info]);

        dispatcher.execute(issuer.clone(), cmd("whitelist info Alice")).await;

        let replies = issuer.replies().join("\n");
        assert!(replies.contains("Whitelist: unknown (store error)"));
        assert!(!replies.contains("not whitelisted"));
    }

    #[tokio::test]
    async fn submit_ignores_foreign_commands() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let dispatcher = dispatcher(store, None, FakeSessions::with(vec![]));
        let issuer = RecordingIssuer::operator();

        assert!(!dispatcher.submit(issuer.clone(), "gamemode creative"));
        assert!(!dispatcher.submit(issuer.clone(), "whitelist frobnicate"));
        assert!(issuer.replies().is_empty());
    }

    #[tokio::test]
    async fn submit_swallows_unauthorized_commands_silently() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let dispatcher = dispatcher(store.clone(), None, FakeSessions::with(vec![]));
        let issuer = RecordingIssuer::with(&[]);

        assert!(dispatcher.submit(issuer.clone(), "whitelist add Alice"));
        assert!(issuer.replies().is_empty());
        assert_eq!(store.row_count(), 0);
    }

    #[tokio::test]
    async fn submit_replies_usage_on_missing_argument() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let dispatcher = dispatcher(store.clone(), None, FakeSessions::with(vec![]));
        let issuer = RecordingIssuer::with(&[Capability::Add]);

        assert!(dispatcher.submit(issuer.clone(), "whitelist add"));
        assert_eq!(issuer.replies(), vec!["Usage: /whitelist add <name>"]);
        assert_eq!(store.row_count(), 0);
    }

    #[tokio::test]
    async fn wildcard_capability_grants_every_verb() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let dispatcher = dispatcher(store, None, FakeSessions::with(vec![]));
        let issuer = RecordingIssuer::with(&[Capability::All]);

        dispatcher.execute(issuer.clone(), cmd("whitelist list")).await;
        assert!(!issuer.replies().is_empty());
        assert!(dispatcher.authorized(&*issuer, Capability::Remove));
    }
}
