//! End-to-end runs of the pipeline through the public API.

use std::rc::Rc;

use pretty_assertions::assert_eq;
use session::storage::ACTIVE_LOGINID_KEY;
use session::storage::CLIENT_ACCOUNTS_KEY;
use session::ChangeWatcher;
use session::MemoryStore;
use session::SyncConfig;
use session::SyncError;
use session::SyncState;
use session::SyncStatus;
use session::Trigger;

const BASE: &str = "https://deriv-dtrader.vercel.app/dtrader";

fn config(base: &str) -> SyncConfig {
    SyncConfig {
        dtrader_url: base.to_string(),
        app_id: 110113,
        default_symbol: "1HZ100V".to_string(),
        ..SyncConfig::default()
    }
}

fn mount(config: SyncConfig, local: &MemoryStore) -> (ChangeWatcher, Vec<SyncState>) {
    let mut watcher = ChangeWatcher::new(config, Rc::new(local.clone()), Rc::new(MemoryStore::new()));
    let mut published = Vec::new();
    watcher.handle(&Trigger::Mount, &mut |s: &SyncState| published.push(s.clone()));
    (watcher, published)
}

#[test]
fn logged_in_account_is_handed_to_dtrader() {
    let local = MemoryStore::new();
    local.set_item(ACTIVE_LOGINID_KEY, "CR123");
    local.set_item(CLIENT_ACCOUNTS_KEY, r#"{"CR123":{"token":"abc","currency":"EUR"}}"#);

    let (watcher, _) = mount(config(BASE), &local);

    assert_eq!(
        watcher.state().url().map(|u| u.as_str()),
        Some(
            "https://deriv-dtrader.vercel.app/dtrader?acct1=CR123&token1=abc&cur1=EUR&lang=EN\
             &app_id=110113&chart_type=area&interval=1t&symbol=1HZ100V&trade_type=over_under"
        )
    );
}

#[test]
fn empty_storage_opens_anonymously() {
    let (watcher, _) = mount(config(BASE), &MemoryStore::new());

    assert_eq!(
        watcher.state().url().map(|u| u.to_string()),
        Some(format!(
            "{BASE}?chart_type=area&interval=1t&symbol=1HZ100V&trade_type=over_under"
        ))
    );
}

#[test]
fn untrusted_base_is_an_error_not_a_url() {
    let local = MemoryStore::new();
    local.set_item(ACTIVE_LOGINID_KEY, "CR123");
    local.set_item(CLIENT_ACCOUNTS_KEY, r#"{"CR123":{"token":"abc","currency":"EUR"}}"#);

    let (watcher, published) = mount(config("https://evil.example.com"), &local);

    assert!(published.iter().all(|s| s.url().is_none()));
    assert_eq!(
        watcher.state().status,
        SyncStatus::Error(SyncError::UntrustedDestination {
            url: "https://evil.example.com".into()
        })
    );
    assert_eq!(watcher.state().error().map(|e| e.user_message()), Some("Invalid DTrader URL"));
}

#[test]
fn accounts_change_while_ready_goes_through_loading() {
    let local = MemoryStore::new();
    local.set_item(ACTIVE_LOGINID_KEY, "CR123");
    local.set_item(CLIENT_ACCOUNTS_KEY, r#"{"CR123":{"token":"abc","currency":"EUR"}}"#);
    let (mut watcher, _) = mount(config(BASE), &local);
    assert!(watcher.state().status.is_ready());

    local.set_item(CLIENT_ACCOUNTS_KEY, r#"{"CR123":{"token":"rotated","currency":"EUR"}}"#);
    let mut published = Vec::new();
    let ran = watcher.handle(
        &Trigger::StorageChanged(Some(CLIENT_ACCOUNTS_KEY.into())),
        &mut |s: &SyncState| published.push(s.clone()),
    );

    assert!(ran);
    assert_eq!(published.len(), 2);
    assert!(published[0].is_loading());
    assert!(published[1]
        .url()
        .is_some_and(|u| u.as_str().contains("token1=rotated")));
}

#[test]
fn unchanged_storage_gives_byte_identical_urls() {
    let local = MemoryStore::new();
    local.set_item(ACTIVE_LOGINID_KEY, "CR 9/&");
    local.set_item(CLIENT_ACCOUNTS_KEY, r#"{"CR 9/&":{"token":"a b+c"}}"#);

    let (mut watcher, _) = mount(config(BASE), &local);
    let first = watcher.state().url().cloned();
    watcher.handle(&Trigger::Tick, &mut |_: &SyncState| {});
    let second = watcher.state().url().cloned();

    assert!(first.is_some());
    assert_eq!(first, second);
}
