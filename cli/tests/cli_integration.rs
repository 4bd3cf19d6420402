//! CLI integration tests for hitodo
//!
//! Each test starts its own mock server and drives the binary against it,
//! checking both the printed output and what the server ends up storing.

use std::collections::BTreeMap;

use predicates::prelude::*;
use serde_json::Value;

/// Start a fresh mock server on a random port and return its `/api` base.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/api")
}

/// Get a command instance for the hitodo binary pointed at `api`
fn hitodo_cmd(api: &str) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("hitodo"));
    cmd.env_remove("RUST_LOG").args(["--api-url", api]);
    cmd
}

/// Run `args` with JSON output and return each printed line parsed
fn json_lines(api: &str, args: &[&str]) -> Vec<Value> {
    let output = hitodo_cmd(api).args(["-f", "json"]).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn snapshot(api: &str) -> BTreeMap<String, Value> {
    let lines = json_lines(api, &["show"]);
    serde_json::from_value(lines[0].clone()).unwrap()
}

fn create_list(api: &str, title: &str) -> String {
    let lines = json_lines(api, &["list", "add", title]);
    lines[1]["id"].as_str().unwrap().to_string()
}

/// Pull the id out of a "Verb noun <id>" message
fn message_id(line: &Value) -> String {
    let message = line["message"].as_str().unwrap();
    message.rsplit(' ').next().unwrap().to_string()
}

// =============================================================================
// Show
// =============================================================================

#[test]
fn test_show_empty_collection() {
    let api = start_server();

    hitodo_cmd(&api)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("No lists yet"));
}

#[test]
fn test_unreachable_server_fails() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    hitodo_cmd(&format!("http://{addr}/api"))
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load lists"));
}

#[test]
fn test_show_collapse_hides_sub_items() {
    let api = start_server();
    let list = create_list(&api, "Garden");
    let parent = message_id(&json_lines(&api, &["item", "add", "Mow", "--list", &list])[0]);
    json_lines(&api, &["item", "add", "Edges", "--item", &parent]);

    hitodo_cmd(&api)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Edges"));

    hitodo_cmd(&api)
        .args(["show", "--collapse", &parent])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mow").and(predicate::str::contains("[collapsed]")))
        .stdout(predicate::str::contains("Edges").not());
}

// =============================================================================
// List Tests
// =============================================================================

#[test]
fn test_list_add_and_show() {
    let api = start_server();

    hitodo_cmd(&api)
        .args(["list", "add", "Groceries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created list"));

    hitodo_cmd(&api)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries ("));
}

#[test]
fn test_list_add_blank_title_creates_nothing() {
    let api = start_server();

    hitodo_cmd(&api)
        .args(["list", "add", "   "])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing created"));

    assert!(snapshot(&api).is_empty());
}

#[test]
fn test_list_rename_and_rm() {
    let api = start_server();
    let id = create_list(&api, "Chores");

    hitodo_cmd(&api)
        .args(["list", "rename", &id, "Weekend chores"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed list"));
    assert_eq!(snapshot(&api)[&id]["title"], "Weekend chores");

    hitodo_cmd(&api)
        .args(["list", "rename", &id, "Weekend chores"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title unchanged"));

    hitodo_cmd(&api).args(["list", "rm", &id]).assert().success();
    assert!(snapshot(&api).is_empty());
}

// =============================================================================
// Item Tests
// =============================================================================

#[test]
fn test_item_add_nests_and_stops_at_depth_limit() {
    let api = start_server();
    let list = create_list(&api, "Deep");

    let first = json_lines(&api, &["item", "add", "level 1", "--list", &list]);
    let mut parent = message_id(&first[0]);
    for level in 2..=3 {
        let content = format!("level {level}");
        let lines = json_lines(&api, &["item", "add", &content, "--item", &parent]);
        parent = message_id(&lines[0]);
    }

    hitodo_cmd(&api)
        .args(["item", "add", "level 4", "--item", &parent])
        .assert()
        .failure()
        .stderr(predicate::str::contains("depth"));

    let items = &snapshot(&api)[&list]["items"];
    assert_eq!(items[0]["subItems"][0]["subItems"][0]["content"], "level 3");
    assert!(items[0]["subItems"][0]["subItems"][0]["subItems"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[test]
fn test_item_add_requires_parent() {
    let api = start_server();

    hitodo_cmd(&api)
        .args(["item", "add", "orphan"])
        .assert()
        .failure();
}

#[test]
fn test_item_edit_and_rm() {
    let api = start_server();
    let list = create_list(&api, "Groceries");
    let added = json_lines(&api, &["item", "add", "milk", "--list", &list]);
    let item = message_id(&added[0]);

    hitodo_cmd(&api)
        .args(["item", "edit", &item, "oat milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated item"));
    assert_eq!(snapshot(&api)[&list]["items"][0]["content"], "oat milk");

    hitodo_cmd(&api)
        .args(["--reload", "item", "rm", &item])
        .assert()
        .success();
    assert!(snapshot(&api)[&list]["items"].as_array().unwrap().is_empty());
}

// =============================================================================
// Move Tests
// =============================================================================

#[test]
fn test_mv_reorders_within_list() {
    let api = start_server();
    let list = create_list(&api, "Groceries");
    let a = message_id(&json_lines(&api, &["item", "add", "A", "--list", &list])[0]);
    let b = message_id(&json_lines(&api, &["item", "add", "B", "--list", &list])[0]);

    hitodo_cmd(&api)
        .args(["mv", &a, &list, "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved"));

    let items = snapshot(&api)[&list]["items"].clone();
    assert_eq!(items[0]["id"], b.as_str());
    assert_eq!(items[1]["id"], a.as_str());

    hitodo_cmd(&api)
        .args(["mv", &a, &list, "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to move"));
}

#[test]
fn test_mv_between_lists() {
    let api = start_server();
    let from = create_list(&api, "From");
    let to = create_list(&api, "To");
    let a = message_id(&json_lines(&api, &["item", "add", "A", "--list", &from])[0]);

    hitodo_cmd(&api).args(["mv", &a, &to, "0"]).assert().success();

    let lists = snapshot(&api);
    assert!(lists[&from]["items"].as_array().unwrap().is_empty());
    assert_eq!(lists[&to]["items"][0]["id"], a.as_str());
}

#[test]
fn test_mv_rejects_sub_items() {
    let api = start_server();
    let list = create_list(&api, "Groceries");
    let a = message_id(&json_lines(&api, &["item", "add", "A", "--list", &list])[0]);
    let child = message_id(&json_lines(&api, &["item", "add", "A.1", "--item", &a])[0]);

    hitodo_cmd(&api)
        .args(["mv", &child, &list, "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sub-item"));
}
