//! End-to-end tests for the schemagraph binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn graph_path(&self) -> std::path::PathBuf {
        self.dir.path().join("graph.gdb")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("schemagraph").unwrap();
        cmd.env("SCHEMAGRAPH_CONFIG", self.dir.path().join("config.toml"))
            .env_remove("SCHEMAGRAPH_FILE")
            .env_remove("RUST_LOG")
            .arg("--file")
            .arg(self.graph_path());
        cmd
    }

    fn run(&self, args: &[&str]) {
        self.cmd().args(args).assert().success();
    }

    /// User/Company schema with a small social graph:
    /// alice -FRIENDS-> bob -FRIENDS-> carol, alice -WORKS_AT-> acme
    fn seed(&self) {
        self.run(&["schema", "node-type", "User", "--required", "name,age"]);
        self.run(&["schema", "node-type", "Company", "--required", "name"]);
        self.run(&["schema", "rel-type", "FRIENDS", "--from", "User", "--to", "User"]);
        self.run(&[
            "schema", "rel-type", "WORKS_AT", "--from", "User", "--to", "Company", "--optional",
            "since",
        ]);
        for (id, name, age) in [("alice", "Alice", "30"), ("bob", "Bob", "25"), ("carol", "Carol", "30")] {
            let name = format!("name={}", name);
            let age = format!("age={}", age);
            self.run(&["node", "add", id, "-t", "User", "-p", name.as_str(), "-p", age.as_str()]);
        }
        self.run(&["node", "add", "acme", "-t", "Company", "-p", "name=Acme"]);
        self.run(&["edge", "add", "alice", "bob", "-r", "FRIENDS"]);
        self.run(&["edge", "add", "bob", "carol", "-r", "FRIENDS"]);
        self.run(&["edge", "add", "alice", "acme", "-r", "WORKS_AT", "-p", "since=2020"]);
    }
}

#[test]
fn test_nodes_persist_between_invocations() {
    let ws = Workspace::new();
    ws.seed();

    ws.cmd()
        .args(["node", "list", "-t", "User"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("{age=30, name=Alice}"))
        .stdout(predicate::str::contains("acme").not());

    let contents = std::fs::read_to_string(ws.graph_path()).unwrap();
    assert!(contents.contains("[SCHEMA_NODE_TYPES]"));
    assert!(contents.contains("alice|User|age=30;name=Alice"));
    assert!(contents.contains("alice|acme|WORKS_AT|since=2020"));
}

#[test]
fn test_missing_required_property_is_rejected() {
    let ws = Workspace::new();
    ws.seed();

    ws.cmd()
        .args(["node", "add", "dave", "-t", "User", "-p", "name=Dave"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required property age"));

    ws.cmd()
        .args(["count", "nodes", "-t", "User"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_edge_type_mismatch_is_rejected() {
    let ws = Workspace::new();
    ws.seed();

    ws.cmd()
        .args(["edge", "add", "acme", "alice", "-r", "WORKS_AT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expects (User -> Company)"));
}

#[test]
fn test_duplicate_node_id_is_rejected() {
    let ws = Workspace::new();
    ws.seed();

    ws.cmd()
        .args(["node", "add", "acme", "-t", "Company", "-p", "name=Other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Node ID already exists: acme"));
}

#[test]
fn test_find_by_property() {
    let ws = Workspace::new();
    ws.seed();

    let output = ws
        .cmd()
        .args(["--format", "json", "node", "list", "--where", "age=30"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let nodes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = nodes
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["alice", "carol"]);
}

#[test]
fn test_set_and_remove_property() {
    let ws = Workspace::new();
    ws.seed();

    ws.run(&["node", "set", "bob", "age", "26"]);
    ws.cmd()
        .args(["node", "list", "--where", "age=26"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bob"));

    ws.cmd()
        .args(["node", "set", "bob", "age"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot set required property 'age'"));

    ws.run(&["edge", "set", "alice", "acme", "-r", "WORKS_AT", "since"]);
    ws.cmd()
        .args(["edge", "list", "-r", "WORKS_AT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("since").not());
}

#[test]
fn test_shortest_path() {
    let ws = Workspace::new();
    ws.seed();

    ws.cmd()
        .args(["traverse", "path", "alice", "carol", "-r", "FRIENDS"])
        .assert()
        .success()
        .stdout("alice -> bob -> carol\n(2 hop(s))\n");

    ws.cmd()
        .args(["traverse", "path", "carol", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No path from carol to alice"));
}

#[test]
fn test_bfs_json_output() {
    let ws = Workspace::new();
    ws.seed();

    let output = ws
        .cmd()
        .args(["--format", "json", "traverse", "bfs", "alice"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["mode"], "bfs");
    assert_eq!(
        result["visited"],
        serde_json::json!(["alice", "bob", "acme", "carol"])
    );
}

#[test]
fn test_traverse_unknown_node_fails() {
    let ws = Workspace::new();
    ws.seed();

    ws.cmd()
        .args(["traverse", "dfs", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Node not found: nobody"));
}

#[test]
fn test_delete_node_cascades() {
    let ws = Workspace::new();
    ws.seed();

    ws.cmd()
        .args(["node", "delete", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 edge(s) removed"));

    ws.cmd()
        .args(["count", "edges"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_drop_type_in_use() {
    let ws = Workspace::new();
    ws.seed();

    ws.cmd()
        .args(["schema", "drop-node-type", "Company"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 instance(s) still exist"));

    ws.run(&["node", "delete", "acme"]);
    ws.run(&["schema", "drop-node-type", "Company"]);

    ws.cmd()
        .args(["node", "add", "initech", "-t", "Company", "-p", "name=Initech"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown node type: 'Company'"));
}

#[test]
fn test_clear_keeps_schema() {
    let ws = Workspace::new();
    ws.seed();

    ws.run(&["clear"]);
    ws.cmd()
        .args(["count", "nodes"])
        .assert()
        .success()
        .stdout("0\n");
    ws.cmd()
        .args(["schema", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FRIENDS"));

    ws.run(&["clear", "--all"]);
    ws.cmd()
        .args(["schema", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No node types defined."));
}

#[test]
fn test_index_listing() {
    let ws = Workspace::new();
    ws.seed();

    ws.cmd()
        .args(["index"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice,carol"));
}

#[test]
fn test_config_set_and_get() {
    let ws = Workspace::new();

    ws.run(&["config", "set", "format", "json"]);
    ws.cmd()
        .args(["config", "get", "format"])
        .assert()
        .success()
        .stdout("json\n");

    ws.cmd()
        .args(["config", "get", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));

    ws.run(&["config", "reset", "format"]);
    ws.cmd()
        .args(["config", "get", "format"])
        .assert()
        .success()
        .stdout("table\n");
}

#[test]
fn test_completions() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("schemagraph"));
}

#[test]
fn test_config_follows_format_flag() {
    let ws = Workspace::new();
    ws.run(&["config", "set", "graph_file", "social.gdb"]);

    let output = ws
        .cmd()
        .args(["--format", "json", "config", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["settings"]["graph_file"], "social.gdb");
    assert_eq!(view["settings"]["format"], "table");

    ws.cmd()
        .args(["--format", "json", "config", "get", "graph_file"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"graph_file\": \"social.gdb\""));

    ws.cmd()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("graph_file"))
        .stdout(predicate::str::contains("social.gdb"));
}

#[test]
fn test_line_break_in_value_is_rejected() {
    let ws = Workspace::new();
    ws.seed();

    ws.cmd()
        .args(["node", "add", "dave", "-t", "User", "-p", "name=Da\nve", "-p", "age=40"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line breaks are not allowed"));

    ws.cmd()
        .args(["node", "list", "-t", "User"])
        .assert()
        .success()
        .stdout(predicate::str::contains("carol"));
}

#[test]
fn test_quiet_flag_help() {
    Command::cargo_bin("schemagraph")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Only log errors"));
}
