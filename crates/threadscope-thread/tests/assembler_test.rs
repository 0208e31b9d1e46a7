use chrono::{DateTime, TimeZone, Utc};
use threadscope_thread::{render_tree, AssembleMode, Post, ThreadAssembler};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_670_000_000 + secs, 0).unwrap()
}

fn post(id: &str, reply_to: Option<&str>, secs: i64) -> Post {
    let p = Post::new(id, "1", format!("u{}", id), format!("user{}", id), "text", at(secs));
    match reply_to {
        Some(parent) => p.replying_to(parent),
        None => p,
    }
}

fn sample_thread() -> Vec<Post> {
    vec![
        post("1", None, 0),
        post("2", Some("1"), 1),
        post("3", Some("1"), 2),
        post("4", Some("2"), 3),
    ]
}

#[test]
fn test_full_tree_keeps_all_siblings() {
    let thread = ThreadAssembler::new(AssembleMode::FullTree)
        .assemble(&sample_thread(), "1")
        .unwrap();

    assert_eq!(thread.root().id(), "1");
    assert!(!thread.root_fallback);
    assert_eq!(thread.root().child_ids(), vec!["2", "3"]);
    assert_eq!(thread.root().find("2").unwrap().child_ids(), vec!["4"]);
    assert!(thread.root().find("3").unwrap().is_leaf());
    assert!(thread.detached.is_empty());
}

#[test]
fn test_root_is_conversation_id_regardless_of_position() {
    let mut posts = sample_thread();
    posts.reverse();

    let thread = ThreadAssembler::default().assemble(&posts, "1").unwrap();
    assert_eq!(thread.root().id(), "1");
    assert_eq!(thread.root().node_count(), 4);
}

#[test]
fn test_sibling_order_follows_input() {
    let posts = vec![
        post("1", None, 0),
        post("3", Some("1"), 5),
        post("2", Some("1"), 1),
    ];

    let thread = ThreadAssembler::default().assemble(&posts, "1").unwrap();
    assert_eq!(thread.root().child_ids(), vec!["3", "2"]);
}

#[test]
fn test_missing_root_falls_back_to_earliest() {
    let posts = vec![
        post("3", Some("2"), 30),
        post("2", Some("1"), 10),
        post("5", Some("2"), 40),
        post("9", Some("8"), 5),
    ];

    let thread = ThreadAssembler::default().assemble(&posts, "1").unwrap();

    assert!(thread.root_fallback);
    assert_eq!(thread.root().id(), "9");
    assert!(thread.root().is_leaf());
}

#[test]
fn test_missing_root_keeps_substitute_subtree() {
    let posts = vec![
        post("3", Some("2"), 30),
        post("2", Some("1"), 10),
        post("5", Some("2"), 40),
    ];

    let thread = ThreadAssembler::default().assemble(&posts, "1").unwrap();

    assert!(thread.root_fallback);
    assert_eq!(thread.root().id(), "2");
    assert_eq!(thread.root().child_ids(), vec!["3", "5"]);
}

#[test]
fn test_orphans_never_appear() {
    let mut posts = sample_thread();
    posts.push(post("7", Some("404"), 4));
    posts.push(post("8", Some("7"), 5));

    let thread = ThreadAssembler::default().assemble(&posts, "1").unwrap();

    assert!(!thread.root().contains("7"));
    assert!(!thread.root().contains("8"));
    assert_eq!(thread.detached, vec!["7".to_string(), "8".to_string()]);
}

#[test]
fn test_main_thread_only_follows_first_reply() {
    let posts = vec![
        post("1", None, 0),
        post("2", Some("1"), 1),
        post("3", Some("1"), 2),
        post("4", Some("2"), 3),
        post("5", Some("2"), 4),
        post("6", Some("4"), 5),
        post("7", Some("5"), 6),
    ];

    let thread = ThreadAssembler::new(AssembleMode::MainThreadOnly)
        .assemble(&posts, "1")
        .unwrap();

    // Every direct reply to the root survives
    assert_eq!(thread.root().child_ids(), vec!["2", "3"]);
    // Below that only the first reply chain is followed
    assert_eq!(thread.root().find("2").unwrap().child_ids(), vec!["4"]);
    assert_eq!(thread.root().find("4").unwrap().child_ids(), vec!["6"]);
    assert!(!thread.root().contains("5"));
    assert!(!thread.root().contains("7"));
    assert_eq!(thread.detached, vec!["5".to_string(), "7".to_string()]);
}

#[test]
fn test_modes_agree_on_linear_chain() {
    let posts = vec![post("1", None, 0), post("2", Some("1"), 1), post("3", Some("2"), 2)];

    let full = ThreadAssembler::new(AssembleMode::FullTree).assemble(&posts, "1").unwrap();
    let main = ThreadAssembler::new(AssembleMode::MainThreadOnly).assemble(&posts, "1").unwrap();

    assert_eq!(full, main);
}

#[test]
fn test_very_deep_chain_is_handled_without_recursion() {
    const DEPTH: usize = 100_000;
    let mut posts = vec![post("0", None, 0)];
    for i in 1..DEPTH {
        posts.push(post(&i.to_string(), Some(&(i - 1).to_string()), i as i64));
    }

    let thread = ThreadAssembler::new(AssembleMode::FullTree)
        .assemble(&posts, "0")
        .unwrap();

    assert_eq!(thread.root().node_count(), DEPTH);
    assert_eq!(thread.root().depth(), DEPTH);
    assert!(thread.root().contains("99999"));

    let json = serde_json::to_string(&thread).unwrap();
    assert!(json.contains("\"id\":\"99999\""));

    let rendered = render_tree(&thread);
    assert_eq!(rendered.lines().count(), DEPTH);

    let copy = thread.clone();
    drop(thread);
    drop(copy);
}
