use threadscope_types::{AssembledThread, NodeRef};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Guides stop growing past this depth; deeper lines carry their depth
/// as a `[n]` marker instead.
pub const MAX_GUIDE_DEPTH: usize = 32;

/// Render the thread as an indented text tree, one post per line.
///
/// Line breaks inside post text are flattened so every post stays on one
/// line. A substituted root is marked as such.
pub fn render_tree(thread: &AssembledThread) -> String {
    let mut out = String::new();
    let marker = if thread.root_fallback {
        "* (oldest available post) "
    } else {
        "* "
    };
    out.push_str(marker);
    out.push_str(&line_for(thread.root()));
    out.push('\n');

    // (node, prefix inherited from ancestors, is last sibling, depth)
    let mut stack: Vec<(NodeRef<'_>, String, bool, usize)> = Vec::new();
    push_children(&mut stack, thread.root(), String::new(), 1);

    while let Some((node, prefix, last, depth)) = stack.pop() {
        out.push_str(&prefix);
        out.push_str(if last { LAST_BRANCH } else { BRANCH });
        if depth > MAX_GUIDE_DEPTH {
            out.push_str(&format!("[{}] ", depth));
        }
        out.push_str(&line_for(node));
        out.push('\n');

        let child_prefix = if depth < MAX_GUIDE_DEPTH {
            format!("{}{}", prefix, if last { SPACE } else { PIPE })
        } else {
            prefix
        };
        push_children(&mut stack, node, child_prefix, depth + 1);
    }

    out
}

fn push_children<'a>(
    stack: &mut Vec<(NodeRef<'a>, String, bool, usize)>,
    node: NodeRef<'a>,
    prefix: String,
    depth: usize,
) {
    let children: Vec<NodeRef<'a>> = node.children().collect();
    let count = children.len();
    for (i, child) in children.into_iter().enumerate().rev() {
        stack.push((child, prefix.clone(), i + 1 == count, depth));
    }
}

fn line_for(node: NodeRef<'_>) -> String {
    node.post()
        .label()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use threadscope_types::Post;

    fn post(id: &str, user: &str) -> Post {
        Post::new(id, "1", user, user, "hi\nthere", Utc.timestamp_opt(0, 0).unwrap())
    }

    #[test]
    fn test_render_shape() {
        let mut thread = AssembledThread::new(post("1", "alice"), false);
        let bob = thread.attach(0, post("2", "bob")).unwrap();
        thread.attach(0, post("3", "carol")).unwrap();
        thread.attach(bob, post("4", "dan")).unwrap();

        let expected = "\
* alice, 1: hi there
├── bob, 2: hi there
│   └── dan, 4: hi there
└── carol, 3: hi there
";
        assert_eq!(render_tree(&thread), expected);
    }

    #[test]
    fn test_fallback_marker() {
        let thread = AssembledThread::new(post("5", "eve"), true);

        assert!(render_tree(&thread).starts_with("* (oldest available post) eve, 5"));
    }

    #[test]
    fn test_deep_chain_indentation_is_capped() {
        let mut thread = AssembledThread::new(post("0", "u"), false);
        let mut parent = 0;
        for i in 1..5_000 {
            parent = thread.attach(parent, post(&i.to_string(), "u")).unwrap();
        }

        let text = render_tree(&thread);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5_000);
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap();
        assert!(widest < MAX_GUIDE_DEPTH * 4 + 40);
        assert!(lines[4_999].contains("[4999] u, 4999"));
        assert!(!lines[MAX_GUIDE_DEPTH].contains('['));
    }
}
