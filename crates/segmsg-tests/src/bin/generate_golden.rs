//! Golden fixture generator for the segmsg conformance suite.
//!
//! Writes every fixture under `tests/golden/`. Run it after changing the
//! test encoder or the example trees, then commit the binary files.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_golden -p segmsg-tests
//! ```
//!
//! # Generated fixtures
//!
//! | File                                   | Contents                                  |
//! |----------------------------------------|-------------------------------------------|
//! | tree_single/message.bin                | Framed 5-node tree, one segment           |
//! | tree_far/message.bin                   | Same tree, child lists behind far pointers |
//! | scenario/segment.bin                   | Unframed 16-byte segment (5, true, 42)    |
//! | edge_cases/truncated/message.bin       | tree_single minus its last 4 bytes        |
//! | edge_cases/trailing_data/message.bin   | tree_single plus 4 zero bytes             |

#![allow(clippy::pedantic)]

use std::path::Path;

use segmsg_tests::{Layout, TreeSpec};

fn main() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let golden_dir = manifest_dir.join("tests/golden");

    let tree = golden_tree();
    let single = tree.encode(Layout::Single).to_framed();
    let far = tree.encode(Layout::FarChildren).to_framed();

    write_file(&golden_dir.join("tree_single/message.bin"), &single);
    write_file(&golden_dir.join("tree_far/message.bin"), &far);
    write_file(
        &golden_dir.join("scenario/segment.bin"),
        &hex::decode("05000000010000002a00000000000000").expect("valid hex"),
    );

    let truncated = &single[..single.len() - 4];
    write_file(&golden_dir.join("edge_cases/truncated/message.bin"), truncated);

    let mut trailing = single.clone();
    trailing.extend_from_slice(&[0; 4]);
    write_file(
        &golden_dir.join("edge_cases/trailing_data/message.bin"),
        &trailing,
    );

    println!("All golden fixtures written to {}", golden_dir.display());
}

/// The tree every golden tree fixture encodes.
fn golden_tree() -> TreeSpec {
    TreeSpec::node(
        1,
        "root",
        vec![
            TreeSpec::node(
                2,
                "a",
                vec![TreeSpec::leaf(4, "a1"), TreeSpec::leaf(5, "a2")],
            ),
            TreeSpec::leaf(3, "b"),
        ],
    )
}

fn write_file(path: &Path, data: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create_dir_all");
    }
    std::fs::write(path, data).expect("write_file");
    println!("  wrote {} ({} bytes) {}", path.display(), data.len(), hex::encode(data));
}
